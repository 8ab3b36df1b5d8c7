//! URL template substitution.

use searchwith_protocols::URL_PLACEHOLDER;

/// Fill a URL template.
///
/// With content, the first `%s` becomes the percent-encoded content. Without
/// content every `%s` is dropped so no literal placeholder reaches the tab.
pub fn resolve_url(template: &str, content: Option<&str>) -> String {
    match content {
        Some(content) => template.replacen(URL_PLACEHOLDER, &urlencoding::encode(content), 1),
        None => template.replace(URL_PLACEHOLDER, ""),
    }
}
