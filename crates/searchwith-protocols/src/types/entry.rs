//! Field-set entries.
//!
//! An entry is either a named URL template or a separator. On disk both use
//! the `{name, url?}` shape, with the reserved name `_separator_` marking a
//! separator.

use serde::{Deserialize, Serialize};

/// Reserved entry name that marks a separator.
pub const SEPARATOR_NAME: &str = "_separator_";

/// Placeholder token substituted with the clicked content.
pub const URL_PLACEHOLDER: &str = "%s";

/// One entry of a field-set list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntry", into = "RawEntry")]
pub enum Entry {
    /// A named URL template.
    Link {
        name: String,
        /// Template containing at most one `%s`. May be absent in
        /// hand-edited or imported data.
        url: Option<String>,
    },
    /// A menu separator.
    Separator,
}

impl Entry {
    /// Create a link entry.
    pub fn link(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Link {
            name: name.into(),
            url: Some(url.into()),
        }
    }

    /// Create a separator entry.
    pub fn separator() -> Self {
        Self::Separator
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }

    /// Display name. Separators report the reserved name.
    pub fn name(&self) -> &str {
        match self {
            Self::Link { name, .. } => name,
            Self::Separator => SEPARATOR_NAME,
        }
    }

    /// URL template, treating an empty string as absent.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Link { url: Some(url), .. } if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawEntry {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

// A separator's `url` is not kept, so it does not survive a re-save.
impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        if raw.name == SEPARATOR_NAME {
            Entry::Separator
        } else {
            Entry::Link {
                name: raw.name,
                url: raw.url,
            }
        }
    }
}

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Link { name, url } => RawEntry { name, url },
            Entry::Separator => RawEntry {
                name: SEPARATOR_NAME.to_string(),
                url: None,
            },
        }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
