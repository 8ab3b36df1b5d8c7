//! Effective entry list.

use searchwith_protocols::{Entry, Settings};

/// Field sets, followed by the rated set when the rating gate is open.
pub fn effective_list(settings: &Settings, threshold: u64) -> Vec<Entry> {
    let mut entries = settings.field_sets.clone();
    if settings.rating_gate(threshold).is_open() {
        entries.extend(settings.rated_sets.iter().cloned());
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(is_rating: bool, has_context: u64) -> Settings {
        Settings {
            field_sets: vec![Entry::link("A", "https://a.com/?q=%s")],
            rated_sets: vec![Entry::separator(), Entry::link("Rate", "https://store/x")],
            is_rating,
            has_context,
            interface_id: None,
        }
    }

    #[test]
    fn test_rated_set_absent_at_threshold() {
        assert_eq!(effective_list(&settings(true, 1), 1).len(), 1);
    }

    #[test]
    fn test_rated_set_present_above_threshold() {
        let entries = effective_list(&settings(true, 2), 1);
        assert_eq!(entries.len(), 3);
        assert!(entries[1].is_separator());
        assert_eq!(entries[2].name(), "Rate");
    }

    #[test]
    fn test_rated_set_absent_when_rating_disabled() {
        assert_eq!(effective_list(&settings(false, 50), 1).len(), 1);
    }
}
