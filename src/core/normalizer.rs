use std::collections::HashSet;

/// Lower-case and trim a single value
#[inline]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalize every element, preserving order
pub fn normalize_all<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|item| normalize(item.as_ref())).collect()
}

/// Normalize into a set for exact membership checks
pub fn normalize_set<S: AsRef<str>>(items: &[S]) -> HashSet<String> {
    items.iter().map(|item| normalize(item.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Cloud Migration "), "cloud migration");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let items = vec!["B", " a", "C "];
        assert_eq!(normalize_all(&items), vec!["b", "a", "c"]);

        let empty: Vec<String> = vec![];
        assert!(normalize_all(&empty).is_empty());
    }

    #[test]
    fn test_normalize_set_collapses_case() {
        let set = normalize_set(&["3D Printing", "3d printing", "Rapid Prototyping"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("3d printing"));
    }
}
