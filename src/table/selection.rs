//! Row selection keyed by row identity
//!
//! Keys are whatever the owning table's `row_key` produces. The set keeps
//! insertion order so reported selections read the way the user built them.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Insert a key. Returns false if it was already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Remove a key. Returns false if it was not present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        self.keys.len() != before
    }

    /// Flip membership of a key. Returns the new membership.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.remove(key) {
            false
        } else {
            self.keys.push(key.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for key in iter {
            selection.insert(key);
        }
        selection
    }
}

/// Drop every key that no row of `data` produces.
pub fn reconcile<T, F>(selection: &Selection, data: &[T], row_key: F) -> Selection
where
    F: Fn(&T) -> String,
{
    let live: Vec<String> = data.iter().map(row_key).collect();
    selection
        .keys()
        .filter(|key| live.iter().any(|k| k == key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_only_one_key() {
        let mut selection: Selection = ["a", "b"].into_iter().collect();

        assert!(!selection.toggle("a"));
        assert!(!selection.contains("a"));
        assert!(selection.contains("b"));

        assert!(selection.toggle("a"));
        assert!(selection.contains("a"));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_insert_keeps_order_and_rejects_duplicates() {
        let mut selection = Selection::new();
        assert!(selection.insert("c"));
        assert!(selection.insert("a"));
        assert!(!selection.insert("c"));

        let keys: Vec<&str> = selection.keys().collect();
        assert_eq!(keys, vec!["c", "a"]);
    }

    #[test]
    fn test_reconcile_prunes_missing_rows() {
        let selection: Selection = ["a", "gone", "c"].into_iter().collect();
        let data = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let pruned = reconcile(&selection, &data, |s| s.clone());

        let keys: Vec<&str> = pruned.keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_reconcile_against_empty_data_clears() {
        let selection: Selection = ["a"].into_iter().collect();
        let data: Vec<String> = Vec::new();

        assert!(reconcile(&selection, &data, |s| s.clone()).is_empty());
    }
}
