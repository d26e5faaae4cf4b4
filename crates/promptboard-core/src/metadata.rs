//! Metadata side panel state.

use crate::object::{ObjectDataPair, ObjectId};

/// The metadata of the selected object, as shown in the side panel.
///
/// Pairs keep the order the store returned them in; edits happen in place
/// and new keys are appended.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataPanel {
    object_id: ObjectId,
    pairs: Vec<ObjectDataPair>,
    /// Row that should receive keyboard focus on the next frame.
    focus: Option<usize>,
}

impl MetadataPanel {
    pub fn new(object_id: ObjectId, pairs: Vec<ObjectDataPair>) -> Self {
        Self {
            object_id,
            pairs,
            focus: None,
        }
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn pairs(&self) -> &[ObjectDataPair] {
        &self.pairs
    }

    /// Value stored under a key.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    /// Update the value of an existing key. Returns false if the key is unknown.
    pub fn set_value(&mut self, key: &str, value: &str) -> bool {
        match self.pairs.iter_mut().find(|pair| pair.key == key) {
            Some(pair) => {
                pair.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Update the value of one row. Returns false if the row is out of range.
    ///
    /// Keys may repeat, so editors address rows rather than keys.
    pub fn set_value_at(&mut self, row: usize, value: &str) -> bool {
        match self.pairs.get_mut(row) {
            Some(pair) => {
                pair.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Append an empty pair under the first unused `<prefix><n>` key and
    /// focus it. Returns the new row index.
    pub fn add_key(&mut self, prefix: &str) -> usize {
        let key = (1..)
            .map(|n| format!("{}{}", prefix, n))
            .find(|candidate| self.value(candidate).is_none())
            .unwrap_or_else(|| prefix.to_string());
        self.pairs.push(ObjectDataPair::new(key, ""));
        let index = self.pairs.len() - 1;
        self.focus = Some(index);
        index
    }

    /// Remove the first pair stored under a key. Returns false if the key is
    /// unknown.
    pub fn remove_key(&mut self, key: &str) -> bool {
        match self.pairs.iter().position(|pair| pair.key == key) {
            Some(row) => self.remove_at(row),
            None => false,
        }
    }

    /// Remove one row. Returns false if the row is out of range.
    pub fn remove_at(&mut self, row: usize) -> bool {
        if row >= self.pairs.len() {
            return false;
        }
        self.pairs.remove(row);
        self.focus = match self.focus {
            Some(focus) if focus == row => None,
            Some(focus) if focus > row => Some(focus - 1),
            other => other,
        };
        true
    }

    /// Row waiting for focus, if any.
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Take the pending focus request.
    pub fn take_focus(&mut self) -> Option<usize> {
        self.focus.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> MetadataPanel {
        MetadataPanel::new(
            "a".to_string(),
            vec![
                ObjectDataPair::new("name", "A"),
                ObjectDataPair::new("type", "rectangle"),
                ObjectDataPair::new("note", ""),
            ],
        )
    }

    #[test]
    fn test_set_value_preserves_order() {
        let mut panel = panel();
        assert!(panel.set_value("type", "circle"));
        let keys: Vec<_> = panel.pairs().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["name", "type", "note"]);
        assert_eq!(panel.value("type"), Some("circle"));
        assert!(!panel.set_value("missing", "x"));
    }

    #[test]
    fn test_add_key_picks_unused_name_and_focuses() {
        let mut panel = panel();
        assert_eq!(panel.add_key("key"), 3);
        assert_eq!(panel.add_key("key"), 4);
        assert_eq!(panel.pairs()[3].key, "key1");
        assert_eq!(panel.pairs()[4].key, "key2");
        assert_eq!(panel.pairs()[4].value, "");
        assert_eq!(panel.take_focus(), Some(4));
        assert_eq!(panel.take_focus(), None);
    }

    #[test]
    fn test_add_key_skips_existing_names() {
        let mut panel = MetadataPanel::new("a".to_string(), vec![ObjectDataPair::new("key1", "x")]);
        panel.add_key("key");
        assert_eq!(panel.pairs()[1].key, "key2");
    }

    #[test]
    fn test_remove_key() {
        let mut panel = panel();
        panel.add_key("key");
        assert!(panel.remove_key("key1"));
        assert_eq!(panel.focus(), None);
        assert!(!panel.remove_key("key1"));
        assert_eq!(panel.pairs().len(), 3);
    }

    #[test]
    fn test_row_edits_with_duplicate_keys() {
        let mut panel = MetadataPanel::new(
            "a".to_string(),
            vec![
                ObjectDataPair::new("tag", "one"),
                ObjectDataPair::new("tag", "two"),
                ObjectDataPair::new("tag", "three"),
            ],
        );

        assert!(panel.set_value_at(1, "edited"));
        let values: Vec<_> = panel.pairs().iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, ["one", "edited", "three"]);
        assert!(!panel.set_value_at(3, "x"));

        assert!(panel.remove_at(2));
        assert_eq!(panel.pairs().len(), 2);
        assert_eq!(panel.pairs()[1].value, "edited");

        // Key removal drops a single row, like row edits touch a single row.
        assert!(panel.remove_key("tag"));
        assert_eq!(panel.pairs(), &[ObjectDataPair::new("tag", "edited")]);
        assert!(!panel.remove_at(5));
    }

    #[test]
    fn test_remove_at_shifts_focus() {
        let mut panel = panel();
        panel.add_key("key");
        assert!(panel.remove_at(0));
        assert_eq!(panel.focus(), Some(2));
        assert!(panel.remove_at(2));
        assert_eq!(panel.focus(), None);
    }
}
