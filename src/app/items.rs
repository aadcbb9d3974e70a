use log::debug;

/// Colors handed out to new items, in order
pub const PALETTE: [&str; 10] = [
    "#ef4444", "#f97316", "#f59e0b", "#84cc16", "#10b981", "#06b6d4", "#3b82f6", "#8b5cf6",
    "#d946ef", "#f43f5e",
];

/// Items a fresh wheel starts with
pub const DEFAULT_ITEMS: [&str; 5] = ["Yakiniku", "Sushi", "Ramen", "Pizza", "Udon"];

/// A selectable option on the wheel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Unique identifier for the item
    pub id: String,
    /// Text shown on the slice
    pub label: String,
    /// Slice color as `#rrggbb`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("Item text cannot be empty")]
    EmptyLabel,
}

/// Ordered collection of wheel items
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a store holding `labels`, skipping blank ones
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for label in labels {
            let _ = store.add(label.as_ref());
        }
        store
    }

    /// Appends a new item. The label is trimmed and must not be empty.
    pub fn add(&mut self, label: &str) -> Result<&Item, ItemError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ItemError::EmptyLabel);
        }

        let item = Item {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.to_string(),
            color: PALETTE[self.items.len() % PALETTE.len()].to_string(),
        };
        debug!("Added item '{}' ({})", item.label, item.id);

        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Removes the item with `id`, keeping the order of the rest
    pub fn remove(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let item = self.items.remove(index);
        debug!("Removed item '{}' ({})", item.label, item.id);
        Some(item)
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(store: &ItemStore) -> Vec<&str> {
        store.items().iter().map(|item| item.label.as_str()).collect()
    }

    #[test]
    fn test_add_trims_and_assigns_palette_colors() {
        let mut store = ItemStore::new();
        let first = store.add("  Curry  ").unwrap().clone();
        assert_eq!(first.label, "Curry");
        assert_eq!(first.color, PALETTE[0]);

        for i in 1..12 {
            store.add(&format!("Item {i}")).unwrap();
        }
        assert_eq!(store.items()[10].color, PALETTE[0]);
        assert_eq!(store.items()[11].color, PALETTE[1]);
    }

    #[test]
    fn test_add_rejects_blank_labels() {
        let mut store = ItemStore::new();
        assert_eq!(store.add("   ").unwrap_err(), ItemError::EmptyLabel);
        assert_eq!(store.add("").unwrap_err(), ItemError::EmptyLabel);
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = ItemStore::with_labels(["a", "a", "a"]);
        let ids: std::collections::HashSet<_> =
            store.items().iter().map(|item| item.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert!(store.add("b").is_ok());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store = ItemStore::with_labels(["a", "b", "c", "d"]);
        let id = store.items()[1].id.clone();

        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.label, "b");
        assert_eq!(labels(&store), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = ItemStore::with_labels(["a", "b"]);
        assert!(store.remove("missing").is_none());
        assert_eq!(labels(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_with_labels_skips_blank() {
        let store = ItemStore::with_labels(DEFAULT_ITEMS.iter().chain([" "].iter()));
        assert_eq!(store.len(), DEFAULT_ITEMS.len());
        assert_eq!(store.get(0).map(|item| item.label.as_str()), Some("Yakiniku"));
    }
}
