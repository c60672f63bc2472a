//! Purchase categories.

use serde::{Deserialize, Serialize};

/// Id of the sentinel category used when none was chosen.
pub const OTHER_ID: &str = "other";

/// A purchase category, snapshotted onto each cart item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

// id, name, icon. "other" must stay last.
const CATALOG: &[(&str, &str, &str)] = &[
    ("food", "Food & Drinks", "🍽️"),
    ("tech", "Technology", "💻"),
    ("fashion", "Fashion", "👕"),
    ("transport", "Transportation", "🚆"),
    ("beauty", "Beauty & Health", "💄"),
    ("gifts", "Gifts & Souvenirs", "🎁"),
    ("entertainment", "Entertainment", "🎭"),
    (OTHER_ID, "Other", "📦"),
];

impl Category {
    fn from_entry(&(id, name, icon): &(&str, &str, &str)) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }

    /// Returns the full catalog in display order.
    pub fn all() -> Vec<Category> {
        CATALOG.iter().map(Self::from_entry).collect()
    }

    /// Looks up a catalog category by id.
    pub fn find(id: &str) -> Option<Category> {
        CATALOG
            .iter()
            .find(|(c, ..)| *c == id)
            .map(Self::from_entry)
    }

    /// The sentinel "other" category.
    pub fn other() -> Category {
        Self {
            id: OTHER_ID.to_string(),
            name: "Other".to_string(),
            icon: "📦".to_string(),
        }
    }

    pub fn is_other(&self) -> bool {
        self.id == OTHER_ID
    }

    /// Position in the catalog, `None` for ids the catalog does not know.
    pub fn catalog_position(id: &str) -> Option<usize> {
        CATALOG.iter().position(|(c, ..)| *c == id)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::other()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_last_in_catalog() {
        let all = Category::all();
        assert_eq!(all.len(), 8);
        assert_eq!(all.last(), Some(&Category::other()));
    }

    #[test]
    fn test_find() {
        assert_eq!(Category::find("tech").unwrap().name, "Technology");
        assert!(Category::find("weapons").is_none());
    }

    #[test]
    fn test_default_is_other() {
        assert!(Category::default().is_other());
    }
}
