use serde::{Deserialize, Serialize};

/// Favorite category for rental depots; the portal also stores other kinds.
pub const FAVORITE_KIND_RENTAL: &str = "rental";

/// One favorites row, as listed by `GET /api/favorite/list` and as posted to
/// `POST /api/favorite/add`. `item_id` carries the depot name — the feed has
/// no other key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub item_id: String,
    pub item_name: String,
    #[serde(default)]
    pub address: String,
}

impl FavoriteEntry {
    /// Entry for a rental depot keyed by its display name.
    #[must_use]
    pub fn rental(name: &str, address: &str) -> Self {
        Self {
            kind: FAVORITE_KIND_RENTAL.to_owned(),
            item_id: name.to_owned(),
            item_name: name.to_owned(),
            address: address.to_owned(),
        }
    }

    /// Whether this row marks `name` as a favorited rental depot.
    #[must_use]
    pub fn is_rental(&self, name: &str) -> bool {
        self.kind == FAVORITE_KIND_RENTAL && self.item_id == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_is_named_type() {
        let entry = FavoriteEntry::rental("Aewol Depot", "Jeju-si");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "rental");
        assert_eq!(json["item_id"], "Aewol Depot");
        assert_eq!(json["item_name"], "Aewol Depot");
        assert_eq!(json["address"], "Jeju-si");
    }

    #[test]
    fn membership_requires_matching_kind_and_id() {
        let entry = FavoriteEntry::rental("Aewol Depot", "Jeju-si");
        assert!(entry.is_rental("Aewol Depot"));
        assert!(!entry.is_rental("Jocheon Depot"));

        let mut term_entry = entry.clone();
        term_entry.kind = "term".to_owned();
        assert!(!term_entry.is_rental("Aewol Depot"));
    }
}
