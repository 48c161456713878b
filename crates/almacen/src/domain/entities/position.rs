//! Position - A storage location and the stock it holds

use serde::{Deserialize, Serialize};

use crate::domain::entities::StockEntry;
use crate::domain::value_objects::Placement;

/// Position - Rack slot, aisle, or the entry (receiving) area
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub id: String,
    pub placement: Placement,
    #[serde(default)]
    pub entries: Vec<StockEntry>,
}

impl Position {
    pub fn new(id: impl Into<String>, placement: Placement) -> Self {
        Self {
            id: id.into(),
            placement,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(mut self, entries: Vec<StockEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Display title derived from the placement
    pub fn title(&self) -> String {
        self.placement.title()
    }

    /// Find the first entry for an item, whatever its lot
    pub fn entry(&self, item_id: &str) -> Option<&StockEntry> {
        self.entries.iter().find(|e| e.item_id == item_id)
    }

    /// Entry for one lot of an item; without a partition, the item's first entry
    pub fn entry_for(&self, item_id: &str, partition: Option<&str>) -> Option<&StockEntry> {
        match partition {
            Some(_) => self.entries.iter().find(|e| e.is_lot(item_id, partition)),
            None => self.entry(item_id),
        }
    }

    /// Index of the entry holding exactly this lot
    pub(crate) fn lot_index(&self, item_id: &str, partition: Option<&str>) -> Option<usize> {
        self.entries.iter().position(|e| e.is_lot(item_id, partition))
    }

    /// Flatten into one row per stock entry
    pub fn rows(&self) -> Vec<StockRow> {
        self.entries
            .iter()
            .map(|entry| StockRow {
                position_id: self.id.clone(),
                placement: self.placement.clone(),
                entry: entry.clone(),
            })
            .collect()
    }
}

/// StockRow - One stock entry together with the placement of its position
///
/// Used by item-oriented lists that still need rack/aisle filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockRow {
    pub position_id: String,
    pub placement: Placement,
    pub entry: StockEntry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_entry_for_picks_lot() {
        let mut p100 = StockEntry::bare("X", Decimal::from(10), 1);
        p100.partition = Some("P-100".to_string());
        let mut p200 = StockEntry::bare("X", Decimal::from(30), 5);
        p200.partition = Some("P-200".to_string());
        let position =
            Position::new("r5", Placement::Entry).with_entries(vec![p100.clone(), p200.clone()]);

        assert_eq!(position.entry_for("X", Some("P-200")), Some(&p200));
        assert_eq!(position.entry_for("X", None), Some(&p100));
        assert_eq!(position.entry_for("X", Some("P-300")), None);
        assert_eq!(position.lot_index("X", None), None);
        assert_eq!(position.lot_index("X", Some("P-200")), Some(1));
    }
}
