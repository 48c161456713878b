//! StockEntry - Quantity of one item held at a position

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reference to the supplier an item or lot came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplierRef {
    pub id: String,
    /// Display name, when the backend resolved it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// StockEntry - An item (and its lot) stored at a position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockEntry {
    pub item_id: String,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierRef>,
    /// Partition (partida) the stock belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    pub kilos: Decimal,
    /// Signed so that an over-removal is representable before the entry is dropped
    pub units: i64,
}

impl StockEntry {
    /// Entry with only an item id and amounts; descriptive fields left empty
    pub fn bare(item_id: impl Into<String>, kilos: Decimal, units: i64) -> Self {
        Self {
            item_id: item_id.into(),
            category: String::new(),
            description: String::new(),
            supplier: None,
            partition: None,
            kilos,
            units,
        }
    }

    /// Copy of this entry's descriptive fields carrying different amounts
    pub fn with_amounts(&self, kilos: Decimal, units: i64) -> Self {
        Self {
            kilos,
            units,
            ..self.clone()
        }
    }

    /// Same item and same lot (a missing partition is its own lot)
    pub fn is_lot(&self, item_id: &str, partition: Option<&str>) -> bool {
        self.item_id == item_id && self.partition.as_deref() == partition
    }

    /// True when nothing is left (kilos ≤ 0 and units ≤ 0)
    pub fn is_empty(&self) -> bool {
        self.kilos <= Decimal::ZERO && self.units <= 0
    }

    pub fn supplier_name(&self) -> Option<&str> {
        self.supplier.as_ref().and_then(|s| s.name.as_deref())
    }
}
