//! ConsolidatedStock - Per-item totals across every position

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Position, SupplierRef};

/// ConsolidatedStock - Total stock of one item in the warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsolidatedStock {
    pub item_id: String,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierRef>,
    pub kilos: Decimal,
    pub units: i64,
    /// Number of positions holding the item
    pub positions: usize,
}

impl ConsolidatedStock {
    /// Aggregate cached positions into per-item totals, in first-seen order
    ///
    /// Lots of one item are summed together; a position holding several lots
    /// of an item counts once.
    pub fn from_positions(positions: &[Position]) -> Vec<ConsolidatedStock> {
        let mut totals: Vec<ConsolidatedStock> = Vec::new();

        for position in positions {
            let mut counted: Vec<&str> = Vec::new();
            for entry in &position.entries {
                let first_here = !counted.contains(&entry.item_id.as_str());
                if first_here {
                    counted.push(&entry.item_id);
                }

                match totals.iter_mut().find(|t| t.item_id == entry.item_id) {
                    Some(total) => {
                        total.kilos += entry.kilos;
                        total.units += entry.units;
                        if first_here {
                            total.positions += 1;
                        }
                    }
                    None => totals.push(ConsolidatedStock {
                        item_id: entry.item_id.clone(),
                        category: entry.category.clone(),
                        description: entry.description.clone(),
                        supplier: entry.supplier.clone(),
                        kilos: entry.kilos,
                        units: entry.units,
                        positions: 1,
                    }),
                }
            }
        }

        totals
    }
}
