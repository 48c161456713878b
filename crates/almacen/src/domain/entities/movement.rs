//! Movements - Stock-affecting user actions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::StockEntry;

/// Move stock of one item between two positions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InternalTransfer {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    pub from_position_id: String,
    pub to_position_id: String,
    pub kilos: Decimal,
    pub units: i64,
}

/// Put stock straight into a position (no remito)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickAdd {
    pub position_id: String,
    pub entry: StockEntry,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirection {
    Increase,
    Decrease,
}

impl std::fmt::Display for AdjustmentDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustmentDirection::Increase => write!(f, "increase"),
            AdjustmentDirection::Decrease => write!(f, "decrease"),
        }
    }
}

impl std::str::FromStr for AdjustmentDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increase" | "up" | "+" => Ok(AdjustmentDirection::Increase),
            "decrease" | "down" | "-" => Ok(AdjustmentDirection::Decrease),
            _ => Err(format!("Unknown adjustment direction: {}", s)),
        }
    }
}

/// Correct the quantity of an item at a position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockAdjustment {
    pub position_id: String,
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    pub direction: AdjustmentDirection,
    pub kilos: Decimal,
    pub units: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
