//! Remito - Goods receipt document

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One received article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemitoLine {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    pub kilos: Decimal,
    pub units: i64,
}

/// Remito - Delivery note for goods received from a supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Remito {
    pub number: String,
    pub supplier_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub lines: Vec<RemitoLine>,
}

impl Remito {
    pub fn total_kilos(&self) -> Decimal {
        self.lines.iter().map(|l| l.kilos).sum()
    }

    pub fn total_units(&self) -> i64 {
        self.lines.iter().map(|l| l.units).sum()
    }
}
