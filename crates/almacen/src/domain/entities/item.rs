//! Item - Reference data for a stocked article

use serde::{Deserialize, Serialize};

use crate::domain::entities::SupplierRef;

/// Item - Read-only article definition fetched from the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierRef>,
}
