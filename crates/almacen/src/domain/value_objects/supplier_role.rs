//! SupplierRole - Whether a counterparty supplies or buys goods

use serde::{Deserialize, Serialize};

/// Role derived from a supplier's category tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SupplierRole {
    Supplier,
    Client,
    Other(String),
}

impl SupplierRole {
    /// Resolve a backend category tag ("proveedor", "cliente", ...)
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "proveedor" | "supplier" => SupplierRole::Supplier,
            "cliente" | "client" => SupplierRole::Client,
            other => SupplierRole::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for SupplierRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupplierRole::Supplier => write!(f, "supplier"),
            SupplierRole::Client => write!(f, "client"),
            SupplierRole::Other(tag) => write!(f, "{}", tag),
        }
    }
}
