//! Supplier - Counterparty that delivers or receives goods

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::SupplierRole;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// Raw category tag as sent by the backend
    pub category: String,
}

impl Supplier {
    pub fn role(&self) -> SupplierRole {
        SupplierRole::from_tag(&self.category)
    }

    pub fn is_supplier(&self) -> bool {
        self.role() == SupplierRole::Supplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_category() {
        let s = Supplier {
            id: "p1".to_string(),
            name: "Hilados del Sur".to_string(),
            category: "Proveedor".to_string(),
        };
        assert!(s.is_supplier());

        let c = Supplier {
            category: "cliente".to_string(),
            ..s
        };
        assert_eq!(c.role(), SupplierRole::Client);
    }
}
