//! Reference records - Items, suppliers and consolidated stock

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ConsolidatedStock, Item, Supplier, SupplierRef};

fn supplier_ref(id: Option<String>, name: Option<String>) -> Option<SupplierRef> {
    id.map(|id| SupplierRef { id, name })
}

/// Item as sent by `GET /items`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proveedor: Option<String>,
    #[serde(
        default,
        rename = "proveedorNombre",
        skip_serializing_if = "Option::is_none"
    )]
    pub proveedor_nombre: Option<String>,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.id,
            category: record.categoria,
            description: record.descripcion,
            supplier: supplier_ref(record.proveedor, record.proveedor_nombre),
        }
    }
}

/// Supplier or client as sent by `GET /proveedores`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub categoria: String,
}

impl From<SupplierRecord> for Supplier {
    fn from(record: SupplierRecord) -> Self {
        Self {
            id: record.id,
            name: record.nombre,
            category: record.categoria,
        }
    }
}

/// Consolidated stock row as sent by `GET /stock/consolidado`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub item: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proveedor: Option<String>,
    #[serde(
        default,
        rename = "proveedorNombre",
        skip_serializing_if = "Option::is_none"
    )]
    pub proveedor_nombre: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub kilos: Decimal,
    #[serde(default)]
    pub unidades: i64,
    #[serde(default)]
    pub posiciones: usize,
}

impl From<ConsolidatedRecord> for ConsolidatedStock {
    fn from(record: ConsolidatedRecord) -> Self {
        Self {
            item_id: record.item,
            category: record.categoria,
            description: record.descripcion,
            supplier: supplier_ref(record.proveedor, record.proveedor_nombre),
            kilos: record.kilos,
            units: record.unidades,
            positions: record.posiciones,
        }
    }
}
