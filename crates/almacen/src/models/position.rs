//! Position records - Positions with stock as served by the backend

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DomainError, Level, Placement, PlacementFields, Position, StockEntry, SupplierRef,
};

/// Stock entry as sent inside a position record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntryRecord {
    #[serde(alias = "itemId")]
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partida: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub kilos: Decimal,
    #[serde(default)]
    pub unidades: i64,
}

impl From<StockEntryRecord> for StockEntry {
    fn from(record: StockEntryRecord) -> Self {
        let supplier = record.proveedor.map(|id| SupplierRef {
            id,
            name: record.proveedor_nombre,
        });
        Self {
            item_id: record.item,
            category: record.categoria,
            description: record.descripcion,
            supplier,
            partition: record.partida,
            kilos: record.kilos,
            units: record.unidades,
        }
    }
}

/// Position as sent by `GET /posiciones`
///
/// Rack coordinates, aisle and entry flag are independent optional fields on
/// the wire; `TryFrom` resolves them into a single [`Placement`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fila: Option<i64>,
    #[serde(default, rename = "AB", skip_serializing_if = "Option::is_none")]
    pub ab: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pasillo: Option<i64>,
    #[serde(default)]
    pub entrada: bool,
    #[serde(default)]
    pub items: Vec<StockEntryRecord>,
}

impl PositionRecord {
    fn placement_fields(&self) -> Result<PlacementFields, DomainError> {
        let level = match self.ab.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => Some(label.parse::<Level>().map_err(DomainError::Validation)?),
        };
        Ok(PlacementFields {
            rack: self.rack,
            row: self.fila,
            level,
            aisle: self.pasillo,
            entry: self.entrada,
        })
    }
}

impl TryFrom<PositionRecord> for Position {
    type Error = DomainError;

    fn try_from(record: PositionRecord) -> Result<Self, Self::Error> {
        let placement = Placement::resolve(&record.placement_fields()?).map_err(|e| {
            DomainError::validation(format!("Position {}: {}", record.id, e.user_message()))
        })?;

        let entries = record
            .items
            .into_iter()
            .map(StockEntry::from)
            .filter(|entry| !entry.is_empty())
            .collect();

        Ok(Position::new(record.id, placement).with_entries(entries))
    }
}

/// Convert fetched records, skipping (and logging) those that cannot be resolved
pub fn ingest_positions(records: Vec<PositionRecord>) -> Vec<Position> {
    records
        .into_iter()
        .filter_map(|record| match Position::try_from(record) {
            Ok(position) => Some(position),
            Err(e) => {
                tracing::warn!("Skipping position record: {}", e);
                None
            }
        })
        .collect()
}
