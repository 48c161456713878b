//! Request bodies - JSON sent with stock-affecting calls

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    AdjustmentDirection, InternalTransfer, QuickAdd, Remito, RemitoLine, StockAdjustment,
};

/// `POST /movimientos/interno`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partida: Option<String>,
    pub posicion_origen: String,
    pub posicion_destino: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub kilos: Decimal,
    pub unidades: i64,
}

impl From<&InternalTransfer> for TransferBody {
    fn from(transfer: &InternalTransfer) -> Self {
        Self {
            item: transfer.item_id.clone(),
            partida: transfer.partition.clone(),
            posicion_origen: transfer.from_position_id.clone(),
            posicion_destino: transfer.to_position_id.clone(),
            kilos: transfer.kilos,
            unidades: transfer.units,
        }
    }
}

/// `POST /movimientos/alta-rapida`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAddBody {
    pub posicion: String,
    pub item: String,
    pub categoria: String,
    pub descripcion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proveedor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partida: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub kilos: Decimal,
    pub unidades: i64,
}

impl From<&QuickAdd> for QuickAddBody {
    fn from(add: &QuickAdd) -> Self {
        Self {
            posicion: add.position_id.clone(),
            item: add.entry.item_id.clone(),
            categoria: add.entry.category.clone(),
            descripcion: add.entry.description.clone(),
            proveedor: add.entry.supplier.as_ref().map(|s| s.id.clone()),
            partida: add.entry.partition.clone(),
            kilos: add.entry.kilos,
            unidades: add.entry.units,
        }
    }
}

/// `POST /movimientos/ajuste`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentBody {
    pub posicion: String,
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partida: Option<String>,
    /// "incremento" or "decremento"
    pub tipo: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub kilos: Decimal,
    pub unidades: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivo: Option<String>,
}

impl From<&StockAdjustment> for AdjustmentBody {
    fn from(adjustment: &StockAdjustment) -> Self {
        let tipo = match adjustment.direction {
            AdjustmentDirection::Increase => "incremento",
            AdjustmentDirection::Decrease => "decremento",
        };
        Self {
            posicion: adjustment.position_id.clone(),
            item: adjustment.item_id.clone(),
            partida: adjustment.partition.clone(),
            tipo,
            kilos: adjustment.kilos,
            unidades: adjustment.units,
            motivo: adjustment.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemitoLineBody {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partida: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub kilos: Decimal,
    pub unidades: i64,
}

impl From<&RemitoLine> for RemitoLineBody {
    fn from(line: &RemitoLine) -> Self {
        Self {
            item: line.item_id.clone(),
            partida: line.partition.clone(),
            kilos: line.kilos,
            unidades: line.units,
        }
    }
}

/// `POST /remitos`
#[derive(Debug, Clone, Serialize)]
pub struct RemitoBody {
    pub numero: String,
    pub proveedor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha: Option<NaiveDate>,
    pub items: Vec<RemitoLineBody>,
}

impl From<&Remito> for RemitoBody {
    fn from(remito: &Remito) -> Self {
        Self {
            numero: remito.number.clone(),
            proveedor: remito.supplier_id.clone(),
            fecha: remito.date,
            items: remito.lines.iter().map(RemitoLineBody::from).collect(),
        }
    }
}
