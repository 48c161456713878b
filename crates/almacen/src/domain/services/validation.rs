//! Validation - Local checks run before any cache write or backend call

use rust_decimal::Decimal;

use crate::domain::entities::{
    AdjustmentDirection, InternalTransfer, QuickAdd, Remito, StockAdjustment, Supplier,
};
use crate::domain::errors::DomainError;
use crate::domain::services::PositionCache;

fn require(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Quantities must be non-negative and not both zero
pub fn validate_quantities(kilos: Decimal, units: i64) -> Result<(), DomainError> {
    if kilos < Decimal::ZERO || units < 0 {
        return Err(DomainError::validation("Quantities cannot be negative"));
    }
    if kilos.is_zero() && units == 0 {
        return Err(DomainError::validation("Enter a quantity in kilos or units"));
    }
    Ok(())
}

fn lot_label(item_id: &str, partition: Option<&str>) -> String {
    match partition {
        Some(p) => format!("{} (lot {})", item_id, p),
        None => item_id.to_string(),
    }
}

/// Requested amounts must not exceed what the cache holds for the lot
///
/// Without a partition the item's first entry at the position is checked,
/// the same lot the stock service resolves to.
fn check_available(
    cache: &PositionCache,
    position_id: &str,
    item_id: &str,
    partition: Option<&str>,
    kilos: Decimal,
    units: i64,
) -> Result<(), DomainError> {
    let (available_kilos, available_units) = cache
        .position(position_id)
        .and_then(|p| p.entry_for(item_id, partition))
        .map(|e| (e.kilos, e.units))
        .unwrap_or((Decimal::ZERO, 0));

    if kilos > available_kilos {
        return Err(DomainError::validation(format!(
            "Requested {} kg of {} but only {} kg are available",
            kilos,
            lot_label(item_id, partition),
            available_kilos
        )));
    }
    if units > available_units {
        return Err(DomainError::validation(format!(
            "Requested {} units of {} but only {} are available",
            units,
            lot_label(item_id, partition),
            available_units
        )));
    }
    Ok(())
}

pub fn validate_transfer(
    transfer: &InternalTransfer,
    cache: &PositionCache,
) -> Result<(), DomainError> {
    require(&transfer.item_id, "Item")?;
    require(&transfer.from_position_id, "Source position")?;
    require(&transfer.to_position_id, "Destination position")?;
    if transfer.from_position_id == transfer.to_position_id {
        return Err(DomainError::validation(
            "Source and destination positions must differ",
        ));
    }
    validate_quantities(transfer.kilos, transfer.units)?;
    check_available(
        cache,
        &transfer.from_position_id,
        &transfer.item_id,
        transfer.partition.as_deref(),
        transfer.kilos,
        transfer.units,
    )
}

pub fn validate_quick_add(add: &QuickAdd) -> Result<(), DomainError> {
    require(&add.position_id, "Position")?;
    require(&add.entry.item_id, "Item")?;
    validate_quantities(add.entry.kilos, add.entry.units)
}

pub fn validate_adjustment(
    adjustment: &StockAdjustment,
    cache: &PositionCache,
) -> Result<(), DomainError> {
    require(&adjustment.position_id, "Position")?;
    require(&adjustment.item_id, "Item")?;
    validate_quantities(adjustment.kilos, adjustment.units)?;

    match adjustment.direction {
        AdjustmentDirection::Decrease => check_available(
            cache,
            &adjustment.position_id,
            &adjustment.item_id,
            adjustment.partition.as_deref(),
            adjustment.kilos,
            adjustment.units,
        ),
        AdjustmentDirection::Increase => {
            let present = cache
                .position(&adjustment.position_id)
                .and_then(|p| p.entry_for(&adjustment.item_id, adjustment.partition.as_deref()))
                .is_some();
            if !present {
                return Err(DomainError::validation(format!(
                    "Item {} is not stored at this position; use a quick add instead",
                    lot_label(&adjustment.item_id, adjustment.partition.as_deref())
                )));
            }
            Ok(())
        }
    }
}

/// Check a remito against the known suppliers
///
/// An unknown supplier id is accepted (the reference list may be stale); a
/// known counterparty that is not a supplier is rejected.
pub fn validate_remito(remito: &Remito, suppliers: &[Supplier]) -> Result<(), DomainError> {
    require(&remito.number, "Remito number")?;
    require(&remito.supplier_id, "Supplier")?;

    if let Some(supplier) = suppliers.iter().find(|s| s.id == remito.supplier_id) {
        if !supplier.is_supplier() {
            return Err(DomainError::validation(format!(
                "{} is registered as {}, not as a supplier",
                supplier.name,
                supplier.role()
            )));
        }
    }

    if remito.lines.is_empty() {
        return Err(DomainError::validation("A remito needs at least one line"));
    }
    for (n, line) in remito.lines.iter().enumerate() {
        require(&line.item_id, &format!("Item on line {}", n + 1))?;
        validate_quantities(line.kilos, line.units).map_err(|e| {
            DomainError::validation(format!("Line {}: {}", n + 1, e.user_message()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Position, RemitoLine, StockEntry};
    use crate::domain::value_objects::Placement;

    fn cache() -> PositionCache {
        PositionCache::new(vec![
            Position::new("a1", Placement::Aisle { number: 1 })
                .with_entries(vec![StockEntry::bare("X", Decimal::from(50), 10)]),
            Position::new("a2", Placement::Aisle { number: 2 }),
        ])
    }

    fn transfer(kilos: i64, units: i64) -> InternalTransfer {
        InternalTransfer {
            item_id: "X".to_string(),
            partition: None,
            from_position_id: "a1".to_string(),
            to_position_id: "a2".to_string(),
            kilos: Decimal::from(kilos),
            units,
        }
    }

    #[test]
    fn test_transfer_within_stock() {
        assert!(validate_transfer(&transfer(50, 10), &cache()).is_ok());
    }

    #[test]
    fn test_transfer_exceeding_stock() {
        let err = validate_transfer(&transfer(51, 1), &cache()).unwrap_err();
        assert!(err.is_validation());
        assert!(validate_transfer(&transfer(1, 11), &cache()).is_err());
    }

    #[test]
    fn test_transfer_checks_named_lot() {
        let mut p100 = StockEntry::bare("X", Decimal::from(10), 1);
        p100.partition = Some("P-100".to_string());
        let mut p200 = StockEntry::bare("X", Decimal::from(30), 5);
        p200.partition = Some("P-200".to_string());
        let cache = PositionCache::new(vec![
            Position::new("a1", Placement::Aisle { number: 1 }).with_entries(vec![p100, p200]),
            Position::new("a2", Placement::Aisle { number: 2 }),
        ]);

        let mut t = transfer(20, 5);
        t.partition = Some("P-200".to_string());
        assert!(validate_transfer(&t, &cache).is_ok());

        t.partition = Some("P-100".to_string());
        let err = validate_transfer(&t, &cache).unwrap_err();
        assert!(err.user_message().contains("lot P-100"));

        t.partition = None;
        assert!(validate_transfer(&t, &cache).is_err());
    }

    #[test]
    fn test_transfer_same_position() {
        let mut t = transfer(1, 1);
        t.to_position_id = "a1".to_string();
        assert!(validate_transfer(&t, &cache()).is_err());
    }

    #[test]
    fn test_quantities() {
        assert!(validate_quantities(Decimal::ZERO, 0).is_err());
        assert!(validate_quantities(Decimal::from(-1), 3).is_err());
        assert!(validate_quantities(Decimal::ZERO, 1).is_ok());
    }

    #[test]
    fn test_increase_requires_existing_entry() {
        let adjustment = StockAdjustment {
            position_id: "a2".to_string(),
            item_id: "X".to_string(),
            partition: None,
            direction: AdjustmentDirection::Increase,
            kilos: Decimal::from(1),
            units: 0,
            reason: None,
        };
        assert!(validate_adjustment(&adjustment, &cache()).is_err());

        let on_a1 = StockAdjustment {
            position_id: "a1".to_string(),
            ..adjustment
        };
        assert!(validate_adjustment(&on_a1, &cache()).is_ok());
    }

    #[test]
    fn test_remito_rules() {
        let suppliers = vec![Supplier {
            id: "c1".to_string(),
            name: "Tejeduria Norte".to_string(),
            category: "cliente".to_string(),
        }];
        let mut remito = Remito {
            number: "0001-00001234".to_string(),
            supplier_id: "c1".to_string(),
            date: None,
            lines: vec![RemitoLine {
                item_id: "X".to_string(),
                partition: Some("P-1".to_string()),
                kilos: Decimal::from(20),
                units: 2,
            }],
        };
        assert!(validate_remito(&remito, &suppliers).is_err());

        remito.supplier_id = "p9".to_string();
        assert!(validate_remito(&remito, &suppliers).is_ok());

        remito.lines[0].kilos = Decimal::ZERO;
        remito.lines[0].units = 0;
        let err = validate_remito(&remito, &suppliers).unwrap_err();
        assert!(err.user_message().starts_with("Line 1"));
    }
}
