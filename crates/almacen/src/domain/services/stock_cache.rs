//! Position Cache - Optimistic in-memory projection of warehouse stock
//!
//! Every write goes through a [`StockMutation`]. Applying a mutation returns
//! its inverse, computed from the values captured before the write, so a
//! caller can undo exactly what it did when the paired backend call fails.
//!
//! Entries are keyed by item and lot (partition). A position may hold several
//! lots of one item; a mutation touches only the lot it names, and an entry
//! without a partition is a lot of its own.
//!
//! Targets that are not in the cache (unknown position, unknown lot) are
//! silent no-ops: the cache may be stale relative to the server.

use rust_decimal::Decimal;

use crate::domain::entities::{Position, StockEntry};

/// A write against the position cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockMutation {
    /// Increment the entry for `entry`'s lot, or append `entry` if absent
    Add {
        position_id: String,
        entry: StockEntry,
    },
    /// Decrement one lot; drop it once kilos ≤ 0 and units ≤ 0
    Remove {
        position_id: String,
        item_id: String,
        partition: Option<String>,
        kilos: Decimal,
        units: i64,
    },
    /// Remove at the source, then add the same lot at the destination
    Move {
        from_position_id: String,
        to_position_id: String,
        item_id: String,
        partition: Option<String>,
        kilos: Decimal,
        units: i64,
    },
    /// Put a previously dropped entry back at its original index
    Reinsert {
        position_id: String,
        index: usize,
        entry: StockEntry,
    },
    /// Apply in order
    Batch(Vec<StockMutation>),
    Noop,
}

impl StockMutation {
    pub fn is_noop(&self) -> bool {
        match self {
            StockMutation::Noop => true,
            StockMutation::Batch(steps) => steps.iter().all(StockMutation::is_noop),
            _ => false,
        }
    }
}

/// Cached positions, in backend order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionCache {
    positions: Vec<Position>,
}

impl PositionCache {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position(&self, position_id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == position_id)
    }

    /// Replace the whole projection with a fresh server read
    pub fn replace_all(&mut self, positions: Vec<Position>) {
        self.positions = positions;
    }

    /// The lot an action on `item_id` at a position refers to
    ///
    /// A given partition is kept; without one, the item's first entry at the
    /// position decides. Falls back to the given partition when nothing
    /// matches.
    pub fn resolve_partition(
        &self,
        position_id: &str,
        item_id: &str,
        partition: Option<&str>,
    ) -> Option<String> {
        self.position(position_id)
            .and_then(|p| p.entry_for(item_id, partition))
            .map(|e| e.partition.clone())
            .unwrap_or_else(|| partition.map(str::to_string))
    }

    fn position_mut(&mut self, position_id: &str) -> Option<&mut Position> {
        self.positions.iter_mut().find(|p| p.id == position_id)
    }

    /// Apply a mutation and return its inverse
    pub fn apply(&mut self, mutation: &StockMutation) -> StockMutation {
        match mutation {
            StockMutation::Add { position_id, entry } => {
                self.add_item_to_position(position_id, entry.clone())
            }
            StockMutation::Remove {
                position_id,
                item_id,
                partition,
                kilos,
                units,
            } => self.remove_quantity_from_position(
                position_id,
                item_id,
                partition.as_deref(),
                *kilos,
                *units,
            ),
            StockMutation::Move {
                from_position_id,
                to_position_id,
                item_id,
                partition,
                kilos,
                units,
            } => self.move_quantity(
                from_position_id,
                to_position_id,
                item_id,
                partition.as_deref(),
                *kilos,
                *units,
            ),
            StockMutation::Reinsert {
                position_id,
                index,
                entry,
            } => self.reinsert(position_id, *index, entry.clone()),
            StockMutation::Batch(steps) => {
                let mut inverses: Vec<StockMutation> =
                    steps.iter().map(|step| self.apply(step)).collect();
                inverses.reverse();
                StockMutation::Batch(inverses)
            }
            StockMutation::Noop => StockMutation::Noop,
        }
    }

    /// Add an entry's amounts to a position
    ///
    /// Increments the existing entry for the same item and lot, otherwise
    /// appends `entry` as-is.
    pub fn add_item_to_position(&mut self, position_id: &str, entry: StockEntry) -> StockMutation {
        let Some(position) = self.position_mut(position_id) else {
            tracing::debug!("add: position {} not cached, skipping", position_id);
            return StockMutation::Noop;
        };

        let inverse = StockMutation::Remove {
            position_id: position_id.to_string(),
            item_id: entry.item_id.clone(),
            partition: entry.partition.clone(),
            kilos: entry.kilos,
            units: entry.units,
        };

        match position.lot_index(&entry.item_id, entry.partition.as_deref()) {
            Some(index) => {
                let existing = &mut position.entries[index];
                existing.kilos += entry.kilos;
                existing.units += entry.units;
            }
            None => position.entries.push(entry),
        }

        inverse
    }

    /// Subtract kilos/units from one lot of an item at a position
    ///
    /// Over-removal is not rejected: the amounts go negative and the entry is
    /// then dropped like any other emptied entry.
    pub fn remove_quantity_from_position(
        &mut self,
        position_id: &str,
        item_id: &str,
        partition: Option<&str>,
        kilos: Decimal,
        units: i64,
    ) -> StockMutation {
        let Some(position) = self.position_mut(position_id) else {
            tracing::debug!("remove: position {} not cached, skipping", position_id);
            return StockMutation::Noop;
        };
        let Some(index) = position.lot_index(item_id, partition) else {
            tracing::debug!(
                "remove: item {} ({:?}) not at {}, skipping",
                item_id,
                partition,
                position_id
            );
            return StockMutation::Noop;
        };

        let snapshot = position.entries[index].clone();
        let entry = &mut position.entries[index];
        entry.kilos -= kilos;
        entry.units -= units;

        if entry.is_empty() {
            position.entries.remove(index);
            StockMutation::Reinsert {
                position_id: position_id.to_string(),
                index,
                entry: snapshot,
            }
        } else {
            StockMutation::Add {
                position_id: position_id.to_string(),
                entry: snapshot.with_amounts(kilos, units),
            }
        }
    }

    /// Move an amount of one lot between positions
    ///
    /// The source entry is captured before it is touched so that a new
    /// destination entry keeps its category, description, supplier and
    /// partition.
    pub fn move_quantity(
        &mut self,
        from_position_id: &str,
        to_position_id: &str,
        item_id: &str,
        partition: Option<&str>,
        kilos: Decimal,
        units: i64,
    ) -> StockMutation {
        let moved = match self
            .position(from_position_id)
            .and_then(|p| p.lot_index(item_id, partition).map(|i| &p.entries[i]))
        {
            Some(original) => original.with_amounts(kilos, units),
            None => StockEntry {
                partition: partition.map(str::to_string),
                ..StockEntry::bare(item_id, kilos, units)
            },
        };

        let undo_remove =
            self.remove_quantity_from_position(from_position_id, item_id, partition, kilos, units);
        let undo_add = self.add_item_to_position(to_position_id, moved);

        StockMutation::Batch(vec![undo_add, undo_remove])
    }

    fn reinsert(&mut self, position_id: &str, index: usize, entry: StockEntry) -> StockMutation {
        let already_present = match self.position(position_id) {
            Some(position) => position
                .lot_index(&entry.item_id, entry.partition.as_deref())
                .is_some(),
            None => return StockMutation::Noop,
        };
        if already_present {
            return self.add_item_to_position(position_id, entry);
        }
        let Some(position) = self.position_mut(position_id) else {
            return StockMutation::Noop;
        };

        let inverse = StockMutation::Remove {
            position_id: position_id.to_string(),
            item_id: entry.item_id.clone(),
            partition: entry.partition.clone(),
            kilos: entry.kilos,
            units: entry.units,
        };
        let at = index.min(position.entries.len());
        position.entries.insert(at, entry);
        inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SupplierRef;
    use crate::domain::value_objects::{Level, Placement};

    const P100: Option<&str> = Some("P-100");

    fn kg(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn nylon(kilos: i64, units: i64) -> StockEntry {
        StockEntry {
            item_id: "X".to_string(),
            category: "nylon".to_string(),
            description: "negro 16/1".to_string(),
            supplier: Some(SupplierRef {
                id: "prov-1".to_string(),
                name: Some("Hilados del Sur".to_string()),
            }),
            partition: Some("P-100".to_string()),
            kilos: kg(kilos),
            units,
        }
    }

    fn cache() -> PositionCache {
        PositionCache::new(vec![
            Position::new(
                "r5",
                Placement::RackRowLevel {
                    rack: 5,
                    row: 3,
                    level: Level::A,
                },
            )
            .with_entries(vec![
                nylon(50, 10),
                StockEntry::bare("Z", kg(4), 1),
            ]),
            Position::new("a2", Placement::Aisle { number: 2 }),
        ])
    }

    #[test]
    fn test_add_twice_increments_single_entry() {
        let mut cache = cache();
        cache.add_item_to_position("a2", StockEntry::bare("X", kg(5), 2));
        cache.add_item_to_position("a2", StockEntry::bare("X", kg(5), 2));

        let pos = cache.position("a2").unwrap();
        assert_eq!(pos.entries.len(), 1);
        assert_eq!(pos.entries[0].kilos, kg(10));
        assert_eq!(pos.entries[0].units, 4);
    }

    #[test]
    fn test_add_to_missing_position_is_noop() {
        let mut cache = cache();
        let before = cache.clone();
        let inverse = cache.add_item_to_position("nope", StockEntry::bare("X", kg(1), 1));
        assert!(inverse.is_noop());
        assert_eq!(cache, before);
    }

    #[test]
    fn test_full_removal_deletes_entry() {
        let mut cache = cache();
        cache.remove_quantity_from_position("r5", "X", P100, kg(50), 10);
        assert!(cache.position("r5").unwrap().entry("X").is_none());
    }

    #[test]
    fn test_partial_removal() {
        let mut cache = cache();
        cache.remove_quantity_from_position("r5", "X", P100, kg(20), 3);
        let entry = cache.position("r5").unwrap().entry("X").unwrap();
        assert_eq!(entry.kilos, kg(30));
        assert_eq!(entry.units, 7);
    }

    #[test]
    fn test_over_removal_drops_entry() {
        let mut cache = cache();
        cache.remove_quantity_from_position("r5", "X", P100, kg(80), 12);
        assert!(cache.position("r5").unwrap().entry("X").is_none());
    }

    #[test]
    fn test_units_left_keeps_entry() {
        let mut cache = cache();
        cache.remove_quantity_from_position("r5", "X", P100, kg(50), 4);
        let entry = cache.position("r5").unwrap().entry("X").unwrap();
        assert_eq!(entry.kilos, Decimal::ZERO);
        assert_eq!(entry.units, 6);
    }

    #[test]
    fn test_remove_unknown_item_is_noop() {
        let mut cache = cache();
        let before = cache.clone();
        assert!(cache
            .remove_quantity_from_position("r5", "missing", None, kg(1), 1)
            .is_noop());
        assert!(cache
            .remove_quantity_from_position("missing", "X", P100, kg(1), 1)
            .is_noop());
        assert_eq!(cache, before);
    }

    #[test]
    fn test_move_copies_descriptive_fields() {
        let mut cache = cache();
        cache.move_quantity("r5", "a2", "X", P100, kg(50), 10);

        assert!(cache.position("r5").unwrap().entry("X").is_none());
        let moved = cache.position("a2").unwrap().entry("X").unwrap();
        assert_eq!(moved, &nylon(50, 10));
    }

    #[test]
    fn test_move_matches_remove_then_add() {
        let mut moved = cache();
        moved.move_quantity("r5", "a2", "X", P100, kg(20), 4);

        let mut manual = cache();
        let copy = manual.position("r5").unwrap().entry("X").unwrap().clone();
        manual.remove_quantity_from_position("r5", "X", P100, kg(20), 4);
        manual.add_item_to_position("a2", copy.with_amounts(kg(20), 4));

        assert_eq!(moved, manual);
    }

    #[test]
    fn test_move_into_existing_lot_increments() {
        let mut cache = cache();
        cache.add_item_to_position("a2", nylon(1, 1));
        cache.move_quantity("r5", "a2", "X", P100, kg(10), 2);

        let dest = &cache.position("a2").unwrap().entries;
        assert_eq!(dest.len(), 1);
        assert_eq!(dest[0].kilos, kg(11));
        assert_eq!(dest[0].units, 3);
    }

    #[test]
    fn test_move_keeps_lots_apart() {
        let mut cache = cache();
        cache.add_item_to_position("a2", StockEntry::bare("X", kg(1), 1));
        cache.move_quantity("r5", "a2", "X", P100, kg(10), 2);

        let dest = cache.position("a2").unwrap();
        assert_eq!(dest.entries.len(), 2);
        assert_eq!(dest.entry_for("X", None).unwrap().kilos, kg(1));
        assert_eq!(dest.entry_for("X", P100).unwrap().kilos, kg(10));
    }

    #[test]
    fn test_two_lots_of_one_item() {
        let mut p200 = nylon(30, 5);
        p200.partition = Some("P-200".to_string());
        let mut cache = PositionCache::new(vec![
            Position::new("r5", Placement::Entry).with_entries(vec![nylon(10, 1), p200]),
            Position::new("a2", Placement::Aisle { number: 2 }),
        ]);
        let before = cache.clone();

        let mutation = StockMutation::Move {
            from_position_id: "r5".to_string(),
            to_position_id: "a2".to_string(),
            item_id: "X".to_string(),
            partition: Some("P-200".to_string()),
            kilos: kg(5),
            units: 1,
        };
        let inverse = cache.apply(&mutation);

        let source = cache.position("r5").unwrap();
        assert_eq!(source.entry_for("X", P100), Some(&nylon(10, 1)));
        let rest = source.entry_for("X", Some("P-200")).unwrap();
        assert_eq!((rest.kilos, rest.units), (kg(25), 4));
        let moved = cache.position("a2").unwrap();
        assert_eq!(moved.entries.len(), 1);
        assert_eq!(moved.entries[0].partition.as_deref(), Some("P-200"));
        assert_eq!((moved.entries[0].kilos, moved.entries[0].units), (kg(5), 1));

        cache.apply(&inverse);
        assert_eq!(cache, before);
    }

    #[test]
    fn test_move_to_unknown_destination() {
        let mut cache = cache();
        let before = cache.clone();

        let inverse = cache.move_quantity("r5", "nowhere", "X", P100, kg(20), 4);

        let source = cache.position("r5").unwrap().entry("X").unwrap();
        assert_eq!((source.kilos, source.units), (kg(30), 6));
        assert!(cache.position("nowhere").is_none());

        cache.apply(&inverse);
        assert_eq!(cache, before);
    }

    #[test]
    fn test_move_without_source_entry_adds_bare_entry() {
        let mut cache = cache();
        let before = cache.clone();

        let inverse = cache.move_quantity("a2", "r5", "W", None, kg(3), 1);

        assert!(cache.position("a2").unwrap().entries.is_empty());
        let added = cache.position("r5").unwrap().entry("W").unwrap();
        assert_eq!(added, &StockEntry::bare("W", kg(3), 1));

        cache.apply(&inverse);
        assert_eq!(cache, before);
    }

    #[test]
    fn test_reinsert_onto_present_lot_increments() {
        let mut cache = cache();
        let before = cache.clone();

        let inverse = cache.apply(&StockMutation::Reinsert {
            position_id: "r5".to_string(),
            index: 1,
            entry: nylon(5, 1),
        });

        let pos = cache.position("r5").unwrap();
        assert_eq!(pos.entries.len(), 2);
        assert_eq!(pos.entries[0].kilos, kg(55));
        assert_eq!(pos.entries[0].units, 11);

        cache.apply(&inverse);
        assert_eq!(cache, before);
    }

    #[test]
    fn test_rollback_of_add_restores_position() {
        let mut cache = cache();
        let before = cache.clone();

        let inverse = cache.add_item_to_position("r5", StockEntry::bare("Y", kg(3), 1));
        assert_eq!(cache.position("r5").unwrap().entries.len(), 3);

        cache.apply(&inverse);
        assert_eq!(cache, before);
    }

    #[test]
    fn test_rollback_of_full_removal_restores_order() {
        let mut cache = cache();
        let before = cache.clone();

        let inverse = cache.remove_quantity_from_position("r5", "X", P100, kg(50), 10);
        assert!(matches!(inverse, StockMutation::Reinsert { index: 0, .. }));

        cache.apply(&inverse);
        assert_eq!(cache, before);
    }

    #[test]
    fn test_rollback_of_move_restores_both_positions() {
        let mut cache = cache();
        let before = cache.clone();

        let mutation = StockMutation::Move {
            from_position_id: "r5".to_string(),
            to_position_id: "a2".to_string(),
            item_id: "X".to_string(),
            partition: Some("P-100".to_string()),
            kilos: kg(50),
            units: 10,
        };
        let inverse = cache.apply(&mutation);
        assert_ne!(cache, before);

        cache.apply(&inverse);
        assert_eq!(cache, before);
    }

    #[test]
    fn test_inverse_of_inverse_reapplies() {
        let mut cache = cache();
        let inverse = cache.remove_quantity_from_position("r5", "X", P100, kg(5), 1);
        let after_forward = cache.clone();

        let redo = cache.apply(&inverse);
        cache.apply(&redo);
        assert_eq!(cache, after_forward);
    }
}
