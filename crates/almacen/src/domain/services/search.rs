//! Search - Free-text and placement filters over cached records
//!
//! Pure functions: no I/O, same input gives the same output, and filtering an
//! already filtered list with the same arguments changes nothing.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ConsolidatedStock, Item, Position, StockEntry, StockRow};
use crate::domain::value_objects::Placement;

/// Records that can be matched by free text
pub trait Searchable {
    /// Concatenated searchable fields (case is normalized by the filter)
    fn search_text(&self) -> String;
}

/// Records that sit at a placement
pub trait Placed {
    fn placement(&self) -> &Placement;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn search_text(&self) -> String {
        (**self).search_text()
    }
}

impl<T: Placed + ?Sized> Placed for &T {
    fn placement(&self) -> &Placement {
        (**self).placement()
    }
}

fn join_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Searchable for StockEntry {
    fn search_text(&self) -> String {
        join_fields([
            self.category.as_str(),
            self.description.as_str(),
            self.partition.as_deref().unwrap_or_default(),
            self.supplier_name().unwrap_or_default(),
        ])
    }
}

impl Searchable for Item {
    fn search_text(&self) -> String {
        join_fields([
            self.category.as_str(),
            self.description.as_str(),
            self.supplier
                .as_ref()
                .and_then(|s| s.name.as_deref())
                .unwrap_or_default(),
        ])
    }
}

impl Searchable for ConsolidatedStock {
    fn search_text(&self) -> String {
        join_fields([
            self.category.as_str(),
            self.description.as_str(),
            self.supplier
                .as_ref()
                .and_then(|s| s.name.as_deref())
                .unwrap_or_default(),
        ])
    }
}

impl Searchable for StockRow {
    fn search_text(&self) -> String {
        self.entry.search_text()
    }
}

impl Searchable for Position {
    fn search_text(&self) -> String {
        let mut text = self.title();
        for entry in &self.entries {
            text.push(' ');
            text.push_str(&entry.search_text());
        }
        text
    }
}

impl Placed for Position {
    fn placement(&self) -> &Placement {
        &self.placement
    }
}

impl Placed for StockRow {
    fn placement(&self) -> &Placement {
        &self.placement
    }
}

/// Lowercased words of a search term
pub fn search_words(term: &str) -> Vec<String> {
    term.split_whitespace().map(str::to_lowercase).collect()
}

/// True when every word occurs somewhere in the record's search text
pub fn matches_words<T: Searchable>(record: &T, words: &[String]) -> bool {
    if words.is_empty() {
        return true;
    }
    let text = record.search_text().to_lowercase();
    words.iter().all(|word| text.contains(word.as_str()))
}

/// Keep records containing every word of `term`
///
/// A blank term returns the records unchanged.
pub fn filter_by_search<I, T>(records: I, term: &str) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Searchable,
{
    let words = search_words(term);
    records
        .into_iter()
        .filter(|record| matches_words(record, &words))
        .collect()
}

/// Optional equality constraints on a placement, as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacementCriteria {
    #[serde(default)]
    pub rack: Option<String>,
    #[serde(default)]
    pub row: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub aisle: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn numeric_matches(criterion: Option<&str>, actual: Option<i64>) -> bool {
    match criterion {
        None => true,
        Some(raw) => match raw.parse::<i64>() {
            Ok(expected) => actual == Some(expected),
            Err(_) => false,
        },
    }
}

impl PlacementCriteria {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        present(&self.rack).is_none()
            && present(&self.row).is_none()
            && present(&self.level).is_none()
            && present(&self.aisle).is_none()
    }

    pub fn matches(&self, placement: &Placement) -> bool {
        let level_ok = match present(&self.level) {
            None => true,
            Some(label) => placement
                .level()
                .map(|level| level.to_string() == label)
                .unwrap_or(false),
        };

        level_ok
            && numeric_matches(present(&self.rack), placement.rack())
            && numeric_matches(present(&self.row), placement.row())
            && numeric_matches(present(&self.aisle), placement.aisle())
    }
}

/// Keep records whose placement satisfies every present criterion
pub fn filter_by_placement<I, T>(records: I, criteria: &PlacementCriteria) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Placed,
{
    records
        .into_iter()
        .filter(|record| criteria.matches(record.placement()))
        .collect()
}

/// Free-text filter followed by the placement filter
pub fn filter_records<I, T>(records: I, term: &str, criteria: &PlacementCriteria) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Searchable + Placed,
{
    filter_by_placement(filter_by_search(records, term), criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SupplierRef;
    use crate::domain::value_objects::Level;
    use rust_decimal::Decimal;

    fn entry(item: &str, category: &str, description: &str) -> StockEntry {
        StockEntry {
            item_id: item.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            supplier: Some(SupplierRef {
                id: "prov-1".to_string(),
                name: Some("Hilados del Sur".to_string()),
            }),
            partition: Some("P-2291".to_string()),
            kilos: Decimal::from(50),
            units: 10,
        }
    }

    fn positions() -> Vec<Position> {
        vec![
            Position::new(
                "r5",
                Placement::RackRowLevel {
                    rack: 5,
                    row: 3,
                    level: Level::A,
                },
            )
            .with_entries(vec![entry("X", "nylon", "negro 16/1")]),
            Position::new(
                "r7",
                Placement::RackRowLevel {
                    rack: 7,
                    row: 1,
                    level: Level::B,
                },
            )
            .with_entries(vec![entry("W", "algodon", "crudo 20/1")]),
            Position::new("a3", Placement::Aisle { number: 3 })
                .with_entries(vec![entry("V", "nylon", "azul 30/1")]),
            Position::new("in", Placement::Entry),
        ]
    }

    fn ids<T: std::ops::Deref<Target = Position>>(found: &[T]) -> Vec<&str> {
        found.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_all_words_must_match() {
        let all = positions();
        assert_eq!(ids(&filter_by_search(&all, "16/1 negro")), vec!["r5"]);
        assert!(filter_by_search(&all, "16/1 azul").is_empty());
    }

    #[test]
    fn test_word_order_does_not_matter() {
        let all = positions();
        assert_eq!(
            filter_by_search(&all, "nylon negro"),
            filter_by_search(&all, "negro nylon")
        );
    }

    #[test]
    fn test_case_insensitive_and_title_searchable() {
        let all = positions();
        assert_eq!(ids(&filter_by_search(&all, "AISLE 3")), vec!["a3"]);
        assert_eq!(ids(&filter_by_search(&all, "entry")), vec!["in"]);
        assert_eq!(filter_by_search(&all, "hilados").len(), 3);
        assert_eq!(filter_by_search(&all, "p-2291").len(), 3);
    }

    #[test]
    fn test_blank_search_is_identity() {
        let all = positions();
        assert_eq!(filter_by_search(all.clone(), ""), all);
        assert_eq!(filter_by_search(all.clone(), "   \t "), all);
    }

    #[test]
    fn test_search_is_idempotent() {
        let all = positions();
        let once = filter_by_search(all, "nylon");
        let twice = filter_by_search(once.clone(), "nylon");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let all = positions();
        let blank = PlacementCriteria {
            rack: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank.is_empty());
        assert_eq!(filter_by_placement(all.clone(), &blank), all);
        assert_eq!(
            filter_by_placement(all.clone(), &PlacementCriteria::default()),
            all
        );
    }

    #[test]
    fn test_placement_criteria() {
        let all = positions();
        let rack_five = PlacementCriteria {
            rack: Some("5".to_string()),
            row: Some("3".to_string()),
            level: Some("A".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_by_placement(&all, &rack_five)), vec!["r5"]);

        let level_b = PlacementCriteria {
            level: Some("B".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_by_placement(&all, &level_b)), vec!["r7"]);

        let aisle = PlacementCriteria {
            aisle: Some("3".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_by_placement(&all, &aisle)), vec!["a3"]);
    }

    #[test]
    fn test_unparseable_number_matches_nothing() {
        let all = positions();
        let bad = PlacementCriteria {
            rack: Some("five".to_string()),
            ..Default::default()
        };
        assert!(filter_by_placement(&all, &bad).is_empty());
    }

    #[test]
    fn test_combined_filter() {
        let all = positions();
        let criteria = PlacementCriteria {
            aisle: Some("3".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_records(&all, "nylon", &criteria)), vec!["a3"]);
        assert!(filter_records(&all, "negro", &criteria).is_empty());
    }

    #[test]
    fn test_stock_rows_and_items() {
        let rows: Vec<StockRow> = positions().iter().flat_map(Position::rows).collect();
        let found = filter_by_search(&rows, "crudo");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position_id, "r7");

        let item = Item {
            id: "X".to_string(),
            category: "Nylon".to_string(),
            description: "Negro 16/1".to_string(),
            supplier: None,
        };
        assert_eq!(filter_by_search([item], "negro nylon").len(), 1);
    }
}
