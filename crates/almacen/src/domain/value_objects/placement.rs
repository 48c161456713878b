//! Placement - Where a position lives in the warehouse

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Rack level label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Level {
    A,
    B,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::A => write!(f, "A"),
            Level::B => write!(f, "B"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Level::A),
            "B" => Ok(Level::B),
            _ => Err(format!("Unknown level: {}", s)),
        }
    }
}

/// Placement scheme of a position
///
/// The backend sends rack coordinates, an aisle number and an entry flag as
/// independent optional fields. They are resolved into exactly one variant
/// when a record is ingested.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Placement {
    RackRowLevel { rack: i64, row: i64, level: Level },
    Aisle { number: i64 },
    Entry,
    #[default]
    Unspecified,
}

/// Raw placement fields as they arrive from the backend or a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementFields {
    pub rack: Option<i64>,
    pub row: Option<i64>,
    pub level: Option<Level>,
    pub aisle: Option<i64>,
    pub entry: bool,
}

impl Placement {
    /// Resolve overlapping optional fields into one placement scheme
    ///
    /// An aisle combined with any rack coordinate, or the entry flag combined
    /// with anything else, is a conflict. Incomplete rack coordinates resolve
    /// to `Unspecified`.
    pub fn resolve(fields: &PlacementFields) -> Result<Self, DomainError> {
        let has_rack = fields.rack.is_some() || fields.row.is_some() || fields.level.is_some();
        let has_aisle = fields.aisle.is_some();

        if has_aisle && has_rack {
            return Err(DomainError::validation(
                "A position cannot have both an aisle and rack coordinates",
            ));
        }
        if fields.entry && (has_aisle || has_rack) {
            return Err(DomainError::validation(
                "The entry position cannot also have an aisle or rack coordinates",
            ));
        }

        let placement = match (fields.aisle, fields.rack, fields.row, fields.level) {
            (Some(number), _, _, _) => Placement::Aisle { number },
            (None, Some(rack), Some(row), Some(level)) => {
                Placement::RackRowLevel { rack, row, level }
            }
            _ if fields.entry => Placement::Entry,
            _ => Placement::Unspecified,
        };
        Ok(placement)
    }

    /// Display title of a position with this placement
    pub fn title(&self) -> String {
        match self {
            Placement::Aisle { number } => format!("Aisle {}", number),
            Placement::RackRowLevel { rack, row, level } => {
                format!("Rack {} - Row {} - Level {}", rack, row, level)
            }
            Placement::Entry => "Entry Position".to_string(),
            Placement::Unspecified => "Unspecified Position".to_string(),
        }
    }

    pub fn rack(&self) -> Option<i64> {
        match self {
            Placement::RackRowLevel { rack, .. } => Some(*rack),
            _ => None,
        }
    }

    pub fn row(&self) -> Option<i64> {
        match self {
            Placement::RackRowLevel { row, .. } => Some(*row),
            _ => None,
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self {
            Placement::RackRowLevel { level, .. } => Some(*level),
            _ => None,
        }
    }

    pub fn aisle(&self) -> Option<i64> {
        match self {
            Placement::Aisle { number } => Some(*number),
            _ => None,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, Placement::Entry)
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(Placement::Aisle { number: 4 }.title(), "Aisle 4");
        assert_eq!(
            Placement::RackRowLevel {
                rack: 5,
                row: 3,
                level: Level::A
            }
            .title(),
            "Rack 5 - Row 3 - Level A"
        );
        assert_eq!(Placement::Entry.title(), "Entry Position");
        assert_eq!(Placement::Unspecified.title(), "Unspecified Position");
    }

    #[test]
    fn test_resolve_schemes() {
        let rack = PlacementFields {
            rack: Some(5),
            row: Some(3),
            level: Some(Level::B),
            ..Default::default()
        };
        assert_eq!(
            Placement::resolve(&rack).unwrap(),
            Placement::RackRowLevel {
                rack: 5,
                row: 3,
                level: Level::B
            }
        );

        let partial = PlacementFields {
            rack: Some(5),
            ..Default::default()
        };
        assert_eq!(Placement::resolve(&partial).unwrap(), Placement::Unspecified);

        let entry = PlacementFields {
            entry: true,
            ..Default::default()
        };
        assert!(Placement::resolve(&entry).unwrap().is_entry());
    }

    #[test]
    fn test_resolve_conflicts() {
        let both = PlacementFields {
            rack: Some(1),
            aisle: Some(2),
            ..Default::default()
        };
        assert!(Placement::resolve(&both).unwrap_err().is_validation());

        let entry_and_aisle = PlacementFields {
            aisle: Some(2),
            entry: true,
            ..Default::default()
        };
        assert!(Placement::resolve(&entry_and_aisle).is_err());
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("a".parse::<Level>().unwrap(), Level::A);
        assert_eq!(" B ".parse::<Level>().unwrap(), Level::B);
        assert!("C".parse::<Level>().is_err());
    }
}
