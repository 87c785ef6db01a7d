use serde::{Deserialize, Serialize};

use mostrador_core::{Entity, UnitId};

/// Measurement unit as loaded from the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub abbreviation: String,
}

impl Entity for Unit {
    type Id = UnitId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Abbreviations of the units considered mass units, in preference order.
///
/// The first entry present in a given catalog is the default an ingredient
/// falls back to when its current unit is not a mass unit.
pub const MASS_UNITS: [&str; 3] = ["kg", "g", "lb"];

/// Abbreviation of the canonical count unit ("each").
pub const COUNT_UNIT: &str = "u";

/// Unit list for one form session, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCatalog {
    units: Vec<Unit>,
}

impl UnitCatalog {
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Resolve a unit abbreviation to its identifier, case-insensitively.
    pub fn id_for_abbreviation(&self, abbreviation: &str) -> Option<UnitId> {
        self.units
            .iter()
            .find(|u| u.abbreviation.eq_ignore_ascii_case(abbreviation))
            .map(|u| u.id)
    }

    /// Resolve a unit identifier back to its abbreviation.
    pub fn abbreviation_of(&self, id: UnitId) -> Option<&str> {
        self.units
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.abbreviation.as_str())
    }

    /// Whether the given unit is one of the fixed mass units.
    pub fn is_mass_unit(&self, id: UnitId) -> bool {
        self.abbreviation_of(id)
            .is_some_and(|abbr| MASS_UNITS.iter().any(|m| abbr.eq_ignore_ascii_case(m)))
    }

    /// The default mass unit for this catalog: kilograms when present,
    /// falling back through grams and pounds.
    pub fn default_mass_unit(&self) -> Option<UnitId> {
        MASS_UNITS
            .iter()
            .find_map(|abbr| self.id_for_abbreviation(abbr))
    }

    /// The canonical count unit, if the catalog carries one.
    pub fn count_unit(&self) -> Option<UnitId> {
        self.id_for_abbreviation(COUNT_UNIT)
    }
}
