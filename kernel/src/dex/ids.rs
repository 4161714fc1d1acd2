//! Identifier newtypes for reference data.
//!
//! All ids are plain integers on the wire (`#[serde(transparent)]`) and
//! derive `Ord` so they can key `BTreeMap`s for deterministic iteration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest level a creature can reach.
pub const MAX_LEVEL: u8 = 100;

/// Species identifier (national number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u16);

/// Ability (move) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(pub u16);

/// Elemental type tag. Opaque to the engine; used only for query filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(pub u8);

/// Breeding category (egg group).
///
/// Ids `1..=12` are the regular categories that pair with each other.
/// Everything above is special: the copy-anything category, and
/// [`BreedingCategory::UNDISCOVERED`] for species that cannot breed at all
/// (juveniles carry it until they evolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreedingCategory(pub u8);

impl BreedingCategory {
    /// Last id of the regular categories.
    pub const LAST_REGULAR: Self = Self(12);

    /// The category of species that cannot breed.
    pub const UNDISCOVERED: Self = Self(15);

    /// Whether this category takes part in ordinary breeding.
    #[must_use]
    pub fn is_regular(self) -> bool {
        self.0 >= 1 && self <= Self::LAST_REGULAR
    }
}

/// Ruleset era.
///
/// `Legacy` is the earlier generation with its own level lists and machine
/// table; entering and leaving it requires an explicit transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    Current,
    Legacy,
}

impl Era {
    /// The era selected by a legacy-mode flag.
    #[must_use]
    pub fn from_legacy_mode(legacy_mode: bool) -> Self {
        if legacy_mode {
            Self::Legacy
        } else {
            Self::Current
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "species#{}", self.0)
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability#{}", self.0)
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
