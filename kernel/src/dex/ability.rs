//! Ability records.

use serde::{Deserialize, Serialize};

use crate::dex::ids::AbilityId;

/// Immutable reference record for one ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub id: AbilityId,
    pub name: String,
    /// Available under the legacy-era ruleset.
    #[serde(default)]
    pub legacy: bool,
    /// Can never be obtained through the sketch copy mechanism.
    #[serde(default)]
    pub unsketchable: bool,
}
