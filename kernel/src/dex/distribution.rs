//! Distribution events: individuals handed out with a fixed ability set.

use serde::{Deserialize, Serialize};

use crate::dex::ids::{AbilityId, SpeciesId};

/// An externally granted individual.
///
/// Receiving it at `min_level` or higher yields a creature that already
/// holds every ability in `abilities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEvent {
    pub species: SpeciesId,
    pub min_level: u8,
    pub abilities: Vec<AbilityId>,
    #[serde(default)]
    pub shiny: bool,
    /// Distributed in the legacy era. Presentation only.
    #[serde(default)]
    pub legacy: bool,
}

impl DistributionEvent {
    /// Whether an individual at `level` holding every ability in `required`
    /// can be obtained from this event.
    pub fn covers<'a>(&self, level: u8, required: impl IntoIterator<Item = &'a AbilityId>) -> bool {
        level >= self.min_level
            && required
                .into_iter()
                .all(|ability| self.abilities.contains(ability))
    }
}
