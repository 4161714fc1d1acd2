//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only: the request or policy
//! was rejected before any state was created. Runtime terminations (found,
//! unsatisfiable, iteration bound reached) are expressed via
//! [`crate::search::SearchOutcome`] and are never errors.

use movecompat_kernel::dex::ids::{AbilityId, SpeciesId, MAX_LEVEL};

/// Typed failure for pre-flight search validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("unknown {0}")]
    UnknownSpecies(SpeciesId),
    #[error("unknown {0}")]
    UnknownAbility(AbilityId),
    #[error("level {0} is outside 1..={max}", max = MAX_LEVEL)]
    InvalidLevel(u8),
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },
}
