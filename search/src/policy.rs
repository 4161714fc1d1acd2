//! Search policy: the bound and fixed parameters of one run.

use movecompat_kernel::dex::ids::MAX_LEVEL;

use crate::error::SearchError;

/// Default iteration bound.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000;

/// Search budget and breeding configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Hard cap on processed states. Exceeding it ends the run with
    /// `SearchOutcome::LimitExceeded`, never with `Unsatisfiable`.
    pub max_iterations: u64,
    /// Level at which breeding partners are considered.
    pub breeding_partner_level: u8,
}

impl SearchPolicy {
    /// Validate the policy before a run.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] for a zero iteration bound or a
    /// partner level outside `1..=MAX_LEVEL`.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_iterations == 0 {
            return Err(SearchError::InvalidPolicy {
                detail: "max_iterations must be at least 1".into(),
            });
        }
        if self.breeding_partner_level == 0 || self.breeding_partner_level > MAX_LEVEL {
            return Err(SearchError::InvalidPolicy {
                detail: format!(
                    "breeding_partner_level {} is outside 1..={MAX_LEVEL}",
                    self.breeding_partner_level
                ),
            });
        }
        Ok(())
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            breeding_partner_level: MAX_LEVEL,
        }
    }
}
