//! Search entry point and processing loop.

use std::rc::Rc;

use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::{AbilityId, SpeciesId, MAX_LEVEL};

use crate::error::SearchError;
use crate::frontier::{Admission, DominanceFrontier};
use crate::policy::SearchPolicy;
use crate::rules::TransitionRules;
use crate::state::{AcquisitionState, Requirement};
use crate::trace::Trace;

/// One compatibility query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub species: SpeciesId,
    pub level: u8,
    pub abilities: Requirement,
}

impl SearchRequest {
    #[must_use]
    pub fn new(species: SpeciesId, level: u8, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        Self {
            species,
            level,
            abilities: abilities.into_iter().collect(),
        }
    }

    /// Check the request against a data set.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownSpecies`], [`SearchError::UnknownAbility`]
    /// or [`SearchError::InvalidLevel`].
    pub fn validate(&self, dex: &Dex) -> Result<(), SearchError> {
        if self.level == 0 || self.level > MAX_LEVEL {
            return Err(SearchError::InvalidLevel(self.level));
        }
        if dex.species(self.species).is_none() {
            return Err(SearchError::UnknownSpecies(self.species));
        }
        if let Some(&unknown) = self.abilities.iter().find(|&&a| dex.ability(a).is_none()) {
            return Err(SearchError::UnknownAbility(unknown));
        }
        Ok(())
    }
}

/// Why the processing loop stopped.
#[derive(Debug)]
pub enum Termination {
    /// A satisfied state; its chain is the witness.
    Found(Rc<AcquisitionState>),
    /// The queue drained without finding a satisfied state.
    Unsatisfiable,
    /// The bound on processed states was exceeded.
    LimitExceeded { iterations: u64 },
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped and processed.
    pub processed: u64,
    /// States registered and queued.
    pub admitted: u64,
    /// Candidates rejected by dominance.
    pub dominated: u64,
    /// Largest queue length observed.
    pub frontier_high_water: u64,
}

/// Public outcome of a validated query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Trace),
    Unsatisfiable,
    LimitExceeded { iterations: u64 },
}

impl SearchOutcome {
    /// Stable token used in reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Unsatisfiable => "unsatisfiable",
            Self::LimitExceeded { .. } => "limit_exceeded",
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub fn trace(&self) -> Option<&Trace> {
        match self {
            Self::Found(trace) => Some(trace),
            _ => None,
        }
    }
}

/// Outcome plus counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// Run the processing loop from `initial`.
///
/// Breadth-first: states are processed in admission order. Rules 2 through 6
/// are applied to each popped state and every candidate is admitted through
/// the frontier; the first satisfied state ends the run.
#[must_use]
pub fn run(
    rules: TransitionRules<'_>,
    initial: &Rc<AcquisitionState>,
    policy: &SearchPolicy,
) -> (Termination, SearchStats) {
    let mut frontier = DominanceFrontier::new(rules);
    let mut processed: u64 = 0;

    let termination = 'run: {
        if let Admission::Found(state) = frontier.admit(initial) {
            break 'run Termination::Found(state);
        }

        while let Some(state) = frontier.pop() {
            if processed > policy.max_iterations {
                tracing::warn!(
                    species = %initial.species(),
                    iterations = processed,
                    "iteration bound exceeded"
                );
                break 'run Termination::LimitExceeded {
                    iterations: processed,
                };
            }
            processed += 1;

            if let Some(found) = rules.distribution(&state) {
                break 'run Termination::Found(found);
            }
            for candidate in rules.successors(&state) {
                if let Admission::Found(found) = frontier.admit(&candidate) {
                    break 'run Termination::Found(found);
                }
            }
        }
        Termination::Unsatisfiable
    };

    let stats = SearchStats {
        processed,
        admitted: frontier.admitted_count(),
        dominated: frontier.dominated_count(),
        frontier_high_water: frontier.high_water(),
    };
    tracing::debug!(
        species = %initial.species(),
        processed = stats.processed,
        admitted = stats.admitted,
        dominated = stats.dominated,
        outcome = termination_kind(&termination),
        "search finished"
    );
    (termination, stats)
}

fn termination_kind(termination: &Termination) -> &'static str {
    match termination {
        Termination::Found(_) => "found",
        Termination::Unsatisfiable => "unsatisfiable",
        Termination::LimitExceeded { .. } => "limit_exceeded",
    }
}

/// Validate a request and policy, then search.
///
/// # Errors
///
/// Returns [`SearchError`] only for pre-flight validation failures; no state
/// is created in that case.
pub fn search(dex: &Dex, request: &SearchRequest, policy: &SearchPolicy) -> Result<SearchResult, SearchError> {
    policy.validate()?;
    request.validate(dex)?;

    tracing::debug!(
        species = %request.species,
        level = request.level,
        abilities = request.abilities.len(),
        "search seeded"
    );
    let rules = TransitionRules::new(dex, policy);
    let root = AcquisitionState::root(request.species, request.level, request.abilities.clone());
    let (termination, stats) = run(rules, &root, policy);

    let outcome = match termination {
        Termination::Found(state) => SearchOutcome::Found(Trace::from_state(&state)),
        Termination::Unsatisfiable => SearchOutcome::Unsatisfiable,
        Termination::LimitExceeded { iterations } => SearchOutcome::LimitExceeded { iterations },
    };
    Ok(SearchResult { outcome, stats })
}
