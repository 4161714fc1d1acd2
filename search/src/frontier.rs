//! FIFO frontier with per-species dominance pruning.
//!
//! Every admitted state is first reduced by direct acquisition. A satisfied
//! state short-circuits the search. Otherwise it is kept only if it improves
//! on every state already registered for its species.
//!
//! The registry is append-only: a later, better state never evicts an
//! earlier one.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use movecompat_kernel::dex::ids::SpeciesId;

use crate::rules::TransitionRules;
use crate::state::AcquisitionState;

/// Outcome of offering a state to the frontier.
#[derive(Debug)]
pub enum Admission {
    /// The reduced state has an empty requirement.
    Found(Rc<AcquisitionState>),
    /// Registered and queued.
    Admitted,
    /// Some registered state is at least as good on every dimension.
    Dominated,
}

/// Breadth-first frontier keyed by species.
pub struct DominanceFrontier<'d> {
    rules: TransitionRules<'d>,
    registry: HashMap<SpeciesId, Vec<Rc<AcquisitionState>>>,
    queue: VecDeque<Rc<AcquisitionState>>,
    admitted: u64,
    dominated: u64,
    high_water: u64,
}

impl<'d> DominanceFrontier<'d> {
    #[must_use]
    pub fn new(rules: TransitionRules<'d>) -> Self {
        Self {
            rules,
            registry: HashMap::new(),
            queue: VecDeque::new(),
            admitted: 0,
            dominated: 0,
            high_water: 0,
        }
    }

    /// Reduce `state` by direct acquisition, then register and queue it
    /// unless dominated.
    pub fn admit(&mut self, state: &Rc<AcquisitionState>) -> Admission {
        let reduced = self.rules.direct_acquisition(state);
        if reduced.is_satisfied() {
            return Admission::Found(reduced);
        }

        let entry = self.registry.entry(reduced.species()).or_default();
        if !entry.iter().all(|kept| reduced.improves_on(kept)) {
            self.dominated += 1;
            tracing::trace!(
                species = %reduced.species(),
                level = reduced.level(),
                "dominated"
            );
            return Admission::Dominated;
        }
        entry.push(Rc::clone(&reduced));
        self.queue.push_back(reduced);
        self.admitted += 1;

        let size = self.queue.len() as u64;
        if size > self.high_water {
            self.high_water = size;
        }
        Admission::Admitted
    }

    /// Oldest queued state.
    pub fn pop(&mut self) -> Option<Rc<AcquisitionState>> {
        self.queue.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// States registered for a species, in admission order.
    #[must_use]
    pub fn registered(&self, species: SpeciesId) -> &[Rc<AcquisitionState>] {
        self.registry.get(&species).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Largest queue length observed.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    #[must_use]
    pub fn admitted_count(&self) -> u64 {
        self.admitted
    }

    #[must_use]
    pub fn dominated_count(&self) -> u64 {
        self.dominated
    }
}
