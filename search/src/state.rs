//! Acquisition state: an immutable snapshot of search progress.
//!
//! States are never mutated. New information is expressed as a new state
//! whose `predecessor` is the old one, so every state carries a finite,
//! acyclic chain back to the root. The chain is the witnessing trace.
//!
//! States are `Rc`-linked and local to one search run.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use movecompat_kernel::dex::ids::{AbilityId, Era, SpeciesId};

/// Abilities still to be confirmed. Only ever shrinks along a chain.
pub type Requirement = BTreeSet<AbilityId>;

/// How an ability was obtained in a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionSource {
    /// Learned by level-up at or below the state's level.
    LevelUp,
    /// Learned from the supplemental level-up list.
    SupplementalLevelUp,
    /// Taught by a machine of the given era.
    Machine(Era),
    /// Copied by the sketch mechanism.
    Sketch,
    /// Part of a distributed individual's initial ability set.
    Distribution,
}

impl AcquisitionSource {
    /// Stable token used in serialized traces.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LevelUp => "level_up",
            Self::SupplementalLevelUp => "supplemental_level_up",
            Self::Machine(Era::Current) => "machine",
            Self::Machine(Era::Legacy) => "legacy_machine",
            Self::Sketch => "sketch",
            Self::Distribution => "distribution",
        }
    }
}

impl fmt::Display for AcquisitionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LevelUp => "level-up (relearnable)",
            Self::SupplementalLevelUp => "level-up (supplemental list)",
            Self::Machine(Era::Current) => "machine",
            Self::Machine(Era::Legacy) => "machine (legacy era)",
            Self::Sketch => "sketch",
            Self::Distribution => "distributed initial ability",
        };
        f.write_str(text)
    }
}

/// One ability gained in the step that produced a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquisition {
    pub ability: AbilityId,
    pub source: AcquisitionSource,
}

/// The action that produced a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// The initial query.
    Root,
    /// Requirement reduced by level-up, machines or sketch.
    DirectAcquisition,
    /// A distributed individual covers the whole requirement.
    ReceiveDistribution,
    /// Step back across an evolution that happens on a level-up.
    LevelUpEvolution,
    /// Step back across an evolution that keeps the level (trade, item, ...).
    EvolutionWithoutLevelUp,
    /// Inherit from a breeding partner via the current-era list.
    Breeding,
    /// Inherit from a breeding partner via the supplemental list.
    SupplementalBreeding,
    /// Move the individual into the legacy era.
    TransferToLegacy,
    /// Bring the individual back from the legacy era.
    ReturnFromLegacy,
}

impl StepKind {
    /// Stable token used in serialized traces.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::DirectAcquisition => "direct_acquisition",
            Self::ReceiveDistribution => "receive_distribution",
            Self::LevelUpEvolution => "level_up_evolution",
            Self::EvolutionWithoutLevelUp => "evolution_without_level_up",
            Self::Breeding => "breeding",
            Self::SupplementalBreeding => "supplemental_breeding",
            Self::TransferToLegacy => "transfer_to_legacy",
            Self::ReturnFromLegacy => "return_from_legacy",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Root => "initial query",
            Self::DirectAcquisition => "learn directly",
            Self::ReceiveDistribution => "receive distributed individual",
            Self::LevelUpEvolution => "evolve on level-up",
            Self::EvolutionWithoutLevelUp => "evolve without level-up",
            Self::Breeding => "inherit through breeding",
            Self::SupplementalBreeding => "inherit through breeding (supplemental list)",
            Self::TransferToLegacy => "transfer to legacy era",
            Self::ReturnFromLegacy => "return from legacy era",
        };
        f.write_str(text)
    }
}

/// Field overrides for [`AcquisitionState::derive`].
///
/// Unset fields resolve against the receiver:
/// - `requirement`: the receiver's requirement
/// - `acquired`: empty (acquisitions belong to the producing step)
/// - `legacy_mode`: the receiver's flag
/// - `ever_legacy`: `legacy_mode || receiver.ever_legacy`
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    requirement: Option<Requirement>,
    acquired: Vec<Acquisition>,
    legacy_mode: Option<bool>,
    ever_legacy: Option<bool>,
}

impl Overrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    #[must_use]
    pub fn acquired(mut self, acquired: Vec<Acquisition>) -> Self {
        self.acquired = acquired;
        self
    }

    #[must_use]
    pub fn legacy_mode(mut self, legacy_mode: bool) -> Self {
        self.legacy_mode = Some(legacy_mode);
        self
    }

    #[must_use]
    pub fn ever_legacy(mut self, ever_legacy: bool) -> Self {
        self.ever_legacy = Some(ever_legacy);
        self
    }
}

/// An immutable search state.
#[derive(Debug)]
pub struct AcquisitionState {
    species: SpeciesId,
    level: u8,
    step: StepKind,
    requirement: Requirement,
    acquired: Vec<Acquisition>,
    legacy_mode: bool,
    ever_legacy: bool,
    predecessor: Option<Rc<AcquisitionState>>,
}

impl AcquisitionState {
    /// The root state of a query.
    #[must_use]
    pub fn root(species: SpeciesId, level: u8, requirement: Requirement) -> Rc<Self> {
        Rc::new(Self {
            species,
            level,
            step: StepKind::Root,
            requirement,
            acquired: Vec::new(),
            legacy_mode: false,
            ever_legacy: false,
            predecessor: None,
        })
    }

    /// Derive a successor whose predecessor is `self`.
    ///
    /// An overridden requirement must be a subset of the receiver's.
    #[must_use]
    pub fn derive(
        self: &Rc<Self>,
        species: SpeciesId,
        level: u8,
        step: StepKind,
        overrides: Overrides,
    ) -> Rc<Self> {
        let requirement = overrides
            .requirement
            .unwrap_or_else(|| self.requirement.clone());
        debug_assert!(
            requirement.is_subset(&self.requirement),
            "requirement must not grow along a chain"
        );
        let legacy_mode = overrides.legacy_mode.unwrap_or(self.legacy_mode);
        let ever_legacy = overrides
            .ever_legacy
            .unwrap_or(legacy_mode || self.ever_legacy);
        Rc::new(Self {
            species,
            level,
            step,
            requirement,
            acquired: overrides.acquired,
            legacy_mode,
            ever_legacy,
            predecessor: Some(Rc::clone(self)),
        })
    }

    /// True iff no ability remains to be confirmed.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.requirement.is_empty()
    }

    /// Whether `self` brings something `other` lacks on at least one tracked
    /// dimension: lower level, no legacy history, not in legacy mode, or a
    /// requirement missing something `other` still needs.
    ///
    /// A state never improves on an identical one.
    #[must_use]
    pub fn improves_on(&self, other: &Self) -> bool {
        self.level < other.level
            || self.ever_legacy < other.ever_legacy
            || self.legacy_mode < other.legacy_mode
            || other
                .requirement
                .iter()
                .any(|ability| !self.requirement.contains(ability))
    }

    #[must_use]
    pub fn species(&self) -> SpeciesId {
        self.species
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn step(&self) -> StepKind {
        self.step
    }

    #[must_use]
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    #[must_use]
    pub fn acquired(&self) -> &[Acquisition] {
        &self.acquired
    }

    #[must_use]
    pub fn legacy_mode(&self) -> bool {
        self.legacy_mode
    }

    #[must_use]
    pub fn ever_legacy(&self) -> bool {
        self.ever_legacy
    }

    /// The era whose rules apply to this state.
    #[must_use]
    pub fn era(&self) -> Era {
        Era::from_legacy_mode(self.legacy_mode)
    }

    #[must_use]
    pub fn predecessor(&self) -> Option<&Rc<AcquisitionState>> {
        self.predecessor.as_ref()
    }

    /// This state followed by each predecessor, back to the root.
    pub fn chain(&self) -> impl Iterator<Item = &AcquisitionState> {
        std::iter::successors(Some(self), |s| s.predecessor.as_deref())
    }
}

impl Drop for AcquisitionState {
    // Unlink iteratively so long chains do not recurse on drop.
    fn drop(&mut self) {
        let mut next = self.predecessor.take();
        while let Some(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut state) => next = state.predecessor.take(),
                Err(_) => break,
            }
        }
    }
}
