//! Witness traces: the predecessor chain of a satisfying state, root first.

use std::fmt::Write as _;

use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::SpeciesId;
use movecompat_kernel::proof::canon::{canonical_json_bytes, CanonError};
use movecompat_kernel::proof::hash::{canonical_hash, ContentHash, DOMAIN_ACQUISITION_TRACE};
use serde_json::{json, Value};

use crate::state::{Acquisition, AcquisitionState, Requirement, StepKind};

/// One state of a witness chain, detached from the `Rc` graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub species: SpeciesId,
    pub level: u8,
    pub step: StepKind,
    pub acquired: Vec<Acquisition>,
    /// Abilities still outstanding after this step.
    pub requirement: Requirement,
    pub legacy_mode: bool,
    pub ever_legacy: bool,
}

impl TraceStep {
    fn from_state(state: &AcquisitionState) -> Self {
        Self {
            species: state.species(),
            level: state.level(),
            step: state.step(),
            acquired: state.acquired().to_vec(),
            requirement: state.requirement().clone(),
            legacy_mode: state.legacy_mode(),
            ever_legacy: state.ever_legacy(),
        }
    }

    fn to_json_value(&self, dex: &Dex) -> Value {
        let species_name = dex
            .species(self.species)
            .map_or_else(|| self.species.to_string(), |s| s.name.clone());
        let acquired: Vec<Value> = self
            .acquired
            .iter()
            .map(|a| {
                json!({
                    "ability": a.ability.0,
                    "name": dex.ability_name(a.ability),
                    "source": a.source.as_str(),
                })
            })
            .collect();
        let remaining: Vec<u16> = self.requirement.iter().map(|a| a.0).collect();
        json!({
            "species": self.species.0,
            "species_name": species_name,
            "level": self.level,
            "step": self.step.as_str(),
            "acquired": acquired,
            "remaining": remaining,
            "legacy_mode": self.legacy_mode,
            "ever_legacy": self.ever_legacy,
        })
    }
}

/// An ordered witness, root first. The last step is satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    /// Collect the chain ending at `state`.
    #[must_use]
    pub fn from_state(state: &AcquisitionState) -> Self {
        let mut steps: Vec<TraceStep> = state.chain().map(TraceStep::from_state).collect();
        steps.reverse();
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Steps after the root.
    #[must_use]
    pub fn actions(&self) -> &[TraceStep] {
        self.steps.get(1..).unwrap_or(&[])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every acquisition along the chain, in order.
    pub fn acquisitions(&self) -> impl Iterator<Item = &Acquisition> {
        self.steps.iter().flat_map(|s| s.acquired.iter())
    }

    /// JSON rendering with names resolved against `dex`.
    #[must_use]
    pub fn to_json_value(&self, dex: &Dex) -> Value {
        Value::Array(self.steps.iter().map(|s| s.to_json_value(dex)).collect())
    }

    /// Canonical JSON bytes of [`Trace::to_json_value`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn to_canonical_json_bytes(&self, dex: &Dex) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value(dex))
    }

    /// Content hash of the canonical trace.
    ///
    /// # Errors
    ///
    /// As [`Trace::to_canonical_json_bytes`].
    pub fn digest(&self, dex: &Dex) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes(dex)?;
        Ok(canonical_hash(DOMAIN_ACQUISITION_TRACE, &bytes))
    }

    /// Human-readable rendering, one line per action.
    #[must_use]
    pub fn render(&self, dex: &Dex) -> String {
        let mut out = String::new();
        for step in self.actions() {
            let name = dex
                .species(step.species)
                .map_or_else(|| step.species.to_string(), |s| s.name.clone());
            let _ = write!(out, "{name} Lv.{} {}", step.level, step.step);
            if step.legacy_mode {
                out.push_str(" [legacy]");
            }
            for a in &step.acquired {
                let _ = write!(out, "; {}: {}", dex.ability_name(a.ability), a.source);
            }
            out.push('\n');
        }
        out
    }
}
