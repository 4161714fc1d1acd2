//! Transition rules: pure functions from a state to its successors.
//!
//! Each rule models one real acquisition mechanism. Precedence, as applied by
//! the driver and frontier:
//!
//! 1. [`TransitionRules::direct_acquisition`] (eagerly, on admission)
//! 2. [`TransitionRules::distribution`]
//! 3. [`TransitionRules::devolution`]
//! 4. [`TransitionRules::breeding`]
//! 5. / 6. [`TransitionRules::transfer`]
//!
//! Rules never mutate a state; they derive new ones.

use std::rc::Rc;

use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::{AbilityId, BreedingCategory, Era};
use movecompat_kernel::dex::species::{Learnset, SpeciesRecord};

use crate::policy::SearchPolicy;
use crate::state::{Acquisition, AcquisitionSource, AcquisitionState, Overrides, Requirement, StepKind};

/// The one species that can copy any ability outside the unsketchable set.
pub const SKETCH_SPECIES: &str = "Smeargle";

/// Transition rules bound to one reference data set.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRules<'d> {
    dex: &'d Dex,
    partner_level: u8,
}

impl<'d> TransitionRules<'d> {
    #[must_use]
    pub fn new(dex: &'d Dex, policy: &SearchPolicy) -> Self {
        Self {
            dex,
            partner_level: policy.breeding_partner_level,
        }
    }

    #[must_use]
    pub fn dex(&self) -> &'d Dex {
        self.dex
    }

    /// Rule 1: confirm every required ability the species can learn on its own
    /// in the state's era.
    ///
    /// Returns the receiver unchanged if nothing was confirmed.
    #[must_use]
    pub fn direct_acquisition(&self, state: &Rc<AcquisitionState>) -> Rc<AcquisitionState> {
        let Some(record) = self.dex.species(state.species()) else {
            return Rc::clone(state);
        };
        let era = state.era();
        let level = state.level();

        let mut remaining = Requirement::new();
        let mut acquired = Vec::new();
        for &ability in state.requirement() {
            match self.direct_source(record, era, level, ability) {
                Some(source) => acquired.push(Acquisition { ability, source }),
                None => {
                    remaining.insert(ability);
                }
            }
        }

        if acquired.is_empty() {
            return Rc::clone(state);
        }
        state.derive(
            state.species(),
            level,
            StepKind::DirectAcquisition,
            Overrides::new().requirement(remaining).acquired(acquired),
        )
    }

    fn direct_source(
        &self,
        record: &SpeciesRecord,
        era: Era,
        level: u8,
        ability: AbilityId,
    ) -> Option<AcquisitionSource> {
        if record.learnset_for(era).learns_by(ability, level) {
            return Some(AcquisitionSource::LevelUp);
        }
        if era == Era::Current
            && record
                .supplemental_learnset
                .as_ref()
                .is_some_and(|extra| extra.learns_by(ability, level))
        {
            return Some(AcquisitionSource::SupplementalLevelUp);
        }
        if self.dex.machine_teaches(record, era, ability) {
            return Some(AcquisitionSource::Machine(era));
        }
        if record.name == SKETCH_SPECIES
            && self.dex.ability(ability).is_some_and(|a| !a.unsketchable)
        {
            return Some(AcquisitionSource::Sketch);
        }
        None
    }

    /// Rule 2: a distributed individual already holding the whole requirement.
    ///
    /// A returned state is satisfied and ends the search.
    #[must_use]
    pub fn distribution(&self, state: &Rc<AcquisitionState>) -> Option<Rc<AcquisitionState>> {
        let species = state.species();
        if !self.dex.has_distributions(species) {
            return None;
        }
        self.dex
            .distributions_for(species)
            .find(|event| event.covers(state.level(), state.requirement()))?;

        let acquired = state
            .requirement()
            .iter()
            .map(|&ability| Acquisition {
                ability,
                source: AcquisitionSource::Distribution,
            })
            .collect();
        Some(state.derive(
            species,
            state.level(),
            StepKind::ReceiveDistribution,
            Overrides::new()
                .requirement(Requirement::new())
                .acquired(acquired),
        ))
    }

    /// Rule 3: step back to the evolutionary predecessor.
    ///
    /// Crossing a level-up evolution lowers the level by one, since the
    /// ability learned on that very level-up may differ between forms.
    #[must_use]
    pub fn devolution(&self, state: &Rc<AcquisitionState>) -> Option<Rc<AcquisitionState>> {
        let record = self.dex.species(state.species())?;
        let evolution = record.evolves_from?;
        let predecessor = self.dex.species(evolution.from)?;

        if state.legacy_mode() && !predecessor.legacy {
            return None;
        }
        if evolution.trigger.required_level() > state.level() {
            return None;
        }

        let derived = if evolution.trigger.requires_level_up() {
            state.derive(
                predecessor.id,
                state.level() - 1,
                StepKind::LevelUpEvolution,
                Overrides::new(),
            )
        } else {
            state.derive(
                predecessor.id,
                state.level(),
                StepKind::EvolutionWithoutLevelUp,
                Overrides::new(),
            )
        };
        Some(derived)
    }

    /// Rule 4: inherit the requirement from a breeding partner.
    ///
    /// Applies only outside legacy mode, to species without a predecessor.
    /// For each level list (current, then supplemental), if every required
    /// ability is inheritable through that list or the breeding-only list,
    /// one candidate per male-capable partner sharing a category.
    #[must_use]
    pub fn breeding(&self, state: &Rc<AcquisitionState>) -> Vec<Rc<AcquisitionState>> {
        let mut out = Vec::new();
        if state.legacy_mode() {
            return out;
        }
        let Some(record) = self.dex.species(state.species()) else {
            return out;
        };
        if record.evolves_from.is_some() {
            return out;
        }
        let categories = self.breedable_categories(record);
        if categories.is_empty() {
            return out;
        }

        let lists = [
            (StepKind::Breeding, Some(&record.learnset)),
            (StepKind::SupplementalBreeding, record.supplemental_learnset.as_ref()),
        ];
        for (step, list) in lists {
            let Some(list) = list else { continue };
            if !inheritable(record, list, state.requirement()) {
                continue;
            }
            for partner in self.partners(&categories) {
                out.push(state.derive(partner.id, self.partner_level, step, Overrides::new()));
            }
        }
        out
    }

    /// Rules 5 and 6: move into or out of the legacy era.
    #[must_use]
    pub fn transfer(&self, state: &Rc<AcquisitionState>) -> Option<Rc<AcquisitionState>> {
        if state.legacy_mode() {
            return Some(state.derive(
                state.species(),
                state.level(),
                StepKind::ReturnFromLegacy,
                Overrides::new().legacy_mode(false),
            ));
        }
        let record = self.dex.species(state.species())?;
        if !record.legacy {
            return None;
        }
        if !state
            .requirement()
            .iter()
            .all(|&ability| self.dex.ability_is_legacy(ability))
        {
            return None;
        }
        Some(state.derive(
            state.species(),
            state.level(),
            StepKind::TransferToLegacy,
            Overrides::new().legacy_mode(true),
        ))
    }

    /// Rules 3 through 6 in precedence order.
    #[must_use]
    pub fn successors(&self, state: &Rc<AcquisitionState>) -> Vec<Rc<AcquisitionState>> {
        let mut out = Vec::new();
        out.extend(self.devolution(state));
        out.extend(self.breeding(state));
        out.extend(self.transfer(state));
        out
    }

    /// Regular categories the species breeds in.
    ///
    /// A juvenile breeds in the categories of its first evolution.
    #[must_use]
    pub fn breedable_categories(&self, record: &SpeciesRecord) -> Vec<BreedingCategory> {
        if record.is_juvenile() {
            return self
                .dex
                .evolutions_of(record.id)
                .first()
                .and_then(|&id| self.dex.species(id))
                .map(|evolved| self.breedable_categories(evolved))
                .unwrap_or_default();
        }
        record
            .breeding
            .iter()
            .copied()
            .filter(|c| c.is_regular())
            .collect()
    }

    /// Male-capable species sharing any of `categories`, in ascending id order.
    pub fn partners<'a>(
        &'a self,
        categories: &'a [BreedingCategory],
    ) -> impl Iterator<Item = &'d SpeciesRecord> + 'a {
        self.dex.all_species().filter(move |partner| {
            partner.gender.male_possible() && categories.iter().any(|&c| partner.in_category(c))
        })
    }
}

fn inheritable(record: &SpeciesRecord, list: &Learnset, requirement: &Requirement) -> bool {
    requirement
        .iter()
        .all(|&ability| record.breeding_only.contains(&ability) || list.contains(ability))
}
