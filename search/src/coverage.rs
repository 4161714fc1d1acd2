//! Individual coverage: can the species obtain each ability on its own,
//! without regard to holding them all on one individual?
//!
//! Much cheaper than [`crate::search::search`]. Checked per ability over the
//! whole lineage and both eras; distribution events are not consulted.

use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::Era;
use movecompat_kernel::dex::species::SpeciesRecord;

use crate::rules::SKETCH_SPECIES;
use crate::state::Requirement;

/// Abilities in `requirement` the species cannot obtain individually by
/// `level`.
#[must_use]
pub fn uncovered(dex: &Dex, record: &SpeciesRecord, level: u8, requirement: &Requirement) -> Requirement {
    let mut rest = requirement.clone();

    if record.name == SKETCH_SPECIES {
        rest.retain(|&ability| dex.ability(ability).is_some_and(|a| a.unsketchable));
    }

    let origin = dex.lineage_root(record);
    rest.retain(|ability| !origin.breeding_only.contains(ability));

    for member in dex.lineage(record) {
        rest.retain(|&ability| {
            let learned = [Era::Current, Era::Legacy].into_iter().any(|era| {
                member.learnset_for(era).learns_by(ability, level)
                    || dex.machine_teaches(member, era, ability)
            });
            let supplemental = member
                .supplemental_learnset
                .as_ref()
                .is_some_and(|extra| extra.learns_by(ability, level));
            !(learned || supplemental)
        });
        if rest.is_empty() {
            break;
        }
    }
    rest
}

/// Whether every ability in `requirement` is individually obtainable.
#[must_use]
pub fn learns_each(dex: &Dex, record: &SpeciesRecord, level: u8, requirement: &Requirement) -> bool {
    uncovered(dex, record, level, requirement).is_empty()
}
