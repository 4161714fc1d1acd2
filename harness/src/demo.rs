//! Bundled demo data set.
//!
//! A dozen species covering every acquisition mechanism: level-up lines,
//! item and friendship evolutions, juveniles, a female-only line, a
//! genderless species, sketch, both machine eras, the supplemental list and
//! two distribution events. The CLI falls back to it when no `--data` is
//! given; lock tests and benchmarks run against it.
//!
//! [`fan_out_dex`] generates the adversarial counterpart: many species that
//! all breed with each other, none able to learn the one ability they could
//! pass on.

use movecompat_kernel::dex::ability::AbilityRecord;
use movecompat_kernel::dex::dataset::{Dex, DexError, DexSource};
use movecompat_kernel::dex::ids::{AbilityId, BreedingCategory, SpeciesId, TypeTag};
use movecompat_kernel::dex::machines::MachineSet;
use movecompat_kernel::dex::species::{BaseStats, GenderRatio, Learnset, SpeciesRecord};

/// Wire form of the demo data set.
pub const DEMO_DEX_JSON: &str = include_str!("../data/demo_dex.json");

/// Build the demo data set.
///
/// # Errors
///
/// Returns [`DexError`] if the bundled JSON fails validation.
pub fn demo_dex() -> Result<Dex, DexError> {
    Dex::from_json_slice(DEMO_DEX_JSON.as_bytes())
}

/// The ability every fan-out species could inherit but none can learn.
pub const FAN_OUT_ABILITY: AbilityId = AbilityId(1);

/// `count` species with ids `1..=count`, one shared breeding category, and
/// [`FAN_OUT_ABILITY`] on every breeding-only list.
///
/// Searching any of them for that ability admits one bred state per species
/// and then exhausts, so the work grows with `count`.
///
/// # Errors
///
/// Returns [`DexError`] if the generated set fails validation.
pub fn fan_out_dex(count: u16) -> Result<Dex, DexError> {
    let species = (1..=count)
        .map(|id| SpeciesRecord {
            id: SpeciesId(id),
            name: format!("Spawn {id}"),
            types: [TypeTag(1), TypeTag(1)],
            base_stats: BaseStats::default(),
            breeding: vec![BreedingCategory(1)],
            evolves_from: None,
            learnset: Learnset::default(),
            legacy_learnset: Learnset::default(),
            supplemental_learnset: None,
            machines: MachineSet::new(),
            legacy_machines: MachineSet::new(),
            breeding_only: vec![FAN_OUT_ABILITY],
            gender: GenderRatio::EVEN,
            legacy: false,
        })
        .collect();
    Dex::new(DexSource {
        species,
        abilities: vec![AbilityRecord {
            id: FAN_OUT_ABILITY,
            name: "Lost Art".into(),
            legacy: false,
            unsketchable: false,
        }],
        ..DexSource::default()
    })
}
