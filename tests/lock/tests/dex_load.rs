//! Data set loading lock tests.
//!
//! Proves:
//! 1. A data set written to disk loads back with the same digest
//! 2. Integrity violations are rejected with the matching error
//! 3. Missing files surface as I/O errors naming the path

use lock_tests::{lock_dex, LOCK_DEX_JSON};
use movecompat_kernel::dex::dataset::{Dex, DexError};
use movecompat_kernel::dex::ids::{AbilityId, SpeciesId};
use serde_json::{json, Value};

fn edited(edit: impl FnOnce(&mut Value)) -> Result<Dex, DexError> {
    let mut value: Value = serde_json::from_str(LOCK_DEX_JSON).expect("fixture parses");
    edit(&mut value);
    Dex::from_json_slice(&serde_json::to_vec(&value).expect("serializes"))
}

#[test]
fn loads_from_disk_with_same_digest() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("dex.json");
    std::fs::write(&path, LOCK_DEX_JSON).expect("write fixture");
    let loaded = Dex::load(&path).expect("fixture loads");
    assert_eq!(loaded.digest().expect("digest"), lock_dex().digest().expect("digest"));
    assert_eq!(loaded.species_count(), 3);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");
    match Dex::load(&path) {
        Err(DexError::Io { path: reported, .. }) => assert!(reported.ends_with("absent.json")),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn duplicate_species_id_rejected() {
    let result = edited(|v| {
        v["species"][2]["id"] = json!(1);
    });
    assert!(matches!(result, Err(DexError::DuplicateSpeciesId(SpeciesId(1)))));
}

#[test]
fn dangling_ability_rejected() {
    let result = edited(|v| {
        v["species"][0]["learnset"] = json!([[1, 77]]);
    });
    assert!(matches!(
        result,
        Err(DexError::UnknownAbility { ability: AbilityId(77), .. })
    ));
}

#[test]
fn dangling_predecessor_rejected() {
    let result = edited(|v| {
        v["species"][1]["evolves_from"]["from"] = json!(99);
    });
    assert!(matches!(
        result,
        Err(DexError::UnknownSpecies { species: SpeciesId(99), .. })
    ));
}

#[test]
fn machine_slot_outside_table_rejected() {
    let result = edited(|v| {
        v["species"][2]["legacy_machines"] = json!([3]);
    });
    assert!(matches!(
        result,
        Err(DexError::MachineSlotOutOfRange { slot: 3, table_len: 1, .. })
    ));
}

#[test]
fn evolution_cycle_rejected() {
    let result = edited(|v| {
        v["species"][0]["evolves_from"] = json!({"from": 2, "trigger": {"kind": "trade"}});
    });
    assert!(matches!(result, Err(DexError::EvolutionCycle(_))));
}

#[test]
fn malformed_json_rejected() {
    assert!(matches!(
        Dex::from_json_slice(b"{\"species\": ["),
        Err(DexError::Parse(_))
    ));
}
