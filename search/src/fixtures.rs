//! Small hand-built data set shared by unit tests.

use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::{AbilityId, SpeciesId};
use serde_json::json;

pub(crate) fn fixture_dex() -> Dex {
    let source = json!({
        "abilities": [
            {"id": 1, "name": "Tackle", "legacy": true},
            {"id": 2, "name": "Growl", "legacy": true},
            {"id": 3, "name": "Vine Whip", "legacy": true},
            {"id": 4, "name": "Solar Beam", "legacy": true},
            {"id": 5, "name": "Cut", "legacy": true},
            {"id": 6, "name": "Toxic", "legacy": true},
            {"id": 7, "name": "Petal Dance"},
            {"id": 8, "name": "Charm", "legacy": true},
            {"id": 9, "name": "Chatter", "unsketchable": true},
            {"id": 10, "name": "Leech Seed", "legacy": true},
            {"id": 11, "name": "Ancient Power"}
        ],
        "machines": [5],
        "legacy_machines": [6],
        "species": [
            {
                "id": 1, "name": "Sprout", "types": [12, 4], "breeding": [7],
                "learnset": [[1, 1], [10, 2]],
                "legacy_learnset": [[1, 1], [7, 3]],
                "supplemental_learnset": [[20, 10]],
                "machines": [0], "legacy_machines": [0],
                "breeding_only": [8, 11], "gender": 8, "legacy": true
            },
            {
                "id": 2, "name": "Bloom", "types": [12, 4], "breeding": [7],
                "evolves_from": {"from": 1, "trigger": {"kind": "level", "level": 16}},
                "learnset": [[1, 1], [40, 4]],
                "legacy_learnset": [[1, 1]],
                "gender": 8, "legacy": true
            },
            {
                "id": 3, "name": "Modern", "types": [1, 1],
                "learnset": [[1, 1]]
            },
            {
                "id": 4, "name": "Smeargle", "types": [1, 1], "breeding": [5],
                "learnset": [[1, 1]], "gender": 8, "legacy": true
            },
            {
                "id": 5, "name": "Weed", "types": [12, 12], "breeding": [7],
                "learnset": [[1, 8]], "gender": 8
            },
            {
                "id": 6, "name": "Petal", "types": [12, 12], "breeding": [7],
                "learnset": [[1, 8]], "gender": 16
            },
            {
                "id": 7, "name": "Bud", "types": [12, 12], "breeding": [15],
                "learnset": [[1, 1]], "breeding_only": [8], "gender": 8
            },
            {
                "id": 8, "name": "Budling", "types": [12, 12], "breeding": [7],
                "evolves_from": {"from": 7, "trigger": {"kind": "friendship"}},
                "learnset": [[1, 1]], "gender": 8
            },
            {
                "id": 9, "name": "Pebble", "types": [5, 5], "breeding": [10],
                "learnset": [[1, 1]], "gender": 8
            },
            {
                "id": 10, "name": "Rockling", "types": [5, 5], "breeding": [10],
                "evolves_from": {"from": 9, "trigger": {"kind": "trade"}},
                "learnset": [[1, 1]], "legacy_learnset": [[1, 1]],
                "gender": 8, "legacy": true
            }
        ],
        "distributions": [
            {"species": 2, "min_level": 30, "abilities": [7, 4]}
        ]
    });
    let bytes = serde_json::to_vec(&source).unwrap();
    Dex::from_json_slice(&bytes).unwrap()
}

pub(crate) fn species(dex: &Dex, name: &str) -> SpeciesId {
    dex.species_by_name(name).unwrap().id
}

pub(crate) fn ability(dex: &Dex, name: &str) -> AbilityId {
    dex.ability_by_name(name).unwrap().id
}
