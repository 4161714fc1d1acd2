//! `Dex`: the validated, immutable reference data set.
//!
//! Construction enforces referential integrity: unique ids and names, every
//! ability and species reference resolves, machine bits stay inside the
//! machine tables, and evolution links form no cycle. A `Dex` that exists is
//! safe to search against; lookups never need to re-validate.
//!
//! Maps are `BTreeMap`s so iteration (partner enumeration, canonical bytes)
//! is in ascending id order.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dex::ability::AbilityRecord;
use crate::dex::distribution::DistributionEvent;
use crate::dex::ids::{AbilityId, Era, SpeciesId};
use crate::dex::species::SpeciesRecord;
use crate::proof::canon::{canonical_json_bytes, CanonError};
use crate::proof::hash::{canonical_hash, ContentHash, DOMAIN_DEX_SNAPSHOT};

/// Wire form of a data set, as read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexSource {
    pub species: Vec<SpeciesRecord>,
    pub abilities: Vec<AbilityRecord>,
    #[serde(default)]
    pub distributions: Vec<DistributionEvent>,
    /// Current-era machine table: slot index to taught ability.
    #[serde(default)]
    pub machines: Vec<AbilityId>,
    /// Legacy-era machine table.
    #[serde(default)]
    pub legacy_machines: Vec<AbilityId>,
}

/// Error type for data set construction and loading.
#[derive(Debug, thiserror::Error)]
pub enum DexError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data set JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {0}")]
    DuplicateSpeciesId(SpeciesId),
    #[error("duplicate species name {0:?}")]
    DuplicateSpeciesName(String),
    #[error("duplicate {0}")]
    DuplicateAbilityId(AbilityId),
    #[error("duplicate ability name {0:?}")]
    DuplicateAbilityName(String),
    #[error("{context} refers to unknown {ability}")]
    UnknownAbility { context: String, ability: AbilityId },
    #[error("{context} refers to unknown {species}")]
    UnknownSpecies { context: String, species: SpeciesId },
    #[error("{species} uses {era} machine slot {slot}, table has {table_len} slots")]
    MachineSlotOutOfRange {
        species: SpeciesId,
        era: Era,
        slot: u16,
        table_len: usize,
    },
    #[error("evolution chain through {0} is cyclic")]
    EvolutionCycle(SpeciesId),
    #[error("canonicalization failed: {0}")]
    Canon(#[from] CanonError),
}

/// The validated reference data set.
#[derive(Debug, Clone)]
pub struct Dex {
    species: BTreeMap<SpeciesId, SpeciesRecord>,
    species_names: HashMap<String, SpeciesId>,
    abilities: BTreeMap<AbilityId, AbilityRecord>,
    ability_names: HashMap<String, AbilityId>,
    distributions: Vec<DistributionEvent>,
    distributions_by_species: BTreeMap<SpeciesId, Vec<usize>>,
    evolutions: BTreeMap<SpeciesId, Vec<SpeciesId>>,
    machine_tables: [Vec<AbilityId>; 2],
    machine_slots: [HashMap<AbilityId, Vec<u16>>; 2],
}

fn era_index(era: Era) -> usize {
    match era {
        Era::Current => 0,
        Era::Legacy => 1,
    }
}

impl Dex {
    /// Build and validate a data set.
    ///
    /// # Errors
    ///
    /// Returns [`DexError`] on duplicate ids or names, dangling references,
    /// out-of-range machine slots, or cyclic evolution links.
    pub fn new(source: DexSource) -> Result<Self, DexError> {
        let DexSource {
            species: species_list,
            abilities: ability_list,
            distributions,
            machines,
            legacy_machines,
        } = source;

        let mut abilities = BTreeMap::new();
        let mut ability_names = HashMap::new();
        for ability in ability_list {
            if ability_names.insert(ability.name.clone(), ability.id).is_some() {
                return Err(DexError::DuplicateAbilityName(ability.name));
            }
            let id = ability.id;
            if abilities.insert(id, ability).is_some() {
                return Err(DexError::DuplicateAbilityId(id));
            }
        }

        let mut species = BTreeMap::new();
        let mut species_names = HashMap::new();
        for mut record in species_list {
            record.normalize();
            if species_names.insert(record.name.clone(), record.id).is_some() {
                return Err(DexError::DuplicateSpeciesName(record.name));
            }
            let id = record.id;
            if species.insert(id, record).is_some() {
                return Err(DexError::DuplicateSpeciesId(id));
            }
        }

        for (context, table) in [("machine table", &machines), ("legacy machine table", &legacy_machines)] {
            for &ability in table {
                if !abilities.contains_key(&ability) {
                    return Err(DexError::UnknownAbility {
                        context: context.to_string(),
                        ability,
                    });
                }
            }
        }

        let mut evolutions: BTreeMap<SpeciesId, Vec<SpeciesId>> = BTreeMap::new();
        for record in species.values() {
            for (field, ability) in record.referenced_abilities() {
                if !abilities.contains_key(&ability) {
                    return Err(DexError::UnknownAbility {
                        context: format!("{} ({}) {field}", record.name, record.id),
                        ability,
                    });
                }
            }
            for (era, table) in [(Era::Current, &machines), (Era::Legacy, &legacy_machines)] {
                if let Some(slot) = record.machines_for(era).max_slot() {
                    if usize::from(slot) >= table.len() {
                        return Err(DexError::MachineSlotOutOfRange {
                            species: record.id,
                            era,
                            slot,
                            table_len: table.len(),
                        });
                    }
                }
            }
            if let Some(evolution) = record.evolves_from {
                if !species.contains_key(&evolution.from) {
                    return Err(DexError::UnknownSpecies {
                        context: format!("{} ({}) evolves_from", record.name, record.id),
                        species: evolution.from,
                    });
                }
                evolutions.entry(evolution.from).or_default().push(record.id);
            }
        }
        check_acyclic(&species)?;

        let mut distributions_by_species: BTreeMap<SpeciesId, Vec<usize>> = BTreeMap::new();
        for (index, event) in distributions.iter().enumerate() {
            if !species.contains_key(&event.species) {
                return Err(DexError::UnknownSpecies {
                    context: format!("distribution #{index}"),
                    species: event.species,
                });
            }
            for &ability in &event.abilities {
                if !abilities.contains_key(&ability) {
                    return Err(DexError::UnknownAbility {
                        context: format!("distribution #{index}"),
                        ability,
                    });
                }
            }
            distributions_by_species
                .entry(event.species)
                .or_default()
                .push(index);
        }

        let machine_slots = [slot_index(&machines), slot_index(&legacy_machines)];

        tracing::info!(
            species = species.len(),
            abilities = abilities.len(),
            distributions = distributions.len(),
            "reference data set built"
        );

        Ok(Self {
            species,
            species_names,
            abilities,
            ability_names,
            distributions,
            distributions_by_species,
            evolutions,
            machine_tables: [machines, legacy_machines],
            machine_slots,
        })
    }

    /// Parse and validate a data set from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Parse`] for malformed JSON, or any validation
    /// error from [`Dex::new`].
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DexError> {
        let source: DexSource = serde_json::from_slice(bytes)?;
        Self::new(source)
    }

    /// Read, parse and validate a data set file.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Io`] if the file cannot be read, otherwise as
    /// [`Dex::from_json_slice`].
    pub fn load(path: &Path) -> Result<Self, DexError> {
        let bytes = std::fs::read(path).map_err(|source| DexError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }

    #[must_use]
    pub fn species(&self, id: SpeciesId) -> Option<&SpeciesRecord> {
        self.species.get(&id)
    }

    #[must_use]
    pub fn species_by_name(&self, name: &str) -> Option<&SpeciesRecord> {
        self.species_names.get(name).and_then(|id| self.species.get(id))
    }

    /// Resolve a species by exact name, falling back to a numeric id.
    #[must_use]
    pub fn resolve_species(&self, key: &str) -> Option<&SpeciesRecord> {
        self.species_by_name(key).or_else(|| {
            key.trim()
                .parse::<u16>()
                .ok()
                .and_then(|n| self.species(SpeciesId(n)))
        })
    }

    /// All species in ascending id order.
    pub fn all_species(&self) -> impl Iterator<Item = &SpeciesRecord> {
        self.species.values()
    }

    #[must_use]
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    #[must_use]
    pub fn ability(&self, id: AbilityId) -> Option<&AbilityRecord> {
        self.abilities.get(&id)
    }

    #[must_use]
    pub fn ability_by_name(&self, name: &str) -> Option<&AbilityRecord> {
        self.ability_names.get(name).and_then(|id| self.abilities.get(id))
    }

    /// Resolve an ability by exact name, falling back to a numeric id.
    #[must_use]
    pub fn resolve_ability(&self, key: &str) -> Option<&AbilityRecord> {
        self.ability_by_name(key).or_else(|| {
            key.trim()
                .parse::<u16>()
                .ok()
                .and_then(|n| self.ability(AbilityId(n)))
        })
    }

    /// Display name of an ability, or its id if unknown.
    #[must_use]
    pub fn ability_name(&self, id: AbilityId) -> String {
        self.ability(id)
            .map_or_else(|| id.to_string(), |a| a.name.clone())
    }

    /// Species that evolve directly from `id`, in ascending id order.
    #[must_use]
    pub fn evolutions_of(&self, id: SpeciesId) -> &[SpeciesId] {
        self.evolutions.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The predecessor record of a species, if it has one.
    #[must_use]
    pub fn predecessor_of(&self, record: &SpeciesRecord) -> Option<&SpeciesRecord> {
        record.evolves_from.and_then(|e| self.species(e.from))
    }

    /// The species itself followed by each predecessor, newest first.
    pub fn lineage<'a>(&'a self, record: &'a SpeciesRecord) -> impl Iterator<Item = &'a SpeciesRecord> {
        std::iter::successors(Some(record), move |r| self.predecessor_of(r))
    }

    /// The first species of the lineage (the one that hatches from an egg).
    #[must_use]
    pub fn lineage_root<'a>(&'a self, record: &'a SpeciesRecord) -> &'a SpeciesRecord {
        self.lineage(record).last().unwrap_or(record)
    }

    /// Distribution events for a species, in data-set order.
    pub fn distributions_for(&self, id: SpeciesId) -> impl Iterator<Item = &DistributionEvent> {
        self.distributions_by_species
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&i| &self.distributions[i])
    }

    #[must_use]
    pub fn has_distributions(&self, id: SpeciesId) -> bool {
        self.distributions_by_species.contains_key(&id)
    }

    /// All distribution events, in data-set order.
    #[must_use]
    pub fn distributions(&self) -> &[DistributionEvent] {
        &self.distributions
    }

    /// The machine table for an era.
    #[must_use]
    pub fn machine_table(&self, era: Era) -> &[AbilityId] {
        &self.machine_tables[era_index(era)]
    }

    /// Whether `record` can be taught `ability` by one of the era's machines.
    #[must_use]
    pub fn machine_teaches(&self, record: &SpeciesRecord, era: Era, ability: AbilityId) -> bool {
        let set = record.machines_for(era);
        self.machine_slots[era_index(era)]
            .get(&ability)
            .is_some_and(|slots| slots.iter().any(|&slot| set.contains(slot)))
    }

    /// Whether an ability exists in the legacy era. Unknown ids are not.
    #[must_use]
    pub fn ability_is_legacy(&self, id: AbilityId) -> bool {
        self.ability(id).is_some_and(|a| a.legacy)
    }

    /// Reassemble the wire form (ascending id order throughout).
    #[must_use]
    pub fn to_source(&self) -> DexSource {
        DexSource {
            species: self.species.values().cloned().collect(),
            abilities: self.abilities.values().cloned().collect(),
            distributions: self.distributions.clone(),
            machines: self.machine_tables[0].clone(),
            legacy_machines: self.machine_tables[1].clone(),
        }
    }

    /// Canonical JSON bytes of the data set.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Parse`] if the records cannot be converted to JSON
    /// and [`DexError::Canon`] if canonicalization fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, DexError> {
        let value = serde_json::to_value(self.to_source())?;
        Ok(canonical_json_bytes(&value)?)
    }

    /// Content hash of the data set, bound into query reports.
    ///
    /// # Errors
    ///
    /// As [`Dex::canonical_bytes`].
    pub fn digest(&self) -> Result<ContentHash, DexError> {
        let bytes = self.canonical_bytes()?;
        Ok(canonical_hash(DOMAIN_DEX_SNAPSHOT, &bytes))
    }
}

fn slot_index(table: &[AbilityId]) -> HashMap<AbilityId, Vec<u16>> {
    let mut index: HashMap<AbilityId, Vec<u16>> = HashMap::new();
    for (slot, &ability) in table.iter().enumerate() {
        if let Ok(slot) = u16::try_from(slot) {
            index.entry(ability).or_default().push(slot);
        }
    }
    index
}

fn check_acyclic(species: &BTreeMap<SpeciesId, SpeciesRecord>) -> Result<(), DexError> {
    for &start in species.keys() {
        let mut seen = BTreeSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                return Err(DexError::EvolutionCycle(start));
            }
            current = species
                .get(&id)
                .and_then(|r| r.evolves_from)
                .map(|e| e.from);
        }
    }
    Ok(())
}
