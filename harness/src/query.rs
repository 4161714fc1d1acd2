//! Query layer: name resolution, single and batch queries.
//!
//! The search crate speaks ids only. This module resolves user-facing keys
//! (exact names or numeric ids), selects candidate species by filters, and
//! runs either the full compatibility search or the cheaper individual
//! coverage check for each of them.

use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::{BreedingCategory, SpeciesId, TypeTag};
use movecompat_kernel::dex::species::{SpeciesRecord, Stat};
use movecompat_search::coverage;
use movecompat_search::error::SearchError;
use movecompat_search::policy::SearchPolicy;
use movecompat_search::search::{search, SearchOutcome, SearchRequest, SearchStats};
use movecompat_search::state::Requirement;
use movecompat_search::trace::Trace;

/// Failure to turn user input into a runnable query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unknown species {0:?}")]
    UnknownSpecies(String),
    #[error("unknown ability {0:?}")]
    UnknownAbility(String),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Look up a species record by exact name or numeric id.
///
/// # Errors
///
/// Returns [`QueryError::UnknownSpecies`] if neither matches.
pub fn lookup_species<'a>(dex: &'a Dex, key: &str) -> Result<&'a SpeciesRecord, QueryError> {
    dex.resolve_species(key)
        .ok_or_else(|| QueryError::UnknownSpecies(key.to_string()))
}

/// Resolve a species by exact name or numeric id.
///
/// # Errors
///
/// Returns [`QueryError::UnknownSpecies`] if neither matches.
pub fn resolve_species(dex: &Dex, key: &str) -> Result<SpeciesId, QueryError> {
    lookup_species(dex, key).map(|r| r.id)
}

/// Resolve each ability key; duplicates collapse.
///
/// # Errors
///
/// Returns [`QueryError::UnknownAbility`] for the first key that does not
/// resolve.
pub fn resolve_abilities<S: AsRef<str>>(dex: &Dex, keys: &[S]) -> Result<Requirement, QueryError> {
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            dex.resolve_ability(key)
                .map(|a| a.id)
                .ok_or_else(|| QueryError::UnknownAbility(key.to_string()))
        })
        .collect()
}

/// How each candidate species is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryMode {
    /// All abilities on one individual, with a witness.
    #[default]
    Compatible,
    /// Each ability obtainable on its own.
    Individually,
}

impl QueryMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compatible => "compatible",
            Self::Individually => "individually",
        }
    }
}

/// Ordering of batch hits. Ties keep species id order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HitOrder {
    #[default]
    Id,
    Name,
    /// By one base stat or their total.
    Stat { stat: Stat, descending: bool },
}

impl HitOrder {
    /// Sort key name: `id`, `name` or the stat name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Stat { stat, .. } => stat.as_str(),
        }
    }

    #[must_use]
    pub fn is_descending(self) -> bool {
        matches!(self, Self::Stat { descending: true, .. })
    }

    fn sort(self, dex: &Dex, hits: &mut [BatchHit]) {
        match self {
            Self::Id => {}
            Self::Name => hits.sort_by(|a, b| species_name(dex, a.species).cmp(species_name(dex, b.species))),
            Self::Stat { stat, descending } => {
                let key = |hit: &BatchHit| dex.species(hit.species).map_or(0, |r| r.base_stats.get(stat));
                if descending {
                    hits.sort_by_key(|hit| std::cmp::Reverse(key(hit)));
                } else {
                    hits.sort_by_key(key);
                }
            }
        }
    }
}

/// A batch query over the data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchQuery {
    /// Restrict to one species; it is still checked against the filters.
    pub species: Option<SpeciesId>,
    pub level: u8,
    pub abilities: Requirement,
    /// Every tag must be one of the species' types.
    pub types: Vec<TypeTag>,
    /// Every category must be one of the species' own categories.
    pub categories: Vec<BreedingCategory>,
    pub mode: QueryMode,
    pub order: HitOrder,
}

impl BatchQuery {
    #[must_use]
    pub fn new(level: u8, abilities: Requirement) -> Self {
        Self {
            species: None,
            level,
            abilities,
            types: Vec::new(),
            categories: Vec::new(),
            mode: QueryMode::default(),
            order: HitOrder::default(),
        }
    }

    fn matches(&self, record: &SpeciesRecord) -> bool {
        self.types.iter().all(|&t| record.has_type(t))
            && self.categories.iter().all(|&c| record.in_category(c))
    }
}

/// One species for which the query holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchHit {
    pub species: SpeciesId,
    /// Witness, in [`QueryMode::Compatible`] only.
    pub trace: Option<Trace>,
}

/// A species whose search hit the iteration bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undecided {
    pub species: SpeciesId,
    pub iterations: u64,
}

/// Aggregated batch outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub hits: Vec<BatchHit>,
    /// Neither hits nor misses; reported so they are not read as negatives.
    pub undecided: Vec<Undecided>,
    /// Species that passed the filters.
    pub examined: usize,
    /// Summed over every compatibility search run.
    pub stats: SearchStats,
}

/// Run a batch query.
///
/// # Errors
///
/// Returns [`QueryError::Search`] if the species, level, policy or an
/// ability is invalid.
pub fn run_batch(dex: &Dex, query: &BatchQuery, policy: &SearchPolicy) -> Result<BatchResult, QueryError> {
    let candidates: Vec<&SpeciesRecord> = match query.species {
        Some(id) => {
            let record = dex.species(id).ok_or(SearchError::UnknownSpecies(id))?;
            if query.matches(record) {
                vec![record]
            } else {
                tracing::info!(species = %record.name, "species does not pass the type or category filters");
                Vec::new()
            }
        }
        None => dex.all_species().filter(|r| query.matches(r)).collect(),
    };
    tracing::info!(
        candidates = candidates.len(),
        level = query.level,
        abilities = query.abilities.len(),
        mode = query.mode.as_str(),
        "batch query"
    );

    let mut result = BatchResult {
        examined: candidates.len(),
        ..BatchResult::default()
    };
    for record in candidates {
        match query.mode {
            QueryMode::Individually => {
                let check = SearchRequest {
                    species: record.id,
                    level: query.level,
                    abilities: query.abilities.clone(),
                };
                check.validate(dex)?;
                if coverage::learns_each(dex, record, query.level, &query.abilities) {
                    result.hits.push(BatchHit {
                        species: record.id,
                        trace: None,
                    });
                }
            }
            QueryMode::Compatible => {
                let request = SearchRequest {
                    species: record.id,
                    level: query.level,
                    abilities: query.abilities.clone(),
                };
                let run = search(dex, &request, policy)?;
                accumulate(&mut result.stats, run.stats);
                match run.outcome {
                    SearchOutcome::Found(trace) => result.hits.push(BatchHit {
                        species: record.id,
                        trace: Some(trace),
                    }),
                    SearchOutcome::Unsatisfiable => {}
                    SearchOutcome::LimitExceeded { iterations } => {
                        result.undecided.push(Undecided {
                            species: record.id,
                            iterations,
                        });
                    }
                }
            }
        }
    }

    query.order.sort(dex, &mut result.hits);
    tracing::info!(
        hits = result.hits.len(),
        undecided = result.undecided.len(),
        "batch finished"
    );
    Ok(result)
}

fn accumulate(total: &mut SearchStats, run: SearchStats) {
    total.processed += run.processed;
    total.admitted += run.admitted;
    total.dominated += run.dominated;
    total.frontier_high_water = total.frontier_high_water.max(run.frontier_high_water);
}

fn species_name(dex: &Dex, id: SpeciesId) -> &str {
    dex.species(id).map_or("", |r| r.name.as_str())
}

/// Convenience for one species.
///
/// # Errors
///
/// As [`resolve_species`], [`resolve_abilities`] and
/// [`movecompat_search::search::search`].
pub fn search_by_name<S: AsRef<str>>(
    dex: &Dex,
    species: &str,
    level: u8,
    abilities: &[S],
    policy: &SearchPolicy,
) -> Result<(SearchRequest, movecompat_search::search::SearchResult), QueryError> {
    let request = SearchRequest {
        species: resolve_species(dex, species)?,
        level,
        abilities: resolve_abilities(dex, abilities)?,
    };
    let result = search(dex, &request, policy)?;
    Ok((request, result))
}
