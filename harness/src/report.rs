//! Query reports: canonical JSON bound to the data set they were computed
//! against.
//!
//! Every report body carries the data-set digest. The report digest is
//! `canonical_hash(DOMAIN_QUERY_REPORT, body)`, where `body` is the canonical
//! JSON of the body. The emitted envelope is
//! `{"body": <body>, "report_digest": "sha256:..."}`, itself canonical.

use movecompat_kernel::dex::dataset::{Dex, DexError};
use movecompat_kernel::dex::ids::{AbilityId, Era, SpeciesId};
use movecompat_kernel::dex::species::{EvolutionTrigger, Learnset, SpeciesRecord, Stat};
use movecompat_kernel::proof::canon::{canonical_json_bytes, CanonError};
use movecompat_kernel::proof::hash::{canonical_hash, ContentHash, DOMAIN_QUERY_REPORT};
use movecompat_search::search::{SearchOutcome, SearchRequest, SearchResult, SearchStats};
use serde_json::{json, Value};

use crate::party::MemberVerdict;
use crate::query::{BatchQuery, BatchResult};

/// Error while building a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("data set digest: {0}")]
    Dex(#[from] DexError),
    #[error("canonicalization failed: {0}")]
    Canon(#[from] CanonError),
}

/// Error while verifying an emitted report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportVerifyError {
    #[error("report is not valid JSON: {detail}")]
    Malformed { detail: String },
    #[error("report is missing field {0}")]
    MissingField(&'static str),
    #[error("report bytes are not canonical JSON")]
    NotCanonical,
    #[error("report digest mismatch: declared {declared}, recomputed {recomputed}")]
    DigestMismatch { declared: String, recomputed: String },
}

/// A finished report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    body: Value,
    /// Canonical JSON of `body`.
    pub body_bytes: Vec<u8>,
    pub digest: ContentHash,
}

impl QueryReport {
    fn seal(dex: &Dex, kind: &str, mut body: Value) -> Result<Self, ReportError> {
        let dex_digest = dex.digest()?;
        if let Value::Object(map) = &mut body {
            map.insert("kind".into(), Value::from(kind));
            map.insert("dex_digest".into(), Value::from(dex_digest.as_str()));
        }
        let body_bytes = canonical_json_bytes(&body)?;
        let digest = canonical_hash(DOMAIN_QUERY_REPORT, &body_bytes);
        Ok(Self {
            body,
            body_bytes,
            digest,
        })
    }

    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Canonical bytes of the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Canon`] if canonicalization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ReportError> {
        let envelope = json!({
            "body": self.body,
            "report_digest": self.digest.as_str(),
        });
        Ok(canonical_json_bytes(&envelope)?)
    }
}

/// Check an emitted envelope: canonical form and digest binding.
///
/// # Errors
///
/// Returns the first [`ReportVerifyError`] found.
pub fn verify_report(bytes: &[u8]) -> Result<(), ReportVerifyError> {
    let envelope: Value = serde_json::from_slice(bytes).map_err(|e| ReportVerifyError::Malformed {
        detail: e.to_string(),
    })?;
    let canonical = canonical_json_bytes(&envelope).map_err(|e| ReportVerifyError::Malformed {
        detail: e.to_string(),
    })?;
    if canonical != bytes {
        return Err(ReportVerifyError::NotCanonical);
    }
    let body = envelope
        .get("body")
        .ok_or(ReportVerifyError::MissingField("body"))?;
    let declared = envelope
        .get("report_digest")
        .and_then(Value::as_str)
        .ok_or(ReportVerifyError::MissingField("report_digest"))?;
    let body_bytes = canonical_json_bytes(body).map_err(|e| ReportVerifyError::Malformed {
        detail: e.to_string(),
    })?;
    let recomputed = canonical_hash(DOMAIN_QUERY_REPORT, &body_bytes);
    if recomputed.as_str() != declared {
        return Err(ReportVerifyError::DigestMismatch {
            declared: declared.to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(())
}

fn species_json(dex: &Dex, id: SpeciesId) -> Value {
    let name = dex.species(id).map_or_else(|| id.to_string(), |r| r.name.clone());
    json!({"id": id.0, "name": name})
}

fn ability_json(dex: &Dex, id: AbilityId) -> Value {
    json!({"id": id.0, "name": dex.ability_name(id)})
}

fn abilities_json<'a>(dex: &Dex, abilities: impl IntoIterator<Item = &'a AbilityId>) -> Value {
    Value::Array(abilities.into_iter().map(|&a| ability_json(dex, a)).collect())
}

fn stats_json(stats: &SearchStats) -> Value {
    json!({
        "processed": stats.processed,
        "admitted": stats.admitted,
        "dominated": stats.dominated,
        "frontier_high_water": stats.frontier_high_water,
    })
}

fn outcome_json(dex: &Dex, outcome: &SearchOutcome) -> Result<Value, ReportError> {
    Ok(match outcome {
        SearchOutcome::Found(trace) => json!({
            "result": outcome.kind(),
            "trace": trace.to_json_value(dex),
            "trace_digest": trace.digest(dex)?.as_str(),
        }),
        SearchOutcome::Unsatisfiable => json!({"result": outcome.kind()}),
        SearchOutcome::LimitExceeded { iterations } => json!({
            "result": outcome.kind(),
            "iterations": iterations,
        }),
    })
}

/// Report for a single compatibility search.
///
/// # Errors
///
/// Returns [`ReportError`] if a digest cannot be computed.
pub fn search_report(dex: &Dex, request: &SearchRequest, result: &SearchResult) -> Result<QueryReport, ReportError> {
    let body = json!({
        "query": {
            "species": species_json(dex, request.species),
            "level": request.level,
            "abilities": abilities_json(dex, &request.abilities),
        },
        "outcome": outcome_json(dex, &result.outcome)?,
        "stats": stats_json(&result.stats),
    });
    QueryReport::seal(dex, "search", body)
}

/// Report for a batch query.
///
/// # Errors
///
/// Returns [`ReportError`] if a digest cannot be computed.
pub fn batch_report(dex: &Dex, query: &BatchQuery, batch: &BatchResult) -> Result<QueryReport, ReportError> {
    let mut hits = Vec::with_capacity(batch.hits.len());
    for hit in &batch.hits {
        let mut entry = json!({"species": species_json(dex, hit.species)});
        if let Some(trace) = &hit.trace {
            entry["trace"] = trace.to_json_value(dex);
            entry["trace_digest"] = Value::from(trace.digest(dex)?.as_str());
        }
        hits.push(entry);
    }
    let undecided: Vec<Value> = batch
        .undecided
        .iter()
        .map(|u| json!({"species": species_json(dex, u.species), "iterations": u.iterations}))
        .collect();
    let body = json!({
        "query": {
            "species": query.species.map(|id| species_json(dex, id)),
            "level": query.level,
            "abilities": abilities_json(dex, &query.abilities),
            "types": query.types.iter().map(|t| t.0).collect::<Vec<_>>(),
            "categories": query.categories.iter().map(|c| c.0).collect::<Vec<_>>(),
            "mode": query.mode.as_str(),
            "order": query.order.as_str(),
            "descending": query.order.is_descending(),
        },
        "examined": batch.examined,
        "hits": hits,
        "undecided": undecided,
        "stats": stats_json(&batch.stats),
    });
    QueryReport::seal(dex, "batch", body)
}

/// Report for a party-data check.
///
/// # Errors
///
/// Returns [`ReportError`] if a digest cannot be computed.
pub fn party_report(dex: &Dex, verdicts: &[MemberVerdict]) -> Result<QueryReport, ReportError> {
    let mut members = Vec::with_capacity(verdicts.len());
    for verdict in verdicts {
        let requirement = verdict.member.requirement();
        members.push(json!({
            "species": species_json(dex, verdict.member.species),
            "level": verdict.member.level,
            "abilities": abilities_json(dex, &requirement),
            "outcome": outcome_json(dex, &verdict.outcome)?,
        }));
    }
    QueryReport::seal(dex, "party", json!({"members": members}))
}

fn trigger_json(trigger: EvolutionTrigger) -> Value {
    match trigger {
        EvolutionTrigger::Level { level } => json!({"kind": "level", "level": level}),
        EvolutionTrigger::Friendship => json!({"kind": "friendship"}),
        EvolutionTrigger::Trade => json!({"kind": "trade"}),
        EvolutionTrigger::Item => json!({"kind": "item"}),
        EvolutionTrigger::Other => json!({"kind": "other"}),
    }
}

fn learnset_json(dex: &Dex, learnset: &Learnset) -> Value {
    learnset
        .entries()
        .iter()
        .map(|m| json!({"level": m.level, "ability": ability_json(dex, m.ability)}))
        .collect()
}

fn machines_json(dex: &Dex, record: &SpeciesRecord, era: Era) -> Value {
    let table = dex.machine_table(era);
    record
        .machines_for(era)
        .iter()
        .filter_map(|slot| {
            let ability = table.get(usize::from(slot))?;
            Some(json!({"slot": slot, "ability": ability_json(dex, *ability)}))
        })
        .collect()
}

/// Entry view of one species: stats, lineage in both directions, every
/// level list, both machine lists and the lineage root's breeding-only list.
///
/// # Errors
///
/// Returns [`ReportError`] if the data-set digest cannot be computed.
pub fn species_report(dex: &Dex, record: &SpeciesRecord) -> Result<QueryReport, ReportError> {
    let stats = record.base_stats;
    let evolves_from = record
        .evolves_from
        .map(|e| json!({"species": species_json(dex, e.from), "trigger": trigger_json(e.trigger)}));
    let evolves_into: Vec<Value> = dex
        .evolutions_of(record.id)
        .iter()
        .filter_map(|&id| dex.species(id))
        .filter_map(|child| {
            let trigger = child.evolves_from?.trigger;
            Some(json!({"species": species_json(dex, child.id), "trigger": trigger_json(trigger)}))
        })
        .collect();
    let root = dex.lineage_root(record);
    let body = json!({
        "species": species_json(dex, record.id),
        "base_stats": {
            "hp": stats.hp,
            "attack": stats.attack,
            "defense": stats.defense,
            "sp_attack": stats.sp_attack,
            "sp_defense": stats.sp_defense,
            "speed": stats.speed,
            "total": stats.get(Stat::Total),
        },
        "types": record.types.iter().map(|t| t.0).collect::<Vec<_>>(),
        "female_sixteenths": record.gender.0,
        "breeding": record.breeding.iter().map(|c| c.0).collect::<Vec<_>>(),
        "evolves_from": evolves_from,
        "evolves_into": evolves_into,
        "learnset": learnset_json(dex, &record.learnset),
        "legacy_learnset": learnset_json(dex, &record.legacy_learnset),
        "supplemental_learnset": record.supplemental_learnset.as_ref().map(|l| learnset_json(dex, l)),
        "machines": machines_json(dex, record, Era::Current),
        "legacy_machines": machines_json(dex, record, Era::Legacy),
        "breeding_only": abilities_json(dex, &root.breeding_only),
        "legacy": record.legacy,
    });
    QueryReport::seal(dex, "species", body)
}

/// Listing of every distribution event.
///
/// # Errors
///
/// Returns [`ReportError`] if the data-set digest cannot be computed.
pub fn distributions_report(dex: &Dex) -> Result<QueryReport, ReportError> {
    let events: Vec<Value> = dex
        .distributions()
        .iter()
        .map(|event| {
            json!({
                "species": species_json(dex, event.species),
                "min_level": event.min_level,
                "abilities": abilities_json(dex, &event.abilities),
                "shiny": event.shiny,
                "legacy": event.legacy,
            })
        })
        .collect();
    QueryReport::seal(dex, "distributions", json!({"events": events}))
}
