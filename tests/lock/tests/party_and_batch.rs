//! Batch and party-data lock tests.
//!
//! Proves:
//! 1. Distribution events count for the compatible mode only
//! 2. Species that hit the bound are listed as undecided, never as misses,
//!    and a named species outside the filters is not examined
//! 3. Party members are checked independently, in input order

use lock_tests::{demo, fan_out_dex, FAN_OUT_ABILITY};
use movecompat_harness::party::{check_party, parse_party, PartyParseError};
use movecompat_harness::query::{resolve_abilities, run_batch, BatchQuery, BatchResult, HitOrder, QueryMode};
use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::{BreedingCategory, SpeciesId, TypeTag};
use movecompat_search::policy::SearchPolicy;
use movecompat_search::search::SearchOutcome;
use movecompat_search::state::Requirement;

// ---------------------------------------------------------------------------
// 1. Modes
// ---------------------------------------------------------------------------

fn single(dex: &Dex, species: u16, level: u8, names: &[&str], mode: QueryMode) -> BatchResult {
    let mut query = BatchQuery::new(level, resolve_abilities(dex, names).expect("abilities resolve"));
    query.species = Some(SpeciesId(species));
    query.mode = mode;
    run_batch(dex, &query, &SearchPolicy::default()).expect("batch runs")
}

#[test]
fn distribution_counts_only_for_compatible() {
    let dex = demo();
    let compatible = single(&dex, 25, 30, &["Surf", "Thunder Shock"], QueryMode::Compatible);
    assert_eq!(compatible.hits.len(), 1);
    assert!(compatible.hits[0].trace.is_some());

    let individually = single(&dex, 25, 30, &["Surf", "Thunder Shock"], QueryMode::Individually);
    assert_eq!(individually.examined, 1);
    assert!(individually.hits.is_empty());
}

#[test]
fn breeding_only_counts_in_both_modes() {
    let dex = demo();
    for mode in [QueryMode::Compatible, QueryMode::Individually] {
        let result = single(&dex, 172, 10, &["Charm", "Double Kick"], mode);
        assert_eq!(result.hits.len(), 1, "{}", mode.as_str());
    }
}

#[test]
fn name_order_sorts_hits() {
    let dex = demo();
    let mut query = BatchQuery::new(50, resolve_abilities(&dex, &["Tackle"]).expect("abilities resolve"));
    query.order = HitOrder::Name;
    let result = run_batch(&dex, &query, &SearchPolicy::default()).expect("batch runs");
    let names: Vec<&str> = result
        .hits
        .iter()
        .map(|h| dex.species(h.species).expect("hit exists").name.as_str())
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert!(!names.is_empty());
    assert_eq!(names, sorted);
}

// ---------------------------------------------------------------------------
// 2. Undecided species
// ---------------------------------------------------------------------------

#[test]
fn bounded_species_are_undecided_not_misses() {
    let dex = fan_out_dex(32);
    let mut query = BatchQuery::new(50, Requirement::from([FAN_OUT_ABILITY]));
    query.categories = vec![BreedingCategory(1)];
    let policy = SearchPolicy {
        max_iterations: 4,
        ..SearchPolicy::default()
    };
    let result = run_batch(&dex, &query, &policy).expect("batch runs");
    assert_eq!(result.examined, 32);
    assert!(result.hits.is_empty());
    assert_eq!(result.undecided.len(), 32);
    assert!(result.undecided.iter().all(|u| u.iterations == 5));
}

#[test]
fn named_species_outside_filters_is_not_examined() {
    let dex = demo();
    let mut query = BatchQuery::new(30, resolve_abilities(&dex, &["Surf"]).expect("abilities resolve"));
    query.species = Some(SpeciesId(25));
    query.categories = vec![BreedingCategory(1)];
    let result = run_batch(&dex, &query, &SearchPolicy::default()).expect("batch runs");
    assert_eq!(result.examined, 0);
    assert!(result.hits.is_empty());
    assert_eq!(result.stats.processed, 0);

    query.categories.clear();
    query.types = vec![TypeTag(13)];
    let result = run_batch(&dex, &query, &SearchPolicy::default()).expect("batch runs");
    assert_eq!(result.examined, 1);
    assert_eq!(result.hits.len(), 1);
}

// ---------------------------------------------------------------------------
// 3. Party data
// ---------------------------------------------------------------------------

const PIKACHU: &str = "25_50_0_a_F_1_1_2_3_4_5_7_2_11_0_1_2_3_4_0_1_2_3_100__50";
const NIDORAN_M: &str = "32_20_1_2_3_4_1_2_3_4_5_20_1_0_0_1_2_3_4_0_1_2_3_100_0_50";
const CHIKORITA: &str = "152_30_0_0_0_0_1_2_3_4_5_15_0_0_0_1_2_3_4_0_1_2_3_100_0_50";

#[test]
fn party_members_checked_in_order() {
    let dex = demo();
    let input = [PIKACHU, CHIKORITA, NIDORAN_M].join("_x_");
    let members = parse_party(&input).expect("party parses");
    let verdicts = check_party(&dex, &members, &SearchPolicy::default()).expect("party checks");
    let species: Vec<SpeciesId> = verdicts.iter().map(|v| v.member.species).collect();
    assert_eq!(species, [SpeciesId(25), SpeciesId(152), SpeciesId(32)]);
    assert!(verdicts[0].outcome.is_found());
    assert_eq!(verdicts[1].outcome, SearchOutcome::Unsatisfiable);
    assert!(verdicts[2].outcome.is_found());
}

#[test]
fn malformed_second_entry_is_located() {
    let input = format!("{PIKACHU}_x_{}", CHIKORITA.replacen("_100_", "_1000_", 1));
    assert!(matches!(
        parse_party(&input),
        Err(PartyParseError::BadField { entry: 1, field: 23, .. })
    ));
}
