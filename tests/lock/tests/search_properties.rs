//! Search property lock tests.
//!
//! Proves:
//! 1. Requirements never grow along a witness chain
//! 2. A level-up ability below the query level is confirmed at the root
//! 3. An ability only reachable before evolution is found via one devolution
//! 4. A legacy-machine-only ability on a species with no legacy presence is
//!    unsatisfiable
//! 5. A species with nothing to step to yields no candidates
//! 6. Identical states are never admitted twice
//! 7. Cyclic breeding fan-out terminates, bounded or not

use std::rc::Rc;

use lock_tests::{demo, fan_out_dex, lock_dex, FAN_OUT_ABILITY};
use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::SpeciesId;
use movecompat_search::frontier::{Admission, DominanceFrontier};
use movecompat_search::policy::SearchPolicy;
use movecompat_search::rules::TransitionRules;
use movecompat_search::search::{search, SearchOutcome, SearchRequest, SearchResult};
use movecompat_search::state::{AcquisitionState, Requirement, StepKind};

fn run(dex: &Dex, species: &str, level: u8, abilities: &[&str], policy: &SearchPolicy) -> SearchResult {
    let record = dex.species_by_name(species).expect("species exists");
    let abilities = abilities
        .iter()
        .map(|name| dex.ability_by_name(name).expect("ability exists").id);
    search(dex, &SearchRequest::new(record.id, level, abilities), policy).expect("request is valid")
}

fn steps(result: &SearchResult) -> Vec<StepKind> {
    result
        .outcome
        .trace()
        .expect("found")
        .steps()
        .iter()
        .map(|s| s.step)
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Requirement monotonicity
// ---------------------------------------------------------------------------

#[test]
fn requirement_never_grows_along_witness() {
    let dex = demo();
    let queries: [(&str, u8, &[&str]); 5] = [
        ("Bulbasaur", 30, &["Body Slam", "Razor Leaf"]),
        ("Venusaur", 40, &["Razor Leaf"]),
        ("Pichu", 10, &["Charm", "Double Kick"]),
        ("Pikachu", 10, &["Surf", "Thunder Shock"]),
        ("Smeargle", 50, &["Surf", "Thunderbolt"]),
    ];
    for (species, level, abilities) in queries {
        let result = run(&dex, species, level, abilities, &SearchPolicy::default());
        let trace = result.outcome.trace().unwrap_or_else(|| panic!("{species} found"));
        for pair in trace.steps().windows(2) {
            assert!(
                pair[1].requirement.is_subset(&pair[0].requirement),
                "{species}: requirement grew at {}",
                pair[1].step
            );
        }
        let last = trace.steps().last().expect("non-empty trace");
        assert!(last.requirement.is_empty(), "{species}: witness ends satisfied");
        assert_eq!(trace.steps()[0].step, StepKind::Root);
    }
}

// ---------------------------------------------------------------------------
// 2. Direct level-up
// ---------------------------------------------------------------------------

#[test]
fn level_up_ability_found_at_root() {
    let dex = lock_dex();
    let result = run(&dex, "Seed", 50, &["Growl"], &SearchPolicy::default());
    assert_eq!(steps(&result), [StepKind::Root, StepKind::DirectAcquisition]);
    assert_eq!(result.stats.processed, 0);
}

// ---------------------------------------------------------------------------
// 3. Devolution
// ---------------------------------------------------------------------------

#[test]
fn pre_evolution_ability_found_via_one_devolution() {
    let dex = lock_dex();
    let result = run(&dex, "Sapling", 50, &["Ember"], &SearchPolicy::default());
    assert_eq!(
        steps(&result),
        [StepKind::Root, StepKind::LevelUpEvolution, StepKind::DirectAcquisition]
    );
    let trace = result.outcome.trace().expect("found");
    assert_eq!(trace.steps()[1].species, SpeciesId(1));
    assert_eq!(trace.steps()[1].level, 49);
}

#[test]
fn devolution_needs_the_evolution_level() {
    let dex = lock_dex();
    let result = run(&dex, "Sapling", 15, &["Ember"], &SearchPolicy::default());
    assert_eq!(result.outcome, SearchOutcome::Unsatisfiable);
}

// ---------------------------------------------------------------------------
// 4. Legacy machine without legacy presence
// ---------------------------------------------------------------------------

#[test]
fn legacy_machine_only_is_unsatisfiable() {
    let dex = lock_dex();
    let result = run(&dex, "Modern", 50, &["Flash"], &SearchPolicy::default());
    assert_eq!(result.outcome, SearchOutcome::Unsatisfiable);
    assert_eq!(result.stats.processed, 1);
}

// ---------------------------------------------------------------------------
// 5. Dead ends
// ---------------------------------------------------------------------------

#[test]
fn isolated_species_has_no_successors() {
    let dex = lock_dex();
    let rules = TransitionRules::new(&dex, &SearchPolicy::default());
    let flash = dex.ability_by_name("Flash").expect("ability exists").id;
    let root = AcquisitionState::root(SpeciesId(3), 50, Requirement::from([flash]));
    assert!(rules.devolution(&root).is_none());
    assert!(rules.breeding(&root).is_empty());
    assert!(rules.transfer(&root).is_none());
    assert!(rules.successors(&root).is_empty());
}

// ---------------------------------------------------------------------------
// 6. Dominance
// ---------------------------------------------------------------------------

#[test]
fn identical_state_is_never_admitted_twice() {
    let dex = lock_dex();
    let rules = TransitionRules::new(&dex, &SearchPolicy::default());
    let mut frontier = DominanceFrontier::new(rules);
    let secret = dex.ability_by_name("Secret Art").expect("ability exists").id;

    let first = AcquisitionState::root(SpeciesId(1), 20, Requirement::from([secret]));
    let twin = AcquisitionState::root(SpeciesId(1), 20, Requirement::from([secret]));
    assert!(matches!(frontier.admit(&first), Admission::Admitted));
    assert!(matches!(frontier.admit(&twin), Admission::Dominated));
    assert!(matches!(frontier.admit(&Rc::clone(&first)), Admission::Dominated));

    let lower = AcquisitionState::root(SpeciesId(1), 19, Requirement::from([secret]));
    assert!(matches!(frontier.admit(&lower), Admission::Admitted));
    assert_eq!(frontier.registered(SpeciesId(1)).len(), 2);
    assert_eq!(frontier.dominated_count(), 2);
}

// ---------------------------------------------------------------------------
// 7. Fan-out termination
// ---------------------------------------------------------------------------

#[test]
fn cyclic_fan_out_hits_the_bound() {
    let dex = fan_out_dex(64);
    let policy = SearchPolicy {
        max_iterations: 8,
        ..SearchPolicy::default()
    };
    let request = SearchRequest::new(SpeciesId(1), 50, [FAN_OUT_ABILITY]);
    let result = search(&dex, &request, &policy).expect("request is valid");
    assert_eq!(result.outcome, SearchOutcome::LimitExceeded { iterations: 9 });
    assert_eq!(result.stats.processed, 9);
}

#[test]
#[ignore = "processes ten thousand states; run with --release --ignored"]
fn cyclic_fan_out_hits_the_default_bound() {
    let dex = fan_out_dex(10_100);
    let request = SearchRequest::new(SpeciesId(1), 50, [FAN_OUT_ABILITY]);
    let result = search(&dex, &request, &SearchPolicy::default()).expect("request is valid");
    assert_eq!(result.outcome, SearchOutcome::LimitExceeded { iterations: 10_001 });
    assert_eq!(result.stats.processed, 10_001);
}

#[test]
fn cyclic_fan_out_exhausts_without_a_bound_hit() {
    let dex = fan_out_dex(64);
    let request = SearchRequest::new(SpeciesId(1), 50, [FAN_OUT_ABILITY]);
    let result = search(&dex, &request, &SearchPolicy::default()).expect("request is valid");
    assert_eq!(result.outcome, SearchOutcome::Unsatisfiable);
    // The root, then one bred state per other species; every re-breed is dominated.
    assert_eq!(result.stats.processed, 64);
    assert_eq!(result.stats.admitted, 64);
    assert!(result.stats.dominated >= 63 * 64);
}
