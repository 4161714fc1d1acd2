//! Shared helpers for movecompat benchmark suites.
//!
//! A [`Regime`] is a data set plus one resolved query, prepared once so the
//! benches time only the search.

use movecompat_harness::demo::{demo_dex, fan_out_dex, FAN_OUT_ABILITY};
use movecompat_harness::query::{resolve_abilities, resolve_species};
use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::SpeciesId;
use movecompat_search::policy::SearchPolicy;
use movecompat_search::search::{search, SearchRequest, SearchResult};

/// A prepared benchmark scenario.
pub struct Regime {
    pub name: &'static str,
    pub dex: Dex,
    pub request: SearchRequest,
    pub policy: SearchPolicy,
}

impl Regime {
    /// Run the search once.
    ///
    /// # Panics
    ///
    /// Panics if the prepared request fails validation.
    #[must_use]
    pub fn run(&self) -> SearchResult {
        search(&self.dex, &self.request, &self.policy).expect("regime request is valid")
    }
}

fn demo_regime(name: &'static str, species: &str, level: u8, abilities: &[&str]) -> Regime {
    let dex = demo_dex().expect("demo data validates");
    let request = SearchRequest {
        species: resolve_species(&dex, species).expect("species resolves"),
        level,
        abilities: resolve_abilities(&dex, abilities).expect("abilities resolve"),
    };
    Regime {
        name,
        dex,
        request,
        policy: SearchPolicy::default(),
    }
}

/// Found at the root after direct reduction.
///
/// # Panics
///
/// Panics if the demo data fails validation.
#[must_use]
pub fn regime_direct() -> Regime {
    demo_regime("direct", "Bulbasaur", 50, &["Growl", "Razor Leaf"])
}

/// Found through a transfer into the legacy era.
///
/// # Panics
///
/// Panics if the demo data fails validation.
#[must_use]
pub fn regime_legacy_transfer() -> Regime {
    demo_regime("legacy_transfer", "Bulbasaur", 30, &["Body Slam", "Razor Leaf"])
}

/// Found through breeding with a partner from another line.
///
/// # Panics
///
/// Panics if the demo data fails validation.
#[must_use]
pub fn regime_breeding() -> Regime {
    demo_regime("breeding", "Pichu", 10, &["Charm", "Double Kick"])
}

/// Exhausts the demo frontier without a witness.
///
/// # Panics
///
/// Panics if the demo data fails validation.
#[must_use]
pub fn regime_dead_end() -> Regime {
    demo_regime("dead_end", "Chikorita", 30, &["Ancient Power"])
}

/// Exhausts a generated set of `count` mutually breedable species.
///
/// # Panics
///
/// Panics if the generated set fails validation.
#[must_use]
pub fn regime_fan_out(count: u16) -> Regime {
    Regime {
        name: "fan_out",
        dex: fan_out_dex(count).expect("fan-out set validates"),
        request: SearchRequest::new(SpeciesId(1), 50, [FAN_OUT_ABILITY]),
        policy: SearchPolicy::default(),
    }
}

/// The same fan-out, cut short by the iteration bound.
///
/// # Panics
///
/// Panics if the generated set fails validation.
#[must_use]
pub fn regime_budget_limited(count: u16, max_iterations: u64) -> Regime {
    Regime {
        name: "budget_limited",
        policy: SearchPolicy {
            max_iterations,
            ..SearchPolicy::default()
        },
        ..regime_fan_out(count)
    }
}

/// Every fixed regime, for the macro suite.
#[must_use]
pub fn all_regimes() -> Vec<Regime> {
    vec![
        regime_direct(),
        regime_legacy_transfer(),
        regime_breeding(),
        regime_dead_end(),
        regime_fan_out(128),
        regime_budget_limited(128, 32),
    ]
}
