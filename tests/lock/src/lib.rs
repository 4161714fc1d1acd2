//! Shared fixtures for the lock tests and the cross-process fixture binary.
//!
//! Three data sets:
//! - [`lock_dex`]: a three-species set built for the search properties
//! - [`demo`]: the harness demo set
//! - [`fan_out_dex`]: the generated all-breed-with-all set

#![forbid(unsafe_code)]

use movecompat_kernel::dex::dataset::Dex;

pub use movecompat_harness::demo::FAN_OUT_ABILITY;

/// Wire form of the property fixture.
pub const LOCK_DEX_JSON: &str = include_str!("../data/lock_dex.json");

/// The property fixture.
///
/// # Panics
///
/// Panics if the bundled JSON does not validate.
#[must_use]
pub fn lock_dex() -> Dex {
    Dex::from_json_slice(LOCK_DEX_JSON.as_bytes()).expect("lock fixture validates")
}

/// The harness demo data set.
///
/// # Panics
///
/// Panics if the bundled JSON does not validate.
#[must_use]
pub fn demo() -> Dex {
    movecompat_harness::demo::demo_dex().expect("demo data validates")
}

/// `count` mutually breedable species; see [`movecompat_harness::demo::fan_out_dex`].
///
/// # Panics
///
/// Panics if the generated set does not validate.
#[must_use]
pub fn fan_out_dex(count: u16) -> Dex {
    movecompat_harness::demo::fan_out_dex(count).expect("fan-out set validates")
}
