//! Reference data: species, abilities, distribution events, machine tables.
//!
//! Everything here is immutable once a [`dataset::Dex`] is built, so a `Dex`
//! can be shared across threads running independent searches.

pub mod ability;
pub mod dataset;
pub mod distribution;
pub mod ids;
pub mod machines;
pub mod species;
