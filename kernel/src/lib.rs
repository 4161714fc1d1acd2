//! Movecompat Kernel: reference data and canonical hashing.
//!
//! # API Surface
//!
//! - [`dex::dataset::Dex`] -- the validated, immutable reference data set
//! - [`proof::canon::canonical_json_bytes`] -- the single JSON canonicalizer
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hash
//!
//! # Module Dependency Direction
//!
//! `proof` ← `dex`
//!
//! One-way only. `dex` uses `proof` for its snapshot digest.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dex;
pub mod proof;
