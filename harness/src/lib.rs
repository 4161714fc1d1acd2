//! Movecompat Harness: user-facing queries over the search layer.
//!
//! Resolves names, runs single, batch and party-data queries, and packages
//! the outcomes as canonical JSON reports bound to the data set's digest.
//! Search semantics live in `movecompat_search`; the harness only
//! orchestrates and renders.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod demo;
pub mod party;
pub mod query;
pub mod report;
