//! Movecompat Search: compatibility search over the acquisition state space.
//!
//! Decides whether one individual of a species, at a given level, can hold a
//! set of abilities at the same time, and produces a witnessing trace when it
//! can. Depends only on `movecompat_kernel`.
//!
//! # Crate dependency graph
//!
//! ```text
//! movecompat_kernel  ←  movecompat_search  ←  movecompat_harness
//! (reference data)      (rules, frontier)     (queries, reports, CLI)
//! ```
//!
//! # Key types
//!
//! - [`state::AcquisitionState`]: immutable, `Rc`-linked search state
//! - [`rules::TransitionRules`]: the acquisition mechanisms
//! - [`frontier::DominanceFrontier`]: FIFO queue with per-species pruning
//! - [`search::search`]: validated entry point returning [`search::SearchOutcome`]
//! - [`trace::Trace`]: root-first witness
//! - [`coverage::learns_each`]: per-ability individual check

#![forbid(unsafe_code)]

pub mod coverage;
pub mod error;
pub mod frontier;
pub mod policy;
pub mod rules;
pub mod search;
pub mod state;
pub mod trace;

#[cfg(test)]
pub(crate) mod fixtures;
