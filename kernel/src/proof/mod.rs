//! Proof module: canonical JSON and content hashing.
//!
//! Depends on nothing internal. `dex` depends on `proof` for its snapshot digest.

pub mod canon;
pub mod hash;
