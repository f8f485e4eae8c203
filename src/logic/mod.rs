//! Logic modules: from category requests to installed packages.
//!
//! # Modules
//!
//! - `classify`: name-based source inference for untagged candidates
//! - `retry`: attempt bound, backoff and the `Sleeper` seam
//! - `resolver`: best-first resolution of one category
//! - `report`: per-category and per-run results
//! - `provision`: pre-flight steps and the full run

pub mod classify;
pub mod provision;
pub mod report;
pub mod resolver;
pub mod retry;
