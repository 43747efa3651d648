//! Flattens a scanned university marks ledger into a per-student
//! results table.
//!
//! The ledger has no regular layout: a header row carries subject
//! codes, and each student occupies a loose block of rows (identifier,
//! name, practical marks, results, grade points) at variable offsets.
//! The scanner locates each block with bounded forward searches and
//! degrades to defaults (0, "Pass", blank) wherever the ledger is
//! incomplete.

pub mod config;
pub mod export;
pub mod grid;
pub mod scan;
