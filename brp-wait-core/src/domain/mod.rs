//! Domain types
//!
//! Outcomes produced by the poll loop. Nothing here outlives a single run.

pub mod attempt;
pub mod poll;
