//! brp-wait Core
//!
//! Shared types for the brp-wait readiness poller.
//!
//! This crate contains:
//! - DTOs: JSON-RPC envelopes exchanged with a Bevy Remote Protocol endpoint
//! - Domain types: Outcomes of a single poll attempt and of a whole poll run

pub mod domain;
pub mod dto;
