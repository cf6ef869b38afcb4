//! Scheduler layer
//!
//! Drives the poll loop: one attempt at a time until the endpoint answers
//! or the deadline passes.

pub mod poller;

pub use poller::ReadinessPoller;
