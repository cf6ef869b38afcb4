//! Data Transfer Objects for the remote endpoint
//!
//! The Bevy Remote Protocol speaks JSON-RPC 2.0 over HTTP. Only the
//! envelopes needed to ask "are you up?" live here.

pub mod rpc;
