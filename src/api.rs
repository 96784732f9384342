//! API plumbing
//!
//! This module contains everything that touches the wire:
//! - Request building and HTTP method selection
//! - The transport seam and its reqwest-backed implementation
//! - Wire records and their conversions into domain types
//! - OAuth2 authorize/token URL construction
//! - The error taxonomy surfaced to callers

pub mod authorize;
pub mod error;
pub mod records;
pub mod request;
pub mod transport;
