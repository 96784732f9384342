//! # Splashfeed - Photo Feed Client Engine
//!
//! An async client engine for Unsplash-style photo APIs: an OAuth2
//! code-grant token exchange, a paginated, de-duplicated, append-only photo
//! feed with like synchronization, profile and avatar lookup, and broadcast
//! change events that decouple the engine from any presentation layer.
//!
//! ## Architecture Overview
//!
//! - [`domain`] - Value types: photos, profiles, the ordered photo set
//! - [`api`] - Request building, the transport seam, wire records, errors
//! - [`token`] - Bearer-token persistence
//! - [`services`] - The session services: feed, oauth, profile, avatar
//! - [`config`] - Layered configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use splashfeed::services::FeedEvent;
//! use splashfeed::test_helpers::{create_test_feed, photos_page_json};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let (feed, transport) = create_test_feed();
//! transport.push_json(200, &photos_page_json(&["a", "b"]));
//!
//! let mut events = feed.subscribe();
//! feed.fetch_next_page().await?;
//!
//! // The event arrives after the merge, so the count is already updated
//! assert_eq!(events.recv().await?, FeedEvent::PhotosAppended);
//! assert_eq!(feed.photo_count().await, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```
//!
//! ## Key Guarantees
//!
//! - **Append-only feed**: delivered photos are never removed or reordered,
//!   so observers can derive insertions from counts alone
//! - **Single-flight**: at most one page fetch and one like request in
//!   flight; concurrent callers are rejected, not queued
//! - **Server-confirmed likes**: the applied like state comes from the
//!   server response, never a blind local flip

#![deny(warnings)]
#![allow(dead_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod services;
pub mod test_helpers;
pub mod token;
pub mod utils;

// Re-exports for convenience
pub use api::error::ApiError;
pub use domain::{Photo, PhotoSet, Profile};
pub use services::{FeedEvent, FeedService, FetchOutcome};

/// App-level result type for binary and glue code; library APIs return
/// typed [`ApiError`]s instead.
pub type Result<T> = color_eyre::eyre::Result<T>;
