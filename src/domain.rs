//! Domain types
//!
//! This module contains the value types the services operate on:
//! - Photo feed entries and their intrinsic sizes
//! - User profiles
//! - The insertion-ordered, de-duplicated photo collection

pub mod collections;
pub mod photo;
pub mod profile;

pub use collections::PhotoSet;
pub use photo::{Photo, PhotoSize};
pub use profile::Profile;
