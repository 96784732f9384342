//! Session services
//!
//! Each service owns one slice of session state behind a `tokio` mutex and
//! talks to the API through the transport seam:
//! - Feed pagination and like synchronization
//! - OAuth2 code exchange
//! - Profile and avatar lookup
//! - Session teardown
//! - The presentation-adjacent pager

pub mod avatar;
pub mod feed;
pub mod logout;
pub mod oauth;
pub mod pager;
pub mod profile;

pub use avatar::AvatarService;
pub use feed::{FeedEvent, FeedService, FetchOutcome};
pub use logout::LogoutService;
pub use oauth::OAuth2Service;
pub use pager::FeedPager;
pub use profile::ProfileService;
