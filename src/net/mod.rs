//! HTTP access to the remote blog API.

pub mod api;
pub mod types;

pub use api::{Authenticator, BlogApi, IdentityProvider};
pub use types::{ApiError, Identity};

// =============================================================================
// TEST HELPERS
// =============================================================================
