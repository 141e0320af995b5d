//! User-facing flows built on the API client and the session store.
//!
//! ARCHITECTURE
//! ============
//! Flows own the policy (who may do what, which notice to show) so the CLI
//! and any other front end only translate input and print results.

pub mod auth;
pub mod posts;
