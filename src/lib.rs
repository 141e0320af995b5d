//! Client for the blog API: session management, navigation gating and the
//! post/comment flows behind the blog's pages.

pub mod config;
pub mod nav;
pub mod net;
pub mod notice;
pub mod services;
pub mod state;
