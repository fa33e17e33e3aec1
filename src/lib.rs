//! EatIT client session lifecycle
//!
//! [`session::SessionManager`] owns the bearer token and user identity for a
//! running client, forces a logout when the token lapses or the backend
//! rejects it, and persists the session through a [`storage::SessionStore`].
//! The `eatit` binary wraps it in a small CLI.

pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod output;
pub mod session;
pub mod storage;
