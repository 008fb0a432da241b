//! # CipherStudio
//!
//! Backend for a browser code playground: project storage with ownership and
//! visibility, bearer credential verification, and the client-side workspace
//! that edits and mirrors projects locally.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! cipherstudio = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cipherstudio::auth::TokenVerifier;
//! use cipherstudio::server::{AppState, create_router};
//! use cipherstudio::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/cipherstudio.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     TokenVerifier::new(b"change-me"),
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod store;
pub mod types;
pub mod workspace;
