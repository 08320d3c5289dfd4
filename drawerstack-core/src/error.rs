//! Error types for the drawer controller.
//!
//! Stack operations themselves never fail: stale ids and repeated closes are
//! no-ops. Errors only surface from configuration, content lookup, session
//! access, and scripted replays.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ContentType;

/// Errors from drawer controller setup and wiring.
#[derive(Debug, Error)]
pub enum DrawerError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("no content provider registered for '{0}'")]
    UnknownContentType(ContentType),

    #[error("no drawer session installed on this thread")]
    SessionNotInstalled,

    #[error("drawer session is already borrowed (re-entrant access)")]
    SessionBusy,

    #[error("invalid script at step {step}: {message}")]
    InvalidScript { step: usize, message: String },
}
