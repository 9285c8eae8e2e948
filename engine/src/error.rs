//! Error types surfaced by the engine.
//!
//! Only the load boundary can fail. Everything inside the derivation pipeline
//! absorbs anomalies locally by skipping the record or falling back to the raw
//! name.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a domain payload.
///
/// `Clone` so that one memoized failure can be handed to every caller that
/// was coalesced onto the same in-flight load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The payload file could not be read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
    /// The payload is not valid domain JSON.
    #[error("failed to parse domain payload for {domain}: {message}")]
    Parse {
        /// Domain path being loaded.
        domain: String,
        /// Parser error text.
        message: String,
    },
    /// The payload was blank or `null`.
    #[error("domain payload for {0} is empty")]
    EmptyPayload(String),
    /// No payload file exists for the domain path.
    #[error("no payload found for domain {0}")]
    UnknownDomain(String),
}

/// Failure to read or parse an explorer configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for the configuration schema.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    /// A toggle name was not recognized.
    #[error("unknown toggle {0:?}")]
    UnknownToggle(String),
}
