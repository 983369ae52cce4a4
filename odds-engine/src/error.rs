//! Error taxonomy.
//!
//! These are the kinds surfaced at module boundaries (transport, adapters,
//! scheduler). Internal glue code inside adapters keeps returning
//! `Box<dyn std::error::Error + Send + Sync>`; it gets folded into one of
//! these at the `Adapter::parse_once` boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport failure: {0}")]
    Request(String),
    #[error("response was not JSON (status {status}, content-type {content_type:?})")]
    NotJson { status: u16, content_type: Option<String> },
    #[error("request timed out")]
    Timeout,
    #[error("request cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("mirror could not be resolved and no fallback base URL is configured")]
    Unresolved,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode vendor payload: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("empty or placeholder team name")]
    InvalidTeamName,
    #[error("match already started")]
    Live,
    #[error("unparseable start time: {0}")]
    BadStartTime(String),
}

/// One complete ingestion pass's outcome. `ParseOnce` never propagates
/// per-match/per-league failures; it only fails for the whole-run-aborting
/// reasons below. A whole-response decode failure (the listing endpoint
/// itself returned a body that doesn't match the vendor schema at all)
/// still aborts the pass — genuine per-item tolerance (one unrecognized
/// market/factor code inside an otherwise well-formed response) is handled
/// upstream of this, in each adapter's code-table lookups returning `None`
/// and being skipped rather than failing the decode.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("mirror unresolved: {0}")]
    MirrorUnresolved(#[from] MirrorError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Misconfiguration — process exits at startup, never recovered from.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required configuration key missing: {0}")]
    MissingKey(&'static str),
    #[error("duplicate adapter registration: {0}")]
    DuplicateAdapter(String),
    #[error("unknown parser name in enabled_parsers: {0}")]
    UnknownParser(String),
}
