use thiserror::Error;

/// Recoverable heap errors.
///
/// Broken rooting or write-barrier discipline is not reported here: it means the
/// heap is already corrupt, and the collector panics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GcError {
    /// No further page of pair storage could be obtained.
    #[error("out of memory: cannot allocate pair page {pages} ({page_size} pairs per page)")]
    OutOfMemory { pages: usize, page_size: usize },

    /// A pair operation was applied to a non-pair value.
    #[error("{0} is not a pair")]
    NotAPair(&'static str),

    /// A configuration value was rejected.
    #[error("invalid gc option: {0}")]
    InvalidOption(&'static str),

    /// A serialized configuration could not be parsed.
    #[error("cannot parse gc option: {0}")]
    Config(String),
}

pub type GcResult<T> = Result<T, GcError>;
