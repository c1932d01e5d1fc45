use thiserror::Error;

/// Errors surfaced by the conversion engine.
///
/// Detection never fails; only rule construction and document re-assembly do.
/// File handling in the binary reports through `anyhow`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("edit {start}..{end} is outside a document of {len} bytes")]
    SpliceOutOfRange { start: usize, end: usize, len: usize },

    #[error("edit starting at {start} overlaps the edit starting at {next_start}")]
    SpliceOverlap { start: usize, next_start: usize },

    #[error("edit offset {offset} is not on a character boundary")]
    SpliceBoundary { offset: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
