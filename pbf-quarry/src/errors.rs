use thiserror::Error;

/// Errors raised while turning a PBF stream into Parquet tables.
///
/// Every variant is fatal for its unit of work: a framing error aborts the
/// whole run, a codec or decode error aborts the block it belongs to, and a
/// write error aborts the partition. Nothing in this crate retries.
#[derive(Debug, Error)]
pub enum Error {
    /// Short read or invalid length prefix in the framed stream.
    #[error("framing error at byte offset {offset}: {reason}")]
    Framing { offset: u64, reason: String },

    /// Unknown or missing compression variant, or corrupt compressed data.
    #[error("codec error: {0}")]
    Codec(String),

    /// Malformed primitive block contents.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failure opening, appending to, rotating, or closing an output file.
    #[error("write error: {0}")]
    Write(String),
}

impl Error {
    pub(crate) fn framing(offset: u64, reason: impl Into<String>) -> Self {
        Error::Framing {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn codec(detail: impl Into<String>) -> Self {
        Error::Codec(detail.into())
    }

    pub(crate) fn decode(detail: impl Into<String>) -> Self {
        Error::Decode(detail.into())
    }

    pub(crate) fn write(detail: impl Into<String>) -> Self {
        Error::Write(detail.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
