use std::io;
use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong while decoding, encoding or forwarding a
/// single DNS request. None of these are recoverable for the request at hand.
#[derive(Error, Debug)]
pub enum DnsError {
    #[error("truncated input: need {needed} bytes at offset {offset}, buffer has {available}")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("label of {len} bytes exceeds the 63 byte limit")]
    LabelTooLong { len: usize },

    #[error("compression pointer to offset {offset} loops back into the name")]
    CompressionLoop { offset: usize },

    #[error("more than {max} compression pointers in a single name")]
    CompressionDepthExceeded { max: usize },

    #[error("message of {size} bytes exceeds the {max} byte limit")]
    MessageTooLarge { size: usize, max: usize },

    #[error("{section} count is {declared} but {actual} entries are present")]
    CountMismatch {
        section: &'static str,
        declared: u16,
        actual: usize,
    },

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] io::Error),

    #[error("upstream did not answer within {0:?}")]
    UpstreamTimeout(Duration),
}

impl DnsError {
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        DnsError::TruncatedInput {
            offset,
            needed,
            available,
        }
    }

    /// Transport failures are worth another attempt, codec failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, DnsError::UpstreamUnavailable(_) | DnsError::UpstreamTimeout(_))
    }
}

pub type Result<T> = std::result::Result<T, DnsError>;
