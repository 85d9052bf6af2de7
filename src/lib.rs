//! Static Huffman coding for whole files.
//!
//! `huf` compresses a file of 8-bit symbols into a self-describing
//! container and losslessly decompresses it. The container (magic
//! `HUF2`) carries only the original byte count and the 256 canonical
//! code lengths; the codes themselves are rederived on both sides from
//! the lengths alone.
//!
//! The interesting machinery lives in four places:
//! - [`huffman`]: min-heap tree construction with deterministic
//!   tie-breaking, and canonical code derivation from lengths.
//! - [`bitio`]: a 64-bit accumulator bit writer/reader over buffered
//!   byte streams.
//! - [`decoder`]: a 4096-entry first-level lookup table with a
//!   tree-walk fallback for long codes.
//! - [`codec`]: the two file-level entry points, [`encode`] and
//!   [`decode`].

pub mod bitio;
pub mod codec;
pub mod container;
pub mod decoder;
pub mod frequency;
pub mod huffman;
pub mod pqueue;

pub use codec::{decode, encode, encode_with_options, EncodeOptions, Stats};

#[cfg(test)]
mod validation;

/// Error kinds for huf operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HufError {
    /// Cannot open the input file or create the output file.
    FileOpen,
    /// Read failed or the input was truncated before the expected end.
    FileRead,
    /// Write failed or was short.
    FileWrite,
    /// Buffer allocation failed.
    Memory,
    /// Bad magic, invalid lengths table, corrupted bit stream, or
    /// premature end of the compressed body.
    BadFormat,
    /// Input size cannot be addressed on this platform.
    InputTooLarge,
    /// Internal invariant violated.
    Unknown,
}

impl std::fmt::Display for HufError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileOpen => write!(f, "cannot open file"),
            Self::FileRead => write!(f, "read failed"),
            Self::FileWrite => write!(f, "write failed"),
            Self::Memory => write!(f, "out of memory"),
            Self::BadFormat => write!(f, "bad container format"),
            Self::InputTooLarge => write!(f, "input too large"),
            Self::Unknown => write!(f, "internal error"),
        }
    }
}

impl std::error::Error for HufError {}

pub type HufResult<T> = Result<T, HufError>;
