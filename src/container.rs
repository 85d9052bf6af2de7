//! The on-disk container header.
//!
//! Layout, little-endian throughout, no padding:
//!
//! | Offset | Size | Field                               |
//! |--------|------|-------------------------------------|
//! | 0      | 4    | Magic `HUF2`                        |
//! | 4      | 8    | original_size (u64)                 |
//! | 12     | 256  | code length per symbol, one byte    |
//! | 268    | ...  | compressed bit stream               |
//!
//! `HUF2` persists canonical code lengths, which is everything the
//! decoder needs to rederive the codes. The legacy `HUF1` layout
//! carried the full 256-entry u64 frequency table instead; it is
//! recognized only so it can be rejected as a format error rather than
//! mistaken for noise.

use std::io::{Read, Write};

use crate::huffman::MAX_SYMBOLS;
use crate::{HufError, HufResult};

/// Container magic for the canonical-lengths layout.
pub const MAGIC: [u8; 4] = *b"HUF2";
/// Magic of the legacy frequency-table layout, not supported here.
pub const LEGACY_MAGIC: [u8; 4] = *b"HUF1";
/// Full header size: magic + original_size + lengths table.
pub const HEADER_LEN: usize = 4 + 8 + MAX_SYMBOLS;

/// Write the container header.
pub fn write_header<W: Write>(
    out: &mut W,
    original_size: u64,
    lengths: &[u8; MAX_SYMBOLS],
) -> HufResult<()> {
    out.write_all(&MAGIC).map_err(|_| HufError::FileWrite)?;
    out.write_all(&original_size.to_le_bytes())
        .map_err(|_| HufError::FileWrite)?;
    out.write_all(lengths).map_err(|_| HufError::FileWrite)?;
    Ok(())
}

/// Read and validate the container header.
///
/// A truncated header or wrong magic is a format error; the Kraft
/// check on the lengths table happens in the decode driver, before any
/// output is produced.
pub fn read_header<R: Read>(input: &mut R) -> HufResult<(u64, [u8; MAX_SYMBOLS])> {
    let mut magic = [0u8; 4];
    read_exact(input, &mut magic)?;
    if magic != MAGIC {
        return Err(HufError::BadFormat);
    }

    let mut size_bytes = [0u8; 8];
    read_exact(input, &mut size_bytes)?;
    let original_size = u64::from_le_bytes(size_bytes);

    let mut lengths = [0u8; MAX_SYMBOLS];
    read_exact(input, &mut lengths)?;

    Ok((original_size, lengths))
}

/// True when `data` starts with either container magic.
pub fn is_container(data: &[u8]) -> bool {
    data.len() >= 4 && (data[..4] == MAGIC || data[..4] == LEGACY_MAGIC)
}

fn read_exact<R: Read>(input: &mut R, buf: &mut [u8]) -> HufResult<()> {
    input.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            HufError::BadFormat
        } else {
            HufError::FileRead
        }
    })
}
