//! File-level encode and decode drivers.
//!
//! Encode reads the whole input into memory (two passes: count, then
//! emit), writes the container header, and streams the bit-packed body
//! through the accumulator writer. Decode streams the body through the
//! accumulator reader behind the table-accelerated decode loop.
//!
//! All state is call-scoped: tables, trees, and buffers are allocated
//! per invocation and released on every exit path, so concurrent calls
//! on disjoint files are safe.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::bitio::{BitReader, BitWriter};
use crate::container;
use crate::decoder::{decode_stream, DecodeTable};
use crate::frequency::FrequencyTable;
use crate::huffman::{
    canonical_codes, kraft_sum, rebuild_tree, Code, HuffTree, KRAFT_ONE, MAX_SYMBOLS,
};
use crate::{HufError, HufResult};

/// Options controlling the encode path.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Number of threads for frequency counting. 0 = auto (one per
    /// available core), 1 = single-threaded.
    pub threads: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { threads: 0 }
    }
}

/// Compression and timing metrics, populated on request.
#[derive(Debug, Clone)]
pub struct Stats {
    /// Input size in bytes.
    pub original_size: u64,
    /// Output container size in bytes (0 for decode).
    pub compressed_size: u64,
    /// Wall-clock time of the coding loop.
    pub elapsed: Duration,
    /// Shannon entropy of the input distribution (bits per symbol).
    pub entropy: f64,
    /// Average emitted code length (bits per symbol).
    pub avg_code_len: f64,
    /// The code table used, indexed by symbol.
    pub codes: Box<[Code; MAX_SYMBOLS]>,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            original_size: 0,
            compressed_size: 0,
            elapsed: Duration::ZERO,
            entropy: 0.0,
            avg_code_len: 0.0,
            codes: Box::new([Code::empty(); MAX_SYMBOLS]),
        }
    }
}

/// A code folded into a single word for the writer's fast path.
#[derive(Clone, Copy)]
struct FastCode {
    bits: u64,
    len: i32,
}

/// Compress `input_path` into a `HUF2` container at `output_path`.
///
/// Equivalent to [`encode_with_options`] with defaults.
pub fn encode(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    stats: Option<&mut Stats>,
) -> HufResult<()> {
    encode_with_options(input_path, output_path, stats, &EncodeOptions::default())
}

/// Compress `input_path` into a `HUF2` container at `output_path`.
///
/// The input is read fully into memory. On failure the output file may
/// hold partial data and should be treated as unreliable.
pub fn encode_with_options(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    stats: Option<&mut Stats>,
    options: &EncodeOptions,
) -> HufResult<()> {
    let data = read_entire_file(input_path.as_ref())?;
    let mut out = File::create(output_path.as_ref()).map_err(|_| HufError::FileOpen)?;

    let start = Instant::now();

    let mut freq = FrequencyTable::new();
    freq.count_parallel(&data, options.threads);

    let mut lengths = [0u8; MAX_SYMBOLS];
    let mut codes = [Code::empty(); MAX_SYMBOLS];
    if !data.is_empty() {
        let tree = HuffTree::from_frequencies(&freq).ok_or(HufError::Unknown)?;
        lengths = tree.code_lengths();
        codes = canonical_codes(&lengths);
    }

    container::write_header(&mut out, data.len() as u64, &lengths)?;

    if !data.is_empty() {
        let fast_codes = fold_fast_codes(&codes);
        let mut bits = BitWriter::new(out);
        for &symbol in &data {
            let fc = fast_codes[symbol as usize];
            if fc.len > 0 {
                bits.write_code(fc.bits, fc.len as u32)?;
            } else {
                // Codes past 64 bits go bit by bit. Reachable only for
                // degenerate weight distributions.
                let code = &codes[symbol as usize];
                for j in 0..code.bit_count as usize {
                    bits.write_bit(code.bit(j))?;
                }
            }
        }
        bits.finish()?;
    }

    let elapsed = start.elapsed();

    if let Some(stats) = stats {
        let total = freq.total.max(1) as f64;
        let mut avg_code_len = 0.0;
        let mut body_bits: u64 = 0;
        for s in 0..MAX_SYMBOLS {
            if freq.byte[s] > 0 {
                let p = freq.byte[s] as f64 / total;
                avg_code_len += p * codes[s].bit_count as f64;
                body_bits += freq.byte[s] * codes[s].bit_count as u64;
            }
        }
        stats.original_size = data.len() as u64;
        stats.compressed_size = container::HEADER_LEN as u64 + body_bits.div_ceil(8);
        stats.elapsed = elapsed;
        stats.entropy = freq.entropy();
        stats.avg_code_len = avg_code_len;
        *stats.codes = codes;
    }

    Ok(())
}

/// Decompress the `HUF2` container at `input_path` to `output_path`.
///
/// The lengths table is validated against the Kraft bound before any
/// output is produced. On failure the output file may hold partial
/// data and should be treated as unreliable.
pub fn decode(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    stats: Option<&mut Stats>,
) -> HufResult<()> {
    let mut input = File::open(input_path.as_ref()).map_err(|_| HufError::FileOpen)?;
    let (original_size, lengths) = container::read_header(&mut input)?;

    let mut out = File::create(output_path.as_ref()).map_err(|_| HufError::FileOpen)?;

    let start = Instant::now();

    if original_size > 0 {
        if kraft_sum(&lengths) > KRAFT_ONE {
            return Err(HufError::BadFormat);
        }

        let present: Vec<usize> = (0..MAX_SYMBOLS).filter(|&s| lengths[s] > 0).collect();
        match present.len() {
            0 => return Err(HufError::BadFormat),
            1 => write_run(&mut out, present[0] as u8, original_size)?,
            _ => {
                let codes = canonical_codes(&lengths);
                let tree = rebuild_tree(&codes)?;
                let table = DecodeTable::build(&tree);
                let mut reader = BitReader::new(input);
                decode_stream(&mut reader, &table, &tree, original_size, &mut out)?;
            }
        }
    }
    out.flush().map_err(|_| HufError::FileWrite)?;

    if let Some(stats) = stats {
        stats.original_size = original_size;
        stats.compressed_size = 0;
        stats.elapsed = start.elapsed();
    }

    Ok(())
}

/// Single-symbol bypass: the body is ignored and `count` copies of
/// `value` are written in blocks.
fn write_run<W: Write>(out: &mut W, value: u8, count: u64) -> HufResult<()> {
    const BLOCK: usize = 4096;
    let block = [value; BLOCK];
    let mut remaining = count;
    while remaining > 0 {
        let chunk = remaining.min(BLOCK as u64) as usize;
        out.write_all(&block[..chunk]).map_err(|_| HufError::FileWrite)?;
        remaining -= chunk as u64;
    }
    Ok(())
}

fn fold_fast_codes(codes: &[Code; MAX_SYMBOLS]) -> [FastCode; MAX_SYMBOLS] {
    let mut fast = [FastCode { bits: 0, len: 0 }; MAX_SYMBOLS];
    for s in 0..MAX_SYMBOLS {
        let code = &codes[s];
        if code.bit_count == 0 {
            continue;
        }
        if code.bit_count > 64 {
            fast[s].len = -1;
            continue;
        }
        let mut word = 0u64;
        for j in 0..code.bit_count as usize {
            word |= (code.bit(j) as u64) << j;
        }
        fast[s] = FastCode {
            bits: word,
            len: code.bit_count as i32,
        };
    }
    fast
}

fn read_entire_file(path: &Path) -> HufResult<Vec<u8>> {
    let mut file = File::open(path).map_err(|_| HufError::FileOpen)?;
    let metadata = file.metadata().map_err(|_| HufError::FileRead)?;
    let size: usize = metadata
        .len()
        .try_into()
        .map_err(|_| HufError::InputTooLarge)?;

    let mut data = Vec::new();
    data.try_reserve_exact(size).map_err(|_| HufError::Memory)?;
    file.read_to_end(&mut data).map_err(|_| HufError::FileRead)?;
    Ok(data)
}
