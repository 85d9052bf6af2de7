//! Table-accelerated Huffman decoding.
//!
//! A 12-bit peek into the bit stream indexes a 4096-entry table. Codes
//! no longer than 12 bits resolve in that single lookup; longer codes
//! fall back to walking the rebuilt tree from the node the table
//! already reached at depth 12, one bit at a time.

use std::io::{Read, Write};

use crate::bitio::{BitReader, IO_BUFFER_CAP};
use crate::huffman::HuffTree;
use crate::{HufError, HufResult};

/// Width of the first-level lookup in bits.
pub const DEC_TABLE_BITS: u32 = 12;
/// Number of first-level entries.
pub const DEC_TABLE_SIZE: usize = 1 << DEC_TABLE_BITS;

/// One first-level entry.
///
/// A resolved entry has `symbol >= 0` and `bits` set to its code
/// length. An unresolved entry has `symbol == -1`, `bits == 12`, and
/// `next_node` pointing at the tree node reached after 12 bits.
#[derive(Debug, Clone, Copy)]
pub struct DecEntry {
    pub symbol: i16,
    pub bits: u8,
    pub next_node: i16,
}

/// The first-level lookup table.
pub struct DecodeTable {
    entries: Vec<DecEntry>,
}

impl DecodeTable {
    /// Populate the table by simulating a 12-bit walk from the root for
    /// every possible peek value, LSB first to match the bit reader's
    /// consumption order.
    pub fn build(tree: &HuffTree) -> DecodeTable {
        let mut entries = Vec::with_capacity(DEC_TABLE_SIZE);
        for i in 0..DEC_TABLE_SIZE {
            entries.push(Self::entry_for(tree, i));
        }
        DecodeTable { entries }
    }

    fn entry_for(tree: &HuffTree, index: usize) -> DecEntry {
        let mut node = tree.root;
        for b in 0..DEC_TABLE_BITS {
            let bit = (index >> b) & 1;
            let n = &tree.nodes[node as usize];
            node = if bit == 1 { n.right } else { n.left };
            if node < 0 {
                // Dead branch of an incomplete tree: no code starts
                // with this prefix, so hitting it means corruption.
                break;
            }
            let reached = &tree.nodes[node as usize];
            if reached.is_leaf() {
                return DecEntry {
                    symbol: reached.symbol as i16,
                    bits: (b + 1) as u8,
                    next_node: -1,
                };
            }
        }
        DecEntry {
            symbol: -1,
            bits: DEC_TABLE_BITS as u8,
            next_node: node as i16,
        }
    }

    pub fn entry(&self, index: usize) -> DecEntry {
        self.entries[index]
    }
}

/// Emit exactly `original_size` symbols from the bit stream.
///
/// Fast path: peek 12, table hit, consume the code length. Slow path:
/// consume the 12 table bits, then walk the tree from `next_node` one
/// bit at a time. Trailing bits in the final byte are ignored; running
/// out of bits mid-code is a format error.
pub fn decode_stream<R: Read, W: Write>(
    reader: &mut BitReader<R>,
    table: &DecodeTable,
    tree: &HuffTree,
    original_size: u64,
    out: &mut W,
) -> HufResult<()> {
    let mut out_buffer = Vec::with_capacity(IO_BUFFER_CAP);
    let mut produced: u64 = 0;

    while produced < original_size {
        reader.ensure(DEC_TABLE_BITS)?;

        let peek = reader.peek(DEC_TABLE_BITS) as usize;
        let entry = table.entry(peek);

        let symbol = if entry.symbol >= 0 {
            if reader.available() < entry.bits as u32 {
                return Err(HufError::BadFormat);
            }
            reader.consume(entry.bits as u32);
            entry.symbol as u8
        } else {
            if reader.available() < DEC_TABLE_BITS {
                return Err(HufError::BadFormat);
            }
            reader.consume(DEC_TABLE_BITS);
            walk_tail(reader, tree, entry.next_node as i32)?
        };

        out_buffer.push(symbol);
        if out_buffer.len() == IO_BUFFER_CAP {
            out.write_all(&out_buffer).map_err(|_| HufError::FileWrite)?;
            out_buffer.clear();
        }
        produced += 1;
    }

    if !out_buffer.is_empty() {
        out.write_all(&out_buffer).map_err(|_| HufError::FileWrite)?;
    }
    Ok(())
}

/// Finish one long code: walk from `node` until a leaf.
fn walk_tail<R: Read>(
    reader: &mut BitReader<R>,
    tree: &HuffTree,
    mut node: i32,
) -> HufResult<u8> {
    if node < 0 {
        return Err(HufError::BadFormat);
    }
    loop {
        let n = &tree.nodes[node as usize];
        if n.is_leaf() {
            return Ok(n.symbol as u8);
        }
        reader.ensure(1)?;
        if reader.available() == 0 {
            return Err(HufError::BadFormat);
        }
        let bit = reader.peek(1);
        reader.consume(1);
        node = if bit == 1 { n.right } else { n.left };
        if node < 0 {
            return Err(HufError::BadFormat);
        }
    }
}
