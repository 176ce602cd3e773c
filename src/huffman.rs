//! Static Huffman codec.
//!
//! A classic prefix coder: symbols that appear often get short codes,
//! symbols that appear rarely get long ones, and no code is a prefix of
//! another, so the decoder can walk the stream bit by bit without any
//! framing between symbols.
//!
//! # Historical Context
//!
//! David Huffman (1952) found the optimal construction as a term paper at
//! MIT: repeatedly merge the two least probable nodes. It remained the
//! workhorse of fast entropy coding for half a century and still anchors
//! DEFLATE and JPEG.
//!
//! # Stream Format
//!
//! `HFMN`, a little-endian `u32` count (257), 257 little-endian `u32`
//! frequencies exactly as counted, then the MSB-first bit stream: one code
//! per input byte and the end-of-stream code last, zero-padded to a byte
//! boundary.
//!
//! The decoder rebuilds the tree from the transmitted frequencies, so the
//! merge order must be fully deterministic. Ties on frequency break toward
//! the lower symbol index, and a running insertion sequence number makes
//! the order total even between internal nodes.

use std::collections::BinaryHeap;
use std::io::Write;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::header;
use crate::model::{count_frequencies, EOS_SYMBOL, SYMBOL_COUNT};

/// Magic tag opening every Huffman stream.
pub const MAGIC: [u8; 4] = *b"HFMN";

enum Node {
    Leaf { symbol: u16 },
    Internal { left: Box<Node>, right: Option<Box<Node>> },
}

/// Priority-queue entry. The std heap pops its maximum, so `Ord` is
/// inverted to pop the smallest (frequency, symbol, sequence) first.
/// Internal nodes carry symbol 0, matching the leaf tie-break rule.
struct HeapEntry {
    freq: u64,
    symbol: u16,
    seq: u32,
    node: Box<Node>,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (other.freq, other.symbol, other.seq).cmp(&(self.freq, self.symbol, self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        (self.freq, self.symbol, self.seq) == (other.freq, other.symbol, other.seq)
    }
}

impl Eq for HeapEntry {}

fn build_tree(freq: &[u32]) -> Box<Node> {
    let mut heap = BinaryHeap::new();
    let mut seq = 0u32;
    for (symbol, &f) in freq.iter().enumerate() {
        if f == 0 {
            continue;
        }
        heap.push(HeapEntry {
            freq: f as u64,
            symbol: symbol as u16,
            seq,
            node: Box::new(Node::Leaf {
                symbol: symbol as u16,
            }),
        });
        seq += 1;
    }

    if heap.is_empty() {
        // Nothing to code at all; stand in a lone end-of-stream leaf.
        return Box::new(Node::Leaf {
            symbol: EOS_SYMBOL as u16,
        });
    }
    if heap.len() == 1 {
        // A single symbol must still get a code of length one.
        let only = heap.pop().unwrap();
        heap.push(HeapEntry {
            freq: only.freq,
            symbol: 0,
            seq,
            node: Box::new(Node::Internal {
                left: only.node,
                right: None,
            }),
        });
        seq += 1;
    }
    while heap.len() > 1 {
        let first = heap.pop().unwrap();
        let second = heap.pop().unwrap();
        heap.push(HeapEntry {
            freq: first.freq + second.freq,
            symbol: 0,
            seq,
            node: Box::new(Node::Internal {
                left: first.node,
                right: Some(second.node),
            }),
        });
        seq += 1;
    }
    heap.pop().unwrap().node
}

fn assign_codes(node: &Node, prefix: &mut Vec<u8>, codes: &mut [Vec<u8>]) {
    match node {
        Node::Leaf { symbol } => {
            codes[*symbol as usize] = if prefix.is_empty() {
                vec![0]
            } else {
                prefix.clone()
            };
        }
        Node::Internal { left, right } => {
            prefix.push(0);
            assign_codes(left, prefix, codes);
            prefix.pop();
            if let Some(right) = right {
                prefix.push(1);
                assign_codes(right, prefix, codes);
                prefix.pop();
            }
        }
    }
}

/// Compress `input` into `sink`.
pub fn encode<W: Write>(input: &[u8], sink: &mut W) -> Result<()> {
    let freq = count_frequencies(input);
    let tree = build_tree(&freq);
    let mut codes = vec![Vec::new(); SYMBOL_COUNT];
    let mut prefix = Vec::new();
    assign_codes(&tree, &mut prefix, &mut codes);

    header::write_header(sink, MAGIC, &freq)?;

    let mut writer = BitWriter::new(&mut *sink);
    for &b in input {
        for &bit in &codes[b as usize] {
            writer.write_bit(bit)?;
        }
    }
    for &bit in &codes[EOS_SYMBOL] {
        writer.write_bit(bit)?;
    }
    writer.flush()
}

/// Decompress a Huffman stream produced by [`encode`] into `sink`.
pub fn decode<W: Write>(input: &[u8], sink: &mut W) -> Result<()> {
    let (freq, consumed) = header::read_header(input, MAGIC)?;
    let tree = build_tree(&freq);

    let mut reader = BitReader::new(&input[consumed..]);
    let mut node = &*tree;
    loop {
        let bit = reader.read_bit();
        node = match node {
            Node::Internal { left, right } => {
                if bit == 0 {
                    left
                } else {
                    match right {
                        Some(right) => right,
                        None => return Err(Error::Corrupt("code path leaves the tree")),
                    }
                }
            }
            Node::Leaf { .. } => return Err(Error::Corrupt("code path leaves the tree")),
        };
        if let Node::Leaf { symbol } = node {
            if *symbol as usize == EOS_SYMBOL {
                return Ok(());
            }
            sink.write_all(&[*symbol as u8])?;
            node = &*tree;
        }
        if reader.eof() && std::ptr::eq(node, &*tree) {
            return Err(Error::Truncated("no end-of-stream marker"));
        }
    }
}

/// Convenience wrapper collecting the encoded stream into a vector.
pub fn encode_to_vec(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode(input, &mut out)?;
    Ok(out)
}

/// Convenience wrapper collecting the decoded bytes into a vector.
pub fn decode_to_vec(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decode(input, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_for(freq: &[u32]) -> Vec<Vec<u8>> {
        let tree = build_tree(freq);
        let mut codes = vec![Vec::new(); SYMBOL_COUNT];
        let mut prefix = Vec::new();
        assign_codes(&tree, &mut prefix, &mut codes);
        codes
    }

    #[test]
    fn round_trip_text() {
        let data = b"abracadabra";
        let encoded = encode_to_vec(data).unwrap();
        assert_eq!(decode_to_vec(&encoded).unwrap(), data);
    }

    #[test]
    fn empty_input_encodes_to_one_padding_byte() {
        let encoded = encode_to_vec(&[]).unwrap();

        let mut expected = Vec::from(*b"HFMN");
        expected.extend_from_slice(&257u32.to_le_bytes());
        for symbol in 0..SYMBOL_COUNT {
            let f = if symbol == EOS_SYMBOL { 1u32 } else { 0 };
            expected.extend_from_slice(&f.to_le_bytes());
        }
        // The lone end-of-stream symbol gets code "0", padded to 0x00.
        expected.push(0x00);

        assert_eq!(encoded, expected);
        assert_eq!(decode_to_vec(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn single_byte_round_trips_for_every_value() {
        for b in 0..=255u8 {
            let encoded = encode_to_vec(&[b]).unwrap();
            assert_eq!(decode_to_vec(&encoded).unwrap(), vec![b], "byte {b:#04x}");
        }
    }

    #[test]
    fn single_symbol_code_has_length_one() {
        let mut freq = vec![0u32; SYMBOL_COUNT];
        freq[b'x' as usize] = 9;
        let codes = codes_for(&freq);
        assert_eq!(codes[b'x' as usize], vec![0]);
    }

    #[test]
    fn frequency_ties_break_toward_the_lower_symbol() {
        let mut freq = vec![0u32; SYMBOL_COUNT];
        freq[10] = 1;
        freq[20] = 1;
        freq[30] = 2;
        let codes = codes_for(&freq);
        // Symbols 10 and 20 merge first; 10 pops first and goes left. The
        // merged pair (internal symbol 0) then wins the tie against 30.
        assert_eq!(codes[10], vec![0, 0]);
        assert_eq!(codes[20], vec![0, 1]);
        assert_eq!(codes[30], vec![1]);
    }

    #[test]
    fn codes_are_prefix_free() {
        let freq = count_frequencies(b"mississippi river");
        let codes = codes_for(&freq);
        let used: Vec<&Vec<u8>> = codes.iter().filter(|c| !c.is_empty()).collect();
        for (i, a) in used.iter().enumerate() {
            for (j, b) in used.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_slice()), "{a:?} prefixes {b:?}");
                }
            }
        }
    }

    #[test]
    fn truncated_magic_is_an_error() {
        let encoded = encode_to_vec(b"hello huffman").unwrap();
        assert!(matches!(
            decode_to_vec(&encoded[..2]),
            Err(Error::Truncated(_))
        ));
    }

    #[test]
    fn truncated_frequency_table_is_an_error() {
        let encoded = encode_to_vec(b"hello huffman").unwrap();
        assert!(matches!(
            decode_to_vec(&encoded[..100]),
            Err(Error::Truncated(_))
        ));
    }

    #[test]
    fn missing_payload_is_an_error() {
        let encoded = encode_to_vec(b"abracadabra").unwrap();
        let header_len = 4 + 4 + SYMBOL_COUNT * 4;
        assert!(decode_to_vec(&encoded[..header_len]).is_err());
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut encoded = encode_to_vec(b"payload").unwrap();
        encoded[3] = b'X';
        assert!(matches!(
            decode_to_vec(&encoded),
            Err(Error::BadMagic { .. })
        ));
    }
}
