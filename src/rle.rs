//! Run-length codec.
//!
//! The simplest member of the family, and the one that sets its framing
//! conventions: the output is a bare sequence of records, each a
//! little-endian `u32` count (strictly positive) followed by the repeated
//! byte. There is no magic tag and no model; runs longer than `u32::MAX`
//! are split.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::header::read_u32;

/// Chunk size for materializing decoded runs.
const RUN_BUF: usize = 4096;

/// Compress `input` into `sink` as `(count, value)` records.
pub fn encode<W: Write>(input: &[u8], sink: &mut W) -> Result<()> {
    if input.is_empty() {
        return Ok(());
    }
    let mut current = input[0];
    let mut count: u32 = 1;
    for &b in &input[1..] {
        if b == current && count < u32::MAX {
            count += 1;
        } else {
            sink.write_u32::<LittleEndian>(count)?;
            sink.write_all(&[current])?;
            current = b;
            count = 1;
        }
    }
    sink.write_u32::<LittleEndian>(count)?;
    sink.write_all(&[current])?;
    Ok(())
}

/// Expand a record stream produced by [`encode`] into `sink`.
///
/// Clean EOF between records ends the stream; a partial count or a count
/// with no value byte is [`Error::Truncated`], and a zero count is
/// [`Error::Corrupt`].
pub fn decode<W: Write>(input: &[u8], sink: &mut W) -> Result<()> {
    let mut pos = 0;
    while pos < input.len() {
        let count = read_u32(input, &mut pos).ok_or(Error::Truncated("run length"))?;
        if count == 0 {
            return Err(Error::Corrupt("zero-length run"));
        }
        if pos >= input.len() {
            return Err(Error::Truncated("run value"));
        }
        let value = input[pos];
        pos += 1;
        write_run(sink, value, count)?;
    }
    Ok(())
}

fn write_run<W: Write>(sink: &mut W, value: u8, count: u32) -> Result<()> {
    let buf = [value; RUN_BUF];
    let mut remaining = count as usize;
    while remaining > 0 {
        let n = remaining.min(RUN_BUF);
        sink.write_all(&buf[..n])?;
        remaining -= n;
    }
    Ok(())
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

    #[test]
    fn one_byte_makes_one_record() {
        let encoded = encode_to_vec(&[0x41]).unwrap();
        assert_eq!(encoded, vec![0x01, 0x00, 0x00, 0x00, 0x41]);
        assert_eq!(decode_to_vec(&encoded).unwrap(), vec![0x41]);
    }

    #[test]
    fn runs_split_on_value_change() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x01];
        let encoded = encode_to_vec(&data).unwrap();
        assert_eq!(
            encoded,
            vec![0x04, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01]
        );
        assert_eq!(decode_to_vec(&encoded).unwrap(), data);
    }

    #[test]
    fn empty_input_encodes_to_nothing() {
        assert_eq!(encode_to_vec(&[]).unwrap(), Vec::<u8>::new());
        assert_eq!(decode_to_vec(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn long_run_round_trips() {
        let data = vec![0x7Au8; 100_000];
        let encoded = encode_to_vec(&data).unwrap();
        assert_eq!(encoded.len(), 5);
        assert_eq!(decode_to_vec(&encoded).unwrap(), data);
    }

    #[test]
    fn alternating_bytes_round_trip() {
        let data: Vec<u8> = (0..1000).map(|i| (i % 2) as u8).collect();
        let encoded = encode_to_vec(&data).unwrap();
        assert_eq!(encoded.len(), 5 * 1000);
        assert_eq!(decode_to_vec(&encoded).unwrap(), data);
    }

    #[test]
    fn zero_count_is_corrupt() {
        let err = decode_to_vec(&[0x00, 0x00, 0x00, 0x00, 0x41]).unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
    }

    #[test]
    fn partial_count_is_truncation() {
        let err = decode_to_vec(&[0x01, 0x00]).unwrap_err();
        assert!(matches!(err, Error::Truncated(_)));
    }

    #[test]
    fn missing_value_byte_is_truncation() {
        let err = decode_to_vec(&[0x01, 0x00, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, Error::Truncated(_)));
    }
}
