//! Static-model range codec.
//!
//! A range coder is an arithmetic coder that renormalizes a byte at a time
//! instead of a bit at a time: whenever the top bytes of `low` and `high`
//! agree, that byte is settled and leaves the register. The payload is
//! therefore a plain byte stream, with no bit packing at all.
//!
//! # Historical Context
//!
//! G. N. N. Martin described range coding in 1979, contemporaneously with
//! the bitwise arithmetic coders. Byte-wise renormalization trades a
//! sliver of compression for much cheaper I/O, which is why LZMA and
//! friends settled on it.
//!
//! # Stream Format
//!
//! `RCNC`, a little-endian `u32` count (257), 257 little-endian `u32`
//! frequencies scaled to a total of at most 2²⁴, then the coder's byte
//! stream: settled bytes in order, closed by the four bytes of `low` at
//! finish time.

use std::io::Write;

use crate::error::{Error, Result};
use crate::header;
use crate::model::{
    count_frequencies, scale_frequencies, CumulativeTable, EOS_SYMBOL, MAX_TOTAL,
};

/// Magic tag opening every range stream.
pub const MAGIC: [u8; 4] = *b"RCNC";

/// Renormalization threshold: while `low` and `high` agree in their top
/// byte — equivalently, `low ^ high < 2²⁴` — that byte is settled.
const RENORM_THRESHOLD: u32 = 1 << 24;

struct Encoder<W> {
    sink: W,
    low: u32,
    high: u32,
}

impl<W: Write> Encoder<W> {
    fn new(sink: W) -> Self {
        Self {
            sink,
            low: 0,
            high: u32::MAX,
        }
    }

    fn encode_symbol(&mut self, symbol: usize, cum: &CumulativeTable) -> Result<()> {
        let range = (self.high as u64).wrapping_sub(self.low as u64) + 1;
        let total = cum.total() as u64;
        let (sym_low, sym_high) = cum.bounds(symbol);

        self.high = self
            .low
            .wrapping_add(((range * sym_high as u64) / total) as u32)
            .wrapping_sub(1);
        self.low = self
            .low
            .wrapping_add(((range * sym_low as u64) / total) as u32);

        while (self.low ^ self.high) < RENORM_THRESHOLD {
            self.sink.write_all(&[(self.low >> 24) as u8])?;
            self.low <<= 8;
            self.high = (self.high << 8) | 0xFF;
        }
        Ok(())
    }

    /// Emit the four bytes of `low`, which pin the final interval.
    fn finish(&mut self) -> Result<()> {
        for _ in 0..4 {
            self.sink.write_all(&[(self.low >> 24) as u8])?;
            self.low <<= 8;
        }
        Ok(())
    }
}

struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    low: u32,
    high: u32,
    code: u32,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        let mut dec = Self {
            data,
            pos: 0,
            low: 0,
            high: u32::MAX,
            code: 0,
        };
        // Priming reads tolerate short input; a well-formed stream always
        // carries at least the four finish bytes.
        for _ in 0..4 {
            let b = if dec.pos < dec.data.len() {
                let b = dec.data[dec.pos];
                dec.pos += 1;
                b
            } else {
                0
            };
            dec.code = (dec.code << 8) | b as u32;
        }
        dec
    }

    /// Pull the next renormalization byte. The encoder emits exactly as
    /// many bytes as the decoder consumes, so running out here means the
    /// stream was cut.
    fn next_byte(&mut self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(Error::Truncated("no end-of-stream marker"));
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn decode_symbol(&mut self, cum: &CumulativeTable) -> Result<usize> {
        let range = (self.high as u64).wrapping_sub(self.low as u64) + 1;
        if range == 0 {
            return Err(Error::Corrupt("empty coding interval"));
        }
        let total = cum.total() as u64;
        let offset = self.code.wrapping_sub(self.low) as u64;
        let value = ((offset + 1) * total - 1) / range;
        if value >= total {
            return Err(Error::Corrupt("code value outside the model total"));
        }

        let symbol = cum.lookup(value as u32);
        let (sym_low, sym_high) = cum.bounds(symbol);

        self.high = self
            .low
            .wrapping_add(((range * sym_high as u64) / total) as u32)
            .wrapping_sub(1);
        self.low = self
            .low
            .wrapping_add(((range * sym_low as u64) / total) as u32);

        while (self.low ^ self.high) < RENORM_THRESHOLD {
            self.low <<= 8;
            self.high = (self.high << 8) | 0xFF;
            let b = self.next_byte()?;
            self.code = (self.code << 8) | b as u32;
        }
        Ok(symbol)
    }
}

/// Compress `input` into `sink`.
pub fn encode<W: Write>(input: &[u8], sink: &mut W) -> Result<()> {
    let mut freq = count_frequencies(input);
    scale_frequencies(&mut freq);
    let cum = CumulativeTable::from_frequencies(&freq);

    header::write_header(sink, MAGIC, &freq)?;

    let mut enc = Encoder::new(&mut *sink);
    for &b in input {
        enc.encode_symbol(b as usize, &cum)?;
    }
    enc.encode_symbol(EOS_SYMBOL, &cum)?;
    enc.finish()
}

/// Decompress a range stream produced by [`encode`] into `sink`.
pub fn decode<W: Write>(input: &[u8], sink: &mut W) -> Result<()> {
    let (freq, consumed) = header::read_header(input, MAGIC)?;
    let total: u64 = freq.iter().map(|&f| f as u64).sum();
    // Scaling may overshoot MAX_TOTAL by one per minimum-clamped symbol.
    if total > MAX_TOTAL as u64 + freq.len() as u64 {
        return Err(Error::BadHeader("frequency total exceeds coder precision"));
    }
    if total > 0 && freq[EOS_SYMBOL] == 0 {
        return Err(Error::BadHeader("end-of-stream frequency is zero"));
    }
    let cum = CumulativeTable::from_frequencies(&freq);

    let mut dec = Decoder::new(&input[consumed..]);
    loop {
        let symbol = dec.decode_symbol(&cum)?;
        if symbol == EOS_SYMBOL {
            return Ok(());
        }
        sink.write_all(&[symbol as u8])?;
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
    use crate::model::SYMBOL_COUNT;

    const HEADER_LEN: usize = 4 + 4 + SYMBOL_COUNT * 4;

    #[test]
    fn round_trip_text() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let encoded = encode_to_vec(data).unwrap();
        assert_eq!(decode_to_vec(&encoded).unwrap(), data);
    }

    #[test]
    fn round_trip_empty() {
        let encoded = encode_to_vec(&[]).unwrap();
        // Header plus the four finish bytes of an untouched interval.
        assert_eq!(encoded.len(), HEADER_LEN + 4);
        assert_eq!(&encoded[HEADER_LEN..], &[0, 0, 0, 0]);
        assert_eq!(decode_to_vec(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn round_trip_every_single_byte() {
        for b in 0..=255u8 {
            let encoded = encode_to_vec(&[b]).unwrap();
            assert_eq!(decode_to_vec(&encoded).unwrap(), vec![b], "byte {b:#04x}");
        }
    }

    #[test]
    fn skewed_input_compresses_hard() {
        let data = vec![0u8; 1024];
        let encoded = encode_to_vec(&data).unwrap();
        assert!(
            encoded.len() - HEADER_LEN < 64,
            "payload is {} bytes",
            encoded.len() - HEADER_LEN
        );
        assert_eq!(decode_to_vec(&encoded).unwrap(), data);
    }

    #[test]
    fn round_trip_long_mixed_input() {
        let data: Vec<u8> = (0u32..16 * 1024)
            .map(|i| (i * 31 % 251) as u8)
            .collect();
        let encoded = encode_to_vec(&data).unwrap();
        assert_eq!(decode_to_vec(&encoded).unwrap(), data);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut encoded = encode_to_vec(b"payload").unwrap();
        encoded[0] = b'X';
        assert!(matches!(
            decode_to_vec(&encoded),
            Err(Error::BadMagic { .. })
        ));
    }

    #[test]
    fn truncated_header_is_an_error() {
        let encoded = encode_to_vec(b"some data").unwrap();
        assert!(matches!(
            decode_to_vec(&encoded[..HEADER_LEN / 2]),
            Err(Error::Truncated(_))
        ));
    }

    #[test]
    fn cut_renormalization_stream_is_an_error() {
        let data: Vec<u8> = (0..=255u8).cycle().take(8 * 1024).collect();
        let encoded = encode_to_vec(&data).unwrap();
        assert!(matches!(
            decode_to_vec(&encoded[..encoded.len() - 16]),
            Err(Error::Truncated(_))
        ));
    }
}
