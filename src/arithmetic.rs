//! Static-model arithmetic codec.
//!
//! Where Huffman rounds every symbol to a whole number of bits, an
//! arithmetic coder narrows a single interval by each symbol's probability
//! and emits bits only as the interval's leading bits settle, so a symbol
//! can cost a fraction of a bit.
//!
//! # Historical Context
//!
//! Rissanen and Pasco laid the groundwork in 1976; Witten, Neal and Cleary
//! (CACM 1987) published the finite-precision formulation used here: a
//! 32-bit interval `[low, high]`, renormalized whenever the halves agree,
//! with an underflow counter (`pending`) for intervals straddling the
//! midpoint.
//!
//! # Stream Format
//!
//! `AENC`, a little-endian `u32` count (257), 257 little-endian `u32`
//! frequencies already scaled so their total is at most 2²⁴, then the
//! MSB-first bit stream covering every input byte plus the end-of-stream
//! symbol, closed by the finish bits that pin the final interval.
//!
//! # References
//!
//! - Witten, I., Neal, R., Cleary, J. (1987). "Arithmetic Coding for Data
//!   Compression." Communications of the ACM 30(6).

use std::io::Write;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::header;
use crate::model::{
    count_frequencies, scale_frequencies, CumulativeTable, EOS_SYMBOL, MAX_TOTAL,
};

/// Magic tag opening every arithmetic stream.
pub const MAGIC: [u8; 4] = *b"AENC";

const STATE_BITS: u32 = 32;
const FULL: u64 = 1 << STATE_BITS;
const HALF: u64 = FULL >> 1;
const QUARTER: u64 = HALF >> 1;
const THREE_QUARTERS: u64 = QUARTER * 3;

/// Zero bits the decoder may fabricate past the end of its input before
/// the stream counts as truncated. A well-formed stream never needs more
/// than the register width: the decoder consumes exactly the encoder's
/// renormalization bits plus the 32-bit priming read.
const EOF_BIT_BUDGET: u64 = STATE_BITS as u64;

struct Encoder<W> {
    writer: BitWriter<W>,
    low: u64,
    high: u64,
    pending: u64,
}

impl<W: Write> Encoder<W> {
    fn new(sink: W) -> Self {
        Self {
            writer: BitWriter::new(sink),
            low: 0,
            high: FULL - 1,
            pending: 0,
        }
    }

    /// Emit a settled bit followed by any pending underflow bits, which
    /// always carry the opposite value.
    fn emit(&mut self, bit: u8) -> Result<()> {
        self.writer.write_bit(bit)?;
        let complement = bit ^ 1;
        while self.pending > 0 {
            self.writer.write_bit(complement)?;
            self.pending -= 1;
        }
        Ok(())
    }

    fn encode_symbol(&mut self, symbol: usize, cum: &CumulativeTable) -> Result<()> {
        let range = self.high - self.low + 1;
        let total = cum.total() as u64;
        let (sym_low, sym_high) = cum.bounds(symbol);

        self.high = self.low + (range * sym_high as u64) / total - 1;
        self.low += (range * sym_low as u64) / total;

        loop {
            if self.high < HALF {
                self.emit(0)?;
            } else if self.low >= HALF {
                self.emit(1)?;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.pending += 1;
                self.low -= QUARTER;
                self.high -= QUARTER;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }
        Ok(())
    }

    /// Disambiguate the final interval and flush the bit writer.
    fn finish(&mut self) -> Result<()> {
        self.pending += 1;
        if self.low < QUARTER {
            self.emit(0)?;
        } else {
            self.emit(1)?;
        }
        self.writer.flush()
    }
}

struct Decoder<'a> {
    reader: BitReader<'a>,
    low: u64,
    high: u64,
    code: u64,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        let mut reader = BitReader::new(data);
        let mut code = 0u64;
        for _ in 0..STATE_BITS {
            code = (code << 1) | reader.read_bit() as u64;
        }
        Self {
            reader,
            low: 0,
            high: FULL - 1,
            code,
        }
    }

    fn decode_symbol(&mut self, cum: &CumulativeTable) -> Result<usize> {
        if self.reader.bits_past_end() > EOF_BIT_BUDGET {
            return Err(Error::Truncated("no end-of-stream marker"));
        }

        let range = self.high - self.low + 1;
        let total = cum.total() as u64;
        let offset = self.code.wrapping_sub(self.low);
        let value = ((offset + 1) * total - 1) / range;
        if value >= total {
            return Err(Error::Corrupt("code value outside the model total"));
        }

        let symbol = cum.lookup(value as u32);
        let (sym_low, sym_high) = cum.bounds(symbol);

        self.high = self.low + (range * sym_high as u64) / total - 1;
        self.low += (range * sym_low as u64) / total;

        loop {
            if self.high < HALF {
                // Leading bit settled at zero; only the shift is needed.
            } else if self.low >= HALF {
                self.low -= HALF;
                self.high -= HALF;
                self.code -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.low -= QUARTER;
                self.high -= QUARTER;
                self.code -= QUARTER;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
            self.code = (self.code << 1) | self.reader.read_bit() as u64;
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

/// Decompress an arithmetic stream produced by [`encode`] into `sink`.
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
