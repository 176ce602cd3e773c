//! Bit-level I/O shared by the Huffman and arithmetic codecs.
//!
//! Bits travel MSB-first: the first bit written lands in bit 7 of the first
//! byte emitted, and the reader hands bits back in the same order. The
//! writer zero-pads the final partial byte on flush. The reader keeps
//! returning zero bits past the end of its input and reports the overrun
//! through [`BitReader::eof`], so callers can tell padding from truncation;
//! termination of an entropy-coded stream is signaled by the end-of-stream
//! symbol, never by the reader itself.

use std::io::Write;

use crate::error::Result;

/// Packs single bits into bytes and forwards complete bytes to a sink.
#[derive(Debug)]
pub struct BitWriter<W> {
    sink: W,
    acc: u8,
    filled: u8,
}

impl<W: Write> BitWriter<W> {
    /// Wrap a byte sink.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            acc: 0,
            filled: 0,
        }
    }

    /// Append one bit. Only the lowest bit of `bit` is used.
    pub fn write_bit(&mut self, bit: u8) -> Result<()> {
        self.acc = (self.acc << 1) | (bit & 1);
        self.filled += 1;
        if self.filled == 8 {
            self.sink.write_all(&[self.acc])?;
            self.acc = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Emit any held bits as a final byte, zero-padded on the low side.
    pub fn flush(&mut self) -> Result<()> {
        if self.filled > 0 {
            self.sink.write_all(&[self.acc << (8 - self.filled)])?;
            self.acc = 0;
            self.filled = 0;
        }
        Ok(())
    }
}

/// Unpacks bits MSB-first from a byte slice.
///
/// Reads past the end of the slice yield zero bits; [`BitReader::eof`]
/// reports whether that has happened and [`BitReader::bits_past_end`] counts
/// how many such bits were fabricated.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    current: u8,
    remaining: u8,
    past_end: u64,
}

impl<'a> BitReader<'a> {
    /// Wrap a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            current: 0,
            remaining: 0,
            past_end: 0,
        }
    }

    /// Read one bit, or zero once the input is exhausted.
    pub fn read_bit(&mut self) -> u8 {
        if self.remaining == 0 {
            if self.pos >= self.data.len() {
                self.past_end += 1;
                return 0;
            }
            self.current = self.data[self.pos];
            self.pos += 1;
            self.remaining = 8;
        }
        self.remaining -= 1;
        (self.current >> self.remaining) & 1
    }

    /// Whether any read has gone past the end of the input.
    pub fn eof(&self) -> bool {
        self.past_end > 0
    }

    /// Number of zero bits fabricated past the end of the input.
    pub fn bits_past_end(&self) -> u64 {
        self.past_end
    }
}
