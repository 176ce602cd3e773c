//! Shared header format for the entropy-coded streams.
//!
//! Every entropy codec opens its output with a four-byte magic tag, a
//! little-endian `u32` symbol count (always 257) and one little-endian
//! `u32` frequency per symbol. The run-length codec reuses only the
//! little-endian helpers.

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use log::trace;

use crate::error::{Error, Result};
use crate::model::SYMBOL_COUNT;

/// Write a magic tag followed by the symbol count and frequency table.
pub fn write_header<W: Write>(sink: &mut W, magic: [u8; 4], freq: &[u32]) -> Result<()> {
    sink.write_all(&magic)?;
    sink.write_u32::<LittleEndian>(freq.len() as u32)?;
    for &f in freq {
        sink.write_u32::<LittleEndian>(f)?;
    }
    Ok(())
}

/// Parse a magic tag and frequency table from the front of `input`.
///
/// Returns the 257-entry table and the number of bytes consumed. The count
/// field must be exactly [`SYMBOL_COUNT`]; anything else is a [`Error::BadHeader`].
pub fn read_header(input: &[u8], magic: [u8; 4]) -> Result<(Vec<u32>, usize)> {
    if input.len() < 4 {
        return Err(Error::Truncated("magic tag"));
    }
    let mut actual = [0u8; 4];
    actual.copy_from_slice(&input[..4]);
    if actual != magic {
        return Err(Error::BadMagic {
            expected: magic,
            actual,
        });
    }

    let mut pos = 4;
    let count = read_u32(input, &mut pos).ok_or(Error::Truncated("symbol count"))?;
    if count as usize != SYMBOL_COUNT {
        return Err(Error::BadHeader("symbol count is not 257"));
    }
    let mut freq = Vec::with_capacity(SYMBOL_COUNT);
    for _ in 0..SYMBOL_COUNT {
        let f = read_u32(input, &mut pos).ok_or(Error::Truncated("frequency table"))?;
        freq.push(f);
    }
    trace!(
        "parsed {:?} header, {} frequency entries, {} bytes",
        magic,
        freq.len(),
        pos
    );
    Ok((freq, pos))
}

/// Read a little-endian `u32` at `*pos`, advancing the cursor on success.
///
/// Returns `None` when fewer than four bytes remain; the caller decides
/// whether that is clean EOF or truncation.
pub(crate) fn read_u32(input: &[u8], pos: &mut usize) -> Option<u32> {
    let end = pos.checked_add(4)?;
    if end > input.len() {
        return None;
    }
    let v = LittleEndian::read_u32(&input[*pos..end]);
    *pos = end;
    Some(v)
}
