//! # Static-Model Byte-Stream Codecs
//!
//! *Four lossless codecs over one shared skeleton: run-length, Huffman,
//! arithmetic and range coding.*
//!
//! ## Intuition First
//!
//! Compression is betting. If you know 'e' shows up ten times as often as
//! 'z', you can pay less to say 'e' and more to say 'z' and come out ahead
//! on average. The codecs here place that bet with a *static* model: one
//! counting pass over the input, a frequency table shipped in the header,
//! and then the model never moves.
//!
//! The difference between them is the currency. Huffman pays in whole
//! bits — it rounds every probability to a power of two. The arithmetic
//! and range coders pay in fractions of a bit by narrowing a shared
//! interval, which is why a megabyte of almost-all-zeros collapses to a
//! handful of payload bytes. Run-length coding doesn't bet at all; it is
//! here because its framing discipline (count/value records, little-endian
//! widths, truncation detection) is the one the others inherit.
//!
//! ## Historical Context
//!
//! ```text
//! 1952  Huffman              Optimal prefix codes from a frequency-sorted merge
//! 1976  Rissanen, Pasco      Arithmetic coding: fractional bits per symbol
//! 1979  Martin               Range coding: renormalize a byte at a time
//! 1987  Witten, Neal, Cleary The practical 32-bit arithmetic coder (CACM)
//! ```
//!
//! ## Mathematical Formulation
//!
//! For symbol probabilities $p_s$, Shannon's bound says a symbol cannot be
//! coded in fewer than $-\log_2 p_s$ bits on average. Huffman attains the
//! bound only when every $p_s$ is a power of two; the interval coders get
//! within a rounding error of it for any distribution, at the cost of a
//! multiply and divide per symbol.
//!
//! ## The Stream Format
//!
//! Every entropy-coded stream is self-describing: a four-byte magic tag
//! (`HFMN`, `AENC` or `RCNC`), a little-endian `u32` symbol count (always
//! 257), 257 little-endian `u32` frequencies, then the payload. Symbol 256
//! is the end-of-stream marker; it is coded exactly once, last, so the
//! payload needs no length field. Run-length streams are bare
//! `(u32 count, u8 value)` records with no header at all.
//!
//! ## Implementation Notes
//!
//! The crate is layered leaves-first:
//! - [`bitio`]: MSB-first bit packing and unpacking.
//! - [`header`]: little-endian helpers and the magic/frequency header.
//! - [`model`]: frequency counting, scaling to a 2²⁴ total, prefix sums.
//! - [`huffman`], [`arithmetic`], [`range`], [`rle`]: the codecs, each
//!   exposing `encode`/`decode` over a byte slice and an `io::Write` sink.
//!
//! All coding is strictly single-threaded and synchronous; model tables
//! are immutable once built and may be shared freely.
//!
//! ## Failure Modes
//!
//! 1. **Truncation**: input ends inside a header, a record, or before the
//!    end-of-stream symbol decodes. Surfaced as [`Error::Truncated`].
//! 2. **Hostile headers**: a frequency table no encoder produces (wrong
//!    count, oversized total, missing end-of-stream weight) is rejected
//!    up front rather than letting the coder spin.
//!
//! ## References
//!
//! - Huffman, D. (1952). "A Method for the Construction of
//!   Minimum-Redundancy Codes." Proceedings of the IRE 40(9).
//! - Witten, I., Neal, R., Cleary, J. (1987). "Arithmetic Coding for Data
//!   Compression." Communications of the ACM 30(6).
//! - Martin, G. N. N. (1979). "Range encoding: an algorithm for removing
//!   redundancy from a digitised message."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arithmetic;
pub mod bitio;
pub mod error;
pub mod header;
pub mod huffman;
pub mod model;
pub mod range;
pub mod rle;

pub use error::{Error, Result};
