//! Huffman prefix-code encoding and decoding of arbitrary symbol streams.
//!
//! Version 0.1.0
//!
//! A [`Codec`] is built once from symbol frequencies (or a sample of data) and then
//! encodes sequences of symbols into bytes and decodes them back. The alphabet can be
//! bytes, characters, strings, tuples or any other hashable type implementing [`Token`].
//! Code tables can be saved and loaded as JSON or as a compact binary record.
//!
//! Basic usage of the binary is as follows:
//!
//! `$> huffcodec train corpus.txt table.json`
//!
//! `$> huffcodec encode table.json message.txt message.huff`
//!
//! This builds a code table from corpus.txt, then encodes message.txt with it.
//!
#![warn(rust_2018_idioms)]

pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod persistence;
pub mod tools;

pub use compression::codec::Codec;
pub use compression::compress::EncodeStream;
pub use compression::concat::{Concat, Decoded};
pub use compression::decompress::DecodeStream;
pub use error::{CodecError, Result};
pub use huffman_coding::code_table::{Code, CodeTable, MAX_CODE_BITS};
pub use huffman_coding::symbol::{Symbol, Token};
pub use persistence::{load, save, Format, Persisted};
