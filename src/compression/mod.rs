//! The compression module holds the codec itself and both directions of the stream codec.
//!
//! Encoding: each symbol's code is shifted into a bit queue and whole bytes are handed
//! out as they fill up. If the last byte is only partly used, the end-of-stream code is
//! appended and the byte is padded with zeros. If the data ends exactly on a byte
//! boundary, no sentinel is written at all.
//!
//! Decoding: bits are read most significant first and grown into a candidate code until
//! the table recognises it. The stream ends either on the end-of-stream code or when the
//! input runs out. Both are valid endings, and leftover bits are dropped.
//!
//! - codec: The `Codec` type and its constructors.
//! - compress: Encoding, eager and lazy.
//! - decompress: Decoding, eager and lazy, plus reassembly.
//! - concat: The `Concat` strategies used for reassembly.
//!

pub mod codec;
pub mod compress;
pub mod concat;
pub mod decompress;
