//! The bitstream module forms the bit level I/O of the codec.
//!
//! Codes rarely line up with byte boundaries. The packer shifts codes into a queue and
//! releases whole bytes; the reader walks bytes back one bit at a time, most significant
//! bit first, so the decoder can grow a candidate code bit by bit.
//!
//! Both sides only deal with bits. Knowing which codes exist, and where the stream ends,
//! is up to the compression module.
//!
pub mod bitpacker;
pub mod bitreader;
