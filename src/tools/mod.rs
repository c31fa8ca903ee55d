//! The tools module provides helper functions around the codec.
//!
//! The tools are:
//! - cli: Command line interface for the huffcodec binary.
//! - freq_count: Frequency counts of bytes or arbitrary symbols.
//!
pub mod cli;
pub mod freq_count;
