//! The huffman_coding module holds everything needed to produce and query a code table.
//!
//! A code table maps each symbol of an alphabet to a variable length prefix code, and each
//! code back to its symbol. Tables are usually built from symbol frequencies with the classic
//! Huffman merge, but any legal table can be handed in directly.
//!
//! - symbol: The alphabet bound (`Token`) and the `Symbol` wrapper carrying the end-of-stream sentinel.
//! - code_table: The immutable two-way `CodeTable` and its `Code` words.
//! - table_builder: Huffman construction from a frequency table.
//!

pub mod code_table;
pub mod symbol;
pub mod table_builder;
