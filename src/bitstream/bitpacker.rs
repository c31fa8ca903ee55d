use std::collections::VecDeque;

use log::trace;

use crate::error::{CodecError, Result};
use crate::huffman_coding::code_table::Code;
use crate::huffman_coding::symbol::Symbol;

/// Packs variable length codes into bytes, most significant bit first.
///
/// Full bytes become available as soon as they are complete, so a caller can hand them
/// out one at a time while it keeps feeding codes.
#[derive(Debug, Default)]
pub struct BitPacker {
    /// Completed bytes not yet taken by the caller
    output: VecDeque<u8>,
    /// Bits waiting to be put as bytes into the output
    queue: u128,
    /// Count of valid bits in the queue (never more than 7 between calls)
    q_bits: u8,
    /// Bytes written so far, taken or not
    written: usize,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Internal write function common to all out_* functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push_back(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
            self.queue &= (1_u128 << self.q_bits) - 1; //drop the bits we wrote
            self.written += 1;
        }
    }

    /// Put a code on the stream.
    pub fn out_code(&mut self, code: Code) {
        self.queue <<= code.bits; //shift queue by bit length
        self.queue |= code.value; //add data portion to queue
        self.q_bits += code.bits; //update depth of queue bits
        self.write_stream();
    }

    /// Take the oldest completed byte.
    pub fn pop(&mut self) -> Option<u8> {
        self.output.pop_front()
    }

    /// Number of bits (0-7) waiting for a byte boundary.
    pub fn pending_bits(&self) -> u8 {
        self.q_bits
    }

    /// Terminate the stream.
    ///
    /// Nothing is written when the stream already ends on a byte boundary. Otherwise the
    /// end-of-stream code is appended and exactly one more byte is written: the top 8 bits
    /// if the code reached past the boundary, or the remaining bits padded with zeros.
    /// A decoder never sees the cut off part of the sentinel, the input simply ends there.
    pub fn finish(&mut self, eof: Option<Code>) -> Result<()> {
        if self.q_bits == 0 {
            return Ok(());
        }
        let eof = eof.ok_or_else(|| {
            CodecError::UnknownSymbol(Symbol::<()>::EndOfStream.to_string())
        })?;
        self.queue <<= eof.bits;
        self.queue |= eof.value;
        self.q_bits += eof.bits;

        let byte = if self.q_bits >= 8 {
            (self.queue >> (self.q_bits - 8)) as u8
        } else {
            (self.queue << (8 - self.q_bits)) as u8
        };
        trace!(
            "Final byte {:08b} at {} ({} bits of sentinel dropped)",
            byte,
            self.loc(),
            self.q_bits.saturating_sub(8)
        );
        self.output.push_back(byte);
        self.written += 1;
        self.queue = 0;
        self.q_bits = 0;
        Ok(())
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.written, self.q_bits % 8)
    }
}
