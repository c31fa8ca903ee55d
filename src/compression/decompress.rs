use std::iter::FusedIterator;

use log::{trace, warn};

use crate::bitstream::bitreader::BitReader;
use crate::error::Result;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::symbol::{Symbol, Token};

use super::codec::Codec;
use super::concat::{Concat, Decoded};

/// Lazy decoder: pulls bytes from its source and hands out symbols.
///
/// The stream ends on the end-of-stream code, leaving the rest of the input untouched,
/// or when the input runs out. Bits left over at that point are dropped without error.
#[derive(Debug)]
pub struct DecodeStream<'a, T: Token, I> {
    table: &'a CodeTable<T>,
    reader: BitReader<I>,
    done: bool,
}

impl<'a, T, I> Iterator for DecodeStream<'a, T, I>
where
    T: Token,
    I: Iterator<Item = u8>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.done {
            return None;
        }
        // Grow a candidate code one bit at a time until the table knows it.
        // The table is prefix free, so the first hit is the only possible one.
        let mut buffer = 0_u128;
        let mut size = 0_u8;
        loop {
            let bit = match self.reader.bit() {
                Some(bit) => bit,
                None => {
                    self.done = true;
                    if size > 0 {
                        trace!("Input ended with {} unmatched bits", size);
                    }
                    return None;
                }
            };
            buffer = (buffer << 1) | bit as u128;
            size += 1;

            match self.table.lookup(size, buffer) {
                Some(Symbol::Real(symbol)) => return Some(symbol.clone()),
                Some(Symbol::EndOfStream) => {
                    self.done = true;
                    return None;
                }
                None if size >= self.table.max_bits() => {
                    // Longer than any code: nothing can match from here on
                    warn!(
                        "No code matches {} bits at {}, dropping the rest of the input",
                        size,
                        self.reader.loc()
                    );
                    self.done = true;
                    return None;
                }
                None => {}
            }
        }
    }
}

impl<'a, T, I> FusedIterator for DecodeStream<'a, T, I>
where
    T: Token,
    I: Iterator<Item = u8>,
{
}

impl<T: Token> Codec<T> {
    /// Decode bytes into a list of symbols.
    pub fn decode(&self, data: &[u8]) -> Vec<T> {
        self.decode_streaming(data.iter().copied()).collect()
    }

    /// Decode lazily from any source of bytes.
    pub fn decode_streaming<I>(&self, data: I) -> DecodeStream<'_, T, I::IntoIter>
    where
        I: IntoIterator<Item = u8>,
    {
        DecodeStream {
            table: &self.table,
            reader: BitReader::new(data.into_iter()),
            done: false,
        }
    }

    /// Decode and reassemble with the codec's own concat strategy.
    pub fn decode_concat(&self, data: &[u8]) -> Result<Decoded<T>> {
        self.decode_as(data, self.concat)
    }

    /// Decode and reassemble with another concat strategy, for this call only.
    pub fn decode_as(&self, data: &[u8], concat: Concat) -> Result<Decoded<T>> {
        concat.reassemble(self.decode_streaming(data.iter().copied()))
    }

    /// Decode and hand the symbol stream to a custom reduction.
    pub fn decode_with<'a, I, F, R>(&'a self, data: I, reduce: F) -> R
    where
        I: IntoIterator<Item = u8>,
        F: FnOnce(DecodeStream<'a, T, I::IntoIter>) -> R,
    {
        reduce(self.decode_streaming(data))
    }
}
