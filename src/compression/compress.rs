use std::borrow::Borrow;
use std::iter::FusedIterator;

use crate::bitstream::bitpacker::BitPacker;
use crate::error::Result;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::symbol::Token;

use super::codec::Codec;

/// Lazy encoder: pulls symbols from its source and hands out packed bytes.
///
/// Single pass. After an error (an unknown symbol) the stream ends, and bytes
/// already handed out are all the output there is.
#[derive(Debug)]
pub struct EncodeStream<'a, T: Token, I> {
    table: &'a CodeTable<T>,
    source: I,
    packer: BitPacker,
    done: bool,
}

impl<'a, T, I> Iterator for EncodeStream<'a, T, I>
where
    T: Token,
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(byte) = self.packer.pop() {
                return Some(Ok(byte));
            }
            if self.done {
                return None;
            }
            match self.source.next() {
                Some(symbol) => match self.table.code_of(symbol.borrow()) {
                    Ok(code) => self.packer.out_code(code),
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                // Input exhausted. Terminate the last partial byte, if any.
                None => {
                    self.done = true;
                    if let Err(e) = self.packer.finish(self.table.eof_code()) {
                        return Some(Err(e));
                    }
                }
            }
        }
    }
}

impl<'a, T, I> FusedIterator for EncodeStream<'a, T, I>
where
    T: Token,
    I: Iterator,
    I::Item: Borrow<T>,
{
}

impl<T: Token> Codec<T> {
    /// Encode a sequence of symbols, owned or borrowed.
    pub fn encode<I>(&self, data: I) -> Result<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.encode_streaming(data).collect()
    }

    /// Encode lazily, one output byte at a time.
    pub fn encode_streaming<I>(&self, data: I) -> EncodeStream<'_, T, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        EncodeStream {
            table: &self.table,
            source: data.into_iter(),
            packer: BitPacker::new(),
            done: false,
        }
    }
}
