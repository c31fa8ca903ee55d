//! BitReader: pulls single bits, most significant first, from any source of bytes.
//!
//! Bytes are only taken from the source when the previous one is used up, so a decoder
//! that stops early never touches the rest of its input.

/// Reads bits from an iterator of bytes.
#[derive(Debug)]
pub struct BitReader<I> {
    source: I,
    /// Byte currently being read
    current: u8,
    /// Bits already taken from `current` (8 means a new byte is needed)
    bit_index: u8,
    /// Total bits handed out
    consumed: usize,
}

impl<I: Iterator<Item = u8>> BitReader<I> {
    pub fn new(source: I) -> Self {
        Self {
            source,
            current: 0,
            bit_index: 8,
            consumed: 0,
        }
    }

    /// Return the next bit (1 or 0), or None if there is no more data to read.
    pub fn bit(&mut self) -> Option<u8> {
        if self.bit_index == 8 {
            self.current = self.source.next()?;
            self.bit_index = 0;
        }
        let bit = (self.current >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        self.consumed += 1;
        Some(bit)
    }

    /// Return *true* if the next bit is 1, *false* if 0, or None if there is no more data.
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Debugging function. Report current position as bytes.bits consumed.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.consumed / 8, self.consumed % 8)
    }
}
