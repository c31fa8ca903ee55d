//! Code table: the immutable, two-way mapping between symbols and their codewords.
//!
//! A codeword is a [`Code`]: a bit length and the integer those bits spell, most
//! significant bit first. The table is built once and only read afterwards, so a
//! shared reference can be handed to any number of threads.

use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::symbol::{Symbol, Token};
use crate::error::{CodecError, Result};

/// Longest code the table accepts. Leaves room for 7 pending bits in a 128 bit accumulator.
pub const MAX_CODE_BITS: u8 = 120;

/// A codeword. Ordered by bit length first, then by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Code {
    /// Number of bits in the codeword
    pub bits: u8,
    /// Integer value of those bits
    pub value: u128,
}

impl Code {
    pub fn new(bits: u8, value: u128) -> Self {
        Self { bits, value }
    }

    /// At least one bit, at most MAX_CODE_BITS, and a value that fits in `bits` bits.
    pub fn is_valid(&self) -> bool {
        self.bits >= 1 && self.bits <= MAX_CODE_BITS && self.value >> self.bits == 0
    }

    /// True when this code is a strict bit prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.bits < other.bits
            && other.value.checked_shr((other.bits - self.bits) as u32) == Some(self.value)
    }
}

impl Display for Code {
    /// Binary digits, zero padded to the code length.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.value, width = self.bits as usize)
    }
}

/// Bidirectional symbol <-> code mapping.
#[derive(Clone, Debug)]
pub struct CodeTable<T: Token> {
    /// Encoder side, real symbols only
    codes: FxHashMap<T, Code>,
    /// Encoder side, the sentinel
    eof: Option<Code>,
    /// Decoder side, every entry
    symbols: FxHashMap<Code, Symbol<T>>,
    /// Longest code in the table
    max_bits: u8,
}

impl<T: Token> CodeTable<T> {
    /// Build a table from (symbol, code) entries, checking every code.
    ///
    /// Fails with `InvalidCode` on an illegal code, on a code used twice, or on a
    /// symbol listed twice. Prefix-freeness is not checked here, see
    /// [`CodeTable::validate_prefix_free`].
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol<T>, Code)>,
    {
        let mut codes = FxHashMap::default();
        let mut eof = None;
        let mut symbols = FxHashMap::default();
        let mut max_bits = 0;

        for (symbol, code) in entries {
            let invalid = |symbol: &Symbol<T>| CodecError::InvalidCode {
                symbol: symbol.to_string(),
                bits: code.bits as u32,
                value: code.value,
            };
            if !code.is_valid() || symbols.contains_key(&code) {
                return Err(invalid(&symbol));
            }
            let repeated = match &symbol {
                Symbol::Real(t) => codes.insert(t.clone(), code).is_some(),
                Symbol::EndOfStream => eof.replace(code).is_some(),
            };
            if repeated {
                return Err(invalid(&symbol));
            }
            max_bits = max_bits.max(code.bits);
            symbols.insert(code, symbol);
        }

        Ok(Self {
            codes,
            eof,
            symbols,
            max_bits,
        })
    }

    /// Number of entries, the sentinel included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Length of the longest code.
    pub fn max_bits(&self) -> u8 {
        self.max_bits
    }

    /// Code of the end-of-stream sentinel, if the table has one.
    pub fn eof_code(&self) -> Option<Code> {
        self.eof
    }

    /// Code for a real symbol (encode).
    pub fn code_of(&self, token: &T) -> Result<Code> {
        self.codes
            .get(token)
            .copied()
            .ok_or_else(|| CodecError::UnknownSymbol(format!("{:?}", token)))
    }

    /// Code for any table key, the sentinel included.
    pub fn get_code(&self, symbol: &Symbol<T>) -> Result<Code> {
        match symbol {
            Symbol::Real(t) => self.code_of(t),
            Symbol::EndOfStream => self
                .eof
                .ok_or_else(|| CodecError::UnknownSymbol(symbol.to_string())),
        }
    }

    /// Check if the code is defined in this table.
    pub fn has_code(&self, bits: u8, value: u128) -> bool {
        self.symbols.contains_key(&Code::new(bits, value))
    }

    /// Symbol for a given code (decode).
    pub fn get_symbol(&self, bits: u8, value: u128) -> Result<&Symbol<T>> {
        self.lookup(bits, value)
            .ok_or(CodecError::UnknownCode { bits, value })
    }

    /// Non-failing probe used in the decoder's inner loop.
    pub(crate) fn lookup(&self, bits: u8, value: u128) -> Option<&Symbol<T>> {
        self.symbols.get(&Code::new(bits, value))
    }

    /// All entries, sorted by code.
    pub fn entries(&self) -> Vec<(&Symbol<T>, Code)> {
        let mut entries = self
            .symbols
            .iter()
            .map(|(code, symbol)| (symbol, *code))
            .collect::<Vec<_>>();
        entries.sort_unstable_by_key(|&(_, code)| code);
        entries
    }

    /// Verify that no code is a bit prefix of another one.
    pub fn validate_prefix_free(&self) -> Result<()> {
        for (symbol, code) in self.entries() {
            // Walk every shorter prefix of this code and look it up
            for bits in 1..code.bits {
                let prefix = Code::new(bits, code.value >> (code.bits - bits));
                if let Some(owner) = self.symbols.get(&prefix) {
                    return Err(CodecError::PrefixConflict {
                        prefix: owner.to_string(),
                        symbol: symbol.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Print a code table overview: bit length, binary code, integer value and symbol.
    pub fn write_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let header = [
            "Bits".to_string(),
            "Code".to_string(),
            "Value".to_string(),
            "Symbol".to_string(),
        ];
        let rows = self
            .entries()
            .into_iter()
            .map(|(symbol, code)| {
                [
                    code.bits.to_string(),
                    code.to_string(),
                    code.value.to_string(),
                    symbol.to_string(),
                ]
            })
            .collect::<Vec<_>>();

        // Find column widths
        let mut widths = [0_usize; 3];
        for row in std::iter::once(&header).chain(rows.iter()) {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.len());
            }
        }

        for row in std::iter::once(&header).chain(rows.iter()) {
            writeln!(
                out,
                "{:>w0$} {:w1$} {:>w2$} {}",
                row[0],
                row[1],
                row[2],
                row[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(entries: &[(Symbol<char>, u8, u128)]) -> Result<CodeTable<char>> {
        CodeTable::new(
            entries
                .iter()
                .map(|(s, bits, value)| (s.clone(), Code::new(*bits, *value))),
        )
    }

    #[test]
    fn lookup_test() {
        let t = table(&[
            (Symbol::Real('a'), 1, 0),
            (Symbol::Real('b'), 2, 2),
            (Symbol::EndOfStream, 2, 3),
        ])
        .unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.max_bits(), 2);
        assert_eq!(t.code_of(&'b').unwrap(), Code::new(2, 2));
        assert_eq!(t.get_code(&Symbol::EndOfStream).unwrap(), Code::new(2, 3));
        assert_eq!(t.eof_code(), Some(Code::new(2, 3)));
        assert!(t.has_code(1, 0));
        assert!(!t.has_code(1, 1));
        assert_eq!(t.get_symbol(2, 2).unwrap(), &Symbol::Real('b'));
        assert!(matches!(
            t.get_symbol(3, 0),
            Err(CodecError::UnknownCode { bits: 3, value: 0 })
        ));
        assert!(matches!(t.code_of(&'z'), Err(CodecError::UnknownSymbol(s)) if s == "'z'"));
        t.validate_prefix_free().unwrap();
    }

    #[test]
    fn invalid_code_test() {
        let zero_bits = table(&[(Symbol::Real('a'), 0, 0)]);
        assert!(matches!(
            zero_bits,
            Err(CodecError::InvalidCode { ref symbol, bits: 0, value: 0 }) if symbol == "'a'"
        ));
        let too_big = table(&[(Symbol::Real('a'), 1, 0), (Symbol::Real('b'), 2, 5)]);
        assert!(matches!(
            too_big,
            Err(CodecError::InvalidCode { ref symbol, bits: 2, value: 5 }) if symbol == "'b'"
        ));
        let too_long = table(&[(Symbol::Real('a'), MAX_CODE_BITS + 1, 0)]);
        assert!(matches!(too_long, Err(CodecError::InvalidCode { .. })));
    }

    #[test]
    fn duplicate_entries_test() {
        let same_code = table(&[(Symbol::Real('a'), 2, 1), (Symbol::Real('b'), 2, 1)]);
        assert!(matches!(
            same_code,
            Err(CodecError::InvalidCode { ref symbol, .. }) if symbol == "'b'"
        ));
        let same_symbol = table(&[(Symbol::Real('a'), 2, 1), (Symbol::Real('a'), 2, 2)]);
        assert!(matches!(same_symbol, Err(CodecError::InvalidCode { .. })));
    }

    #[test]
    fn prefix_conflict_test() {
        let t = table(&[
            (Symbol::Real('a'), 1, 1),
            (Symbol::Real('b'), 3, 0b101),
            (Symbol::EndOfStream, 1, 0),
        ])
        .unwrap();
        match t.validate_prefix_free() {
            Err(CodecError::PrefixConflict { prefix, symbol }) => {
                assert_eq!(prefix, "'a'");
                assert_eq!(symbol, "'b'");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn code_display_test() {
        assert_eq!(Code::new(3, 1).to_string(), "001");
        assert_eq!(Code::new(1, 1).to_string(), "1");
        assert!(Code::new(1, 1).is_prefix_of(&Code::new(3, 0b110)));
        assert!(!Code::new(2, 1).is_prefix_of(&Code::new(3, 0b110)));
        assert!(!Code::new(3, 6).is_prefix_of(&Code::new(3, 6)));
    }

    #[test]
    fn write_table_test() {
        let t = table(&[
            (Symbol::Real('c'), 1, 1),
            (Symbol::Real('b'), 2, 1),
            (Symbol::Real('a'), 3, 1),
            (Symbol::EndOfStream, 3, 0),
        ])
        .unwrap();
        let mut out = Vec::new();
        t.write_table(&mut out).unwrap();
        let dump = String::from_utf8(out).unwrap();
        let lines = dump.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "Bits Code Value Symbol",
                "   1 1        1 'c'",
                "   2 01       1 'b'",
                "   3 000      0 _EOF",
                "   3 001      1 'a'",
            ]
        );
    }
}
