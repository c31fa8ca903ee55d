use std::io::{self, Write};

use crate::error::Result;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::symbol::{Symbol, Token};
use crate::huffman_coding::table_builder::build_table;
use crate::tools::freq_count::{byte_freqs, count};

use super::concat::Concat;

/// A prefix code codec: a code table plus the strategy that puts decoded symbols back
/// together.
///
/// Immutable once built. Encoding and decoding only read the table, so a codec can be
/// shared between threads freely. The methods doing the work live in
/// [`compress`](super::compress) and [`decompress`](super::decompress).
#[derive(Clone, Debug)]
pub struct Codec<T: Token> {
    pub(crate) table: CodeTable<T>,
    pub(crate) concat: Concat,
}

impl<T: Token> Codec<T> {
    /// Wrap an existing code table.
    pub fn from_table(table: CodeTable<T>, concat: Concat) -> Self {
        Self { table, concat }
    }

    /// Build a Huffman codec from symbol frequencies. The concat strategy is guessed from `T`.
    pub fn from_frequencies<I>(frequencies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        Self::from_frequencies_with(frequencies, T::default_concat())
    }

    /// Build a Huffman codec from symbol frequencies with an explicit concat strategy.
    pub fn from_frequencies_with<I>(frequencies: I, concat: Concat) -> Result<Self>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let frequencies = frequencies
            .into_iter()
            .map(|(symbol, freq)| (Symbol::Real(symbol), freq));
        Self::from_symbol_frequencies(frequencies, concat)
    }

    /// Build a Huffman codec where the caller may also weight the end-of-stream sentinel.
    pub fn from_symbol_frequencies<I>(frequencies: I, concat: Concat) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol<T>, u64)>,
    {
        Ok(Self::from_table(build_table(frequencies)?, concat))
    }

    /// Build a Huffman codec from a sample of symbols.
    pub fn from_data<I>(data: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_frequencies(count(data))
    }

    /// Get code table
    pub fn code_table(&self) -> &CodeTable<T> {
        &self.table
    }

    /// Strategy used by `decode_concat`.
    pub fn concat(&self) -> Concat {
        self.concat
    }

    /// Print code table overview
    pub fn write_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.table.write_table(out)
    }
}

impl Codec<u8> {
    /// Build a byte codec, counting large inputs in parallel.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let frequencies = byte_freqs(data)
            .into_iter()
            .enumerate()
            .filter(|&(_, f)| f > 0)
            .map(|(byte, f)| (byte as u8, f));
        Self::from_frequencies(frequencies)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::compression::concat::Decoded;
    use crate::error::CodecError;
    use crate::huffman_coding::code_table::Code;

    #[test]
    fn optimal_encoded_lengths_test() {
        let codec = Codec::from_frequencies(vec![('A', 5), ('B', 4), ('C', 2)]).unwrap();
        assert_eq!(codec.code_table().code_of(&'A').unwrap().bits, 1);
        assert!(codec.code_table().code_of(&'B').unwrap().bits >= 2);
        assert!(codec.code_table().code_of(&'C').unwrap().bits >= 2);
        assert_eq!(codec.encode("ACC".chars()).unwrap().len(), 1);
        assert_eq!(codec.encode("CC".chars()).unwrap().len(), 1);
        assert_eq!(codec.encode("CCCCC".chars()).unwrap().len(), 2);
        for text in ["ACC", "CC", "CCCCC", "ABCABCAAAB"] {
            let encoded = codec.encode(text.chars()).unwrap();
            assert_eq!(codec.decode(&encoded), text.chars().collect::<Vec<_>>());
        }
    }

    #[test]
    fn trailing_zero_handling_test() {
        // 'b' gets the only 1 bit code, 'a' and the sentinel 2 bits each. Without the
        // sentinel, 'abba' plus padding could not be told apart from a longer message.
        let codec = Codec::from_frequencies(vec![('a', 1), ('b', 1)]).unwrap();
        assert_eq!(codec.code_table().code_of(&'b').unwrap().bits, 1);
        assert_eq!(codec.code_table().eof_code().unwrap().bits, 2);
        let encoded = codec.encode("abba".chars()).unwrap();
        let decoded = codec.decode_concat(&encoded).unwrap();
        assert_eq!(decoded, Decoded::Text("abba".to_string()));
    }

    #[test]
    fn empty_input_test() {
        let codec = Codec::from_data("hello".chars()).unwrap();
        assert!(codec.encode("".chars()).unwrap().is_empty());
        assert!(codec.decode(&[]).is_empty());
        assert_eq!(codec.decode_concat(&[]).unwrap(), Decoded::Text(String::new()));
    }

    #[test]
    fn string_data_test() {
        for text in [
            "hello world, how are you doing today?",
            "hëllò wørl∂, høw åré ¥øü døin§ tø∂@¥?",
        ] {
            let codec = Codec::from_data(text.chars()).unwrap();
            assert_eq!(codec.concat(), Concat::StrJoin);
            let encoded = codec.encode(text.chars()).unwrap();
            assert!(encoded.len() < text.len());
            let decoded = codec.decode_concat(&encoded).unwrap().into_text().unwrap();
            assert_eq!(decoded, text);
        }
    }

    #[test]
    fn byte_data_test() {
        let data = b"hello world, how are you doing today?";
        let codec = Codec::from_bytes(data).unwrap();
        assert_eq!(codec.concat(), Concat::Bytes);
        let encoded = codec.encode(data).unwrap();
        assert!(encoded.len() < data.len());
        let decoded = codec.decode_concat(&encoded).unwrap();
        assert_eq!(decoded, Decoded::Bytes(data.to_vec()));
    }

    #[test]
    fn non_string_symbols_test() {
        let pairs = vec![(1, 1), (2, 1), (1, 1)];
        let codec = Codec::from_data(pairs.clone()).unwrap();
        assert_eq!(codec.decode(&codec.encode(&pairs).unwrap()), pairs);

        let fruit = ["apple", "pear", "orange", "apple", "lemon", "pear"]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();
        let codec = Codec::from_data(fruit.clone()).unwrap();
        assert_eq!(codec.concat(), Concat::List);
        assert_eq!(codec.decode(&codec.encode(&fruit).unwrap()), fruit);

        let odd = vec![None, Some(vec![]), None, Some(vec![(); 2]), None];
        let codec = Codec::from_data(odd.clone()).unwrap();
        assert_eq!(codec.decode(&codec.encode(&odd).unwrap()), odd);

        let pieces = vec![
            ("king".to_string(), 'w', 0_u8),
            ("queen".to_string(), 'e', 3),
            ("pawn".to_string(), 'n', 0),
            ("king".to_string(), 'w', 0),
        ];
        let codec = Codec::from_data(pieces.clone()).unwrap();
        assert_eq!(codec.decode(&codec.encode(&pieces).unwrap()), pieces);
    }

    #[test]
    fn unknown_symbol_test() {
        let codec = Codec::from_data(vec![10_i64, 20, 30, 10]).unwrap();
        let err = codec.encode(&[10_i64, 40]).unwrap_err();
        assert!(matches!(err, CodecError::UnknownSymbol(ref s) if s == "40"));

        let codec = Codec::from_data("shakespeare".chars()).unwrap();
        assert!(matches!(
            codec.encode("Shakespeare".chars()),
            Err(CodecError::UnknownSymbol(_))
        ));
    }

    #[test]
    fn from_table_test() {
        let table = CodeTable::new(vec![
            (Symbol::Real('x'), Code::new(1, 0)),
            (Symbol::Real('y'), Code::new(2, 2)),
            (Symbol::EndOfStream, Code::new(2, 3)),
        ])
        .unwrap();
        let codec = Codec::from_table(table, Concat::StrJoin);
        // x y y x -> 0 10 10 0, then the sentinel 11 -> 0101 0011
        let encoded = codec.encode("xyyx".chars()).unwrap();
        assert_eq!(encoded, vec![0b0101_0011]);
        assert_eq!(
            codec.decode_concat(&encoded).unwrap().into_text().unwrap(),
            "xyyx"
        );
    }

    #[test]
    fn empty_alphabet_test() {
        let empty: Vec<(char, u64)> = vec![];
        assert!(matches!(
            Codec::from_frequencies(empty),
            Err(CodecError::EmptyAlphabet)
        ));
        assert!(matches!(
            Codec::<u8>::from_bytes(&[]),
            Err(CodecError::EmptyAlphabet)
        ));
    }

    #[test]
    fn shared_between_threads_test() {
        let text = "the quick brown fox jumps over the lazy dog";
        let codec = Arc::new(Codec::from_data(text.chars()).unwrap());
        let expected = codec.encode(text.chars()).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let codec = Arc::clone(&codec);
                let expected = &expected;
                scope.spawn(move || {
                    let encoded = codec.encode(text.chars()).unwrap();
                    assert_eq!(&encoded, expected);
                    assert_eq!(codec.decode(&encoded).iter().collect::<String>(), text);
                });
            }
        });
    }

    #[test]
    fn write_table_test() {
        let codec = Codec::from_frequencies(vec![('a', 2), ('b', 4), ('c', 8)]).unwrap();
        let mut out = Vec::new();
        codec.write_table(&mut out).unwrap();
        let dump = String::from_utf8(out).unwrap();
        assert!(dump.contains("   1 1        1 'c'"));
        assert!(dump.contains("   2 01       1 'b'"));
        assert!(dump.contains("   3 001      1 'a'"));
        assert!(dump.contains("   3 000      0 _EOF"));
    }

    proptest! {
        #[test]
        fn round_trip_prop(
            freqs in prop::collection::hash_map(any::<u16>(), 0_u64..1000, 1..40),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..200),
        ) {
            let alphabet = freqs.keys().copied().collect::<Vec<_>>();
            let data = picks.iter().map(|i| *i.get(&alphabet)).collect::<Vec<_>>();
            let codec = Codec::from_frequencies(freqs).unwrap();
            let encoded = codec.encode(&data).unwrap();
            prop_assert_eq!(codec.decode(&encoded), data);
        }
    }
}
