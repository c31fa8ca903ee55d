//! The symbol alphabet and the end-of-stream sentinel.
//!
//! A codec works over any alphabet type implementing [`Token`]. Inside the code table
//! every token is wrapped in [`Symbol::Real`], next to one extra entry for
//! [`Symbol::EndOfStream`], which marks where the encoded bits end when they do not
//! fill the last byte.

use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::compression::concat::Concat;

/// A table entry key: either a caller symbol or the end-of-stream sentinel.
///
/// Variant order matters. The derived ordering puts `EndOfStream` below every
/// `Real` value, whatever `T` is.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol<T> {
    /// Marks the end of the encoded bit stream. Never produced by a decoder.
    EndOfStream,
    /// A symbol from the caller's alphabet.
    Real(T),
}

impl<T> Symbol<T> {
    /// True for the end-of-stream sentinel.
    pub fn is_eof(&self) -> bool {
        matches!(self, Symbol::EndOfStream)
    }

    /// The wrapped caller symbol, if any.
    pub fn real(&self) -> Option<&T> {
        match self {
            Symbol::Real(t) => Some(t),
            Symbol::EndOfStream => None,
        }
    }
}

impl<T: Debug> Display for Symbol<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::EndOfStream => write!(f, "_EOF"),
            Symbol::Real(t) => write!(f, "{:?}", t),
        }
    }
}

/// Bound for alphabet types. Anything hashable and comparable for equality will do.
///
/// The provided methods only matter when decoded symbols are joined into text or
/// bytes, or when a codec has to guess its concatenation strategy from the data type.
pub trait Token: Clone + Eq + Hash + Debug {
    /// Strategy `from_data` picks for this alphabet.
    fn default_concat() -> Concat {
        Concat::List
    }

    /// Append the text form of this symbol. Returns false if it has none.
    fn push_text(&self, _out: &mut String) -> bool {
        false
    }

    /// The byte this symbol stands for, if it is one.
    fn as_byte(&self) -> Option<u8> {
        None
    }
}

impl Token for char {
    fn default_concat() -> Concat {
        Concat::StrJoin
    }

    fn push_text(&self, out: &mut String) -> bool {
        out.push(*self);
        true
    }
}

impl Token for u8 {
    fn default_concat() -> Concat {
        Concat::Bytes
    }

    fn as_byte(&self) -> Option<u8> {
        Some(*self)
    }
}

impl Token for String {
    fn push_text(&self, out: &mut String) -> bool {
        out.push_str(self);
        true
    }
}

macro_rules! plain_tokens {
    ($($t:ty),*) => {
        $(impl Token for $t {})*
    };
}

plain_tokens!(i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize, bool, ());

impl<T: Token> Token for Option<T> {}
impl<T: Token> Token for Vec<T> {}
impl<A: Token, B: Token> Token for (A, B) {}
impl<A: Token, B: Token, C: Token> Token for (A, B, C) {}
