//! Reassembly of decoded symbols into the caller's container.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::huffman_coding::symbol::Token;

/// How decoded symbols are put back together.
///
/// Stored with the codec and persisted with its code table, so only named strategies
/// exist here. A one-off custom reduction goes through `Codec::decode_with`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concat {
    /// Keep the symbols as a list
    #[default]
    List,
    /// Join the symbols into one string
    StrJoin,
    /// Collect the symbols as bytes
    Bytes,
}

/// Decoded output, shaped by a `Concat` strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded<T> {
    List(Vec<T>),
    Text(String),
    Bytes(Vec<u8>),
}

impl<T> Decoded<T> {
    pub fn into_list(self) -> Option<Vec<T>> {
        match self {
            Decoded::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Decoded::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Decoded::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl Concat {
    /// Name used in the text persistence format.
    pub fn name(&self) -> &'static str {
        match self {
            Concat::List => "list",
            Concat::StrJoin => "str_join",
            Concat::Bytes => "bytes",
        }
    }

    /// Collect symbols according to this strategy.
    ///
    /// Fails with `UnsupportedConcat` on the first symbol that has no text or byte form.
    pub fn reassemble<T, I>(self, symbols: I) -> Result<Decoded<T>>
    where
        T: Token,
        I: IntoIterator<Item = T>,
    {
        let unsupported = |symbol: &T| CodecError::UnsupportedConcat {
            concat: self.name(),
            symbol: format!("{:?}", symbol),
        };
        match self {
            Concat::List => Ok(Decoded::List(symbols.into_iter().collect())),
            Concat::StrJoin => {
                let mut text = String::new();
                for symbol in symbols {
                    if !symbol.push_text(&mut text) {
                        return Err(unsupported(&symbol));
                    }
                }
                Ok(Decoded::Text(text))
            }
            Concat::Bytes => symbols
                .into_iter()
                .map(|symbol| symbol.as_byte().ok_or_else(|| unsupported(&symbol)))
                .collect::<Result<Vec<u8>>>()
                .map(Decoded::Bytes),
        }
    }
}

impl Display for Concat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
