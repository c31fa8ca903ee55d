//! Compact binary form of a code table, serialized with bincode.
//!
//! Holds every entry, the sentinel included, behind a magic number, a version and the
//! name of the symbol type. Not meant to be read by anything but this crate, built by
//! the same compiler: the type name is only checked for equality.

use std::any::type_name;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ensure_dir, Persisted};
use crate::compression::codec::Codec;
use crate::compression::concat::Concat;
use crate::error::{CodecError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};
use crate::huffman_coding::symbol::{Symbol, Token};

pub const MAGIC: [u8; 4] = *b"HUFC";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct BinaryRecord<S> {
    magic: [u8; 4],
    version: u32,
    /// Rust type of the symbols. bincode alone cannot tell a byte from an ASCII char.
    symbol_type: String,
    code_table: Vec<(Symbol<S>, Code)>,
    concat: Concat,
    /// JSON text, since bincode cannot read back a free form value
    metadata: Option<String>,
}

/// Serialize the codec and optional metadata.
pub fn to_bytes<T>(codec: &Codec<T>, metadata: Option<&Value>) -> Result<Vec<u8>>
where
    T: Token + Serialize,
{
    let metadata = metadata
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| CodecError::malformed(format!("metadata: {}", e)))?;
    let record = BinaryRecord {
        magic: MAGIC,
        version: FORMAT_VERSION,
        symbol_type: type_name::<T>().to_string(),
        code_table: codec
            .code_table()
            .entries()
            .into_iter()
            .map(|(symbol, code)| {
                let symbol = match symbol {
                    Symbol::Real(t) => Symbol::Real(t),
                    Symbol::EndOfStream => Symbol::EndOfStream,
                };
                (symbol, code)
            })
            .collect(),
        concat: codec.concat(),
        metadata,
    };
    bincode::serialize(&record).map_err(|e| CodecError::malformed(format!("serialize: {}", e)))
}

/// Deserialize a codec written by `to_bytes`.
pub fn from_bytes<T>(data: &[u8]) -> Result<Persisted<T>>
where
    T: Token + DeserializeOwned,
{
    let (magic, version): ([u8; 4], u32) = bincode::deserialize(data)
        .map_err(|e| CodecError::malformed(format!("header: {}", e)))?;
    if magic != MAGIC {
        return Err(CodecError::malformed("not a binary code table"));
    }
    if version != FORMAT_VERSION {
        return Err(CodecError::malformed(format!(
            "unsupported version {}",
            version
        )));
    }

    let (_, _, symbol_type): ([u8; 4], u32, String) = bincode::deserialize(data)
        .map_err(|e| CodecError::malformed(format!("header: {}", e)))?;
    if symbol_type != type_name::<T>() {
        return Err(CodecError::malformed(format!(
            "table holds {} symbols, not {}",
            symbol_type,
            type_name::<T>()
        )));
    }

    let record: BinaryRecord<T> = bincode::deserialize(data)
        .map_err(|e| CodecError::malformed(format!("bad code table: {}", e)))?;
    let metadata = record
        .metadata
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| CodecError::malformed(format!("metadata: {}", e)))?;

    Ok(Persisted {
        codec: Codec::from_table(CodeTable::new(record.code_table)?, record.concat),
        metadata,
    })
}

/// Persist the code table to a binary file.
pub fn save_binary<T, P>(codec: &Codec<T>, path: P, metadata: Option<&Value>) -> Result<()>
where
    T: Token + Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let data = to_bytes(codec, metadata)?;
    ensure_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&data)?;
    writer.flush()?;
    info!(
        "Saved code table ({} items) to {:?}",
        codec.code_table().len(),
        path
    );
    Ok(())
}

/// Load a code table persisted with `save_binary`.
pub fn load_binary<T, P>(path: P) -> Result<Persisted<T>>
where
    T: Token + DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let persisted = from_bytes(&fs::read(path)?)?;
    info!(
        "Loaded code table ({} items) from {:?}",
        persisted.codec.code_table().len(),
        path
    );
    Ok(persisted)
}
