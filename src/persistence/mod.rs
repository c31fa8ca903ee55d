//! Saving and loading code tables.
//!
//! Two formats are supported:
//! - text: a versioned JSON document, portable and readable by other tools.
//! - binary: a compact bincode record, only readable by this crate.
//!
//! Both carry the concat strategy and an optional free form metadata value next to the
//! table. The format is picked from the file extension: `.json` is text, anything else
//! is binary.
//!
pub mod binary;
pub mod text;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::compression::codec::Codec;
use crate::error::Result;
use crate::huffman_coding::symbol::Token;

/// A loaded codec, with whatever metadata was saved alongside it.
#[derive(Clone, Debug)]
pub struct Persisted<T: Token> {
    pub codec: Codec<T>,
    pub metadata: Option<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Binary,
    Json,
}

impl Format {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Binary,
        }
    }
}

/// Create the parent directories of a file about to be written.
pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save a codec, in the format its path calls for.
pub fn save<T, P>(codec: &Codec<T>, path: P, metadata: Option<&Value>) -> Result<()>
where
    T: Token + Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match Format::from_path(path) {
        Format::Json => text::save_json(codec, path, metadata),
        Format::Binary => binary::save_binary(codec, path, metadata),
    }
}

/// Load a codec, in the format its path calls for.
pub fn load<T, P>(path: P) -> Result<Persisted<T>>
where
    T: Token + DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match Format::from_path(path) {
        Format::Json => text::load_json(path),
        Format::Binary => binary::load_binary(path),
    }
}
