//! Portable, versioned JSON form of a code table.
//!
//! ```text
//! {"type":"huffcodec code table","version":1,
//!  "code_table":[[symbol,bits,value],...],"eof_code":[bits,value],
//!  "concat":"list"|"str_join"|"bytes","metadata":{...}}
//! ```
//!
//! Symbols are written as rows, not as object keys, since most of them would not be
//! valid JSON keys. The sentinel is not a caller symbol, so it gets its own field.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;
use rustc_hash::FxHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ensure_dir, Persisted};
use crate::compression::codec::Codec;
use crate::compression::concat::Concat;
use crate::error::{CodecError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};
use crate::huffman_coding::symbol::{Symbol, Token};

/// Type tag of the document.
pub const FORMAT_TYPE: &str = "huffcodec code table";
/// Only version written and accepted.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct Header {
    #[serde(rename = "type")]
    kind: String,
    version: u32,
}

#[derive(Serialize, Deserialize)]
struct TextRecord<S> {
    #[serde(rename = "type")]
    kind: String,
    version: u32,
    code_table: Vec<(S, u8, u128)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eof_code: Option<(u8, u128)>,
    #[serde(default)]
    concat: Concat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

/// Assemble the document, refusing symbols that would not survive a reload.
fn text_record<'a, T>(
    codec: &'a Codec<T>,
    metadata: Option<&Value>,
) -> Result<TextRecord<&'a T>>
where
    T: Token + Serialize,
{
    let table = codec.code_table();
    // Pull the sentinel out of the rows
    let code_table = table
        .entries()
        .into_iter()
        .filter_map(|(symbol, code)| symbol.real().map(|t| (t, code.bits, code.value)))
        .collect::<Vec<_>>();

    // Distinct symbols can share a JSON form, e.g. `None` and `Some(())` are both null
    let mut seen = FxHashSet::default();
    for (t, _, _) in &code_table {
        let text = serde_json::to_string(t)
            .map_err(|e| CodecError::malformed(format!("symbol {:?}: {}", t, e)))?;
        if !seen.insert(text) {
            return Err(CodecError::malformed(format!(
                "symbol {:?} has the same JSON form as another symbol",
                t
            )));
        }
    }

    Ok(TextRecord {
        kind: FORMAT_TYPE.to_string(),
        version: FORMAT_VERSION,
        code_table,
        eof_code: table.eof_code().map(|code| (code.bits, code.value)),
        concat: codec.concat(),
        metadata: metadata.cloned(),
    })
}

/// Write the codec as a compact JSON document.
///
/// Fails with `MalformedPersistedData`, before writing anything, when two symbols
/// serialize to the same JSON value.
pub fn write_json<T, W>(codec: &Codec<T>, writer: W, metadata: Option<&Value>) -> Result<()>
where
    T: Token + Serialize,
    W: Write,
{
    let record = text_record(codec, metadata)?;
    serde_json::to_writer(writer, &record).map_err(std::io::Error::from)?;
    Ok(())
}

/// Read a codec from a JSON document, checking its type tag and version.
pub fn read_json<T, R>(mut reader: R) -> Result<Persisted<T>>
where
    T: Token + DeserializeOwned,
    R: Read,
{
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let header: Header = serde_json::from_str(&text)
        .map_err(|e| CodecError::malformed(format!("not a code table document: {}", e)))?;
    if header.kind != FORMAT_TYPE {
        return Err(CodecError::malformed(format!(
            "unexpected type {:?}",
            header.kind
        )));
    }
    if header.version != FORMAT_VERSION {
        return Err(CodecError::malformed(format!(
            "unsupported version {}",
            header.version
        )));
    }

    let record: TextRecord<T> = serde_json::from_str(&text)
        .map_err(|e| CodecError::malformed(format!("bad code table: {}", e)))?;

    // Put the sentinel back under its own identity
    let entries = record
        .code_table
        .into_iter()
        .map(|(t, bits, value)| (Symbol::Real(t), Code::new(bits, value)))
        .chain(
            record
                .eof_code
                .map(|(bits, value)| (Symbol::EndOfStream, Code::new(bits, value))),
        );
    let table = CodeTable::new(entries)?;

    Ok(Persisted {
        codec: Codec::from_table(table, record.concat),
        metadata: record.metadata,
    })
}

/// Persist the code table as a JSON file.
pub fn save_json<T, P>(codec: &Codec<T>, path: P, metadata: Option<&Value>) -> Result<()>
where
    T: Token + Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let record = text_record(codec, metadata)?;
    ensure_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &record).map_err(std::io::Error::from)?;
    writer.flush()?;
    info!(
        "Saved code table ({} items) to {:?}",
        codec.code_table().len(),
        path
    );
    Ok(())
}

/// Load a code table persisted with `save_json`.
pub fn load_json<T, P>(path: P) -> Result<Persisted<T>>
where
    T: Token + DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let persisted = read_json(BufReader::new(File::open(path)?))?;
    info!(
        "Loaded code table ({} items) from {:?}",
        persisted.codec.code_table().len(),
        path
    );
    Ok(persisted)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn to_json<T: Token + Serialize>(codec: &Codec<T>, metadata: Option<&Value>) -> Value {
        let mut out = Vec::new();
        write_json(codec, &mut out, metadata).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn schema_test() {
        let codec = Codec::from_frequencies(vec![('a', 2), ('b', 4), ('c', 8)]).unwrap();
        let doc = to_json(&codec, Some(&json!({"source": "test"})));
        assert_eq!(
            doc,
            json!({
                "type": "huffcodec code table",
                "version": 1,
                "code_table": [["c", 1, 1], ["b", 2, 1], ["a", 3, 1]],
                "eof_code": [3, 0],
                "concat": "str_join",
                "metadata": {"source": "test"}
            })
        );
    }

    #[test]
    fn round_trip_test() {
        let train = ["FR", "UK", "BE", "IT", "FR", "IT", "GR", "FR", "NL", "BE", "DE"];
        let data = ["FR", "IT", "BE", "FR", "UK"];
        let codec = Codec::from_data(train.iter().map(|s| s.to_string())).unwrap();
        let mut out = Vec::new();
        write_json(&codec, &mut out, None).unwrap();
        let loaded = read_json::<String, _>(out.as_slice()).unwrap();
        assert!(loaded.metadata.is_none());
        assert_eq!(loaded.codec.concat(), Concat::List);

        let data = data.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let encoded = codec.encode(&data).unwrap();
        assert_eq!(loaded.codec.encode(&data).unwrap(), encoded);
        assert_eq!(loaded.codec.decode(&encoded), data);
    }

    #[test]
    fn tuple_symbols_test() {
        let train = vec![(0, 0), (0, 1), (1, 0), (0, 0), (1, 0), (1, 0)];
        let data = vec![(1, 0), (0, 0), (0, 1), (1, 0)];
        let codec = Codec::from_data(train).unwrap();
        let mut out = Vec::new();
        write_json(&codec, &mut out, None).unwrap();
        let loaded = read_json::<(i32, i32), _>(out.as_slice()).unwrap().codec;
        let encoded = codec.encode(&data).unwrap();
        assert_eq!(loaded.encode(&data).unwrap(), encoded);
        assert_eq!(loaded.decode(&encoded), data);
    }

    #[test]
    fn defaults_test() {
        let doc = r#"{"type":"huffcodec code table","version":1,"code_table":[[7,1,0],[8,1,1]]}"#;
        let loaded = read_json::<u32, _>(doc.as_bytes()).unwrap();
        assert_eq!(loaded.codec.concat(), Concat::List);
        assert_eq!(loaded.codec.code_table().eof_code(), None);
        assert_eq!(loaded.codec.encode(&[7_u32, 8, 8, 7, 7, 7, 7, 7]).unwrap(), vec![0b0110_0000]);
    }

    #[test]
    fn rejects_bad_documents_test() {
        let cases = [
            r#"{"type":"something else","version":1,"code_table":[]}"#,
            r#"{"type":"huffcodec code table","version":2,"code_table":[]}"#,
            r#"{"version":1,"code_table":[]}"#,
            r#"{"type":"huffcodec code table","version":1,"code_table":[["a",1]]}"#,
            r#"{"type":"huffcodec code table","version":1,"code_table":[["a",-1,0]]}"#,
            r#"{"type":"huffcodec code table","version":1,"code_table":[],"concat":"zip"}"#,
            "[1, 2, 3]",
            "not json",
        ];
        for doc in cases {
            let result = read_json::<char, _>(doc.as_bytes());
            assert!(
                matches!(result, Err(CodecError::MalformedPersistedData(_))),
                "accepted {}",
                doc
            );
        }
    }

    #[test]
    fn rejects_illegal_codes_test() {
        let doc = r#"{"type":"huffcodec code table","version":1,"code_table":[["a",2,5]]}"#;
        assert!(matches!(
            read_json::<char, _>(doc.as_bytes()),
            Err(CodecError::InvalidCode { .. })
        ));
    }

    #[test]
    fn ambiguous_symbols_test() {
        // None and Some(()) both come out as null
        let codec = Codec::from_data(vec![None, Some(()), None, None, Some(())]).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            write_json(&codec, &mut out, None),
            Err(CodecError::MalformedPersistedData(_))
        ));
        assert!(out.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        assert!(matches!(
            save_json(&codec, &path, None),
            Err(CodecError::MalformedPersistedData(_))
        ));
        assert!(!path.exists());

        // Distinct forms are fine
        let codec = Codec::from_data(vec![None, Some(1_u8), Some(2), None]).unwrap();
        let mut out = Vec::new();
        write_json(&codec, &mut out, None).unwrap();
        let loaded = read_json::<Option<u8>, _>(out.as_slice()).unwrap().codec;
        let data = vec![Some(2), None, Some(1)];
        assert_eq!(loaded.decode(&codec.encode(&data).unwrap()), data);
    }

    #[test]
    fn file_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("code-table.json");
        let codec = Codec::from_data("aabcbcdbabdbcbd".chars()).unwrap();
        save_json(&codec, &path, None).unwrap();
        let loaded = load_json::<char, _>(&path).unwrap().codec;
        let encoded = codec.encode("abcdabcd".chars()).unwrap();
        assert_eq!(loaded.encode("abcdabcd".chars()).unwrap(), encoded);
        assert_eq!(
            loaded.decode_concat(&encoded).unwrap().into_text().unwrap(),
            "abcdabcd"
        );
    }
}
