//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::{
    fs,
    io::{self, Write},
    process::exit,
};

use huffcodec::persistence::{load, save, Persisted};
use huffcodec::tools::cli::{huffopts_init, Alphabet, HuffOpts, Mode};
use huffcodec::tools::freq_count::{byte_freqs, count};
use huffcodec::{Codec, CodecError, Result};

use log::{debug, error, info, LevelFilter};
use serde_json::{json, Value};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Can't start logger: {}", e);
    }

    let options = huffopts_init();

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Train => train(&options),
        Mode::Encode => encode(&options),
        Mode::Decode => decode(&options),
        Mode::Dump => dump(&options),
    };

    match result {
        Ok(()) => info!("Done.\n"),
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    }
}

/// A code table read back from disk, typed by the alphabet it was trained on.
enum Table {
    Bytes(Persisted<u8>),
    Chars(Persisted<char>),
}

/// Count the training sample, build a codec and save it with its training metadata.
fn train(opts: &HuffOpts) -> Result<()> {
    let data = fs::read(&opts.input)?;
    let source = opts.input.display().to_string();

    match opts.alphabet {
        Alphabet::Bytes => {
            let codec = Codec::from_bytes(&data)?;
            let freqs = byte_freqs(&data)
                .into_iter()
                .enumerate()
                .filter(|&(_, f)| f > 0)
                .collect::<Vec<_>>();
            let metadata = json!({
                "alphabet": Alphabet::Bytes.name(),
                "source": source,
                "frequencies": freqs,
            });
            save(&codec, &opts.table, Some(&metadata))
        }
        Alphabet::Chars => {
            let mut text = utf8(data)?;
            if opts.lowercase {
                text = text.to_lowercase();
            }
            let freqs = count(text.chars());
            let codec = Codec::from_frequencies(freqs.iter().copied())?;
            let metadata = json!({
                "alphabet": Alphabet::Chars.name(),
                "source": source,
                "lowercase": opts.lowercase,
                "frequencies": freqs,
            });
            save(&codec, &opts.table, Some(&metadata))
        }
    }
}

fn encode(opts: &HuffOpts) -> Result<()> {
    let data = fs::read(&opts.input)?;
    let encoded = match load_table(opts)? {
        Table::Bytes(table) => table.codec.encode(&data)?,
        Table::Chars(table) => table.codec.encode(utf8(data.clone())?.chars())?,
    };
    fs::write(&opts.output, &encoded)?;
    info!(
        "Encoded {} bytes into {} bytes ({:?})",
        data.len(),
        encoded.len(),
        opts.output
    );
    Ok(())
}

fn decode(opts: &HuffOpts) -> Result<()> {
    let data = fs::read(&opts.input)?;
    let decoded = match load_table(opts)? {
        Table::Bytes(table) => table.codec.decode(&data),
        Table::Chars(table) => table
            .codec
            .decode(&data)
            .into_iter()
            .collect::<String>()
            .into_bytes(),
    };
    fs::write(&opts.output, &decoded)?;
    info!(
        "Decoded {} bytes into {} bytes ({:?})",
        data.len(),
        decoded.len(),
        opts.output
    );
    Ok(())
}

/// Print the code table and whatever was recorded when it was trained.
fn dump(opts: &HuffOpts) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let metadata = match load_table(opts)? {
        Table::Bytes(table) => {
            table.codec.write_table(&mut out)?;
            table.metadata
        }
        Table::Chars(table) => {
            table.codec.write_table(&mut out)?;
            table.metadata
        }
    };
    if let Some(metadata) = metadata {
        if let Some(source) = metadata.get("source").and_then(Value::as_str) {
            writeln!(out, "Trained on {}", source)?;
        }
    }
    Ok(())
}

/// Load the table named in the options.
///
/// The symbol type is not known up front. Character tables are tried first. A table
/// that fails to load as characters (the binary form records its symbol type, the JSON
/// form writes bytes as numbers), or whose metadata says bytes, is loaded as bytes.
fn load_table(opts: &HuffOpts) -> Result<Table> {
    match load::<char, _>(&opts.table) {
        Ok(table) if alphabet_of(&table.metadata) != Some(Alphabet::Bytes) => {
            return Ok(Table::Chars(table))
        }
        Err(CodecError::Io(e)) => return Err(e.into()),
        Ok(_) => {}
        Err(e) => debug!("Not a character table ({}), trying bytes", e),
    }
    Ok(Table::Bytes(load::<u8, _>(&opts.table)?))
}

fn alphabet_of(metadata: &Option<Value>) -> Option<Alphabet> {
    metadata
        .as_ref()?
        .get("alphabet")
        .and_then(Value::as_str)
        .and_then(Alphabet::from_name)
}

fn utf8(data: Vec<u8>) -> Result<String> {
    String::from_utf8(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
