use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use clap::{ArgEnum, Parser, Subcommand};
use log::info;

/// Train, Encode, Decode, Dump
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Train,
    Encode,
    Decode,
    Dump,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What a training file is split into
#[derive(Clone, Copy, Debug, PartialEq, Eq, ArgEnum)]
pub enum Alphabet {
    /// Raw bytes
    Bytes,
    /// UTF-8 characters
    Chars,
}

impl Alphabet {
    /// Name stored in the table metadata.
    pub fn name(&self) -> &'static str {
        match self {
            Alphabet::Bytes => "bytes",
            Alphabet::Chars => "chars",
        }
    }

    pub fn from_name(name: &str) -> Option<Alphabet> {
        match name {
            "bytes" => Some(Alphabet::Bytes),
            "chars" => Some(Alphabet::Chars),
            _ => None,
        }
    }
}
impl Display for Alphabet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Huffman prefix-code encoder and decoder",
    long_about = "
    Builds a Huffman code table from a sample file, saves it, and uses it to encode and
    decode other files. Tables ending in .json are saved as JSON, anything else is binary."
)]
pub struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', global = true, default_value_t = 3)]
    v: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a code table from a sample file and save it
    Train {
        /// Sample file to count symbols in
        input: PathBuf,
        /// Where to save the code table
        table: PathBuf,
        /// Split the sample into bytes or characters
        #[clap(long, arg_enum, default_value_t = Alphabet::Chars)]
        alphabet: Alphabet,
        /// Lowercase the sample before counting (characters only)
        #[clap(long)]
        lower: bool,
    },
    /// Encode a file with a saved code table
    Encode {
        table: PathBuf,
        input: PathBuf,
        output: PathBuf,
    },
    /// Decode a file with a saved code table
    Decode {
        table: PathBuf,
        input: PathBuf,
        output: PathBuf,
    },
    /// Print a saved code table
    Dump { table: PathBuf },
}

/// Everything the binary needs to know to do its job.
#[derive(Debug)]
pub struct HuffOpts {
    /// Train/Encode/Decode/Dump
    pub op_mode: Mode,
    /// Code table file
    pub table: PathBuf,
    /// File to read
    pub input: PathBuf,
    /// File to write
    pub output: PathBuf,
    /// Alphabet used when training
    pub alphabet: Alphabet,
    /// Lowercase the training sample
    pub lowercase: bool,
    /// Log level, 0 (off) to 5 (trace)
    pub verbosity: u8,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            op_mode: Mode::Dump,
            table: PathBuf::new(),
            input: PathBuf::new(),
            output: PathBuf::new(),
            alphabet: Alphabet::Chars,
            lowercase: false,
            verbosity: 3,
        }
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Args> for HuffOpts {
    fn from(args: Args) -> Self {
        let mut opts = HuffOpts {
            verbosity: args.v,
            ..HuffOpts::new()
        };
        match args.command {
            Command::Train {
                input,
                table,
                alphabet,
                lower,
            } => {
                opts.op_mode = Mode::Train;
                opts.input = input;
                opts.table = table;
                opts.alphabet = alphabet;
                opts.lowercase = lower;
            }
            Command::Encode {
                table,
                input,
                output,
            } => {
                opts.op_mode = Mode::Encode;
                opts.table = table;
                opts.input = input;
                opts.output = output;
            }
            Command::Decode {
                table,
                input,
                output,
            } => {
                opts.op_mode = Mode::Decode;
                opts.table = table;
                opts.input = input;
                opts.output = output;
            }
            Command::Dump { table } => {
                opts.op_mode = Mode::Dump;
                opts.table = table;
            }
        }
        opts
    }
}

/// Parse the command line, set the log level and report what we are about to do.
pub fn huffopts_init() -> HuffOpts {
    let opts = HuffOpts::from(Args::parse());

    // Set the log level
    match opts.verbosity {
        0 => log::set_max_level(log::LevelFilter::Off),
        1 => log::set_max_level(log::LevelFilter::Error),
        2 => log::set_max_level(log::LevelFilter::Warn),
        3 => log::set_max_level(log::LevelFilter::Info),
        4 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    };

    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Code table {:?}", opts.table);
    if opts.op_mode == Mode::Train {
        info!("Training on {:?} as {}", opts.input, opts.alphabet);
    }
    opts
}
