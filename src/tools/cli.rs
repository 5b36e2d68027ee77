use std::path::{Path, PathBuf};
use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, warn};

/// Compress, Decompress, Test
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define all user settable options to control program behavior
#[derive(Debug)]
pub struct HpOpts {
    /// Name of the file to read for input
    pub file: PathBuf,
    /// Explicit output file. Derived from the input name when None
    pub out_file: Option<PathBuf>,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Strip trailing whitespace before compressing
    pub trim: bool,
    /// Verbosity of user information, 0 (off) to 5 (trace)
    pub verbose: u8,
}

impl HpOpts {
    /// Set default parameters for the given input file
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            out_file: None,
            op_mode: Mode::Zip,
            output: Output::File,
            force_overwrite: false,
            trim: false,
            verbose: 3,
        }
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Huffman file compressor",
    long_about = "
    Counts the bytes of the input, builds a huffman tree from the counts and writes
    every byte as its huffman code. The counts are stored ahead of the packed codes
    so the file can be decompressed on its own."
)]
pub struct Args {
    /// Filename of file to process
    #[clap()]
    filename: String,

    /// Perform compression on the input file (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress", conflicts_with_all = &["compress", "test"])]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test", conflicts_with = "compress")]
    test: bool,

    /// Write output to this file instead of the derived name
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout", conflicts_with = "output")]
    stdout: bool,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Strip trailing whitespace from the input before compressing
    #[clap(long = "trim")]
    trim: bool,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=5))]
    v: u8,
}

impl From<Args> for HpOpts {
    fn from(args: Args) -> Self {
        let mut opts = HpOpts::new(PathBuf::from(args.filename));
        if args.decompress {
            opts.op_mode = Mode::Unzip
        };
        if args.test {
            opts.op_mode = Mode::Test
        };
        opts.out_file = args.output.map(PathBuf::from);
        if args.stdout {
            opts.output = Output::Stdout
        };
        opts.force_overwrite = args.force;
        opts.trim = args.trim;
        opts.verbose = args.v;
        opts
    }
}

/// Parse the command line, set the log level and report the settings.
pub fn hpopts_init() -> HpOpts {
    let opts = HpOpts::from(Args::parse());

    // Set the log level
    match opts.verbose {
        0 => log::set_max_level(log::LevelFilter::Off),
        1 => log::set_max_level(log::LevelFilter::Error),
        2 => log::set_max_level(log::LevelFilter::Warn),
        3 => log::set_max_level(log::LevelFilter::Info),
        4 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    };

    // Below we report initialization status to the user
    info!("---- huffpack Initialization Start ----",);
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Getting input from the file {}", opts.file.display());
    match opts.output {
        Output::File if opts.op_mode != Mode::Test => {
            info!("Sending output to {}", output_path(&opts).display())
        }
        Output::File => {}
        Output::Stdout => warn!("Sending output to stdout"),
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.trim {
        info!("Trimming trailing whitespace")
    };
    info!("---- huffpack Initialization End ----\n");
    opts
}

/// Output file for opts: the explicit one if given, otherwise derived from the input.
/// Compressing `dir/name.ext` writes `dir/compressed_name.bin`; decompressing
/// `dir/compressed_name.bin` writes `dir/decompressed_name.txt`.
pub fn output_path(opts: &HpOpts) -> PathBuf {
    if let Some(path) = &opts.out_file {
        return path.clone();
    }
    let dir = opts.file.parent().unwrap_or_else(|| Path::new(""));
    let stem = opts
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match opts.op_mode {
        Mode::Zip => dir.join(format!("compressed_{}.bin", stem)),
        Mode::Unzip | Mode::Test => {
            let stem = stem.strip_prefix("compressed_").unwrap_or(&stem);
            dir.join(format!("decompressed_{}.txt", stem))
        }
    }
}
