//! huffpack command line interface
//!
//! Usage:
//!   huffpack encode [-s] <source> <archive>     # file or directory -> archive
//!   huffpack decode [-s] <archive> <prefix>     # archive -> <prefix>/<root>
//!   huffpack --version
//!   huffpack --help
//!
//! Log output goes to stderr. `HUFFPACK_LOG` takes an `EnvFilter` directive
//! and overrides `-v`.

#![allow(clippy::cast_precision_loss)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use huffpack::{compress_to_file, decompress_file, ArchiveSummary};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HUFFPACK_LOG";

/// Exit code for command line errors.
const EXIT_USAGE: i32 = 1;
/// Exit code when source and destination are the same path.
const EXIT_SAME_PATH: i32 = 4;

#[derive(Parser)]
#[command(
    name = "huffpack",
    about = "Huffman compression for files and directory trees",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file or directory into an archive
    #[command(visible_alias = "e")]
    Encode {
        /// File or directory to compress
        source: PathBuf,
        /// Archive file to create
        destination: PathBuf,
        /// Print source and destination sizes
        #[arg(short, long)]
        size: bool,
    },

    /// Restore an archive under a destination directory
    #[command(visible_alias = "d")]
    Decode {
        /// Archive file to read
        source: PathBuf,
        /// Directory to extract into (created if missing)
        destination: PathBuf,
        /// Print source and destination sizes
        #[arg(short, long)]
        size: bool,
    },
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Whether two paths name the same file, resolving links when both exist.
fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Print the size report: both sizes and the change between them.
fn print_sizes(source_bytes: u64, destination_bytes: u64) {
    println!("Source:      {source_bytes} bytes");
    println!("Destination: {destination_bytes} bytes");

    let (label, delta) = if destination_bytes <= source_bytes {
        ("Decrease", source_bytes - destination_bytes)
    } else {
        ("Increase", destination_bytes - source_bytes)
    };
    let percent = if source_bytes == 0 {
        0.0
    } else {
        delta as f64 * 100.0 / source_bytes as f64
    };
    println!("{label}:    {delta} bytes ({percent:.2}%)");
}

fn print_entries(summary: &ArchiveSummary) {
    println!(
        "Entries:     {} files, {} directories",
        summary.files, summary.directories
    );
}

/// Compress a file or directory.
fn do_encode(source: &Path, destination: &Path, size: bool) -> huffpack::Result<()> {
    let summary = compress_to_file(source, destination)?;

    println!("Input:       {} ({})", source.display(), summary.root);
    println!("Output:      {}", destination.display());
    print_entries(&summary);
    if size {
        print_sizes(summary.original_bytes, summary.packed_bytes);
    }

    Ok(())
}

/// Decompress an archive.
fn do_decode(source: &Path, destination: &Path, size: bool) -> huffpack::Result<()> {
    let summary = decompress_file(source, destination)?;

    println!("Input:       {}", source.display());
    println!("Output:      {}", destination.join(&summary.root).display());
    print_entries(&summary);
    if size {
        print_sizes(summary.packed_bytes, summary.original_bytes);
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout.
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli.verbose);

    let (source, destination) = match &cli.command {
        Command::Encode {
            source,
            destination,
            ..
        }
        | Command::Decode {
            source,
            destination,
            ..
        } => (source, destination),
    };
    if same_path(source, destination) {
        eprintln!("Error: source and destination are the same path");
        process::exit(EXIT_SAME_PATH);
    }

    let result = match &cli.command {
        Command::Encode {
            source,
            destination,
            size,
        } => do_encode(source, destination, *size),
        Command::Decode {
            source,
            destination,
            size,
        } => do_decode(source, destination, *size),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}
