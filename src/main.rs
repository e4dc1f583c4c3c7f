use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use huffzip::{header, symbol, HuffmanCodec};

/// Huffman compressor for arbitrary files.
#[derive(Parser, Debug)]
#[command(author, version, about = "Static Huffman file compressor", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT into OUTPUT.
    Compress { input: PathBuf, output: PathBuf },
    /// Decompress INPUT into OUTPUT.
    Decompress { input: PathBuf, output: PathBuf },
    /// Print the frequency table, codes and tree stored in a compressed file.
    Inspect { input: PathBuf },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compress { input, output } => {
            let src = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
            let dst = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            let stats = HuffmanCodec::encode_from_file(src, dst)
                .with_context(|| format!("compressing {}", input.display()))?;
            info!(
                input_bytes = stats.input_bytes,
                output_bytes = stats.output_bytes(),
                ratio = stats.ratio().unwrap_or(0.0),
                "compressed {}",
                input.display()
            );
        }
        Command::Decompress { input, output } => {
            let src = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
            let dst = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            let stats = HuffmanCodec::decode_from_file(src, dst)
                .with_context(|| format!("decompressing {}", input.display()))?;
            info!(output_bytes = stats.output_bytes, "decompressed {}", input.display());
        }
        Command::Inspect { input } => {
            let src = File::open(&input).with_context(|| format!("opening {}", input.display()))?;
            let frequencies = header::read_frequency_table(&mut BufReader::new(src))
                .with_context(|| format!("reading header of {}", input.display()))?;
            let codec = HuffmanCodec::new(frequencies)?;

            let frequencies = codec.frequencies();
            println!("{} symbols, {} input bytes", frequencies.len(), frequencies.input_len());
            println!("{:>8}  {:>12}  code", "symbol", "count");
            for (sym, code) in codec.code_table().iter() {
                let count = frequencies.get(sym).unwrap_or(0);
                println!("{:>8}  {:>12}  {}", symbol::label(sym), count, code);
            }
            if let Some(bits) = codec.code_table().encoded_bits(frequencies) {
                println!("payload: {} bits", bits);
            }
            println!();
            print!("{}", codec.tree().render());
        }
    }

    Ok(())
}
