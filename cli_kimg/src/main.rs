use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use lib_kimg::{init_logging, BaseAddress, Format, Options};
use log::{info, LevelFilter};
use strum::IntoEnumIterator;

fn formats_help() -> String {
    let mut help = String::from("Supported formats:\n");
    for format in Format::iter() {
        help.push_str(&format!("  {:<6}{}\n", format.name(), format.description()));
    }
    help.push_str(
        "\nIf no output file is given, the input file name with the format's extension is used.\n\
         If no palette file is given, 1-bit black & white is assumed.\n\
         Base address defaults to 2000; it must be a multiple of 2000 between 2000 and A000.",
    );
    help
}

/// Converts GIMP indexed C headers into images for one to four K-1008 cards.
#[derive(Parser, Debug)]
#[command(name = "kimg", version, after_help = formats_help())]
struct Args {
    /// Image in GIMP C source header format
    #[arg(short, long)]
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// GIMP palette file
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value_t = Format::Pap)]
    format: Format,

    /// Hex load address of the first card
    #[arg(short = 'a', long = "address", default_value = "2000")]
    base_address: BaseAddress,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn into_options(self) -> Options {
        Options {
            input: self.input,
            output: self.output,
            palette: self.palette,
            format: self.format,
            base_address: self.base_address,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level());

    let options = args.into_options();
    info!("Converting {} to {}", options.input.display(), options.format);

    let summary = lib_kimg::run(&options)
        .with_context(|| format!("Failed to convert {}", options.input.display()))?;

    println!(
        "{}x{} pixels, {} card(s), {} records written to {}",
        summary.width,
        summary.height,
        summary.color_bits,
        summary.records,
        summary.output.display()
    );

    Ok(())
}
