use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use fph::avec::FphFile;
use log::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "fph2csv",
    version = env!("CARGO_PKG_VERSION"),
    about = "Decode ICON CPAP .FPH files to semicolon-separated text",
    long_about = None,
)]
struct Cli {
    /// Files to decode. Names starting with `SUM` are decoded as summaries
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Write a metadata row with the header fields before the records
    #[arg(long)]
    header: bool,
    /// Output file (default: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Log decoding details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .parse_default_env()
        .init();

    if let Err(e) = run(&cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    for path in &cli.files {
        let file = FphFile::open(path).with_context(|| format!("decoding {}", path.display()))?;

        if file.records().is_empty() {
            warn!("{}: no records decoded.", path.display());
        } else {
            info!("{}: {} records.", path.display(), file.records().len());
        }

        file.write_csv(&mut out, cli.header)
            .with_context(|| format!("writing records of {}", path.display()))?;
    }

    out.flush()?;

    Ok(())
}
