use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use color_eyre::Result;

use dd_converter::import::ImportConfig;
use dd_converter::zdd::Zdd;
use dd_converter::Error;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for simplelog::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => simplelog::LevelFilter::Off,
            LogLevel::Error => simplelog::LevelFilter::Error,
            LogLevel::Warn => simplelog::LevelFilter::Warn,
            LogLevel::Info => simplelog::LevelFilter::Info,
            LogLevel::Debug => simplelog::LevelFilter::Debug,
            LogLevel::Trace => simplelog::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Read a ZDD in text format, rebuild it and write it back canonically")]
struct Cli {
    /// Input file (default: stdin).
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Reject duplicate ids, dangling references, a referenced root and a missing terminator.
    #[arg(long)]
    strict: bool,

    /// Apply zero-suppression before writing.
    #[arg(long)]
    reduce: bool,

    /// Logging verbosity (logs go to stderr).
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        cli.log_level.into(),
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let zdd = Zdd::default();
    let config = ImportConfig { strict: cli.strict };

    let res = match &cli.input {
        Some(path) => File::open(path)
            .map_err(Error::from)
            .and_then(|file| zdd.read_text_with(BufReader::new(file), &config)),
        None => zdd.read_text_with(io::stdin().lock(), &config),
    };
    let f = match res {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    log::info!("Built diagram {} with {} nodes", f, zdd.size(f));

    let f = if cli.reduce { zdd.reduce(f) } else { f };

    match &cli.output {
        Some(path) => zdd.save_text(f, path)?,
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            zdd.write_text(f, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}
