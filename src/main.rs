//! adiumcat CLI - list buddies or print a buddy's Adium transcripts

use adiumcat::{Config, Core, CoreError};
use clap::error::ErrorKind;
use clap::Parser;
use std::fmt::Display;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "adiumcat")]
#[command(author = "Antonio Malara")]
#[command(version)]
#[command(about = "Print Adium chat transcripts as plain text", long_about = None)]
struct Args {
    /// Buddy whose transcripts to print; lists every buddy when omitted
    buddy: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value_os_t = Config::default_path())]
    config: PathBuf,

    /// Override the Adium user directory
    #[arg(long)]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initialize a new config file with defaults
    #[arg(long)]
    init: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    // Initialize logging; stdout is reserved for transcript lines
    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("adiumcat={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config_path = adiumcat::config::expand_path(&args.config);

    // Handle --init flag
    if args.init {
        if config_path.exists() {
            tracing::warn!("Config file already exists: {}", config_path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Config::create_default(&config_path)?;
        tracing::info!("Created default config at: {}", config_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    // Load configuration
    let mut config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        tracing::debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        Config::default()
    };

    // Apply overrides: environment first, then CLI
    config.apply_env_overrides();
    if let Some(root) = args.root {
        config.logs.root = root;
    }

    let core = Core::new(config);
    tracing::debug!("Using log store at {}", core.store().root().display());

    let Some(buddy) = args.buddy else {
        print_lines(core.buddies())?;
        return Ok(ExitCode::SUCCESS);
    };

    match core.conversations(&buddy) {
        Ok(result) => {
            print_lines(&result.events)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(CoreError::NotFound(..)) => {
            println!("logs for \"{}\" not found!", buddy);
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e.into()),
    }
}

/// Write one line per item to stdout. A closed pipe ends output quietly.
fn print_lines<I>(lines: I) -> io::Result<()>
where
    I: IntoIterator,
    I::Item: Display,
{
    match write_lines(lines) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn write_lines<I>(lines: I) -> io::Result<()>
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = BufWriter::new(io::stdout().lock());
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
