//! `histdb` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments into an extraction config and run it once.
//! - Map any fatal error to a non-zero exit code with a readable message.

use clap::Parser;
use histdb_core::{
    core_version, default_log_level, init_logging, run_extraction, BinMode, ExtractConfig,
    JsonSourceReader,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "histdb")]
#[command(about = "Convert histogram trees into a normalized SQLite database")]
#[command(version)]
struct Cli {
    /// Input source files (`<name>.<extension>`)
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output SQLite database (replaced if it exists)
    #[arg(short, long)]
    output: PathBuf,

    /// Names of the leading label columns, in order (repeatable or comma-separated)
    #[arg(short = 'p', long = "labels", value_delimiter = ',')]
    labels: Vec<String>,

    /// Store (content, error) pairs per bin instead of content only
    #[arg(long)]
    errors: bool,

    /// Depth-0 histogram name to skip
    #[arg(long, conflicts_with = "no_skip")]
    skip_hist: Option<String>,

    /// Keep every depth-0 histogram
    #[arg(long)]
    no_skip: bool,

    /// JSON config file; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log verbosity (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr otherwise
    #[arg(long)]
    log_dir: Option<String>,
}

impl Cli {
    fn extract_config(&self) -> Result<ExtractConfig, String> {
        let mut config = match &self.config {
            Some(path) => ExtractConfig::load(path).map_err(|err| err.to_string())?,
            None => ExtractConfig::default(),
        };

        if !self.labels.is_empty() {
            config.label_names = self.labels.clone();
        }
        if self.errors {
            config.bin_mode = BinMode::ContentWithErrors;
        }
        if let Some(name) = &self.skip_hist {
            config.skip_root_hist = Some(name.clone());
        }
        if self.no_skip {
            config.skip_root_hist = None;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(message) = init_logging(level, cli.log_dir.as_deref()) {
        eprintln!("histdb: {message}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=cli_start module=cli status=ok core_version={} inputs={}",
        core_version(),
        cli.inputs.len()
    );

    let config = match cli.extract_config() {
        Ok(config) => config,
        Err(message) => {
            error!("event=cli_config module=cli status=error error={message}");
            eprintln!("histdb: {message}");
            return ExitCode::FAILURE;
        }
    };

    match run_extraction(config, &cli.inputs, &cli.output, &JsonSourceReader) {
        Ok(summary) => {
            println!(
                "wrote {} ({} histograms, {} axes, {} label columns)",
                cli.output.display(),
                summary.hist_rows,
                summary.axis_rows,
                summary.label_columns
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("histdb: {err}");
            ExitCode::FAILURE
        }
    }
}
