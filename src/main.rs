use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use patron_load::logging::{init_logging, LogConfig, LogFormat};
use patron_load::{run, AlmaXmlRenderer, PatronLoadConfig, RunOptions};

/// Convert the SIS patron extract into Alma user XML files
#[derive(Parser)]
#[command(name = "patron-load", version, about)]
struct Cli {
    /// TOML config file (every key optional)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pipe-delimited SIS extract
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// `code,label` department file
    #[arg(long, value_name = "PATH")]
    departments: Option<PathBuf>,

    /// Non-distance ZIP code list
    #[arg(short, long, value_name = "PATH")]
    zip_codes: Option<PathBuf>,

    /// Directory for the numbered output files
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Output files are named `{n}-{basename}`
    #[arg(long, value_name = "NAME")]
    basename: Option<String>,

    /// Patrons per output file
    #[arg(long, value_name = "N")]
    chunk_size: Option<usize>,

    /// Processing date (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Write a JSON run report here
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Normalize and report without writing output files
    #[arg(long)]
    dry_run: bool,

    /// -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatArg,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// File config first, then flags on top
    fn load_config(&self) -> Result<PatronLoadConfig> {
        let mut config = match &self.config {
            Some(path) => PatronLoadConfig::from_file(path)?,
            None => PatronLoadConfig::default(),
        };

        let paths = &mut config.paths;
        if let Some(input) = &self.input {
            paths.patron_file = input.clone();
        }
        if let Some(departments) = &self.departments {
            paths.departments_file = departments.clone();
        }
        if let Some(zip_codes) = &self.zip_codes {
            paths.zip_codes_file = zip_codes.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            paths.output_dir = output_dir.clone();
        }
        if let Some(basename) = &self.basename {
            paths.output_basename = basename.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            config.output.chunk_size = chunk_size;
        }

        Ok(config)
    }

    /// Logs already reach stderr unless they go to a file
    fn echo_errors_to_stderr(&self) -> bool {
        self.log_file.is_some()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format.into())
        .with_log_file(cli.log_file.clone());
    if let Err(e) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_cli(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            if cli.echo_errors_to_stderr() {
                eprintln!("error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Ok(false) when some output chunk failed
fn run_cli(cli: &Cli) -> Result<bool> {
    let config = cli.load_config()?;
    let options = RunOptions {
        today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
        dry_run: cli.dry_run,
    };

    let report = run(&config, options, &AlmaXmlRenderer::new())?;

    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
    }

    Ok(!report.has_failures())
}
