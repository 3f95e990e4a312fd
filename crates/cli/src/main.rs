// ventas CLI - consolidate branch sales workbooks into one filtered file

mod exit_codes;
mod logging;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use ventas_config::{Overrides, Settings};
use ventas_io::{discover_inputs, read_reference, write_records, XlsxSource};
use ventas_pipeline::homologate::HomologationTable;
use ventas_pipeline::model::LoadReport;
use ventas_pipeline::remap::SkuMapping;
use ventas_pipeline::schema::SOURCE_SHEET;
use ventas_pipeline::{load_sources, Outcome, PipelineError, RunSummary, StopReason};

use exit_codes::{
    stop_exit_code, EXIT_ERROR, EXIT_REFERENCE, EXIT_SUCCESS, EXIT_USAGE, EXIT_WRITE,
};

#[derive(Parser)]
#[command(name = "ventas")]
#[command(about = "Consolidate branch sales workbooks into one filtered spreadsheet")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct SettingsArgs {
    /// Settings file (default: <config dir>/ventas/settings.toml)
    #[arg(long, value_name = "FILE", env = "VENTAS_CONFIG")]
    config: Option<PathBuf>,

    /// Input folder, searched recursively for .xlsx files. Repeatable;
    /// replaces the folders from the settings file.
    #[arg(long = "input", short = 'i', value_name = "DIR")]
    inputs: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, clean, homologate and filter every input workbook, then write
    /// the consolidated file
    #[command(after_help = "\
Examples:
  ventas run
  ventas run --input ~/ventas/agrac --input ~/ventas/agse --mapping mapeo_sku.xlsx
  ventas run --output-dir salida --output-name ventas.csv
  ventas run --json | jq .summary

Exit codes:
  0  output written
  2  bad arguments or settings
  3  reference mapping file unreadable
  4  no data loaded (no output written)
  5  no rows after the family filter (no output written)
  6  output file could not be written")]
    Run {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Reference mapping workbook (SKU remap + homologated attributes)
        #[arg(long, short = 'm', value_name = "FILE")]
        mapping: Option<PathBuf>,

        /// Output directory (created if missing)
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Output file name; .xlsx or .csv
        #[arg(long, value_name = "NAME")]
        output_name: Option<String>,

        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// List the input files a run would load
    #[command(after_help = "\
Examples:
  ventas discover
  ventas discover --input ~/ventas --json")]
    Discover {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Print the file list as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Load the reference mapping workbook and report what it contains
    CheckMapping {
        /// Settings file (default: <config dir>/ventas/settings.toml)
        #[arg(long, value_name = "FILE", env = "VENTAS_CONFIG")]
        config: Option<PathBuf>,

        /// Reference mapping workbook
        #[arg(long, short = 'm', value_name = "FILE")]
        mapping: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\npipeline: ventas-pipeline ", env!("CARGO_PKG_VERSION"),
            "\nbuild:    debug",
            "\ntarget:   ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\npipeline: ventas-pipeline ", env!("CARGO_PKG_VERSION"),
            "\nbuild:    release",
            "\ntarget:   ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            settings,
            mapping,
            output_dir,
            output_name,
            json,
        } => cmd_run(settings, mapping, output_dir, output_name, json),
        Commands::Discover { settings, json } => cmd_discover(settings, json),
        Commands::CheckMapping { config, mapping } => cmd_check_mapping(config, mapping),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    /// Reference workbook failures are fatal for the whole run.
    pub fn reference(err: PipelineError) -> Self {
        let hint = match &err {
            PipelineError::MissingColumn { .. } => {
                "the reference workbook's first sheet must carry the SKU and attribute columns"
            }
            _ => "check the --mapping path or mapping_file in the settings file",
        };
        Self {
            code: EXIT_REFERENCE,
            message: err.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    /// Early stop: clean exit with a distinct code, no output written.
    pub fn stopped(reason: StopReason) -> Self {
        let hint = match reason {
            StopReason::NoDataLoaded => "run `ventas discover` to see which files are found",
            StopReason::NoRowsAfterFamilyFilter => {
                "no row matched the warehouse and family allow-lists; check the reference families"
            }
        };
        Self {
            code: stop_exit_code(reason),
            message: reason.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// settings
// ============================================================================

fn settings_hint() -> String {
    format!("pass the value on the command line or set it in {}", Settings::config_path_display())
}

fn load_settings(config: Option<PathBuf>, overrides: Overrides) -> Result<Settings, CliError> {
    let loaded = match config {
        Some(path) => Settings::load_from(&ventas_config::expand_home(&path)),
        None => Settings::load(),
    };
    let settings = loaded
        .map_err(|e| CliError::usage(e).with_hint("fix the settings file or pass --config FILE"))?
        .with_overrides(overrides);
    tracing::debug!(?settings, "settings resolved");
    Ok(settings)
}

fn input_files(settings: &Settings) -> Result<Vec<PathBuf>, CliError> {
    settings
        .validate_inputs()
        .map_err(|e| CliError::usage(e).with_hint(settings_hint()))?;
    let files = discover_inputs(&settings.input_roots).map_err(CliError::general)?;
    tracing::info!(files = files.len(), roots = settings.input_roots.len(), "input files found");
    Ok(files)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("failed to serialize report: {}", e)))?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).map_err(|e| CliError::general(e.to_string()))
}

// ============================================================================
// run
// ============================================================================

#[derive(Serialize)]
struct RunReport<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    rows_written: usize,
    files: &'a LoadReport,
    summary: &'a RunSummary,
}

fn cmd_run(
    args: SettingsArgs,
    mapping: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let settings = load_settings(
        args.config,
        Overrides {
            input_roots: args.inputs,
            mapping_file: mapping,
            output_dir,
            output_name,
        },
    )?;

    let mapping_path = settings
        .mapping_path()
        .map_err(|e| CliError::usage(e).with_hint(settings_hint()))?
        .to_path_buf();
    let output_path = settings.output_path().map_err(CliError::usage)?;

    let files = input_files(&settings)?;
    let sources: Vec<XlsxSource> = files.iter().map(|p| XlsxSource::new(p, SOURCE_SHEET)).collect();
    let (loaded, load_report) = load_sources(&sources);

    // Nothing loaded: stop before touching the reference workbook.
    let outcome = if loaded.is_empty() {
        ventas_pipeline::run(loaded, &[])
    } else {
        let reference = read_reference(&mapping_path).map_err(CliError::reference)?;
        ventas_pipeline::run(loaded, &reference)
    };

    match outcome {
        Outcome::Completed { records, summary } => {
            let rows = write_records(&output_path, &records).map_err(|e| {
                CliError::write(e).with_hint("check that the output directory is writable")
            })?;
            tracing::info!(file = %output_path.display(), rows, "consolidated file generated");
            if json {
                print_json(&RunReport {
                    status: "completed",
                    stop_reason: None,
                    output: Some(output_path.display().to_string()),
                    rows_written: rows,
                    files: &load_report,
                    summary: &summary,
                })?;
            }
            Ok(())
        }
        Outcome::Stopped { reason, summary } => {
            if json {
                print_json(&RunReport {
                    status: "stopped",
                    stop_reason: Some(reason),
                    output: None,
                    rows_written: 0,
                    files: &load_report,
                    summary: &summary,
                })?;
            }
            Err(CliError::stopped(reason))
        }
    }
}

// ============================================================================
// discover
// ============================================================================

#[derive(Serialize)]
struct DiscoverReport {
    count: usize,
    files: Vec<String>,
}

fn cmd_discover(args: SettingsArgs, json: bool) -> Result<(), CliError> {
    let settings = load_settings(
        args.config,
        Overrides {
            input_roots: args.inputs,
            ..Default::default()
        },
    )?;
    let files = input_files(&settings)?;

    if json {
        return print_json(&DiscoverReport {
            count: files.len(),
            files: files.iter().map(|p| p.display().to_string()).collect(),
        });
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for file in &files {
        writeln!(handle, "{}", file.display()).map_err(|e| CliError::general(e.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// check-mapping
// ============================================================================

fn cmd_check_mapping(config: Option<PathBuf>, mapping: Option<PathBuf>) -> Result<(), CliError> {
    let settings = load_settings(
        config,
        Overrides {
            mapping_file: mapping,
            ..Default::default()
        },
    )?;
    let path: &Path = settings
        .mapping_path()
        .map_err(|e| CliError::usage(e).with_hint(settings_hint()))?;

    let rows = read_reference(path).map_err(CliError::reference)?;
    let remap = SkuMapping::from_reference(&rows);
    let table = HomologationTable::from_reference(&rows);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "reference rows:  {}", rows.len())
        .and_then(|_| writeln!(handle, "AGRAC mappings:  {}", remap.len()))
        .and_then(|_| writeln!(handle, "distinct SKUs:   {}", table.len()))
        .map_err(|e| CliError::general(e.to_string()))
}
