use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use glob::glob;
use streamshark_core::{DecodeOptions, DecodeReport, default_registry};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("STREAMSHARK_BUILD_COMMIT"),
    ", ",
    env!("STREAMSHARK_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "streamshark")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for SLAC RSSI / AXI-Stream packet captures.",
    long_about = None,
    after_help = "Examples:\n  streamshark pcap decode capture.pcapng -o report.json\n  streamshark pcap dissect capture.pcap --stdout --port 8198\n  streamshark schema --protocol axisp --pretty"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs (offline-first).
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Print the registered protocol field schemas as JSON.
    Schema {
        /// Only print the schema of this protocol
        #[arg(long)]
        protocol: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode every matching UDP datagram and write a versioned JSON report.
    #[command(alias = "dissect")]
    #[command(
        after_help = "Examples:\n  streamshark pcap decode capture.pcapng -o report.json\n  streamshark pcap dissect capture.pcap --stdout --protocol axisp"
    )]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path to a .pcap or .pcapng file (a glob matching one file is accepted)
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any datagram failed to decode
    #[arg(long)]
    strict: bool,

    /// List decode error kinds after decoding
    #[arg(long)]
    list_errors: bool,

    /// Only decode datagrams to or from this UDP port (repeatable)
    #[arg(long = "port", value_name = "PORT")]
    ports: Vec<u16>,

    /// Protocol each UDP payload is decoded as
    #[arg(long, default_value = "rssi")]
    protocol: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Decode(args) => cmd_pcap_decode(args),
        },
        Commands::Schema { protocol, pretty } => cmd_schema(protocol.as_deref(), pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_pcap_decode(args: DecodeArgs) -> Result<(), CliError> {
    let registry = default_registry();
    if !registry.contains(&args.protocol) {
        return Err(unknown_protocol(&args.protocol));
    }

    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report_path = match (&args.report, args.stdout) {
        (_, true) => None,
        (Some(path), false) => Some(path.clone()),
        (None, false) => {
            return Err(CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            ));
        }
    };
    if let Some(report_path) = report_path.as_ref() {
        ensure_distinct_output(report_path, &input_abs)?;
    }

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", args.input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }

    let options = DecodeOptions {
        protocol: args.protocol.clone(),
        ports: args.ports.clone(),
    };
    debug!(input = %resolved_input.display(), protocol = %options.protocol, "decoding capture");
    let rep = streamshark_core::analyze_pcap_file(&resolved_input, &options)
        .context("PCAP/PCAPNG decoding failed")?;
    let json = to_json(&rep, args.pretty, args.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !args.quiet {
                eprintln!(
                    "OK: {} datagrams decoded, {} failed -> {}",
                    rep.decode.decoded,
                    failed_count(&rep),
                    report.display()
                );
            }
        }
    }

    if args.list_errors && !args.quiet {
        print_errors(&rep);
    }
    if args.strict && failed_count(&rep) > 0 {
        return Err(CliError::new(
            format!("{} datagrams failed to decode", failed_count(&rep)),
            Some("use --list-errors to inspect".to_string()),
        ));
    }
    Ok(())
}

fn cmd_schema(protocol: Option<&str>, pretty: bool) -> Result<(), CliError> {
    let registry = default_registry();
    let schemas = match protocol {
        None => registry.schemas(),
        Some(name) => {
            let schemas: Vec<_> = registry
                .schemas()
                .into_iter()
                .filter(|schema| schema.name == name)
                .collect();
            if schemas.is_empty() {
                return Err(unknown_protocol(name));
            }
            schemas
        }
    };
    let json = to_json(&schemas, pretty, false)?;
    println!("{}", json);
    Ok(())
}

fn unknown_protocol(name: &str) -> CliError {
    CliError::new(
        format!("unknown protocol '{}'", name),
        Some(format!(
            "registered protocols: {}",
            default_registry().names().join(", ")
        )),
    )
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_dir = match report_path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => fs::canonicalize("."),
        Some(parent) => fs::canonicalize(parent),
        None => return Ok(()),
    };
    // A missing output directory is created later, so it cannot hold the input.
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(
    value: &T,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn failed_count(rep: &DecodeReport) -> u64 {
    rep.decode.malformed + rep.decode.truncated
}

fn print_errors(rep: &DecodeReport) {
    eprintln!("Decode errors:");
    for entry in &rep.errors {
        eprintln!("  {} {} ({})", entry.protocol, entry.kind, entry.count);
    }
    if rep.decode.unresolved_handoffs > 0 {
        eprintln!("  unresolved hand-offs ({})", rep.decode.unresolved_handoffs);
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.len() > 1 {
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches); matches: ",
            pattern,
            matches.len()
        );
        message.push_str(
            &matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        );
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(
            message,
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    matches.pop().ok_or_else(|| {
        CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )
    })
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
