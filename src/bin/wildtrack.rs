//! Wildtrack CLI - Command-line interface for the collar telemetry engine
//!
//! Commands:
//! - replay: Run a recorded event log through one session (batch mode)
//! - run: Process streaming events from stdin (streaming mode)
//! - validate: Validate an event log
//! - thresholds: Print the effective configuration
//! - doctor: Diagnose engine health and configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wildtrack::encoder::SnapshotEncoder;
use wildtrack::sound::SoundPlayer;
use wildtrack::types::{SessionSnapshot, Severity};
use wildtrack::{EngineConfig, EventAdapter, TelemetrySession, TrackError, TrackEvent};
use wildtrack::{PRODUCER_NAME, TRACK_VERSION};

/// Wildtrack - telemetry classification and geofence tracking for animal collars
#[derive(Parser)]
#[command(name = "wildtrack")]
#[command(version = TRACK_VERSION)]
#[command(about = "Classify collar telemetry and track geofence status", long_about = None)]
struct Cli {
    /// Log verbosity written to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an event log through one session (batch mode)
    Replay {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Process streaming events from stdin (streaming mode)
    Run {
        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Flush output after each snapshot
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Validate an event log
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective thresholds and boundary geometry
    Thresholds {
        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose engine health and configuration
    Doctor {
        /// Check a configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one event per line)
    Ndjson,
    /// JSON array of events
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one snapshot per line)
    Ndjson,
    /// JSON array of snapshots
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), WildtrackCliError> {
    match command {
        Commands::Replay {
            input,
            output,
            input_format,
            output_format,
            config,
        } => cmd_replay(
            &input,
            &output,
            input_format,
            output_format,
            config.as_deref(),
        ),

        Commands::Run { config, flush } => cmd_run(config.as_deref(), flush),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Thresholds { config, json } => cmd_thresholds(config.as_deref(), json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_replay(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&Path>,
) -> Result<(), WildtrackCliError> {
    let input_data = read_input(input)?;
    let events = parse_events(&input_data, &input_format)?;

    if events.is_empty() {
        return Err(WildtrackCliError::NoEvents);
    }

    let failures = EventAdapter::validate_events(&events);
    if !failures.is_empty() {
        for failure in &failures {
            warn!(index = failure.index, kind = failure.kind, error = %failure.error, "invalid event");
        }
        return Err(WildtrackCliError::ValidationFailed(failures.len()));
    }

    let mut session = TelemetrySession::with_config(load_config(config)?)?;
    let encoder = SnapshotEncoder::new();
    let mut speaker = TerminalBell::detect();

    let mut snapshots: Vec<SessionSnapshot> = Vec::with_capacity(events.len());
    for event in events {
        debug!(kind = event.kind(), "replaying event");
        session.apply(event);
        session.play_pending_sound(&mut speaker);
        snapshots.push(encoder.encode(&session));
    }

    info!(
        events = snapshots.len(),
        samples = session.samples_received(),
        "replay complete"
    );

    let output_data = format_output(&snapshots, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(config: Option<&Path>, flush: bool) -> Result<(), WildtrackCliError> {
    let mut session = TelemetrySession::with_config(load_config(config)?)?;
    let encoder = SnapshotEncoder::new();
    let mut speaker = TerminalBell::detect();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut skipped = 0usize;

    for (line_num, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        // A bad line never ends the stream
        let event = match EventAdapter::parse_line(trimmed).and_then(|event| {
            event.validate()?;
            Ok(event)
        }) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_num + 1, error = %e, "skipping malformed event");
                skipped += 1;
                continue;
            }
        };

        session.apply(event);
        session.play_pending_sound(&mut speaker);

        writeln!(stdout, "{}", encoder.encode_to_json(&session)?)?;
        if flush {
            stdout.flush()?;
        }
    }

    stdout.flush()?;
    info!(
        samples = session.samples_received(),
        skipped,
        "input stream closed"
    );

    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), WildtrackCliError> {
    let input_data = read_input(input)?;
    let events = parse_events(&input_data, &input_format)?;

    let results = EventAdapter::validate_events(&events);

    let report = ValidationReport {
        total_events: events.len(),
        valid_events: events.len() - results.len(),
        invalid_events: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                kind: r.kind.to_string(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total events:   {}", report.total_events);
        println!("Valid events:   {}", report.valid_events);
        println!("Invalid events: {}", report.invalid_events);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {} event (index {}): {}", err.kind, err.index, err.error);
            }
        }
    }

    if report.invalid_events > 0 {
        Err(WildtrackCliError::ValidationFailed(report.invalid_events))
    } else {
        Ok(())
    }
}

fn cmd_thresholds(config: Option<&Path>, json: bool) -> Result<(), WildtrackCliError> {
    let config = load_config(config)?;

    if json {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    println!("Health Thresholds");
    println!("=================");
    println!("{:<16} {:>18} {:>18}", "Vital", "Healthy", "At Risk");
    for kind in wildtrack::types::VitalKind::ALL {
        let threshold = config.thresholds.get(kind);
        println!(
            "{:<16} {:>8} - {:<7} {:>8} - {:<7}",
            kind.display_name(),
            threshold.healthy.min,
            threshold.healthy.max,
            threshold.at_risk.min,
            threshold.at_risk.max
        );
    }

    println!("\nBoundary");
    println!("========");
    println!("Radius:           {} km", config.boundary.boundary_radius_km);
    println!("Warning distance: {} km", config.boundary.warning_distance_km);
    println!("Motion threshold: {} m/s²", config.motion_threshold_mps2);
    println!("History capacity: {} points", config.history_capacity);

    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), WildtrackCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "wildtrack_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Wildtrack version {}", TRACK_VERSION),
    });

    checks.push(config_check(config));

    // Check stdin is available (for streaming mode)
    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (interactive mode)"
    } else {
        "stdin is a pipe (streaming mode ready)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: TRACK_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Wildtrack Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(WildtrackCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

/// Check a config path the same way `load_config` will read it
fn config_check(config: Option<&Path>) -> DoctorCheck {
    let (status, message) = match config {
        Some(path) if !path.exists() => (
            CheckStatus::Error,
            format!("Config file {} does not exist", path.display()),
        ),
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => match EngineConfig::from_json(&content) {
                Ok(parsed) => (
                    CheckStatus::Ok,
                    format!(
                        "Config valid (radius {} km, warning at {} km)",
                        parsed.boundary.boundary_radius_km, parsed.boundary.warning_distance_km
                    ),
                ),
                Err(e) => (CheckStatus::Error, e.to_string()),
            },
            Err(e) => (
                CheckStatus::Error,
                format!("Cannot read config file: {}", e),
            ),
        },
        None => (CheckStatus::Ok, "Using built-in defaults".to_string()),
    };

    DoctorCheck {
        name: "config".to_string(),
        status,
        message,
    }
}


fn read_input(input: &Path) -> Result<String, WildtrackCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_events(data: &str, format: &InputFormat) -> Result<Vec<TrackEvent>, WildtrackCliError> {
    let events = match format {
        InputFormat::Ndjson => EventAdapter::parse_ndjson(data)?,
        InputFormat::Json => EventAdapter::parse_array(data)?,
    };
    Ok(events)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, WildtrackCliError> {
    match path {
        Some(path) => {
            let config = EngineConfig::from_json(&fs::read_to_string(path)?)?;
            info!(path = %path.display(), "loaded engine config");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn format_output(
    snapshots: &[SessionSnapshot],
    format: &OutputFormat,
) -> Result<String, WildtrackCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for snapshot in snapshots {
                lines.push(serde_json::to_string(snapshot)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(snapshots)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(snapshots)?),
    }
}

/// Rings the terminal bell on stderr for sound requests.
///
/// Stays silent when stderr is not a terminal.
struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    fn detect() -> Self {
        Self {
            enabled: atty::is(atty::Stream::Stderr),
        }
    }
}

impl SoundPlayer for TerminalBell {
    fn play(&mut self, severity: Severity) -> Result<(), TrackError> {
        if !self.enabled {
            return Ok(());
        }
        // Critical rings twice
        let bell = match severity {
            Severity::Warning => "\x07",
            Severity::Critical => "\x07\x07",
        };
        let mut stderr = io::stderr();
        stderr
            .write_all(bell.as_bytes())
            .and_then(|_| stderr.flush())
            .map_err(|e| TrackError::Sound(e.to_string()))
    }
}

// Error types

#[derive(Debug)]
enum WildtrackCliError {
    Io(io::Error),
    Track(TrackError),
    Json(serde_json::Error),
    NoEvents,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for WildtrackCliError {
    fn from(e: io::Error) -> Self {
        WildtrackCliError::Io(e)
    }
}

impl From<TrackError> for WildtrackCliError {
    fn from(e: TrackError) -> Self {
        WildtrackCliError::Track(e)
    }
}

impl From<serde_json::Error> for WildtrackCliError {
    fn from(e: serde_json::Error) -> Self {
        WildtrackCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WildtrackCliError> for CliError {
    fn from(e: WildtrackCliError) -> Self {
        match e {
            WildtrackCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WildtrackCliError::Track(e @ TrackError::InvalidConfig(_)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'wildtrack doctor --config <file>' for details".to_string()),
            },
            WildtrackCliError::Track(e @ TrackError::InvalidEvent(_)) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'wildtrack validate' for details".to_string()),
            },
            WildtrackCliError::Track(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure each event has a \"type\" field".to_string()),
            },
            WildtrackCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            WildtrackCliError::NoEvents => CliError {
                code: "NO_EVENTS".to_string(),
                message: "No events found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            WildtrackCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} events failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            WildtrackCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_events: usize,
    valid_events: usize,
    invalid_events: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    kind: String,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Debug, PartialEq, serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
