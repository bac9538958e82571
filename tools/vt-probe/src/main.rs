//! # vt-probe
//!
//! Command line front end for the Vantage probe selection engine.
//!
//! ## Usage
//!
//! ```bash
//! # Probe every configured candidate
//! vt-probe --config vantage.toml batch
//!
//! # Connect to the first candidate under 1500ms
//! vt-probe auto-connect --threshold-ms 1500
//!
//! # Probe one candidate, JSON output
//! vt-probe --json probe tokyo-1
//!
//! # Single attempt reachability check
//! vt-probe check --timeout-secs 2
//! ```
//!
//! Ctrl-C cancels a running batch or auto-connect after the current step and
//! aborts `probe` and `check` immediately. Both exit with status 130.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vt_01_probe_selection::adapters::{
    HttpProbeGateway, TcpConnectionGateway, TcpProbeGateway, TomlConfigProvider,
};
use vt_01_probe_selection::service::find_candidate;
use vt_01_probe_selection::{
    AttemptVerdict, AutoConnectOutcome, AutoConnectReport, BatchSummary, Candidate, CandidateId,
    ConfigProvider, ProbeGateway, ProbeParams, ProbeResult, ProbeSelectionApi,
    ProbeSelectionService,
};

type Service = ProbeSelectionService<dyn ProbeGateway, TcpConnectionGateway>;

/// Nothing acceptable or reachable.
const EXIT_NOTHING_USABLE: u8 = 2;
/// Cancelled or interrupted by Ctrl-C.
const EXIT_CANCELLED: u8 = 130;

/// Vantage probe CLI
#[derive(Parser, Debug)]
#[command(name = "vt-probe")]
#[command(about = "Probe candidate endpoints and auto-connect to the best one")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "vantage.toml")]
    config: PathBuf,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Probe with an HTTP GET of this path instead of a TCP handshake
    #[arg(long, value_name = "PATH")]
    http_path: Option<String>,

    /// Use HTTPS for --http-path
    #[arg(long, requires = "http_path")]
    https: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe every configured candidate in order
    Batch,
    /// Probe ranked candidates and connect to the first acceptable one
    ///
    /// Without --hold the session is closed again as soon as it is
    /// established, so the run only proves a connection is possible.
    AutoConnect {
        /// Override the acceptance threshold (ms)
        #[arg(long)]
        threshold_ms: Option<u64>,

        /// Keep the session open until Ctrl-C instead of closing it right away
        #[arg(long)]
        hold: bool,
    },
    /// Probe a single candidate
    Probe {
        /// Candidate id
        id: String,
    },
    /// Single attempt reachability check of every candidate
    Check {
        /// Per-candidate timeout (seconds)
        #[arg(long, default_value_t = 5)]
        timeout_secs: u64,
    },
}

fn init_logging(verbose: u8, json_logs: bool) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json_logs {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
    }
    Ok(())
}

/// Cancel any running workflow on Ctrl-C.
fn spawn_cancel_on_ctrl_c(service: Arc<Service>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("[vt-probe] interrupt received, cancelling after current step");
            service.cancel_batch();
            service.cancel_auto_connect();
        }
    });
}

/// Run `work` unless `interrupt` resolves first, which exits with 130.
///
/// Dropping `work` mid-probe releases the candidate's in-flight mark.
async fn until_interrupted<W, I>(work: W, interrupt: I) -> Result<ExitCode>
where
    W: Future<Output = Result<ExitCode>>,
    I: Future<Output = io::Result<()>>,
{
    tokio::select! {
        outcome = work => outcome,
        signal = interrupt => {
            signal.context("failed to listen for Ctrl-C")?;
            warn!("[vt-probe] interrupt received, aborting");
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
    }
}

fn build_prober(http_path: Option<&str>, https: bool) -> Result<Arc<dyn ProbeGateway>> {
    let Some(path) = http_path else {
        return Ok(Arc::new(TcpProbeGateway::new()));
    };
    let gateway = if https {
        HttpProbeGateway::https(path)
    } else {
        HttpProbeGateway::http(path)
    }
    .context("failed to build HTTP client")?;
    Ok(Arc::new(gateway))
}

#[derive(Serialize)]
struct CandidateResult<'a> {
    id: &'a CandidateId,
    name: &'a str,
    address: String,
    result: Option<ProbeResult>,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    summary: BatchSummary,
    results: Vec<CandidateResult<'a>>,
}

fn collect_results<'a>(service: &Service, candidates: &'a [Candidate]) -> Vec<CandidateResult<'a>> {
    candidates
        .iter()
        .map(|candidate| CandidateResult {
            id: &candidate.id,
            name: &candidate.name,
            address: candidate.address(),
            result: service.get_result(&candidate.id),
        })
        .collect()
}

fn describe(result: Option<&ProbeResult>) -> String {
    match result {
        Some(ProbeResult {
            success: true,
            latency_ms: Some(latency),
            ..
        }) => format!("{latency} ms"),
        Some(ProbeResult {
            success: true,
            latency_ms: None,
            ..
        }) => "timeout".to_string(),
        Some(ProbeResult { error, .. }) => {
            format!("failed ({})", error.as_deref().unwrap_or("unknown error"))
        }
        None => "not probed".to_string(),
    }
}

fn print_table(rows: &[CandidateResult<'_>]) {
    println!("{:<20} {:<28} {:<24} RESULT", "ID", "NAME", "ADDRESS");
    for row in rows {
        println!(
            "{:<20} {:<28} {:<24} {}",
            row.id.as_str(),
            row.name,
            row.address,
            describe(row.result.as_ref())
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}

async fn run_batch(service: &Service, candidates: &[Candidate], json: bool) -> Result<ExitCode> {
    let summary = service.probe_all(candidates).await?;
    let results = collect_results(service, candidates);

    if json {
        print_json(&BatchOutput { summary, results })?;
    } else {
        print_table(&results);
        println!();
        println!(
            "{} attempted, {} succeeded, {} failed, {} skipped{}",
            summary.attempted,
            summary.succeeded,
            summary.failed(),
            summary.skipped,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
    }
    Ok(ExitCode::from(batch_status(&summary)))
}

fn batch_status(summary: &BatchSummary) -> u8 {
    if summary.cancelled {
        EXIT_CANCELLED
    } else if summary.succeeded == 0 {
        EXIT_NOTHING_USABLE
    } else {
        0
    }
}

fn print_report(report: &AutoConnectReport) {
    for attempt in &report.attempts {
        let line = match &attempt.verdict {
            AttemptVerdict::Connected { latency_ms } => format!("connected ({latency_ms} ms)"),
            AttemptVerdict::ConnectFailed { latency_ms, reason } => {
                format!("connect failed after {latency_ms} ms probe: {reason}")
            }
            AttemptVerdict::Rejected { reason, latency_ms } => match latency_ms {
                Some(latency) => format!("rejected: {reason} ({latency} ms)"),
                None => format!("rejected: {reason}"),
            },
            AttemptVerdict::SkippedInFlight => "skipped, already being probed".to_string(),
        };
        println!("{:<20} {}", attempt.candidate_id.as_str(), line);
    }
    println!();

    match &report.outcome {
        AutoConnectOutcome::Connected {
            candidate,
            latency_ms,
            attempted,
        } => println!(
            "Connected to {} ({}) at {} ms after {} probe(s)",
            candidate.name,
            candidate.address(),
            latency_ms,
            attempted
        ),
        AutoConnectOutcome::Exhausted { attempted } => {
            println!("No acceptable candidate after {attempted} probe(s)")
        }
        AutoConnectOutcome::Cancelled { attempted } => {
            println!("Cancelled after {attempted} probe(s)")
        }
    }
}

async fn run_auto_connect(
    service: &Service,
    candidates: &[Candidate],
    hold: bool,
    json: bool,
) -> Result<ExitCode> {
    let report = service.auto_connect(candidates).await?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    if report.outcome.connected().is_none() {
        return Ok(match report.outcome {
            AutoConnectOutcome::Cancelled { .. } => ExitCode::from(EXIT_CANCELLED),
            _ => ExitCode::from(EXIT_NOTHING_USABLE),
        });
    }

    if hold {
        info!("[vt-probe] holding session, press Ctrl-C to disconnect");
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")?;
    }
    service.disconnect().await?;
    Ok(ExitCode::SUCCESS)
}

async fn run_probe(
    service: &Service,
    candidates: &[Candidate],
    id: &str,
    json: bool,
) -> Result<ExitCode> {
    let candidate = find_candidate(candidates, &CandidateId::new(id))?;
    let result = service.probe_one(candidate).await?;

    if json {
        print_json(&CandidateResult {
            id: &candidate.id,
            name: &candidate.name,
            address: candidate.address(),
            result: Some(result.clone()),
        })?;
    } else {
        println!("{} ({}): {}", candidate.name, candidate.address(), describe(Some(&result)));
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NOTHING_USABLE)
    })
}

async fn run_check(
    service: &Service,
    candidates: &[Candidate],
    timeout_secs: u64,
    json: bool,
) -> Result<ExitCode> {
    let params = ProbeParams::connectivity(timeout_secs);
    let mut reachable = 0usize;

    for candidate in candidates {
        let result = service.probe_candidate(candidate, params).await?;
        if result.success {
            reachable += 1;
        }
    }

    let results = collect_results(service, candidates);
    if json {
        print_json(&results)?;
    } else {
        print_table(&results);
        println!();
        println!("{reachable}/{} reachable", candidates.len());
    }

    Ok(if reachable > 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NOTHING_USABLE)
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs)?;

    let provider = TomlConfigProvider::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let candidates = provider.candidates();
    let mut config = provider.selection_config();

    if let Command::AutoConnect {
        threshold_ms: Some(threshold_ms),
        ..
    } = cli.command
    {
        config.acceptance_threshold_ms = threshold_ms;
    }

    info!(
        candidates = candidates.len(),
        config = %cli.config.display(),
        "[vt-probe] loaded configuration"
    );

    let prober = build_prober(cli.http_path.as_deref(), cli.https)?;
    let connector = TcpConnectionGateway::new(config.connect_timeout_secs);
    let service: Arc<Service> =
        Arc::new(ProbeSelectionService::new(config, prober, Arc::new(connector)));

    match cli.command {
        Command::Batch => {
            spawn_cancel_on_ctrl_c(Arc::clone(&service));
            run_batch(&service, &candidates, cli.json).await
        }
        Command::AutoConnect { hold, .. } => {
            spawn_cancel_on_ctrl_c(Arc::clone(&service));
            run_auto_connect(&service, &candidates, hold, cli.json).await
        }
        Command::Probe { id } => {
            until_interrupted(
                run_probe(&service, &candidates, &id, cli.json),
                tokio::signal::ctrl_c(),
            )
            .await
        }
        Command::Check { timeout_secs } => {
            until_interrupted(
                run_check(&service, &candidates, timeout_secs, cli.json),
                tokio::signal::ctrl_c(),
            )
            .await
        }
    }
}
