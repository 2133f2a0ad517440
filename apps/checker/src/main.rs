use std::{io, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    run_analysis, AnalysisController, HttpAnalysisService, HttpServiceConfig, Notice, Notifier,
};
use shared::{error::AnalysisError, protocol::AnalysisResult};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod session;

use config::{load_settings, DEFAULT_CONFIG_PATH};
use session::{exit_status, handle_line, handle_outcome, write_result, LineAction};

#[derive(Parser, Debug)]
#[command(about = "Check whether a headline, article or post looks like real or fake news")]
struct Args {
    /// Analysis endpoint; overrides the config file and CHECKER_SERVICE_URL.
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,
    /// Text to analyze. Reads lines from stdin when omitted.
    text: Vec<String>,
}

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        debug!(title = %notice.title, severity = notice.severity.as_str(), "notice raised");
        eprintln!("{}: {}", notice.title, notice.description);
    }
}

type Outcome = (u64, Result<AnalysisResult, AnalysisError>);

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (config_path, explicit) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    let mut settings = load_settings(&config_path, explicit)?;
    if let Some(v) = args.service_url.clone() {
        settings.service_url = v;
    }
    if let Some(v) = args.api_key.clone() {
        settings.api_key = Some(v);
    }
    if let Some(v) = args.timeout_secs {
        settings.timeout_secs = v;
    }

    let endpoint = settings.endpoint()?;
    let service = HttpAnalysisService::new(HttpServiceConfig {
        endpoint,
        api_key: settings.api_key.clone(),
        timeout: settings.timeout(),
    })
    .context("failed to set up analysis service client")?;
    info!(endpoint = %service.endpoint(), "analysis service configured");

    let mut controller = AnalysisController::new(Arc::new(service), Arc::new(TerminalNotifier));

    if args.text.is_empty() {
        run_interactive(&mut controller, args.json).await?;
        Ok(ExitCode::SUCCESS)
    } else {
        let text = args.text.join(" ");
        match controller.submit(text).await {
            Ok(result) => {
                write_result(&mut io::stdout(), &result, args.json)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => Ok(ExitCode::from(exit_status(&err))),
        }
    }
}

/// Line mode: each line replaces the input and is submitted. Lines typed while a
/// request is in flight are kept as the current input but not submitted.
async fn run_interactive(controller: &mut AnalysisController, json: bool) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<Outcome>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    eprintln!("Paste a headline, article or post and press Enter. Ctrl-D to quit.");

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("failed to read stdin")? else {
                    stdin_open = false;
                    continue;
                };
                let action = handle_line(controller, line, &mut io::stdout(), &mut io::stderr())?;
                let LineAction::Submitted(pending) = action else {
                    continue;
                };

                let service = controller.service();
                let tx = outcome_tx.clone();
                tokio::spawn(async move {
                    let outcome = run_analysis(service, &pending).await;
                    if tx.send((pending.generation, outcome)).is_err() {
                        warn!(generation = pending.generation, "analysis outcome dropped after shutdown");
                    }
                });
            }
            Some((generation, outcome)) = outcome_rx.recv() => {
                handle_outcome(controller, generation, outcome, json, &mut io::stdout())?;
            }
            else => break,
        }

        if !stdin_open && !controller.is_analyzing() {
            break;
        }
    }

    Ok(())
}
