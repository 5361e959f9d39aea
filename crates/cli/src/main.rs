mod cli;
mod presenter;

use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use qrshield_core::config::{load_dotenv, Config};
use qrshield_engine::{Evaluator, Presenter, ScanSession};

use crate::cli::CliArgs;
use crate::presenter::TermPresenter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    if args.stdin && !args.payloads.is_empty() {
        bail!("pass PAYLOAD arguments or --stdin, not both");
    }
    if !args.stdin && args.payloads.is_empty() {
        bail!("no payloads given (pass PAYLOAD arguments or --stdin)");
    }

    let mut config = Config::from_env();
    if let Some(timeout) = args.timeout_secs {
        config.resolver.timeout_secs = timeout;
    }
    if let Some(max_hops) = args.max_hops {
        config.resolver.max_hops = max_hops;
    }
    if let Some(cooldown) = args.cooldown_ms {
        config.scanner.cooldown_ms = cooldown;
    }
    if args.no_debounce {
        // Zero cooldown admits every line.
        config.scanner.cooldown_ms = 0;
    }
    config.log_summary();

    let presenter: Box<dyn Presenter> = Box::new(TermPresenter::new(args.json));

    let any_suspicious = if args.stdin {
        run_stream(&config, presenter).await?
    } else {
        run_once(&config, presenter, &args.payloads).await?
    };

    if any_suspicious {
        std::process::exit(1);
    }
    Ok(())
}

/// Evaluate fixed payloads; no debounce involved.
async fn run_once(
    config: &Config,
    presenter: Box<dyn Presenter>,
    payloads: &[String],
) -> Result<bool> {
    let evaluator = Evaluator::new(config).context("failed to build evaluator")?;

    let mut any_suspicious = false;
    for payload in payloads {
        let verdict = evaluator.evaluate(payload).await;
        if let Err(e) = presenter.present(&verdict).await {
            tracing::warn!(error = %e, "presenter failed");
        }
        any_suspicious |= verdict.suspicious;
    }
    Ok(any_suspicious)
}

/// Stream payloads from stdin through a debounced scan session, the way
/// a frame decoder would feed the engine.
async fn run_stream(config: &Config, presenter: Box<dyn Presenter>) -> Result<bool> {
    let mut session =
        ScanSession::new(config, vec![presenter]).context("failed to build scan session")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut any_suspicious = false;

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }
        if let Some(verdict) = session.process(payload, Instant::now()).await {
            any_suspicious |= verdict.suspicious;
        }
    }
    Ok(any_suspicious)
}
