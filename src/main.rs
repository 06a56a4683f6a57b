mod analytics;
mod api;
mod config;
mod fault;
mod ingest;
mod models;
mod processor;
mod service;
mod types;
mod upstream;

use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::ServiceConfig;
use crate::ingest::TransactionFeed;
use crate::service::TransactionService;
use crate::upstream::HttpUpstreamClient;

const SERVE_COMMAND: &str = "serve";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: transaction-service [input].csv|.jsonl [log_level:optional] [account_id:optional] > [output].jsonl");
        eprintln!("       transaction-service serve [log_level:optional]");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        eprintln!("Upstream is configured through API_HOST, API_PORT, UPSTREAM_TIMEOUT_SECS and PROCESSING_DELAY_MS");
        eprintln!("The listener address for serve is configured through SERVICE_ADDR (default: 0.0.0.0:5000)");
        exit(1);
    }

    setup_logging(args.get(2).map(String::as_str));

    let config = ServiceConfig::from_env();
    let upstream = Arc::new(HttpUpstreamClient::new(&config.base_url(), config.upstream_timeout)?);
    info!("Forwarding status updates to {}", upstream.base_url());

    let service = TransactionService::new(upstream, config.processing_delay);

    if args[1] == SERVE_COMMAND {
        return serve(service, &config).await;
    }

    run_file(service, &args[1], args.get(3).map(String::as_str)).await
}

async fn serve(service: TransactionService<HttpUpstreamClient>, config: &ServiceConfig) -> Result<()> {
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, api::router(Arc::new(service)))
        .with_graceful_shutdown(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for shutdown signal: {error}");
            }
        })
        .await?;

    info!("Listener stopped");
    Ok(())
}

async fn run_file(service: TransactionService<HttpUpstreamClient>, path: &str, account_id: Option<&str>) -> Result<()> {
    info!("Service status: {}", service.health().status);

    let timer = Instant::now();
    let queued = TransactionFeed::new().run(path, &service).await?;
    info!("Queued {queued} transactions (queue depth {})", service.queue_depth().await);

    let batch = service.trigger_batch().await;
    info!("Processed batch in: {:?}", timer.elapsed());

    let analytics = service.analytics(account_id).await;

    if let Some(summary) = analytics.summary() {
        info!("Analyzed {} transactions, net flow {}", summary.total_transactions, summary.net_flow);
    }

    let mut output = BufWriter::new(stdout().lock());
    write_json_line(&mut output, &batch)?;
    write_json_line(&mut output, &analytics)?;
    output.flush()?;

    Ok(())
}

/// Accepts any level name `LevelFilter` parses, case-insensitively. Anything else falls back to `error`.
fn setup_logging(requested: Option<&str>) {
    let parsed = requested.map(|level| level.parse::<LevelFilter>().map_err(|_| level));
    let level = match parsed {
        Some(Ok(level)) => level,
        _ => LevelFilter::ERROR
    };

    //NOTE: Results go to stdout, so logging has to use stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(stderr).with_filter(level))
        .init();

    if let Some(Err(unknown)) = parsed {
        eprintln!("Invalid log level '{unknown}', defaulting to 'error'");
    }
}

fn write_json_line<W: Write, T: Serialize>(output: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *output, value)?;
    writeln!(output)?;

    Ok(())
}
