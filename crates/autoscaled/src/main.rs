//! autoscaled — the autoscaler daemon.
//!
//! Single binary that wires together the orchestrator core and its
//! adapter crates:
//! - State store (redb or in-memory)
//! - Resize driver + operation status client (HTTP)
//! - Downstream event emitter (HTTP)
//! - Counters + Prometheus exposition
//! - HTTP ingress (axum) and a stdin message-bus ingress
//!
//! # Usage
//!
//! ```text
//! autoscaled serve --listen 0.0.0.0:8080 --config autoscaled.toml
//! autoscaled tick-stdin --config autoscaled.toml
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use autoscale_api::{decode_envelope, tick_in_process, ApiState};
use autoscale_core::{Orchestrator, Registry};
use autoscale_events::{HttpDownstreamEmitter, NullDownstreamEmitter};
use autoscale_metrics::AtomicCounters;
use autoscale_remote::{HttpOperationStatusClient, HttpResizeClient};
use autoscale_state::DefaultStateStoreFactory;

use config::DaemonConfig;

#[derive(Parser)]
#[command(name = "autoscaled", about = "Relational database autoscaler daemon")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "autoscaled.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP ingress (POST /v1/tick, GET /healthz, GET /metrics).
    Serve {
        /// Overrides `server.listen_addr` from the config file.
        #[arg(long)]
        listen: Option<String>,
    },
    /// Read newline-delimited message-bus envelopes from stdin and tick
    /// the orchestrator once per line.
    TickStdin,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match DaemonConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!(
                "warning: could not read config at {:?} ({err}), using defaults",
                cli.config
            );
            DaemonConfig {
                server: config::ServerConfig {
                    listen_addr: "0.0.0.0:8080".to_string(),
                },
                state: Default::default(),
                remote: Default::default(),
                logging: Default::default(),
                instances: Default::default(),
            }
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.parse().unwrap()),
        )
        .init();

    let emitter: Arc<dyn autoscale_core::ports::DownstreamEmitter> =
        if config.remote.default_endpoint.is_some() {
            Arc::new(HttpDownstreamEmitter::new())
        } else {
            Arc::new(NullDownstreamEmitter)
        };

    let counters = Arc::new(AtomicCounters::new());
    let defaults = Arc::new(config.snapshot_defaults());
    let orchestrator = Arc::new(Orchestrator::new(
        Registry::default(),
        Arc::new(DefaultStateStoreFactory::new()),
        Arc::new(HttpResizeClient::default()),
        Arc::new(HttpOperationStatusClient::default()),
        emitter,
        counters.clone(),
    ));

    match cli.command {
        Command::Serve { listen } => {
            let addr = listen.unwrap_or(config.server.listen_addr);
            serve(orchestrator, counters, defaults, addr).await
        }
        Command::TickStdin => tick_stdin(orchestrator.as_ref(), defaults.as_ref()).await,
    }
}

async fn serve(
    orchestrator: Arc<Orchestrator>,
    counters: Arc<AtomicCounters>,
    defaults: Arc<autoscale_api::SnapshotDefaults>,
    listen_addr: String,
) -> anyhow::Result<()> {
    info!(%listen_addr, "autoscaler daemon starting");

    let router = autoscale_api::build_router(ApiState { orchestrator, counters, defaults });
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;

    info!(%listen_addr, "HTTP ingress listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("autoscaler daemon stopped");
    Ok(())
}

async fn tick_stdin(
    orchestrator: &Orchestrator,
    defaults: &autoscale_api::SnapshotDefaults,
) -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let mut snapshot = match decode_envelope(&line) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "dropping malformed envelope");
                continue;
            }
        };
        defaults.apply(&mut snapshot);

        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        match tick_in_process(orchestrator, snapshot, now_ms).await {
            Ok(outcome) => info!(?outcome, "tick complete"),
            Err(err) => error!(error = %err, "tick failed"),
        }
    }

    Ok(())
}
