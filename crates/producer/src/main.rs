use anyhow::Context;
use clap::Parser;
use iris_producer::{Orchestrator, ProducerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "iris-producer", about = "Model-driven signal producer")]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV quote feed (overrides the config file)
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON model artifact (overrides the config file)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Generate N synthetic quotes instead of reading a feed file
    #[arg(long)]
    synthetic: Option<usize>,

    /// Directory holding the status slots and signal log
    #[arg(long)]
    ipc_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("iris_producer=info".parse()?)
                .add_directive("iris_ipc=info".parse()?)
                .add_directive("iris_signal=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ProducerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ProducerConfig::default(),
    };
    if let Some(data) = args.data {
        config.quote_feed = Some(data);
    }
    if let Some(model) = args.model {
        config.model_artifact = Some(model);
    }
    if let Some(count) = args.synthetic {
        config.synthetic_quotes = Some(count);
    }
    if let Some(dir) = args.ipc_dir {
        config = config.with_ipc_dir(dir);
    }

    tracing::info!("starting signal producer");

    // Cooperative cancellation: Ctrl-C flips a flag checked at loop
    // safe points; the in-flight quote completes
    let stop = Arc::new(AtomicBool::new(false));
    let stop_handle = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; shutting down after current quote");
            stop_handle.store(true, Ordering::SeqCst);
        }
    });

    let orchestrator = Orchestrator::new(config)?;
    let report = orchestrator.run(stop).await?;

    tracing::info!(
        total = report.counters.total,
        interrupted = report.interrupted,
        degraded = report.degraded,
        "producer finished"
    );
    Ok(())
}
