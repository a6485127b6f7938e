use anyhow::Context;
use clap::Parser;
use iris_engine::{Consumer, EngineConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "iris-engine", about = "Signal-consuming engine")]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

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
                .add_directive("iris_engine=info".parse()?)
                .add_directive("iris_ipc=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = args.ipc_dir {
        config = config.with_ipc_dir(dir);
    }

    tracing::info!("starting engine");

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handle = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; draining and shutting down");
            stop_handle.store(true, Ordering::SeqCst);
        }
    });

    let consumer = Consumer::new(config);
    let report = consumer.run(stop).await?;

    tracing::info!(
        total = report.counters.total,
        malformed = report.malformed,
        interrupted = report.interrupted,
        "engine finished"
    );
    Ok(())
}
