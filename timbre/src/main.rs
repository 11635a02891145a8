#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::sync::Arc;
use std::time::Duration;

use args::Args;
use clap::Parser;
use timbre_config::Config;
use timbre_engine::{Device, ModelManager, WorkerLoader, worker_threads};
use timbre_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    // Load configuration
    let mut config = Config::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.server.listen_address = listen;
    }

    tracing::info!(
        config_path = %args.config.display(),
        "starting timbred"
    );

    let device: Device = config.model.device.parse()?;
    let loader = Arc::new(WorkerLoader::new(
        config.model.runner.clone(),
        config.model.model_dir.clone(),
        Duration::from_secs(config.model.load_timeout_secs),
        worker_threads(),
    ));

    let manager = Arc::new(ModelManager::new());
    let server = Server::new(Arc::clone(&manager), &config);

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // The listener comes up immediately; synthesis endpoints answer 503
    // until the background load reaches Ready. A load that fails on every
    // device takes the whole process down.
    let load_task = tokio::spawn({
        let manager = Arc::clone(&manager);
        let shutdown = shutdown.clone();
        async move {
            let result = manager.load(loader, device).await;
            if let Err(ref err) = result {
                tracing::error!("model load failed: {err}");
                shutdown.cancel();
            }
            result
        }
    });

    server.serve(shutdown).await?;

    if load_task.is_finished() && load_task.await?.is_err() {
        anyhow::bail!("model never became ready");
    }

    tracing::info!("timbred stopped");
    Ok(())
}

/// Initialize the tracing subscriber
fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
