//! Drift Archipelago - World Server

use std::path::PathBuf;

use clap::Parser;
use drift_server::{encode_event, GameServer, ServerConfig, ServerError};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Headless archipelago server.
#[derive(Parser, Debug)]
#[command(name = "drift-server")]
#[command(about = "Generates an archipelago and runs its enemy simulation")]
struct Args {
    /// Server configuration (RON). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the world seed.
    #[arg(short, long)]
    seed: Option<u32>,

    /// Print the generated map as ASCII and exit.
    #[arg(long)]
    print_map: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    tracing::info!(seed = config.world.seed, "Starting Drift Archipelago server");
    let server = GameServer::new(&config)?;

    if args.print_map {
        if let Some(world) = server.world() {
            println!("{}", world.grid.to_ascii());
        }
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(server))?;
    Ok(())
}

async fn run(mut server: GameServer) -> Result<(), ServerError> {
    let mut events = server.subscribe();
    server.start()?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = events.recv() => match received {
                Ok(event) => {
                    let json = encode_event(&event)?;
                    tracing::debug!(kind = event.kind(), %json, "Event");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event log fell behind");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    tracing::info!("Shutting down");
    server.stop().await;
    Ok(())
}
