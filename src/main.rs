//! Twinstick GW - dual-analog gamepad gateway
//!
//! Maps the two analog sticks of a stock gamepad onto touch, mouse, and
//! key surfaces with per-stick sector capture and rail locking.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twinstick_gw::config::{watcher, AppConfig, ConfigWatcher, TrackerMode};
use twinstick_gw::input::gamepad::{self, PadProvider};
use twinstick_gw::paths::AppPaths;
use twinstick_gw::router::Router;
use twinstick_gw::sinks::ConsoleSink;
use twinstick_gw::sniffer;

/// Twinstick Gateway - drive touch, mouse, and key surfaces from gamepad sticks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to the detected app directory)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Override the configured tracker mode (touch, mouse, keys)
    #[arg(short, long)]
    mode: Option<String>,

    /// List connected gamepads and exit
    #[arg(long)]
    list_gamepads: bool,

    /// Print raw input frames as JSON lines instead of routing them
    #[arg(long)]
    sniff: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Keep config and logs next to the executable
    #[arg(long)]
    portable: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level)?;

    info!("Starting Twinstick GW...");

    // Handle list gamepads
    if args.list_gamepads {
        return gamepad::list_gamepads();
    }

    let mode_override = match &args.mode {
        Some(mode) => Some(mode.parse::<TrackerMode>()?),
        None => None,
    };

    // Resolve file locations (portable vs installed mode)
    let paths = AppPaths::detect(args.portable);
    paths.ensure_directories()?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| paths.config.to_string_lossy().into_owned());
    info!("Configuration file: {}", config_path);
    info!("Data directory: {}", paths.base_dir().display());

    // First run: write defaults so the watcher has a file to follow
    if !std::path::Path::new(&config_path).exists() {
        info!("No configuration found, writing defaults");
        AppConfig::default().save(&config_path).await?;
    }

    // Handle print config
    if args.print_config {
        let mut config = AppConfig::load(&config_path).await?;
        if let Some(mode) = mode_override {
            config.mode = mode;
        }
        println!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    // Handle sniffer mode
    if args.sniff {
        let config = AppConfig::load(&config_path).await?;
        return sniffer::run_frame_sniffer(&config).await;
    }

    // Load configuration with hot-reload watcher
    let (config_watcher, initial_config) = ConfigWatcher::new(config_path.clone()).await?;
    info!("Configuration loaded successfully with hot-reload enabled");

    let mut config = (*initial_config).clone();
    if let Some(mode) = mode_override {
        info!("Tracker mode overridden from command line: {}", mode.as_str());
        config.mode = mode;
    }

    // Initialize router
    let router = Router::new(config.clone())?;
    info!("Router initialized ({} mode)", config.mode.as_str());

    // Set up shutdown signal
    let shutdown_signal = shutdown_signal();

    // Start the main application
    run_app(router, config, mode_override, config_watcher, shutdown_signal).await?;

    info!("Twinstick GW shutdown complete");
    Ok(())
}

async fn run_app(
    mut router: Router,
    config: AppConfig,
    mode_override: Option<TrackerMode>,
    mut config_watcher: ConfigWatcher,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    info!("Starting main application loop...");

    // Register output sinks
    if config.sinks.console {
        router
            .register_sink(Arc::new(ConsoleSink::new("console")))
            .await?;
        info!("Registered console sink");
    }

    // Start the gamepad provider
    let (mut provider, mut frame_rx) = PadProvider::start(config.gamepad.clone(), config.poll_hz)?;
    info!("🎮 Gamepad provider started at {} Hz", config.poll_hz);

    info!("Ready to process input frames!");

    // Main event loop
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // Handle input frames from the gamepad provider
            Some(frame) = frame_rx.recv() => {
                router.process_frame(&frame).await;
            }

            // Handle config reload
            Some(mut new_config) = config_watcher.next_config() => {
                info!("📝 Configuration file changed, reloading...");

                // The provider keeps the snapshot it was started with
                if watcher::requires_restart(&config, &new_config) {
                    warn!("⚠️  Gamepad or polling changes require a restart to take effect");
                }

                // A command line mode override outlives file edits
                if let Some(mode) = mode_override {
                    new_config.mode = mode;
                }

                match router.update_config(new_config).await {
                    Ok(()) => {
                        info!("✅ Configuration reloaded successfully without dropping frames");
                    }
                    Err(e) => {
                        warn!("⚠️  Failed to reload config (keeping old config): {}", e);
                    }
                }
            }

            // Handle shutdown signal
            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    // Cleanup
    info!("Shutting down...");
    provider.shutdown().await;
    router.shutdown().await;
    info!("All sinks shut down");

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received");
}
