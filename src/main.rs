//! Webstage - headless-browser action executor.
//!
//! Main entry point: CLI parsing, tracing setup, and the action server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use webstage_browser::{ActionContext, Dispatcher, ScreenshotStore, SessionConfig, SessionManager};
use webstage_vision::{VisionAnalyzer, VisionClient};

mod server;

use server::AppState;

/// Webstage CLI.
#[derive(Parser)]
#[command(name = "webstage")]
#[command(about = "Headless-browser action executor for UI test orchestration")]
#[command(version)]
struct Cli {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value_t = 3890)]
    port: u16,

    /// Chrome debugging port
    #[arg(long, default_value_t = 9222)]
    debug_port: u16,

    /// Explicit Chrome executable path
    #[arg(long)]
    chrome_path: Option<PathBuf>,

    /// Run the browser with a visible window (debugging aid)
    #[arg(long)]
    headed: bool,

    /// Data directory for logs and screenshots.
    /// Default: ~/.webstage
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Vision model for visionAnalyze
    #[arg(long, env = "WEBSTAGE_VISION_MODEL", default_value = "claude-sonnet-4-20250514")]
    vision_model: String,
}

/// Get the data directory path.
fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir.clone().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".webstage")
    })
}

/// Initialize tracing with console and file output.
///
/// Log files go to `<data-dir>/debug/` with daily rotation.
fn init_tracing(data_dir: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = data_dir.join("debug");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("webstage")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer guard alive for the life of the process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Resolve until a termination signal arrives (ctrl-c everywhere, SIGTERM
/// on unix). The only path that ends the process.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("termination signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let data_dir = data_dir(&cli);
    init_tracing(&data_dir)?;

    info!("Starting webstage v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {}", data_dir.display());

    let store = Arc::new(ScreenshotStore::new(data_dir.join("screenshots"))?);
    let session = Arc::new(SessionManager::new(SessionConfig {
        debug_port: cli.debug_port,
        chrome_path: cli.chrome_path.clone(),
        headless: !cli.headed,
        ..SessionConfig::default()
    }));

    // Vision is optional: without a key, visionAnalyze reports a
    // recoverable failure instead of the whole service refusing to start.
    let vision = match std::env::var("ANTHROPIC_API_KEY") {
        Ok(key) if !key.is_empty() => {
            info!("Vision analysis enabled (model: {})", cli.vision_model);
            Some(Arc::new(VisionAnalyzer::new(VisionClient::new(
                key,
                cli.vision_model.clone(),
            ))))
        }
        _ => {
            warn!("ANTHROPIC_API_KEY not set; visionAnalyze will report failures");
            None
        }
    };

    let dispatcher = Arc::new(Dispatcher::new(ActionContext {
        session: session.clone(),
        store: store.clone(),
        vision,
    }));

    let state = Arc::new(AppState {
        dispatcher,
        session: session.clone(),
        store,
    });
    let app = server::router(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Action server listening on {}", addr);
    info!("  POST /action              - execute an action");
    info!("  GET  /screenshots/{{name}}  - fetch a saved screenshot");
    info!("  GET  /health              - liveness probe");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down browser session");
    session.shutdown().await;
    Ok(())
}
