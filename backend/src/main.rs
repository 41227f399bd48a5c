//! Kairos dashboard server.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use kairos_backend::{app, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("kairos {}", VERSION);
}

/// Path given with `--config`. The flag without a path is an error.
fn config_path_arg(args: &[String]) -> Result<Option<PathBuf>, String> {
    match args.iter().position(|a| a == "--config") {
        None => Ok(None),
        Some(i) => match args.get(i + 1) {
            Some(path) if !path.starts_with('-') => Ok(Some(PathBuf::from(path))),
            _ => Err("--config requires a path".to_string()),
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V and --config <path>
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }
    let config_path = config_path_arg(&args)?;

    // Load configuration
    let config = Config::load(config_path.as_deref())?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Kairos dashboard {}", VERSION);

    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config));
    let app = app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
