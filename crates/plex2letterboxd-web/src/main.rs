use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use letterboxd_export_config::AuthConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod handlers;

#[derive(Parser)]
#[command(name = "plex2letterboxd-web")]
#[command(about = "Web form for exporting watched Plex movies to the Letterboxd import format")]
#[command(version)]
struct Cli {
    /// Config file with the [auth] section (baseurl, token, optional library)
    #[arg(long, default_value = "config.ini")]
    ini: PathBuf,

    /// Address to bind the web server
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,
}

/// Read-only configuration shared by all requests. Each export builds its
/// own session and CSV buffer; nothing mutable lives here.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthConfig>,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/export", post(handlers::export))
        .with_state(state)
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let auth = AuthConfig::load(&cli.ini)?;

    let state = AppState {
        auth: Arc::new(auth),
    };

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    info!("listening on {}", cli.bind);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
