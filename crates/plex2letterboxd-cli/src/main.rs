use std::path::PathBuf;

use chrono::Utc;
use clap::{ArgAction, Parser};
use color_eyre::eyre::Context;
use letterboxd_export_config::AuthConfig;
use letterboxd_export_core::{export_watched, resolve_session, WatchedAfter};
use tracing::info;

mod logging;

#[derive(Parser)]
#[command(name = "plex2letterboxd")]
#[command(about = "Export watched Plex movies to the Letterboxd import format")]
#[command(version)]
struct Cli {
    /// Config file with the [auth] section (baseurl, token)
    #[arg(short, long, default_value = "config.ini")]
    ini: PathBuf,

    /// File to write the CSV to
    #[arg(short, long, default_value = "letterboxd.csv")]
    output: PathBuf,

    /// Library sections to export, in order
    #[arg(short, long, num_args = 1.., default_value = "Movies")]
    sections: Vec<String>,

    /// Name of a shared (non-managed) account to export instead of the owner
    #[arg(short, long)]
    managed_user: Option<String>,

    /// Only export movies watched after the given time
    #[arg(short, long, value_name = "YYYY-MM-DD|Nd")]
    watched_after: Option<WatchedAfter>,

    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let auth = AuthConfig::load(&cli.ini)?;

    let session = resolve_session(&auth, cli.managed_user.as_deref()).await?;
    let bound = cli.watched_after.map(|after| after.resolve(Utc::now()));

    info!(sections = ?cli.sections, "starting export");
    let outcome = export_watched(&session, &cli.sections, bound).await?;

    tokio::fs::write(&cli.output, &outcome.csv)
        .await
        .wrap_err_with(|| format!("failed to write {}", cli.output.display()))?;

    if !cli.quiet {
        println!("Exported {} movies to {}.", outcome.rows, cli.output.display());
    }
    Ok(())
}
