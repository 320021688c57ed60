/*
[INPUT]:  CLI arguments, YAML configuration file, saved session
[OUTPUT]: One container-driven command against the hosted backend
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or session persistence
*/

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use cli::commands::{self, CommandContext};
use taskdeck_app::prefs::{self, JsonFilePreferences, PreferenceStore};
use taskdeck_app::{AppConfig, Services};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::load(args.config_path.as_deref()).context("load config")?;
    let log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(log_level)?;

    let prefs_path = config.resolved_prefs_path()?;
    let store = JsonFilePreferences::open(&prefs_path).context("open preferences")?;
    info!(prefs = %store.path().display(), "preferences opened");
    let prefs: Arc<dyn PreferenceStore> = Arc::new(store);

    let client = config.build_client()?;
    match prefs::load_session(prefs.as_ref()) {
        Ok(Some(saved)) if !saved.is_expired() => {
            debug!("restoring saved session");
            client.session().restore(saved);
        }
        Ok(Some(_)) => debug!("saved session expired"),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "ignoring unreadable saved session"),
    }

    let services = Services::from_client(client.clone(), config.url_expires_in());
    let ctx = CommandContext {
        services,
        prefs: prefs.clone(),
    };
    let result = commands::run(&ctx, args.command).await;

    prefs::save_session(prefs.as_ref(), client.session().snapshot().as_ref())
        .context("save session")?;
    result
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
