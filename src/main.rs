#![warn(clippy::all, clippy::pedantic)]

use slate::{cfg::Settings, state::SlateState};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

#[tokio::main]
async fn main() {
    let env_loaded = dotenvy::dotenv();

    if let Err(e) = tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    ) {
        eprintln!("unable to set tracing subscriber: {e:?}");
        return;
    }
    if let Err(e) = env_loaded {
        debug!(?e, "No .env file loaded");
    }

    info!("`tracing` online");

    let settings = match Settings::new().await {
        Ok(settings) => settings,
        Err(e) => {
            error!(?e, "Unable to load settings");
            return;
        }
    };
    let state = match SlateState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            error!(?e, "Unable to create state");
            return;
        }
    };

    match state.sessions.load_session().await {
        Ok(Some(user)) => info!(username = %user.username, role = %user.role.as_str(), "Resuming session"),
        Ok(None) => info!("Nobody logged in"),
        Err(e) => warn!(?e, "Stored session unreadable"),
    }

    let mut dashboard = state.dashboard();
    dashboard.load_all().await;

    info!(stats = ?dashboard.stats, "Dashboard loaded");
    for (class, absences) in dashboard.absences_by_class() {
        info!(%class, absences, "Absences");
    }
    for notice in dashboard.take_notices() {
        if notice.is_error() {
            warn!(message = %notice.message, "Notice");
        } else {
            info!(message = %notice.message, "Notice");
        }
    }
}
