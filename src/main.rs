//! Binary entry point: resolve configuration, start logging, open the SQLite
//! key-value store, restore the last session, and drive the Ratatui loop.
use score_tracker::logs::setup_logging;
use score_tracker::{open_store, run_app, App, Config, RosterStore};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _log_guard = setup_logging(&config.log_dir);
    info!(data_dir = %config.data_dir.display(), "starting score tracker");

    let store = open_store(&config.db_path)?;
    let mut app = App::new(Box::new(store), RosterStore::new(), &config);
    app.restore_last_session();

    let result = run_app(&mut app);
    info!("score tracker stopped");
    result
}
