/// Tableau Backend: config loading, logging, storage init, HTTP server.
pub mod api;
pub mod config;
pub mod log_bridge;
pub mod server;
pub mod state;

use std::sync::Arc;

use tableau_core::clock::SystemClock;
use tableau_core::storage::local::JsonFileStorage;

use crate::state::AppState;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // stderr only until the config names the data dir holding the log file
    if let Err(e) = log_bridge::init() {
        log_bridge::write_fallback_line(&format!("failed to initialize backend logger: {}", e));
    }

    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);
    log_bridge::set_log_file(config.log_path());
    log::info!(target: "tableau.config", "Using config {}", config_path.display());

    let tickets_path = config.tickets_path();
    let categories_path = config.categories_path();
    log::info!(
        target: "tableau.storage",
        "Tickets: {} | Categories: {}",
        tickets_path.display(),
        categories_path.display()
    );

    let storage = Arc::new(JsonFileStorage::new(tickets_path.clone(), categories_path.clone()));
    let state = AppState::new(storage, Arc::new(SystemClock), config.port)
        .with_files(tickets_path, categories_path);

    server::run_server(state, &config.bind_address).await
}
