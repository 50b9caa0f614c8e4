use axum::{extract::State, response::Json};

use crate::state::AppState;

pub async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "running",
        "port": state.port,
        "ticketsFile": state.tickets_file.display().to_string(),
        "categoriesFile": state.categories_file.display().to_string(),
        "logFile": crate::log_bridge::log_file_path(),
    }))
}
