use axum::{
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};

mod board;
mod category;
mod status;
mod view;

use crate::state::AppState;

/// Axum routes.
///
///   GET    /                -> board page (reclassifies and re-saves tickets)
///   POST   /add             -> add ticket (form), redirect to /
///   POST   /delete          -> delete ticket (form), redirect to /
///   POST   /move            -> move ticket to end of a column (form), 204 / 400
///   POST   /edit            -> edit ticket (form), redirect to /
///   GET    /categories      -> list categories
///   POST   /category        -> create category (JSON), 201
///   PATCH  /category/{id}   -> update category (JSON), 200 / 404
///   DELETE /category/{id}   -> delete category, 204
///   GET    /status          -> health check
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(view::index))
        .route("/add", post(board::add_ticket))
        .route("/delete", post(board::delete_ticket))
        .route("/move", post(board::move_ticket))
        .route("/edit", post(board::edit_ticket))
        .route("/categories", get(category::list_categories))
        .route("/category", post(category::create_category))
        .route(
            "/category/{id}",
            patch(category::update_category).delete(category::delete_category),
        )
        .route("/status", get(status::status))
}

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> (
    std::sync::Arc<tableau_core::storage::memory::MemoryStorage>,
    AppState,
) {
    use std::sync::Arc;
    use tableau_core::clock::FixedClock;
    use tableau_core::storage::memory::MemoryStorage;

    let storage = Arc::new(MemoryStorage::new());
    let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let state = AppState::new(storage.clone(), Arc::new(FixedClock(today)), 5000);
    (storage, state)
}
