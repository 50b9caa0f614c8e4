use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tableau_core::categories::CategoryError;
use tableau_core::types::{Category, CategoryPatch};

use super::log_api_issue;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCategoryBody {
    name: String,
    color: String,
}

/// Category ids only match unsigned digit path segments; anything else,
/// including a sign, is a 404.
fn parse_id(raw: &str, target: &'static str) -> Result<i64, StatusCode> {
    let digits = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());
    match raw.parse::<i64>() {
        Ok(id) if digits => Ok(id),
        _ => {
            let status = StatusCode::NOT_FOUND;
            log_api_issue(status, target, format!("Invalid category id {:?}", raw));
            Err(status)
        }
    }
}

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.categories.list())
}

/// POST /category -- 201 with the created category.
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryBody>,
) -> (StatusCode, Json<Category>) {
    let category = state.categories.create(body.name, body.color);
    (StatusCode::CREATED, Json(category))
}

/// PATCH /category/{id} -- updated category, or an empty 404.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>, StatusCode> {
    let id = parse_id(&id, "tableau.api.update_category")?;
    state.categories.update(id, patch).map(Json).map_err(|e| {
        let status = match e {
            CategoryError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        log_api_issue(status, "tableau.api.update_category", e.to_string());
        status
    })
}

/// DELETE /category/{id} -- always 204 for integer ids.
pub async fn delete_category(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    match parse_id(&id, "tableau.api.delete_category") {
        Ok(id) => {
            state.categories.delete(id);
            StatusCode::NO_CONTENT
        }
        Err(status) => status,
    }
}
