use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::Redirect,
};
use serde::Deserialize;
use tableau_core::board::{NewTicket, Outcome, TicketEdit};

use super::log_api_issue;
use crate::state::AppState;

// Missing form fields read as empty: the board service turns them into
// ignored operations instead of extractor rejections.

#[derive(Deserialize)]
pub struct AddTicketForm {
    #[serde(default)]
    column: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    comment: String,
    category: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteTicketForm {
    #[serde(default)]
    column: String,
    #[serde(default)]
    index: String,
}

#[derive(Deserialize)]
pub struct MoveTicketForm {
    from_column: Option<String>,
    to_column: Option<String>,
    from_index: Option<String>,
}

#[derive(Deserialize)]
pub struct EditTicketForm {
    #[serde(default)]
    column: String,
    #[serde(default)]
    index: String,
    #[serde(default)]
    new_title: String,
    #[serde(default)]
    new_comment: String,
    edit_category: Option<String>,
    date: Option<String>,
}

fn back_to_board() -> Redirect {
    Redirect::to("/")
}

/// POST /add -- append a ticket, then redirect to the board.
pub async fn add_ticket(State(state): State<AppState>, Form(form): Form<AddTicketForm>) -> Redirect {
    state.board.add_ticket(NewTicket {
        column: form.column,
        title: form.title,
        comment: form.comment,
        category: form.category,
        date: form.date,
    });
    back_to_board()
}

/// POST /delete -- remove a ticket; out-of-range requests are no-ops.
pub async fn delete_ticket(
    State(state): State<AppState>,
    Form(form): Form<DeleteTicketForm>,
) -> Redirect {
    state.board.delete_ticket(&form.column, &form.index);
    back_to_board()
}

/// POST /move -- 204 on success, 400 when a column or the index is invalid.
pub async fn move_ticket(
    State(state): State<AppState>,
    Form(form): Form<MoveTicketForm>,
) -> StatusCode {
    let (Some(from_column), Some(to_column), Some(from_index)) =
        (form.from_column, form.to_column, form.from_index)
    else {
        let status = StatusCode::BAD_REQUEST;
        log_api_issue(status, "tableau.api.move", "Missing move form field");
        return status;
    };

    match state.board.move_ticket(&from_column, &to_column, &from_index) {
        Outcome::Applied => StatusCode::NO_CONTENT,
        Outcome::Ignored(reason) => {
            let status = StatusCode::BAD_REQUEST;
            log_api_issue(
                status,
                "tableau.api.move",
                format!("Rejected move {} -> {}: {}", from_column, to_column, reason),
            );
            status
        }
    }
}

/// POST /edit -- overwrite a ticket, then redirect to the board.
pub async fn edit_ticket(State(state): State<AppState>, Form(form): Form<EditTicketForm>) -> Redirect {
    state.board.edit_ticket(TicketEdit {
        column: form.column,
        index: form.index,
        title: form.new_title,
        comment: form.new_comment,
        category: form.edit_category,
        date: form.date,
    });
    back_to_board()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_state;
    use axum::response::IntoResponse;
    use tableau_core::storage::BoardStorage;
    use tableau_core::types::Column;

    fn add_form(column: &str, title: &str) -> AddTicketForm {
        AddTicketForm {
            column: column.to_string(),
            title: title.to_string(),
            comment: String::new(),
            category: None,
            date: None,
        }
    }

    fn move_form(from: &str, to: &str, index: &str) -> MoveTicketForm {
        MoveTicketForm {
            from_column: Some(from.to_string()),
            to_column: Some(to.to_string()),
            from_index: Some(index.to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_redirects_to_board() {
        let (storage, state) = test_state();
        let response = add_ticket(State(state), Form(add_form("À faire", "Task")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/");
        assert_eq!(storage.load_board().tickets(Column::Todo)[0].title, "Task");
    }

    #[tokio::test]
    async fn test_add_invalid_column_still_redirects() {
        let (storage, state) = test_state();
        let response = add_ticket(State(state), Form(add_form("Nulle part", "Task")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(storage.load_board().total_tickets(), 0);
    }

    #[tokio::test]
    async fn test_delete_out_of_range_redirects() {
        let (storage, state) = test_state();
        let _redirect = add_ticket(State(state.clone()), Form(add_form("Terminé", "done"))).await;

        let form = DeleteTicketForm {
            column: "Terminé".to_string(),
            index: "5".to_string(),
        };
        let response = delete_ticket(State(state), Form(form)).await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(storage.load_board().tickets(Column::Done).len(), 1);
    }

    #[tokio::test]
    async fn test_move_status_codes() {
        let (storage, state) = test_state();
        let _redirect = add_ticket(State(state.clone()), Form(add_form("Pense bête", "idea"))).await;

        let status = move_ticket(State(state.clone()), Form(move_form("Pense bête", "En cours", "0"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(storage.load_board().tickets(Column::InProgress)[0].title, "idea");

        let status = move_ticket(State(state.clone()), Form(move_form("Pense bête", "En cours", "0"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let status = move_ticket(State(state.clone()), Form(move_form("En cours", "Ailleurs", "0"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let status = move_ticket(State(state.clone()), Form(move_form("En cours", "Terminé", "zero"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = MoveTicketForm {
            from_column: Some("En cours".to_string()),
            to_column: None,
            from_index: Some("0".to_string()),
        };
        assert_eq!(move_ticket(State(state), Form(missing)).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_clears_category_and_date() {
        let (storage, state) = test_state();
        let mut form = add_form("À faire", "draft");
        form.category = Some("3".to_string());
        let _redirect = add_ticket(State(state.clone()), Form(form)).await;

        let edit = EditTicketForm {
            column: "À faire".to_string(),
            index: "0".to_string(),
            new_title: "final".to_string(),
            new_comment: "ready".to_string(),
            edit_category: Some(String::new()),
            date: None,
        };
        let response = edit_ticket(State(state), Form(edit)).await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let board = storage.load_board();
        let ticket = &board.tickets(Column::Todo)[0];
        assert_eq!(ticket.title, "final");
        assert_eq!(ticket.comment, "ready");
        assert_eq!(ticket.category, None);
    }
}
