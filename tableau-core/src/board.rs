//! Ticket lifecycle: add, edit, delete, move.
//!
//! Every operation reloads the board from storage, applies its change and
//! writes the whole board back. Invalid input never errors: the operation is
//! skipped and the reason reported as [`Outcome::Ignored`].

use std::sync::Arc;

use crate::clock::Clock;
use crate::storage::BoardStorage;
use crate::types::{Board, Column, Ticket};
use crate::urgency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IgnoreReason {
    #[error("unknown column {0:?}")]
    UnknownColumn(String),

    #[error("index {0:?} is not an integer")]
    InvalidIndex(String),

    #[error("index {index} out of range (column holds {len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("title is empty")]
    EmptyTitle,
}

/// Raw fields of a new ticket, as submitted by the add form.
#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub column: String,
    pub title: String,
    pub comment: String,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// Raw fields of a ticket edit, as submitted by the edit form.
#[derive(Debug, Clone, Default)]
pub struct TicketEdit {
    pub column: String,
    pub index: String,
    pub title: String,
    pub comment: String,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// A category id field counts as set only when it parses to a non-zero integer.
pub fn parse_category_field(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok().filter(|id| *id != 0)
}

fn parse_date_field(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

fn resolve_column(name: &str) -> Result<Column, IgnoreReason> {
    Column::from_name(name).ok_or_else(|| IgnoreReason::UnknownColumn(name.to_string()))
}

fn parse_index(raw: &str) -> Result<i64, IgnoreReason> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| IgnoreReason::InvalidIndex(raw.to_string()))
}

/// Position of `index` within a column of `len` tickets.
fn checked_position(index: i64, len: usize) -> Result<usize, IgnoreReason> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or(IgnoreReason::IndexOutOfRange { index, len })
}

pub struct BoardService {
    storage: Arc<dyn BoardStorage>,
    clock: Arc<dyn Clock>,
}

impl BoardService {
    pub fn new(storage: Arc<dyn BoardStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Load, reclassify and persist the board for display.
    pub fn view(&self) -> Board {
        let mut board = self.storage.load_board();
        urgency::classify(&mut board, self.clock.today());
        self.persist(&board);
        board
    }

    pub fn add_ticket(&self, input: NewTicket) -> Outcome {
        let mut board = self.storage.load_board();
        let title = input.title.trim();
        let comment = input.comment.trim();
        let category = parse_category_field(input.category.as_deref());
        let date = parse_date_field(input.date.as_deref());

        let column = match resolve_column(&input.column) {
            Ok(column) => column,
            Err(reason) => return self.ignored("add", reason),
        };
        if title.is_empty() {
            return self.ignored("add", IgnoreReason::EmptyTitle);
        }

        let mut ticket = Ticket::new(title, comment);
        ticket.set_category(category);
        ticket.set_date(date);
        board.tickets_mut(column).push(ticket);

        urgency::classify(&mut board, self.clock.today());
        self.persist(&board);
        log::info!(target: "tableau.board", "Added ticket {:?} to {}", title, column);
        Outcome::Applied
    }

    pub fn delete_ticket(&self, column: &str, index: &str) -> Outcome {
        let mut board = self.storage.load_board();
        let index = match parse_index(index) {
            Ok(index) => index,
            Err(reason) => return self.ignored("delete", reason),
        };
        let column = match resolve_column(column) {
            Ok(column) => column,
            Err(reason) => return self.ignored("delete", reason),
        };
        let tickets = board.tickets_mut(column);
        let position = match checked_position(index, tickets.len()) {
            Ok(position) => position,
            Err(reason) => return self.ignored("delete", reason),
        };

        let removed = tickets.remove(position);
        self.persist(&board);
        log::info!(
            target: "tableau.board",
            "Deleted ticket {:?} from {}",
            removed.title,
            column
        );
        Outcome::Applied
    }

    /// Move a ticket to the end of another (or the same) column.
    /// The moved ticket is not reclassified.
    pub fn move_ticket(&self, from_column: &str, to_column: &str, from_index: &str) -> Outcome {
        let mut board = self.storage.load_board();
        let from_index = match parse_index(from_index) {
            Ok(index) => index,
            Err(reason) => return self.ignored("move", reason),
        };
        let (from, to) = match (resolve_column(from_column), resolve_column(to_column)) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(reason), _) | (_, Err(reason)) => return self.ignored("move", reason),
        };
        let position = match checked_position(from_index, board.tickets(from).len()) {
            Ok(position) => position,
            Err(reason) => return self.ignored("move", reason),
        };

        let ticket = board.tickets_mut(from).remove(position);
        board.tickets_mut(to).push(ticket);
        self.persist(&board);
        log::info!(target: "tableau.board", "Moved ticket {} -> {}", from, to);
        Outcome::Applied
    }

    /// Overwrite a ticket's fields. Unlike add, an unset category or date
    /// removes the field from the ticket.
    pub fn edit_ticket(&self, input: TicketEdit) -> Outcome {
        let mut board = self.storage.load_board();
        let title = input.title.trim();
        let comment = input.comment.trim();
        let category = parse_category_field(input.category.as_deref());
        let date = parse_date_field(input.date.as_deref());

        let index = match parse_index(&input.index) {
            Ok(index) => index,
            Err(reason) => return self.ignored("edit", reason),
        };
        let column = match resolve_column(&input.column) {
            Ok(column) => column,
            Err(reason) => return self.ignored("edit", reason),
        };
        let tickets = board.tickets_mut(column);
        let position = match checked_position(index, tickets.len()) {
            Ok(position) => position,
            Err(reason) => return self.ignored("edit", reason),
        };
        if title.is_empty() {
            return self.ignored("edit", IgnoreReason::EmptyTitle);
        }

        let ticket = &mut tickets[position];
        ticket.title = title.to_string();
        ticket.comment = comment.to_string();
        ticket.set_category(category);
        ticket.set_date(date);

        urgency::classify(&mut board, self.clock.today());
        self.persist(&board);
        log::info!(target: "tableau.board", "Edited ticket {} #{}", column, position);
        Outcome::Applied
    }

    /// Write failures are logged, never surfaced to the caller.
    fn persist(&self, board: &Board) {
        if let Err(e) = self.storage.save_board(board) {
            log::error!(target: "tableau.board", "Failed to save board: {}", e);
        }
    }

    fn ignored(&self, operation: &str, reason: IgnoreReason) -> Outcome {
        log::debug!(target: "tableau.board", "Ignoring {}: {}", operation, reason);
        Outcome::Ignored(reason)
    }
}
