pub mod local;
pub mod memory;

use serde::Serialize;

use crate::types::{Board, Category};

/// Abstract storage for the board and the category list.
/// Implementations: JsonFileStorage (two flat JSON files), MemoryStorage (tests).
///
/// Loads never fail: missing or unreadable data reads as empty.
pub trait BoardStorage: Send + Sync {
    /// Read the board, normalized to the four official columns.
    fn load_board(&self) -> Board;

    /// Overwrite the persisted board.
    fn save_board(&self, board: &Board) -> Result<(), StorageError>;

    /// Read the category list in persisted order.
    fn load_categories(&self) -> Vec<Category>;

    /// Overwrite the persisted category list.
    fn save_categories(&self, categories: &[Category]) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Parse a ticket document. Malformed JSON reads as an empty board.
pub fn parse_board(content: &str) -> Board {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(value) => Board::from_value(&value),
        Err(e) => {
            log::warn!(target: "tableau.storage", "Failed to parse ticket document: {}", e);
            Board::new()
        }
    }
}

/// Parse a category document. Anything but a list reads as empty; entries
/// without an integer id are skipped one by one.
pub fn parse_categories(content: &str) -> Vec<Category> {
    let entries = match serde_json::from_str::<serde_json::Value>(content) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) => {
            log::warn!(target: "tableau.storage", "Category document is not a list");
            return Vec::new();
        }
        Err(e) => {
            log::warn!(target: "tableau.storage", "Failed to parse category document: {}", e);
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| {
            let category = Category::from_value(entry);
            if category.is_none() {
                log::warn!(target: "tableau.storage", "Skipping category without id: {}", entry);
            }
            category
        })
        .collect()
}

/// Ticket documents are written with 4-space indentation.
pub fn render_board(board: &Board) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    board.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub fn render_categories(categories: &[Category]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(categories)
}
