/// Local filesystem storage backend.
///
/// Keeps the board and the category list in two flat JSON files:
/// - Missing or unparsable files read as empty
/// - Atomic writes (write to .tmp, fsync, rename)
/// - Parent directories are created on first write

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{parse_board, parse_categories, render_board, render_categories};
use super::{BoardStorage, StorageError};
use crate::types::{Board, Category};

pub struct JsonFileStorage {
    tickets_path: PathBuf,
    categories_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(tickets_path: impl Into<PathBuf>, categories_path: impl Into<PathBuf>) -> Self {
        Self {
            tickets_path: tickets_path.into(),
            categories_path: categories_path.into(),
        }
    }

    pub fn tickets_path(&self) -> &Path {
        &self.tickets_path
    }

    pub fn categories_path(&self) -> &Path {
        &self.categories_path
    }

    /// Read a document, treating a missing file as absent data.
    fn read_document(path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!(
                    target: "tableau.storage",
                    "Failed to read {}: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let tmp_path = path.with_extension("tableau.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl BoardStorage for JsonFileStorage {
    fn load_board(&self) -> Board {
        match Self::read_document(&self.tickets_path) {
            Some(content) => parse_board(&content),
            None => Board::new(),
        }
    }

    fn save_board(&self, board: &Board) -> Result<(), StorageError> {
        let content = render_board(board)?;
        Self::atomic_write(&self.tickets_path, &content)?;
        log::debug!(
            target: "tableau.storage",
            "Wrote {} tickets to {}",
            board.total_tickets(),
            self.tickets_path.display()
        );
        Ok(())
    }

    fn load_categories(&self) -> Vec<Category> {
        match Self::read_document(&self.categories_path) {
            Some(content) => parse_categories(&content),
            None => Vec::new(),
        }
    }

    fn save_categories(&self, categories: &[Category]) -> Result<(), StorageError> {
        let content = render_categories(categories)?;
        Self::atomic_write(&self.categories_path, &content)?;
        Ok(())
    }
}
