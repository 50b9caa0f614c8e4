/// In-memory storage backend for tests and ephemeral runs.
///
/// Holds the raw JSON documents rather than typed values so that every load
/// goes through the same normalization as the file backend.

use std::io;
use std::sync::{Mutex, MutexGuard};

use super::{parse_board, parse_categories, render_board, render_categories};
use super::{BoardStorage, StorageError};
use crate::types::{Board, Category};

#[derive(Default)]
pub struct MemoryStorage {
    tickets: Mutex<Option<String>>,
    categories: Mutex<Option<String>>,
    board_writes: Mutex<usize>,
    fail_writes: bool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw document text, as if read from disk.
    pub fn with_documents(tickets: Option<&str>, categories: Option<&str>) -> Self {
        Self {
            tickets: Mutex::new(tickets.map(str::to_string)),
            categories: Mutex::new(categories.map(str::to_string)),
            board_writes: Mutex::new(0),
            fail_writes: false,
        }
    }

    /// Every save fails with an I/O error and leaves the documents untouched.
    pub fn with_failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage is read-only").into());
        }
        Ok(())
    }

    /// The ticket document as last written.
    pub fn tickets_document(&self) -> Option<String> {
        lock(&self.tickets).clone()
    }

    /// Number of successful `save_board` calls.
    pub fn board_writes(&self) -> usize {
        *lock(&self.board_writes)
    }
}

impl BoardStorage for MemoryStorage {
    fn load_board(&self) -> Board {
        lock(&self.tickets)
            .as_deref()
            .map(parse_board)
            .unwrap_or_default()
    }

    fn save_board(&self, board: &Board) -> Result<(), StorageError> {
        self.check_writable()?;
        let content = render_board(board)?;
        *lock(&self.tickets) = Some(content);
        *lock(&self.board_writes) += 1;
        Ok(())
    }

    fn load_categories(&self) -> Vec<Category> {
        lock(&self.categories)
            .as_deref()
            .map(parse_categories)
            .unwrap_or_default()
    }

    fn save_categories(&self, categories: &[Category]) -> Result<(), StorageError> {
        self.check_writable()?;
        let content = render_categories(categories)?;
        *lock(&self.categories) = Some(content);
        Ok(())
    }
}
