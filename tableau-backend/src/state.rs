/// Shared application state passed to axum handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tableau_core::board::BoardService;
use tableau_core::categories::CategoryService;
use tableau_core::clock::Clock;
use tableau_core::storage::BoardStorage;

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<BoardService>,
    pub categories: Arc<CategoryService>,
    pub port: u16,
    pub tickets_file: PathBuf,
    pub categories_file: PathBuf,
}

impl AppState {
    pub fn new(storage: Arc<dyn BoardStorage>, clock: Arc<dyn Clock>, port: u16) -> Self {
        Self {
            board: Arc::new(BoardService::new(storage.clone(), clock)),
            categories: Arc::new(CategoryService::new(storage)),
            port,
            tickets_file: PathBuf::new(),
            categories_file: PathBuf::new(),
        }
    }

    /// Record where the file backend keeps its documents (reported by /status).
    pub fn with_files(mut self, tickets_file: PathBuf, categories_file: PathBuf) -> Self {
        self.tickets_file = tickets_file;
        self.categories_file = categories_file;
        self
    }
}
