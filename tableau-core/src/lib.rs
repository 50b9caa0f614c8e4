//! Core of the Tableau Kanban board: data model, storage backends, urgency
//! classification and the board/category services.

pub mod board;
pub mod categories;
pub mod clock;
pub mod storage;
pub mod types;
pub mod urgency;
