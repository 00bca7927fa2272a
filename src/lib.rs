//! Core domain logic for the TodoApp desktop to-do manager.
//! This crate is the single source of truth for business invariants; the
//! presentation layer only calls the service APIs and renders the results.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, DEFAULT_DB_FILE};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::Project;
pub use model::todo::Todo;
pub use model::{ProjectId, TodoId, ValidationError, MAX_PROJECT_NAME_LEN, MAX_TITLE_LEN};
pub use repo::memory_repo::InMemoryTodoRepository;
pub use repo::sqlite_repo::SqliteTodoRepository;
pub use repo::todo_repo::{RepoError, RepoResult, TodoRepository};
pub use service::project_service::{ProjectService, ProjectStats};
pub use service::todo_service::TodoService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
