//! Domain model for projects and their todos.
//!
//! # Responsibility
//! - Define the canonical entity types used by core business logic.
//! - Enforce entity-level invariants (non-blank names, immutable identity).
//!
//! # Invariants
//! - Every entity is identified by a stable UUID assigned at creation.
//! - `updated_at >= created_at` holds for every todo at all times.
//! - Overdue/due-today are computed views, never stored state.

use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod project;
pub mod todo;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Stable identifier for a todo.
pub type TodoId = Uuid;

/// Maximum accepted length for a todo title, after trimming.
pub const MAX_TITLE_LEN: usize = 500;

/// Maximum accepted length for a project name, after trimming.
pub const MAX_PROJECT_NAME_LEN: usize = 100;

/// Validation failure raised before any persistence call.
///
/// The `Display` output is the user-facing message; the presentation layer
/// shows it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
    EmptyProjectName,
    ProjectNameTooLong { max: usize, actual: usize },
    DueDateInPast { due: NaiveDateTime },
    UnknownProject(ProjectId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Todo title cannot be empty"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "Todo title cannot exceed {max} characters (got {actual})")
            }
            Self::EmptyProjectName => write!(f, "Project name cannot be empty"),
            Self::ProjectNameTooLong { max, actual } => {
                write!(f, "Project name cannot exceed {max} characters (got {actual})")
            }
            Self::DueDateInPast { due } => {
                write!(f, "Due date cannot be in the past: {due}")
            }
            Self::UnknownProject(id) => write!(f, "Project not found: {id}"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_title(title: &str) -> Result<&str, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            max: MAX_TITLE_LEN,
            actual: len,
        });
    }
    Ok(trimmed)
}

pub(crate) fn validate_project_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyProjectName);
    }
    let len = trimmed.chars().count();
    if len > MAX_PROJECT_NAME_LEN {
        return Err(ValidationError::ProjectNameTooLong {
            max: MAX_PROJECT_NAME_LEN,
            actual: len,
        });
    }
    Ok(trimmed)
}
