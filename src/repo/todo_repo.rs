//! Project/todo repository contract.
//!
//! # Responsibility
//! - Provide stable CRUD and query APIs over project-scoped todo storage.
//! - Keep storage details behind a trait so the service layer stays
//!   backend-agnostic.
//!
//! # Invariants
//! - Write paths persist durably before any in-process state changes.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `delete_*` and lookup misses are signalled in-band, not as errors.

use crate::db::DbError;
use crate::model::project::Project;
use crate::model::todo::Todo;
use crate::model::{ProjectId, TodoId, ValidationError};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for project/todo persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for project-scoped todo storage.
///
/// All returned collections are snapshots; mutating them never touches the
/// underlying store.
pub trait TodoRepository {
    /// Returns every project (order unspecified; services sort snapshots).
    fn all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Gets one project by id.
    fn project(&self, project_id: ProjectId) -> RepoResult<Option<Project>>;
    /// Inserts or fully replaces a project, todos included.
    fn save_project(&self, project: &Project) -> RepoResult<()>;
    /// Deletes a project and, by cascade, all of its todos. Returns whether
    /// anything was removed.
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool>;
    fn project_exists(&self, project_id: ProjectId) -> RepoResult<bool>;

    /// Gets one todo scoped to a project.
    fn todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<Option<Todo>>;
    /// Inserts or replaces a todo inside the given project.
    ///
    /// Fails with [`ValidationError::UnknownProject`] when the project does
    /// not exist.
    fn save_todo(&self, project_id: ProjectId, todo: &Todo) -> RepoResult<()>;
    /// Removes a todo. Returns `false` when the project is unknown; removing
    /// an absent todo from an existing project is an idempotent success.
    fn delete_todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<bool>;

    /// Case-insensitive substring match over todo titles across all projects.
    /// A blank query matches nothing.
    fn search_todos(&self, query: &str) -> RepoResult<Vec<Todo>>;
    /// Todos whose deadline falls on today's date, done or not.
    fn todos_due_today(&self) -> RepoResult<Vec<Todo>>;
    /// Pending todos whose deadline lies strictly in the past.
    fn overdue_todos(&self) -> RepoResult<Vec<Todo>>;
    /// Todos whose deadline falls in the half-open window `[start, end)`.
    fn todos_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> RepoResult<Vec<Todo>>;

    fn project_count(&self) -> RepoResult<usize>;
    fn total_todo_count(&self) -> RepoResult<usize>;
    fn completed_todo_count(&self) -> RepoResult<usize>;

    /// Seeds the "Personal"/"Work" starter projects, only when the store is
    /// empty. Calling it again is a no-op.
    fn initialize_default_data(&self) -> RepoResult<()>;
    /// Removes every project and todo.
    fn clear_all(&self) -> RepoResult<()>;
}

// Forwarding impl so TodoService and ProjectService can share one store.
impl<R: TodoRepository + ?Sized> TodoRepository for &R {
    fn all_projects(&self) -> RepoResult<Vec<Project>> {
        (**self).all_projects()
    }

    fn project(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        (**self).project(project_id)
    }

    fn save_project(&self, project: &Project) -> RepoResult<()> {
        (**self).save_project(project)
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        (**self).delete_project(project_id)
    }

    fn project_exists(&self, project_id: ProjectId) -> RepoResult<bool> {
        (**self).project_exists(project_id)
    }

    fn todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<Option<Todo>> {
        (**self).todo(project_id, todo_id)
    }

    fn save_todo(&self, project_id: ProjectId, todo: &Todo) -> RepoResult<()> {
        (**self).save_todo(project_id, todo)
    }

    fn delete_todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<bool> {
        (**self).delete_todo(project_id, todo_id)
    }

    fn search_todos(&self, query: &str) -> RepoResult<Vec<Todo>> {
        (**self).search_todos(query)
    }

    fn todos_due_today(&self) -> RepoResult<Vec<Todo>> {
        (**self).todos_due_today()
    }

    fn overdue_todos(&self) -> RepoResult<Vec<Todo>> {
        (**self).overdue_todos()
    }

    fn todos_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> RepoResult<Vec<Todo>> {
        (**self).todos_in_range(start, end)
    }

    fn project_count(&self) -> RepoResult<usize> {
        (**self).project_count()
    }

    fn total_todo_count(&self) -> RepoResult<usize> {
        (**self).total_todo_count()
    }

    fn completed_todo_count(&self) -> RepoResult<usize> {
        (**self).completed_todo_count()
    }

    fn initialize_default_data(&self) -> RepoResult<()> {
        (**self).initialize_default_data()
    }

    fn clear_all(&self) -> RepoResult<()> {
        (**self).clear_all()
    }
}

/// Builds the seed projects shared by every backend's default-data path.
pub(crate) fn default_seed_projects() -> Result<Vec<Project>, ValidationError> {
    let mut personal = Project::new("Personal")?;
    personal.add_todo(Todo::new("Buy groceries")?);
    personal.add_todo(Todo::new("Call mom")?);

    let mut work = Project::new("Work")?;
    work.add_todo(Todo::new("Team meeting")?);
    work.add_todo(Todo::new("Finish report")?);

    Ok(vec![personal, work])
}
