//! Todo/project use-case service.
//!
//! # Responsibility
//! - Validate input, then orchestrate repository CRUD.
//! - Expose derived statistics for the main view.
//!
//! # Invariants
//! - Validation failures are raised before any persistence call; an invalid
//!   request never partially applies.
//! - Unknown ids are signalled with `Ok(false)` / `Ok(None)`, never errors.
//! - Past due times are rejected at creation only; updates accept any time,
//!   so an already-missed deadline can still be recorded.

use crate::model::project::Project;
use crate::model::todo::Todo;
use crate::model::{
    validate_project_name, validate_title, ProjectId, TodoId, ValidationError,
};
use crate::repo::todo_repo::{RepoResult, TodoRepository};
use chrono::{Local, NaiveDateTime};

/// Use-case service wrapper for project and todo CRUD.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn all_projects(&self) -> RepoResult<Vec<Project>> {
        self.repo.all_projects()
    }

    pub fn project(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        self.repo.project(project_id)
    }

    /// Creates and persists a new empty project.
    pub fn create_project(&self, name: &str) -> RepoResult<Project> {
        let name = validate_project_name(name)?;
        let project = Project::new(name)?;
        self.repo.save_project(&project)?;
        Ok(project)
    }

    /// Renames a project. Returns the updated project, or `None` when the id
    /// does not resolve.
    pub fn update_project_name(
        &self,
        project_id: ProjectId,
        new_name: &str,
    ) -> RepoResult<Option<Project>> {
        let new_name = validate_project_name(new_name)?;
        let Some(mut project) = self.repo.project(project_id)? else {
            return Ok(None);
        };
        project.set_name(new_name)?;
        self.repo.save_project(&project)?;
        Ok(Some(project))
    }

    /// Deletes a project and all of its todos.
    pub fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        self.repo.delete_project(project_id)
    }

    /// Creates a pending todo inside an existing project.
    ///
    /// Rejects blank/over-length titles, due times in the past and unknown
    /// projects, in that order, before any persistence call.
    pub fn create_todo(
        &self,
        project_id: ProjectId,
        title: &str,
        due_time: Option<NaiveDateTime>,
    ) -> RepoResult<Todo> {
        let title = validate_title(title)?;
        if let Some(due) = due_time {
            if due < Local::now().naive_local() {
                return Err(ValidationError::DueDateInPast { due }.into());
            }
        }
        if !self.repo.project_exists(project_id)? {
            return Err(ValidationError::UnknownProject(project_id).into());
        }

        let mut todo = Todo::new(title)?;
        if due_time.is_some() {
            todo.set_due_time(due_time);
        }
        self.repo.save_todo(project_id, &todo)?;
        Ok(todo)
    }

    /// Flips a todo's done flag. Returns `false` when the id does not resolve.
    pub fn toggle_todo_done(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<bool> {
        let Some(mut todo) = self.repo.todo(project_id, todo_id)? else {
            return Ok(false);
        };
        todo.toggle_done();
        self.repo.save_todo(project_id, &todo)?;
        Ok(true)
    }

    /// Applies title/due-time edits to a todo.
    ///
    /// Persists and returns `true` only when at least one field actually
    /// changed:
    /// - a `Some` title that is non-blank after trimming and differs from the
    ///   current one (blank titles are ignored, not an error, matching the
    ///   edit-dialog contract);
    /// - a due time that differs from the current one; `None` clears a
    ///   previously set time, and is a no-op when none was set.
    pub fn update_todo(
        &self,
        project_id: ProjectId,
        todo_id: TodoId,
        new_title: Option<&str>,
        new_time: Option<NaiveDateTime>,
    ) -> RepoResult<bool> {
        let Some(mut todo) = self.repo.todo(project_id, todo_id)? else {
            return Ok(false);
        };

        let mut updated = false;

        if let Some(title) = new_title {
            let trimmed = title.trim();
            if !trimmed.is_empty() && trimmed != todo.title() {
                todo.set_title(validate_title(trimmed)?)?;
                updated = true;
            }
        }

        if new_time != todo.due_time() {
            todo.set_due_time(new_time);
            updated = true;
        }

        if updated {
            self.repo.save_todo(project_id, &todo)?;
        }
        Ok(updated)
    }

    /// Deletes a todo. Returns `false` when the project id does not resolve.
    pub fn delete_todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<bool> {
        self.repo.delete_todo(project_id, todo_id)
    }

    /// Case-insensitive title search. A blank query returns nothing without
    /// touching the store.
    pub fn search_todos(&self, query: &str) -> RepoResult<Vec<Todo>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repo.search_todos(query.trim())
    }

    pub fn today_todos(&self) -> RepoResult<Vec<Todo>> {
        self.repo.todos_due_today()
    }

    pub fn overdue_todos(&self) -> RepoResult<Vec<Todo>> {
        self.repo.overdue_todos()
    }

    pub fn todos_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<Todo>> {
        self.repo.todos_in_range(start, end)
    }

    /// Todos of one project, or an empty list for an unknown id.
    pub fn todos_by_project(&self, project_id: ProjectId) -> RepoResult<Vec<Todo>> {
        Ok(self
            .repo
            .project(project_id)?
            .map(|project| project.todos().to_vec())
            .unwrap_or_default())
    }

    pub fn total_projects(&self) -> RepoResult<usize> {
        self.repo.project_count()
    }

    pub fn total_todos(&self) -> RepoResult<usize> {
        self.repo.total_todo_count()
    }

    pub fn completed_todos_count(&self) -> RepoResult<usize> {
        self.repo.completed_todo_count()
    }

    /// Overall done-ratio in percent. 0.0 when the store holds no todos.
    pub fn overall_completion_percentage(&self) -> RepoResult<f64> {
        let total = self.repo.total_todo_count()?;
        if total == 0 {
            return Ok(0.0);
        }
        let completed = self.repo.completed_todo_count()?;
        Ok(completed as f64 * 100.0 / total as f64)
    }

    /// One-line summary for the footer status label.
    pub fn stats_summary(&self) -> RepoResult<String> {
        let projects = self.repo.project_count()?;
        let todos = self.repo.total_todo_count()?;
        let completed = self.repo.completed_todo_count()?;
        let percentage = self.overall_completion_percentage()?;
        Ok(format!(
            "Projects: {projects} | Todos: {todos} | Completed: {completed} ({percentage:.1}%)"
        ))
    }
}
