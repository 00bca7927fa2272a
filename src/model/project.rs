//! Project entity: a named container that exclusively owns its todos.
//!
//! # Invariants
//! - `id` and `created_at` never change after construction.
//! - `name` is trimmed and never blank.
//! - Todos keep insertion order; each is addressable by a project-unique id.
//! - Removing an unknown todo id is an idempotent no-op.

use super::todo::Todo;
use super::{validate_project_name, ProjectId, TodoId, ValidationError};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    created_at: NaiveDateTime,
    todos: Vec<Todo>,
}

impl Project {
    /// Creates an empty project with a generated id.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let name = validate_project_name(name.as_ref())?.to_string();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            created_at: Local::now().naive_local(),
            todos: Vec::new(),
        })
    }

    /// Rehydrates a project from persisted parts. Validates the name so
    /// corrupt rows are rejected instead of masked.
    pub fn from_parts(
        id: ProjectId,
        name: impl AsRef<str>,
        created_at: NaiveDateTime,
        todos: Vec<Todo>,
    ) -> Result<Self, ValidationError> {
        let name = validate_project_name(name.as_ref())?.to_string();
        Ok(Self {
            id,
            name,
            created_at,
            todos,
        })
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Todos in insertion order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Renames the project. Rejects blank/over-length input unchanged.
    pub fn set_name(&mut self, name: impl AsRef<str>) -> Result<(), ValidationError> {
        let name = validate_project_name(name.as_ref())?.to_string();
        self.name = name;
        Ok(())
    }

    /// Appends a todo to this project.
    pub fn add_todo(&mut self, todo: Todo) {
        self.todos.push(todo);
    }

    /// Replaces the todo with the same id in place, or appends it.
    ///
    /// Repository save paths use this to make project saves a full upsert.
    pub fn upsert_todo(&mut self, todo: Todo) {
        match self.todos.iter_mut().find(|t| t.id() == todo.id()) {
            Some(slot) => *slot = todo,
            None => self.todos.push(todo),
        }
    }

    /// Removes the todo with the given id. Unknown ids are a no-op.
    pub fn remove_todo(&mut self, todo_id: TodoId) {
        self.todos.retain(|todo| todo.id() != todo_id);
    }

    pub fn find_todo(&self, todo_id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id() == todo_id)
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.is_done()).count()
    }

    pub fn total_count(&self) -> usize {
        self.todos.len()
    }

    /// Whole-percent completion, rounded half-up. 0 for an empty project.
    pub fn completion_percentage(&self) -> u32 {
        if self.todos.is_empty() {
            return 0;
        }
        let ratio = self.completed_count() as f64 * 100.0 / self.todos.len() as f64;
        ratio.round() as u32
    }

    /// Completion label for list rows, e.g. `33%`.
    pub fn completion_label(&self) -> String {
        format!("{}%", self.completion_percentage())
    }
}
