//! Map-backed repository for tests and throwaway sessions.
//!
//! # Responsibility
//! - Provide the full [`TodoRepository`] contract without a database.
//!
//! # Invariants
//! - All reads hand out clones; callers can never corrupt internal state by
//!   mutating a returned project or todo.
//! - Default data is seeded at construction, only when the store is empty.

use crate::model::project::Project;
use crate::model::todo::Todo;
use crate::model::{ProjectId, TodoId, ValidationError};
use crate::repo::todo_repo::{default_seed_projects, RepoResult, TodoRepository};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory project store keyed by project id.
pub struct InMemoryTodoRepository {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryTodoRepository {
    /// Creates a store pre-seeded with the starter projects.
    pub fn new() -> Self {
        let repo = Self::empty();
        // Seeding a fresh map cannot fail: the seed fixtures always validate.
        let _ = repo.initialize_default_data();
        repo
    }

    /// Creates a completely empty store.
    pub fn empty() -> Self {
        Self {
            projects: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ProjectId, Project>> {
        // A poisoned lock still holds a consistent map; there are no
        // multi-step in-memory writes to be torn by a panic.
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn all_projects(&self) -> RepoResult<Vec<Project>> {
        Ok(self.lock().values().cloned().collect())
    }

    fn project(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        Ok(self.lock().get(&project_id).cloned())
    }

    fn save_project(&self, project: &Project) -> RepoResult<()> {
        self.lock().insert(project.id(), project.clone());
        Ok(())
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        Ok(self.lock().remove(&project_id).is_some())
    }

    fn project_exists(&self, project_id: ProjectId) -> RepoResult<bool> {
        Ok(self.lock().contains_key(&project_id))
    }

    fn todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<Option<Todo>> {
        Ok(self
            .lock()
            .get(&project_id)
            .and_then(|project| project.find_todo(todo_id).cloned()))
    }

    fn save_todo(&self, project_id: ProjectId, todo: &Todo) -> RepoResult<()> {
        let mut projects = self.lock();
        let project = projects
            .get_mut(&project_id)
            .ok_or(ValidationError::UnknownProject(project_id))?;
        project.upsert_todo(todo.clone());
        Ok(())
    }

    fn delete_todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<bool> {
        let mut projects = self.lock();
        match projects.get_mut(&project_id) {
            Some(project) => {
                project.remove_todo(todo_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn search_todos(&self, query: &str) -> RepoResult<Vec<Todo>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .lock()
            .values()
            .flat_map(|project| project.todos())
            .filter(|todo| todo.title().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn todos_due_today(&self) -> RepoResult<Vec<Todo>> {
        Ok(self
            .lock()
            .values()
            .flat_map(|project| project.todos())
            .filter(|todo| todo.is_due_today())
            .cloned()
            .collect())
    }

    fn overdue_todos(&self) -> RepoResult<Vec<Todo>> {
        Ok(self
            .lock()
            .values()
            .flat_map(|project| project.todos())
            .filter(|todo| todo.is_overdue())
            .cloned()
            .collect())
    }

    fn todos_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> RepoResult<Vec<Todo>> {
        Ok(self
            .lock()
            .values()
            .flat_map(|project| project.todos())
            .filter(|todo| match todo.due_time() {
                Some(due) => due >= start && due < end,
                None => false,
            })
            .cloned()
            .collect())
    }

    fn project_count(&self) -> RepoResult<usize> {
        Ok(self.lock().len())
    }

    fn total_todo_count(&self) -> RepoResult<usize> {
        Ok(self.lock().values().map(|project| project.total_count()).sum())
    }

    fn completed_todo_count(&self) -> RepoResult<usize> {
        Ok(self
            .lock()
            .values()
            .map(|project| project.completed_count())
            .sum())
    }

    fn initialize_default_data(&self) -> RepoResult<()> {
        let mut projects = self.lock();
        if !projects.is_empty() {
            return Ok(());
        }
        for project in default_seed_projects()? {
            projects.insert(project.id(), project);
        }
        Ok(())
    }

    fn clear_all(&self) -> RepoResult<()> {
        self.lock().clear();
        Ok(())
    }
}
