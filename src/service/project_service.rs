//! Project-level read helpers for the sidebar and stats widgets.
//!
//! # Responsibility
//! - Derive per-project statistics without storing them.
//! - Provide sorted snapshots of the project list.
//!
//! # Invariants
//! - Sorting operates on snapshots; the store order is never mutated.

use crate::model::project::Project;
use crate::model::ProjectId;
use crate::repo::todo_repo::{RepoResult, TodoRepository};

/// Derived counters for one project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectStats {
    pub total: usize,
    pub completed: usize,
    /// Done-ratio in percent; 0.0 for an empty project.
    pub percentage: f64,
}

/// Read-side service over the project list.
pub struct ProjectService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Computed stats for one project, or `None` for an unknown id.
    pub fn project_stats(&self, project_id: ProjectId) -> RepoResult<Option<ProjectStats>> {
        let Some(project) = self.repo.project(project_id)? else {
            return Ok(None);
        };
        let total = project.total_count();
        let completed = project.completed_count();
        let percentage = if total > 0 {
            completed as f64 * 100.0 / total as f64
        } else {
            0.0
        };
        Ok(Some(ProjectStats {
            total,
            completed,
            percentage,
        }))
    }

    /// Projects sorted by creation date, newest first.
    pub fn projects_sorted_by_date(&self) -> RepoResult<Vec<Project>> {
        let mut projects = self.repo.all_projects()?;
        projects.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(projects)
    }

    /// Projects sorted by name, case-insensitively.
    pub fn projects_sorted_by_name(&self) -> RepoResult<Vec<Project>> {
        let mut projects = self.repo.all_projects()?;
        projects.sort_by(|a, b| {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
        });
        Ok(projects)
    }

    /// True when a project with this name already exists, ignoring case and
    /// surrounding whitespace.
    pub fn project_name_exists(&self, name: &str) -> RepoResult<bool> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .repo
            .all_projects()?
            .iter()
            .any(|project| project.name().to_lowercase() == needle))
    }
}
