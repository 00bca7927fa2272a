//! Todo entity.
//!
//! # Responsibility
//! - Hold one task with its completion flag and optional deadline.
//! - Keep `updated_at` honest: every mutating setter refreshes it.
//!
//! # Invariants
//! - `id` and `created_at` never change after construction.
//! - `title` is trimmed and never blank.
//! - Overdue/due-today are derived on read; nothing is flipped automatically.

use super::{validate_title, TodoId, ValidationError};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task owned by exactly one project.
///
/// Fields stay private so identity and title invariants cannot be broken by
/// raw assignment; all mutation goes through the named setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    id: TodoId,
    title: String,
    done: bool,
    /// Absent means "no deadline".
    due_time: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Todo {
    /// Creates a pending todo with a generated id and no deadline.
    pub fn new(title: impl AsRef<str>) -> Result<Self, ValidationError> {
        let title = validate_title(title.as_ref())?.to_string();
        let now = Local::now().naive_local();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            done: false,
            due_time: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrates a todo from persisted parts.
    ///
    /// Used by repository load paths; still validates the title so corrupt
    /// rows are rejected instead of masked.
    pub fn from_parts(
        id: TodoId,
        title: impl AsRef<str>,
        done: bool,
        due_time: Option<NaiveDateTime>,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(title.as_ref())?.to_string();
        Ok(Self {
            id,
            title,
            done,
            due_time,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn due_time(&self) -> Option<NaiveDateTime> {
        self.due_time
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// Replaces the title. Rejects blank/over-length input unchanged.
    pub fn set_title(&mut self, title: impl AsRef<str>) -> Result<(), ValidationError> {
        let title = validate_title(title.as_ref())?.to_string();
        self.title = title;
        self.touch();
        Ok(())
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
        self.touch();
    }

    /// Sets or clears the deadline. `None` means "no deadline".
    pub fn set_due_time(&mut self, due_time: Option<NaiveDateTime>) {
        self.due_time = due_time;
        self.touch();
    }

    /// Removes the deadline entirely.
    pub fn clear_due_time(&mut self) {
        self.set_due_time(None);
    }

    /// Flips the pending/done flag.
    pub fn toggle_done(&mut self) {
        self.done = !self.done;
        self.touch();
    }

    /// True when a deadline exists, lies strictly in the past and the todo is
    /// still pending. Completed todos are never overdue.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Local::now().naive_local())
    }

    /// Clock-injected variant of [`Todo::is_overdue`].
    pub fn is_overdue_at(&self, now: NaiveDateTime) -> bool {
        match self.due_time {
            Some(due) => !self.done && due < now,
            None => false,
        }
    }

    /// True when the deadline's date component equals today, regardless of
    /// the done flag.
    pub fn is_due_today(&self) -> bool {
        self.is_due_today_at(Local::now().naive_local())
    }

    /// Clock-injected variant of [`Todo::is_due_today`].
    pub fn is_due_today_at(&self, now: NaiveDateTime) -> bool {
        match self.due_time {
            Some(due) => due.date() == now.date(),
            None => false,
        }
    }

    pub fn has_due_date(&self) -> bool {
        self.due_time.is_some()
    }

    /// Short deadline label for list rows, e.g. `Aug 24`. Empty without one.
    pub fn formatted_due_date(&self) -> String {
        self.due_time
            .map(|due| due.format("%b %d").to_string())
            .unwrap_or_default()
    }

    /// Weekday name of the deadline, e.g. `Monday`. Empty without one.
    pub fn day_of_week(&self) -> String {
        self.due_time
            .map(|due| due.format("%A").to_string())
            .unwrap_or_default()
    }

    fn touch(&mut self) {
        self.updated_at = Local::now().naive_local();
    }
}
