//! SQLite-backed repository with a write-through cached projection.
//!
//! # Responsibility
//! - Persist projects/todos durably and serve all reads from memory.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every write hits the database first; the cache is mutated only after the
//!   commit succeeds, so a failed write leaves both sides unchanged.
//! - One mutex guards connection and cache together for the whole operation.
//! - Timestamps are stored as ISO-8601 text, booleans as 0/1.
//!
//! The cache reflects only this process's writes; sharing the database file
//! with another writer process is unsupported.

use crate::db::migrations::latest_version;
use crate::model::project::Project;
use crate::model::todo::Todo;
use crate::model::{ProjectId, TodoId, ValidationError};
use crate::repo::todo_repo::{default_seed_projects, RepoError, RepoResult, TodoRepository};
use chrono::NaiveDateTime;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const REQUIRED_TABLES: [&str; 2] = ["projects", "todos"];

/// Durable repository over a migrated SQLite connection.
///
/// Construction loads the whole table pair into a keyed cache; reads never
/// touch SQL afterwards.
#[derive(Debug)]
pub struct SqliteTodoRepository {
    store: Mutex<Store>,
}

#[derive(Debug)]
struct Store {
    conn: Connection,
    cache: HashMap<ProjectId, Project>,
}

impl SqliteTodoRepository {
    /// Takes ownership of a migrated connection and loads the cache.
    ///
    /// # Errors
    /// - [`RepoError::UninitializedConnection`] when migrations were not run.
    /// - [`RepoError::MissingRequiredTable`] when the schema is incomplete.
    /// - [`RepoError::InvalidData`] when persisted rows fail to decode.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        let cache = load_cache(&conn)?;
        info!(
            "event=cache_load module=repo status=ok projects={} todos={}",
            cache.len(),
            cache.values().map(Project::total_count).sum::<usize>()
        );
        Ok(Self {
            store: Mutex::new(Store { conn, cache }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // Recover a poisoned lock: the database side is transactional, and a
        // cache/database divergence window on panic is an accepted tradeoff
        // of the write-through design.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TodoRepository for SqliteTodoRepository {
    fn all_projects(&self) -> RepoResult<Vec<Project>> {
        Ok(self.lock().cache.values().cloned().collect())
    }

    fn project(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        Ok(self.lock().cache.get(&project_id).cloned())
    }

    fn save_project(&self, project: &Project) -> RepoResult<()> {
        let mut store = self.lock();
        save_project_locked(&mut store, project)
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        let mut store = self.lock();
        // Foreign key cascade removes the project's todos with it.
        let changed = store.conn.execute(
            "DELETE FROM projects WHERE id = ?1;",
            [project_id.to_string()],
        )?;
        if changed == 0 {
            return Ok(false);
        }
        store.cache.remove(&project_id);
        Ok(true)
    }

    fn project_exists(&self, project_id: ProjectId) -> RepoResult<bool> {
        Ok(self.lock().cache.contains_key(&project_id))
    }

    fn todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<Option<Todo>> {
        Ok(self
            .lock()
            .cache
            .get(&project_id)
            .and_then(|project| project.find_todo(todo_id).cloned()))
    }

    fn save_todo(&self, project_id: ProjectId, todo: &Todo) -> RepoResult<()> {
        let mut store = self.lock();
        let mut project = store
            .cache
            .get(&project_id)
            .cloned()
            .ok_or(ValidationError::UnknownProject(project_id))?;
        project.upsert_todo(todo.clone());
        save_project_locked(&mut store, &project)
    }

    fn delete_todo(&self, project_id: ProjectId, todo_id: TodoId) -> RepoResult<bool> {
        let mut store = self.lock();
        let Some(mut project) = store.cache.get(&project_id).cloned() else {
            return Ok(false);
        };
        project.remove_todo(todo_id);
        save_project_locked(&mut store, &project)?;
        Ok(true)
    }

    fn search_todos(&self, query: &str) -> RepoResult<Vec<Todo>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .lock()
            .cache
            .values()
            .flat_map(|project| project.todos())
            .filter(|todo| todo.title().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn todos_due_today(&self) -> RepoResult<Vec<Todo>> {
        Ok(self
            .lock()
            .cache
            .values()
            .flat_map(|project| project.todos())
            .filter(|todo| todo.is_due_today())
            .cloned()
            .collect())
    }

    fn overdue_todos(&self) -> RepoResult<Vec<Todo>> {
        Ok(self
            .lock()
            .cache
            .values()
            .flat_map(|project| project.todos())
            .filter(|todo| todo.is_overdue())
            .cloned()
            .collect())
    }

    fn todos_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> RepoResult<Vec<Todo>> {
        Ok(self
            .lock()
            .cache
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
        Ok(self.lock().cache.len())
    }

    fn total_todo_count(&self) -> RepoResult<usize> {
        Ok(self
            .lock()
            .cache
            .values()
            .map(Project::total_count)
            .sum())
    }

    fn completed_todo_count(&self) -> RepoResult<usize> {
        Ok(self
            .lock()
            .cache
            .values()
            .map(Project::completed_count)
            .sum())
    }

    fn initialize_default_data(&self) -> RepoResult<()> {
        let mut store = self.lock();
        if !store.cache.is_empty() {
            return Ok(());
        }
        for project in default_seed_projects()? {
            save_project_locked(&mut store, &project)?;
        }
        info!("event=seed_defaults module=repo status=ok projects=2 todos=4");
        Ok(())
    }

    fn clear_all(&self) -> RepoResult<()> {
        let mut store = self.lock();
        let tx = store.conn.transaction()?;
        tx.execute("DELETE FROM todos;", [])?;
        tx.execute("DELETE FROM projects;", [])?;
        tx.commit()?;
        store.cache.clear();
        info!("event=store_wipe module=repo status=ok");
        Ok(())
    }
}

/// Writes one project (row plus full todo set) in a single transaction, then
/// mirrors it into the cache.
fn save_project_locked(store: &mut Store, project: &Project) -> RepoResult<()> {
    let tx = store.conn.transaction()?;
    tx.execute(
        "INSERT OR REPLACE INTO projects (id, name, created_at) VALUES (?1, ?2, ?3);",
        params![
            project.id().to_string(),
            project.name(),
            datetime_to_db(project.created_at()),
        ],
    )?;

    // Full replace: simpler than row-level diffing and atomic either way.
    tx.execute(
        "DELETE FROM todos WHERE project_id = ?1;",
        [project.id().to_string()],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO todos (id, project_id, title, done, time, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        )?;
        for todo in project.todos() {
            stmt.execute(params![
                todo.id().to_string(),
                project.id().to_string(),
                todo.title(),
                bool_to_int(todo.is_done()),
                todo.due_time().map(datetime_to_db),
                datetime_to_db(todo.created_at()),
                datetime_to_db(todo.updated_at()),
            ])?;
        }
    }
    tx.commit()?;

    store.cache.insert(project.id(), project.clone());
    Ok(())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected = latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual != expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }

    for table in REQUIRED_TABLES {
        let found: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )
            .optional()?;
        if found.is_none() {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn load_cache(conn: &Connection) -> RepoResult<HashMap<ProjectId, Project>> {
    let mut cache = HashMap::new();

    let mut stmt = conn.prepare("SELECT id, name, created_at FROM projects;")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let id_text: String = row.get("id")?;
        let id = parse_uuid(&id_text, "projects.id")?;
        let name: String = row.get("name")?;
        let created_at = datetime_from_db(&row.get::<_, String>("created_at")?, "projects.created_at")?;

        let todos = load_todos_for_project(conn, id)?;
        let project = Project::from_parts(id, name, created_at, todos)?;
        cache.insert(project.id(), project);
    }

    Ok(cache)
}

fn load_todos_for_project(conn: &Connection, project_id: ProjectId) -> RepoResult<Vec<Todo>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, done, time, created_at, updated_at
         FROM todos
         WHERE project_id = ?1
         ORDER BY created_at ASC, id ASC;",
    )?;
    let mut rows = stmt.query([project_id.to_string()])?;
    let mut todos = Vec::new();

    while let Some(row) = rows.next()? {
        let id_text: String = row.get("id")?;
        let id = parse_uuid(&id_text, "todos.id")?;
        let title: String = row.get("title")?;
        let done = match row.get::<_, i64>("done")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid done value `{other}` in todos.done"
                )));
            }
        };
        let due_time = match row.get::<_, Option<String>>("time")? {
            Some(text) => Some(datetime_from_db(&text, "todos.time")?),
            None => None,
        };
        let created_at = datetime_from_db(&row.get::<_, String>("created_at")?, "todos.created_at")?;
        let updated_at = datetime_from_db(&row.get::<_, String>("updated_at")?, "todos.updated_at")?;

        todos.push(Todo::from_parts(
            id, title, done, due_time, created_at, updated_at,
        )?);
    }

    Ok(todos)
}

fn parse_uuid(text: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

fn datetime_to_db(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn datetime_from_db(text: &str, column: &str) -> RepoResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid timestamp value `{text}` in {column}"))
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
