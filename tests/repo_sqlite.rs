use chrono::{Duration, Local, NaiveDate};
use rusqlite::Connection;
use todoapp_core::db::migrations::latest_version;
use todoapp_core::{
    open_db, open_db_in_memory, Project, RepoError, SqliteTodoRepository, Todo, TodoRepository,
};

fn fresh_repo() -> SqliteTodoRepository {
    SqliteTodoRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

#[test]
fn save_and_get_project_roundtrip() {
    let repo = fresh_repo();

    let mut project = Project::new("Work").unwrap();
    project.add_todo(Todo::new("Finish report").unwrap());
    repo.save_project(&project).unwrap();

    let loaded = repo.project(project.id()).unwrap().unwrap();
    assert_eq!(loaded.name(), "Work");
    assert_eq!(loaded.total_count(), 1);
    assert_eq!(loaded.todos()[0].title(), "Finish report");
    assert!(repo.project_exists(project.id()).unwrap());
}

#[test]
fn write_then_read_reflects_mutation_exactly_once() {
    let repo = fresh_repo();

    let project = Project::new("Inbox").unwrap();
    repo.save_project(&project).unwrap();

    let todo = Todo::new("only once").unwrap();
    repo.save_todo(project.id(), &todo).unwrap();
    repo.save_todo(project.id(), &todo).unwrap();

    let loaded = repo.project(project.id()).unwrap().unwrap();
    assert_eq!(loaded.total_count(), 1);
    assert_eq!(repo.total_todo_count().unwrap(), 1);
}

#[test]
fn save_todo_to_unknown_project_is_a_validation_error() {
    let repo = fresh_repo();
    let todo = Todo::new("orphan").unwrap();

    let err = repo
        .save_todo(uuid::Uuid::new_v4(), &todo)
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn delete_project_cascades_to_its_todos() {
    let repo = fresh_repo();

    let mut project = Project::new("Work").unwrap();
    let todo = Todo::new("doomed").unwrap();
    let todo_id = todo.id();
    project.add_todo(todo);
    repo.save_project(&project).unwrap();

    assert!(repo.delete_project(project.id()).unwrap());
    assert!(repo.project(project.id()).unwrap().is_none());
    assert!(repo.todo(project.id(), todo_id).unwrap().is_none());
    assert_eq!(repo.total_todo_count().unwrap(), 0);

    // Second delete reports nothing removed.
    assert!(!repo.delete_project(project.id()).unwrap());
}

#[test]
fn delete_todo_is_idempotent_within_existing_project() {
    let repo = fresh_repo();

    let project = Project::new("Work").unwrap();
    repo.save_project(&project).unwrap();
    let todo = Todo::new("task").unwrap();
    repo.save_todo(project.id(), &todo).unwrap();

    assert!(repo.delete_todo(project.id(), todo.id()).unwrap());
    assert!(repo.delete_todo(project.id(), todo.id()).unwrap());
    assert!(!repo.delete_todo(uuid::Uuid::new_v4(), todo.id()).unwrap());
}

#[test]
fn seeding_is_idempotent() {
    let repo = fresh_repo();

    repo.initialize_default_data().unwrap();
    assert_eq!(repo.project_count().unwrap(), 2);
    assert_eq!(repo.total_todo_count().unwrap(), 4);

    repo.initialize_default_data().unwrap();
    assert_eq!(repo.project_count().unwrap(), 2);
    assert_eq!(repo.total_todo_count().unwrap(), 4);
}

#[test]
fn search_is_case_insensitive_substring_match() {
    let repo = fresh_repo();
    repo.initialize_default_data().unwrap();

    let hits = repo.search_todos("GROC").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title(), "Buy groceries");

    assert!(repo.search_todos("   ").unwrap().is_empty());
    assert!(repo.search_todos("no such todo").unwrap().is_empty());
}

#[test]
fn date_range_filter_is_half_open() {
    let repo = fresh_repo();
    let project = Project::new("Plans").unwrap();
    repo.save_project(&project).unwrap();

    let start = NaiveDate::from_ymd_opt(2026, 9, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 9, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut inside = Todo::new("inside").unwrap();
    inside.set_due_time(Some(start));
    let mut at_end = Todo::new("at end").unwrap();
    at_end.set_due_time(Some(end));
    let no_deadline = Todo::new("no deadline").unwrap();

    repo.save_todo(project.id(), &inside).unwrap();
    repo.save_todo(project.id(), &at_end).unwrap();
    repo.save_todo(project.id(), &no_deadline).unwrap();

    let hits = repo.todos_in_range(start, end).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title(), "inside");
}

#[test]
fn overdue_and_due_today_are_served_from_cache() {
    let repo = fresh_repo();
    let project = Project::new("Now").unwrap();
    repo.save_project(&project).unwrap();

    let now = Local::now().naive_local();
    let mut overdue = Todo::new("late").unwrap();
    overdue.set_due_time(Some(now - Duration::hours(2)));
    let mut today = Todo::new("today").unwrap();
    today.set_due_time(Some(now));

    repo.save_todo(project.id(), &overdue).unwrap();
    repo.save_todo(project.id(), &today).unwrap();

    let overdue_hits = repo.overdue_todos().unwrap();
    assert!(overdue_hits.iter().any(|t| t.title() == "late"));

    let today_hits = repo.todos_due_today().unwrap();
    assert!(today_hits.iter().any(|t| t.title() == "today"));
}

#[test]
fn counts_track_completion() {
    let repo = fresh_repo();
    let project = Project::new("Counts").unwrap();
    repo.save_project(&project).unwrap();

    let mut done = Todo::new("done").unwrap();
    done.set_done(true);
    repo.save_todo(project.id(), &done).unwrap();
    repo.save_todo(project.id(), &Todo::new("open").unwrap())
        .unwrap();

    assert_eq!(repo.project_count().unwrap(), 1);
    assert_eq!(repo.total_todo_count().unwrap(), 2);
    assert_eq!(repo.completed_todo_count().unwrap(), 1);
}

#[test]
fn clear_all_wipes_store_and_cache() {
    let repo = fresh_repo();
    repo.initialize_default_data().unwrap();

    repo.clear_all().unwrap();
    assert_eq!(repo.project_count().unwrap(), 0);
    assert_eq!(repo.total_todo_count().unwrap(), 0);
    assert!(repo.all_projects().unwrap().is_empty());

    // An empty store can be reseeded.
    repo.initialize_default_data().unwrap();
    assert_eq!(repo.project_count().unwrap(), 2);
}

#[test]
fn data_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("todo.db");

    let project = Project::new("Durable").unwrap();
    let mut todo = Todo::new("persisted").unwrap();
    todo.set_done(true);

    {
        let repo = SqliteTodoRepository::try_new(open_db(&db_path).unwrap()).unwrap();
        repo.save_project(&project).unwrap();
        repo.save_todo(project.id(), &todo).unwrap();
    }

    let repo = SqliteTodoRepository::try_new(open_db(&db_path).unwrap()).unwrap();
    let loaded = repo.project(project.id()).unwrap().unwrap();
    assert_eq!(loaded.name(), "Durable");
    let reloaded = loaded.find_todo(todo.id()).unwrap();
    assert_eq!(reloaded.title(), "persisted");
    assert!(reloaded.is_done());
    assert_eq!(reloaded.due_time(), None);
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTodoRepository::try_new(conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn corrupt_done_flag_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO projects (id, name, created_at)
         VALUES ('11111111-2222-4333-8444-555555555555', 'Work', '2026-08-24T09:00:00');
         INSERT INTO todos (id, project_id, title, done, time, created_at, updated_at)
         VALUES ('aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee',
                 '11111111-2222-4333-8444-555555555555',
                 'broken row', 2, NULL,
                 '2026-08-24T09:00:00', '2026-08-24T09:00:00');",
    )
    .unwrap();

    let err = SqliteTodoRepository::try_new(conn).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)), "got: {err}");
}

#[test]
fn corrupt_timestamp_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO projects (id, name, created_at)
         VALUES ('11111111-2222-4333-8444-555555555555', 'Work', '2026-08-24T09:00:00');
         INSERT INTO todos (id, project_id, title, done, time, created_at, updated_at)
         VALUES ('aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee',
                 '11111111-2222-4333-8444-555555555555',
                 'broken row', 0, 'next tuesday',
                 '2026-08-24T09:00:00', '2026-08-24T09:00:00');",
    )
    .unwrap();

    let err = SqliteTodoRepository::try_new(conn).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)), "got: {err}");
}

#[test]
fn corrupt_uuid_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO projects (id, name, created_at)
         VALUES ('not-a-uuid', 'Work', '2026-08-24T09:00:00');",
    )
    .unwrap();

    let err = SqliteTodoRepository::try_new(conn).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)), "got: {err}");
}

#[test]
fn repository_rejects_connection_missing_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoRepository::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("projects"))
    ));
}
