use todoapp_core::{Project, Todo, ValidationError};

#[test]
fn new_project_is_empty_and_trimmed() {
    let project = Project::new("  Personal ").unwrap();
    assert_eq!(project.name(), "Personal");
    assert!(project.todos().is_empty());
    assert_eq!(project.total_count(), 0);
    assert_eq!(project.completed_count(), 0);
}

#[test]
fn blank_name_is_rejected() {
    assert_eq!(
        Project::new("   ").unwrap_err(),
        ValidationError::EmptyProjectName
    );

    let mut project = Project::new("Work").unwrap();
    assert_eq!(
        project.set_name("").unwrap_err(),
        ValidationError::EmptyProjectName
    );
    assert_eq!(project.name(), "Work");
}

#[test]
fn over_length_name_is_rejected() {
    let long = "n".repeat(101);
    assert!(matches!(
        Project::new(&long).unwrap_err(),
        ValidationError::ProjectNameTooLong { max: 100, .. }
    ));
}

#[test]
fn todos_keep_insertion_order() {
    let mut project = Project::new("Work").unwrap();
    project.add_todo(Todo::new("first").unwrap());
    project.add_todo(Todo::new("second").unwrap());

    let titles: Vec<_> = project.todos().iter().map(Todo::title).collect();
    assert_eq!(titles, ["first", "second"]);
}

#[test]
fn remove_todo_is_idempotent() {
    let mut project = Project::new("Work").unwrap();
    let todo = Todo::new("task").unwrap();
    let id = todo.id();
    project.add_todo(todo);

    project.remove_todo(id);
    assert_eq!(project.total_count(), 0);

    // Removing again is a no-op, not an error.
    project.remove_todo(id);
    assert_eq!(project.total_count(), 0);
}

#[test]
fn upsert_replaces_in_place() {
    let mut project = Project::new("Work").unwrap();
    let mut todo = Todo::new("draft").unwrap();
    project.add_todo(todo.clone());
    project.add_todo(Todo::new("other").unwrap());

    todo.set_done(true);
    project.upsert_todo(todo.clone());

    assert_eq!(project.total_count(), 2);
    assert!(project.find_todo(todo.id()).unwrap().is_done());
    // Replacement keeps the slot, not append order.
    assert_eq!(project.todos()[0].id(), todo.id());
}

#[test]
fn completion_percentage_rounds_and_handles_empty() {
    let mut project = Project::new("Work").unwrap();
    assert_eq!(project.completion_percentage(), 0);
    assert_eq!(project.completion_label(), "0%");

    let mut done = Todo::new("done").unwrap();
    done.set_done(true);
    project.add_todo(done);
    project.add_todo(Todo::new("open a").unwrap());
    project.add_todo(Todo::new("open b").unwrap());

    assert_eq!(project.completed_count(), 1);
    assert_eq!(project.total_count(), 3);
    assert_eq!(project.completion_percentage(), 33);
    assert_eq!(project.completion_label(), "33%");
}
