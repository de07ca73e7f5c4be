//! One contract suite, run against every repository variant.

use rusqlite::Connection;
use todo_core::db::open_db_in_memory;
use todo_core::{
    ContextError, InMemoryTodoRepository, InMemoryUserRepository, NewTodo, RepoError,
    RequestContext, SqliteTodoRepository, SqliteUserRepository, TodoId, TodoRepository,
    TodoUpdate, User, UserRepository,
};

fn new_todo(email: &str, title: &str, created_at: i64) -> NewTodo {
    NewTodo {
        email: email.to_string(),
        title: title.to_string(),
        completed: false,
        created_at,
    }
}

fn user_contract(repo: &impl UserRepository) {
    let ctx = RequestContext::new();

    let missing = repo.find_by_email(&ctx, "alice@example.com").unwrap_err();
    assert!(missing.is_not_found());
    assert!(matches!(missing, RepoError::UserNotFound(ref email) if email == "alice@example.com"));

    repo.insert(&ctx, &User::new("bob@example.com", "hidden")).unwrap();
    repo.insert(&ctx, &User::new("alice@example.com", "secret")).unwrap();

    let found = repo.find_by_email(&ctx, "alice@example.com").unwrap();
    assert_eq!(found, User::new("alice@example.com", "secret"));

    let emails: Vec<String> = repo
        .list(&ctx)
        .unwrap()
        .into_iter()
        .map(|user| user.email)
        .collect();
    assert_eq!(emails, vec!["alice@example.com", "bob@example.com"]);

    repo.clear(&ctx).unwrap();
    assert!(repo.list(&ctx).unwrap().is_empty());
}

fn todo_contract(repo: &impl TodoRepository) {
    let ctx = RequestContext::new();

    let second = repo.create(&ctx, new_todo("alice@example.com", "second", 200)).unwrap();
    let first = repo.create(&ctx, new_todo("alice@example.com", "first", 100)).unwrap();
    let bobs = repo.create(&ctx, new_todo("bob@example.com", "bob's", 150)).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.title, "first");
    assert!(!first.completed);

    let titles: Vec<String> = repo
        .list(&ctx, "")
        .unwrap()
        .into_iter()
        .map(|todo| todo.title)
        .collect();
    assert_eq!(titles, vec!["first", "bob's", "second"]);

    let alice_only = repo.list(&ctx, "alice@example.com").unwrap();
    assert_eq!(alice_only.len(), 2);
    assert!(alice_only.iter().all(|todo| todo.email == "alice@example.com"));

    let updated = repo
        .update(&ctx, first.id, &TodoUpdate::completed(true))
        .unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.title, "first");
    assert!(updated.completed);

    let renamed = repo
        .update(&ctx, first.id, &TodoUpdate::title("renamed"))
        .unwrap();
    assert_eq!(renamed.title, "renamed");
    assert!(renamed.completed);

    let unknown = TodoId::generate();
    let err = repo
        .update(&ctx, unknown, &TodoUpdate::completed(true))
        .unwrap_err();
    assert!(matches!(err, RepoError::TodoNotFound(id) if id == unknown));

    repo.delete(&ctx, bobs.id).unwrap();
    let err = repo.delete(&ctx, bobs.id).unwrap_err();
    assert!(matches!(err, RepoError::TodoNotFound(id) if id == bobs.id));

    repo.create(&ctx, new_todo("bob@example.com", "again", 300)).unwrap();
    repo.clear(&ctx, "alice@example.com").unwrap();
    let remaining = repo.list(&ctx, "").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].email, "bob@example.com");

    repo.clear(&ctx, "").unwrap();
    assert!(repo.list(&ctx, "").unwrap().is_empty());
}

fn equal_timestamps_keep_creation_order(repo: &impl TodoRepository) {
    let ctx = RequestContext::new();
    for title in ["a", "b", "c", "d"] {
        repo.create(&ctx, new_todo("x@example.com", title, 7)).unwrap();
    }
    let titles: Vec<String> = repo
        .list(&ctx, "x@example.com")
        .unwrap()
        .into_iter()
        .map(|todo| todo.title)
        .collect();
    assert_eq!(titles, vec!["a", "b", "c", "d"]);
}

fn cancelled_context_is_rejected(users: &impl UserRepository, todos: &impl TodoRepository) {
    let ctx = RequestContext::new();
    ctx.cancel();

    assert!(matches!(
        users.list(&ctx),
        Err(RepoError::Context(ContextError::Cancelled))
    ));
    assert!(matches!(
        todos.create(&ctx, new_todo("a@b.com", "never stored", 1)),
        Err(RepoError::Context(ContextError::Cancelled))
    ));
    assert!(todos.list(&RequestContext::new(), "").unwrap().is_empty());
}

fn sqlite() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn sqlite_user_repository_honors_contract() {
    let conn = sqlite();
    user_contract(&SqliteUserRepository::try_new(&conn).unwrap());
}

#[test]
fn memory_user_repository_honors_contract() {
    user_contract(&InMemoryUserRepository::new());
}

#[test]
fn sqlite_todo_repository_honors_contract() {
    let conn = sqlite();
    todo_contract(&SqliteTodoRepository::try_new(&conn).unwrap());
}

#[test]
fn memory_todo_repository_honors_contract() {
    todo_contract(&InMemoryTodoRepository::new());
}

#[test]
fn sqlite_list_keeps_creation_order_for_equal_timestamps() {
    let conn = sqlite();
    equal_timestamps_keep_creation_order(&SqliteTodoRepository::try_new(&conn).unwrap());
}

#[test]
fn memory_list_keeps_creation_order_for_equal_timestamps() {
    equal_timestamps_keep_creation_order(&InMemoryTodoRepository::new());
}

#[test]
fn sqlite_repositories_reject_cancelled_context() {
    let conn = sqlite();
    cancelled_context_is_rejected(
        &SqliteUserRepository::try_new(&conn).unwrap(),
        &SqliteTodoRepository::try_new(&conn).unwrap(),
    );
}

#[test]
fn memory_repositories_reject_cancelled_context() {
    cancelled_context_is_rejected(&InMemoryUserRepository::new(), &InMemoryTodoRepository::new());
}

#[test]
fn sqlite_rejects_undecodable_rows() {
    let conn = sqlite();
    conn.execute(
        "INSERT INTO todos (uuid, email, title, completed, created_at)
         VALUES ('not-a-uuid', 'a@b.com', 'broken', 0, 1);",
        [],
    )
    .unwrap();

    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let err = repo.list(&RequestContext::new(), "").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(ref message) if message.contains("not-a-uuid")));
}

#[test]
fn sqlite_duplicate_user_insert_is_a_store_error() {
    let conn = sqlite();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    let ctx = RequestContext::new();

    repo.insert(&ctx, &User::new("a@b.com", "one")).unwrap();
    let err = repo.insert(&ctx, &User::new("a@b.com", "two")).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}
