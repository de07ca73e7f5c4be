use todo_core::db::open_db_in_memory;
use todo_core::{
    ErrorKind, InMemoryUserRepository, RepoError, RequestContext, SqliteUserRepository, User,
    UserRepository, UserService, UserServiceError,
};

fn service() -> (UserService<InMemoryUserRepository>, InMemoryUserRepository) {
    let repo = InMemoryUserRepository::new();
    (UserService::new(repo.clone()), repo)
}

#[test]
fn register_normalizes_email_and_password() {
    let (service, repo) = service();
    let ctx = RequestContext::new();

    service
        .register(&ctx, User::new("  Alice@Example.COM ", "  secret  "))
        .unwrap();

    let stored = repo.find_by_email(&ctx, "alice@example.com").unwrap();
    assert_eq!(stored.password, "secret");
}

#[test]
fn register_rejects_duplicate_email_in_any_casing() {
    let (service, repo) = service();
    let ctx = RequestContext::new();

    service
        .register(&ctx, User::new("user@example.com", "secret"))
        .unwrap();
    let err = service
        .register(&ctx, User::new(" USER@example.com ", "other"))
        .unwrap_err();

    assert!(matches!(err, UserServiceError::AlreadyExists));
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(repo.len(), 1);
    let stored = repo.find_by_email(&ctx, "user@example.com").unwrap();
    assert_eq!(stored.password, "secret");
}

#[test]
fn register_rejects_blank_fields_without_storing() {
    let (service, repo) = service();
    let ctx = RequestContext::new();

    for (email, password) in [("", "secret"), ("   ", "secret"), ("a@b.com", ""), ("a@b.com", " \t ")] {
        let err = service.register(&ctx, User::new(email, password)).unwrap_err();
        assert!(matches!(err, UserServiceError::InvalidInput));
    }
    assert!(repo.is_empty());
}

#[test]
fn register_validation_happens_before_store_access() {
    let (service, _repo) = service();
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = service.register(&ctx, User::new("", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn login_accepts_normalized_credentials() {
    let (service, _repo) = service();
    let ctx = RequestContext::new();
    service
        .register(&ctx, User::new("user@example.com", "secret"))
        .unwrap();

    service.login(&ctx, " User@Example.com ", " secret ").unwrap();
}

#[test]
fn login_failures_are_indistinguishable() {
    let (service, _repo) = service();
    let ctx = RequestContext::new();
    service
        .register(&ctx, User::new("user@example.com", "secret"))
        .unwrap();

    let wrong_password = service.login(&ctx, "user@example.com", "nope").unwrap_err();
    let unknown_user = service.login(&ctx, "ghost@example.com", "secret").unwrap_err();
    let blank = service.login(&ctx, "", "").unwrap_err();

    for err in [wrong_password, unknown_user, blank] {
        assert!(matches!(err, UserServiceError::InvalidCredentials));
        assert_eq!(err.to_string(), "invalid credentials");
    }
}

#[test]
fn login_password_comparison_is_case_sensitive() {
    let (service, _repo) = service();
    let ctx = RequestContext::new();
    service
        .register(&ctx, User::new("user@example.com", "Secret"))
        .unwrap();

    let err = service.login(&ctx, "user@example.com", "secret").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
}

#[test]
fn list_exposes_public_projection_only() {
    let (service, _repo) = service();
    let ctx = RequestContext::new();
    service
        .register(&ctx, User::new("b@example.com", "pw-b"))
        .unwrap();
    service
        .register(&ctx, User::new("a@example.com", "pw-a"))
        .unwrap();

    let users = service.list(&ctx).unwrap();
    let mut emails: Vec<&str> = users.iter().map(|user| user.email.as_str()).collect();
    emails.sort_unstable();
    assert_eq!(emails, vec!["a@example.com", "b@example.com"]);

    let json = serde_json::to_value(&users).unwrap();
    for entry in json.as_array().unwrap() {
        assert!(entry.get("password").is_none());
    }
}

#[test]
fn clear_removes_every_user() {
    let (service, repo) = service();
    let ctx = RequestContext::new();
    service
        .register(&ctx, User::new("a@example.com", "pw"))
        .unwrap();

    service.clear(&ctx).unwrap();
    assert!(repo.is_empty());
    service
        .register(&ctx, User::new("a@example.com", "pw"))
        .unwrap();
}

#[test]
fn cancelled_context_surfaces_as_store_error() {
    let (service, _repo) = service();
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = service.login(&ctx, "a@example.com", "pw").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
    assert!(matches!(err, UserServiceError::Store(RepoError::Context(_))));

    let err = service.list(&ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
}

#[test]
fn sqlite_backed_register_and_login_flow() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let ctx = RequestContext::new();

    service
        .register(&ctx, User::new("User@example.com", "secret"))
        .unwrap();
    service.login(&ctx, "user@example.com", "secret").unwrap();
    let err = service
        .register(&ctx, User::new("user@example.com", "secret"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let users = service.list(&ctx).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "user@example.com");
}
