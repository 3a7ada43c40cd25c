use mytasks_core::db::open_shared_db;
use mytasks_core::{
    App, CoreConfig, RepoError, Role, ServiceError, ServiceErrorKind, UserRepository, ADMIN_NAME,
};
use uuid::Uuid;

#[test]
fn administrator_and_user_scenario() {
    let app = App::in_memory("admin").unwrap();

    let admin = app.authenticate(ADMIN_NAME, "admin").unwrap();
    assert!(admin.has_role(Role::Administrator));

    app.users().add_user(&admin, "alice", "a123").unwrap();

    let alice = app.authenticate("alice", "a123").unwrap();
    assert!(alice.roles().is_empty());

    let created = app.tasks().create_task(&alice, "Write spec").unwrap();
    assert!(!created.is_done());
    assert_eq!(created.title(), "Write spec");
    assert_eq!(app.tasks().list_tasks(&alice).unwrap(), vec![created.clone()]);

    let foreign_id = Uuid::new_v4();
    assert!(!app.ownership().is_owner("alice", foreign_id).unwrap());
    let err = app
        .tasks()
        .edit_task(&alice, foreign_id, "Hijack", true)
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Forbidden);
}

#[test]
fn bootstrap_creates_admin_once_and_keeps_existing_password() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        db_path: dir.path().join("mytasks.sqlite3"),
        admin_password: "first".to_string(),
        ..CoreConfig::default()
    };

    let app = App::open(&config).unwrap();
    app.authenticate(ADMIN_NAME, "first").unwrap();
    drop(app);

    let reopened = App::open(&CoreConfig {
        admin_password: "second".to_string(),
        ..config
    })
    .unwrap();
    reopened.authenticate(ADMIN_NAME, "first").unwrap();
    assert!(reopened.authenticate(ADMIN_NAME, "second").is_err());
}

#[test]
fn tasks_are_isolated_between_users() {
    let app = App::in_memory("admin").unwrap();
    let admin = app.authenticate(ADMIN_NAME, "admin").unwrap();
    app.users().add_user(&admin, "alice", "a").unwrap();
    app.users().add_user(&admin, "bob", "b").unwrap();
    let alice = app.authenticate("alice", "a").unwrap();
    let bob = app.authenticate("bob", "b").unwrap();

    let alice_task = app.tasks().create_task(&alice, "alice only").unwrap();
    let bob_task = app.tasks().create_task(&bob, "bob only").unwrap();

    assert_eq!(app.tasks().list_tasks(&alice).unwrap(), vec![alice_task.clone()]);

    let edit = app.tasks().edit_task(&bob, alice_task.id(), "mine", true);
    assert!(matches!(edit, Err(ServiceError::Forbidden(_))));
    let remove = app.tasks().remove_task(&bob, alice_task.id());
    assert!(matches!(remove, Err(ServiceError::Forbidden(_))));
    assert_eq!(app.tasks().list_tasks(&alice).unwrap(), vec![alice_task.clone()]);

    let edited = app
        .tasks()
        .edit_task(&alice, alice_task.id(), "  done now ", true)
        .unwrap();
    assert_eq!(edited.id(), alice_task.id());
    assert_eq!(edited.title(), "done now");
    assert_eq!(app.tasks().list_tasks(&alice).unwrap(), vec![edited]);

    app.tasks().remove_task(&bob, bob_task.id()).unwrap();
    assert!(app.tasks().list_tasks(&bob).unwrap().is_empty());
}

#[test]
fn edit_with_blank_title_is_a_validation_error_even_for_foreign_tasks() {
    let app = App::in_memory("admin").unwrap();
    let admin = app.authenticate(ADMIN_NAME, "admin").unwrap();

    let err = app
        .tasks()
        .edit_task(&admin, Uuid::new_v4(), "   ", false)
        .unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Validation);

    let err = app.tasks().create_task(&admin, " ").unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Validation);
}

#[test]
fn user_administration_requires_the_administrator_role() {
    let app = App::in_memory("admin").unwrap();
    let admin = app.authenticate(ADMIN_NAME, "admin").unwrap();
    app.users().add_user(&admin, "alice", "a").unwrap();
    let alice = app.authenticate("alice", "a").unwrap();

    for result in [
        app.users().list_user_names(&alice).map(|_| ()),
        app.users().add_user(&alice, "mallory", "m"),
        app.users().update_user(&alice, "alice", "new"),
        app.users().remove_user(&alice, "alice"),
    ] {
        assert_eq!(result.unwrap_err().kind(), ServiceErrorKind::Forbidden);
    }

    assert_eq!(
        app.users().list_user_names(&admin).unwrap(),
        vec![ADMIN_NAME.to_string(), "alice".to_string()]
    );
}

#[test]
fn admin_account_cannot_be_removed_through_the_service() {
    let app = App::in_memory("admin").unwrap();
    let admin = app.authenticate(ADMIN_NAME, "admin").unwrap();

    let err = app.users().remove_user(&admin, ADMIN_NAME).unwrap_err();
    assert_eq!(err.kind(), ServiceErrorKind::Forbidden);
    app.authenticate(ADMIN_NAME, "admin").unwrap();
}

#[test]
fn password_update_and_removal_are_seen_by_authentication() {
    let app = App::in_memory("admin").unwrap();
    let admin = app.authenticate(ADMIN_NAME, "admin").unwrap();
    app.users().add_user(&admin, "alice", "a").unwrap();
    app.authenticate("alice", "a").unwrap();

    app.users().update_user(&admin, "alice", "b").unwrap();
    assert_eq!(
        app.authenticate("alice", "a").unwrap_err().kind(),
        ServiceErrorKind::Unauthenticated
    );
    app.authenticate("alice", "b").unwrap();

    app.users().remove_user(&admin, "alice").unwrap();
    assert!(!app.directory().is_cached("alice"));
    assert_eq!(
        app.authenticate("alice", "b").unwrap_err().kind(),
        ServiceErrorKind::Unauthenticated
    );
}

#[test]
fn service_errors_carry_store_semantics() {
    let app = App::in_memory("admin").unwrap();
    let admin = app.authenticate(ADMIN_NAME, "admin").unwrap();
    app.users().add_user(&admin, "alice", "a").unwrap();

    let duplicate = app.users().add_user(&admin, "alice", "x").unwrap_err();
    assert_eq!(duplicate.kind(), ServiceErrorKind::Conflict);

    let missing = app.users().update_user(&admin, "ghost", "x").unwrap_err();
    assert!(matches!(missing, ServiceError::UserNotFound(ref name) if name == "ghost"));

    let invalid = app.users().add_user(&admin, "", "x").unwrap_err();
    assert_eq!(invalid.kind(), ServiceErrorKind::Validation);
}

#[test]
fn directory_over_a_shared_connection_sees_external_rows_only_through_find_all() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");
    let conn = open_shared_db(&path).unwrap();
    let app = App::from_connection(conn.clone(), "admin").unwrap();

    app.directory().find_by_name(ADMIN_NAME).unwrap();
    conn.lock()
        .execute(
            "UPDATE users SET password = 'rotated' WHERE name = ?1;",
            [ADMIN_NAME],
        )
        .unwrap();

    let cached = app.directory().find_by_name(ADMIN_NAME).unwrap().unwrap();
    assert_eq!(cached.password(), "admin");
    let listed = app.directory().find_all().unwrap();
    assert_eq!(listed[0].password(), "rotated");

    assert!(matches!(
        app.directory().remove_by_name(ADMIN_NAME),
        Err(RepoError::ProtectedUser(_))
    ));
}
