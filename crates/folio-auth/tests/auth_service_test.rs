//! Integration tests for the identity service backed by in-memory
//! SurrealDB.

use folio_auth::config::AuthConfig;
use folio_auth::service::{AuthService, RegisterInput};
use folio_core::error::FolioError;
use folio_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> AuthService<SurrealUserRepository<surrealdb::engine::local::Db>> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    folio_db::run_migrations(&db).await.unwrap();
    AuthService::new(SurrealUserRepository::new(db), AuthConfig::default())
}

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: email.into(),
        password: "correct horse battery".into(),
    }
}

#[tokio::test]
async fn register_then_login() {
    let service = setup().await;

    let user = service
        .register(register_input("ada@example.com"))
        .await
        .unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.full_name(), "Ada Lovelace");
    assert_ne!(user.password_hash, "correct horse battery");
    assert!(user.last_login_at.is_none());

    let logged_in = service
        .login("ada@example.com", "correct horse battery")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let service = setup().await;

    service
        .register(register_input("ada@example.com"))
        .await
        .unwrap();

    assert!(matches!(
        service.register(register_input("ada@example.com")).await,
        Err(FolioError::Conflict { .. })
    ));
}

#[tokio::test]
async fn short_password_is_rejected() {
    let service = setup().await;

    let mut input = register_input("ada@example.com");
    input.password = "short".into();

    assert!(matches!(
        service.register(input).await,
        Err(FolioError::Conflict { .. })
    ));
}

#[tokio::test]
async fn wrong_password_fails_authentication() {
    let service = setup().await;

    service
        .register(register_input("ada@example.com"))
        .await
        .unwrap();

    assert!(matches!(
        service.login("ada@example.com", "not the password").await,
        Err(FolioError::AuthenticationFailed { .. })
    ));
}

#[tokio::test]
async fn unknown_email_fails_the_same_way() {
    let service = setup().await;

    assert!(matches!(
        service.login("nobody@example.com", "whatever").await,
        Err(FolioError::AuthenticationFailed { .. })
    ));
}

#[tokio::test]
async fn login_stamps_last_login() {
    let service = setup().await;

    service
        .register(register_input("ada@example.com"))
        .await
        .unwrap();
    service
        .login("ada@example.com", "correct horse battery")
        .await
        .unwrap();

    // A second login sees the stamp left by the first.
    let user = service
        .login("ada@example.com", "correct horse battery")
        .await
        .unwrap();
    assert!(user.last_login_at.is_some());
}

#[tokio::test]
async fn deactivated_user_cannot_log_in() {
    let service = setup().await;

    let user = service
        .register(register_input("ada@example.com"))
        .await
        .unwrap();
    service.deactivate(user.id).await.unwrap();

    assert!(matches!(
        service.login("ada@example.com", "correct horse battery").await,
        Err(FolioError::AuthenticationFailed { .. })
    ));

    // A second deactivation no longer finds the user.
    assert!(matches!(
        service.deactivate(user.id).await,
        Err(FolioError::NotFound { .. })
    ));
}
