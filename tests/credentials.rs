// tests/credentials.rs

mod common;

use common::{spawn_app, ADMIN_EMAIL, ADMIN_PASSWORD};
use crm_backend::{
    common::error::AppError,
    models::auth::{NewUserPayload, Role},
};
use rstest::rstest;

fn payload(name: &str, email: &str) -> NewUserPayload {
    NewUserPayload {
        name: name.into(),
        email: email.into(),
        password: "correct horse".into(),
        role: None,
    }
}

#[tokio::test]
async fn added_user_validates_with_same_password() {
    let app = spawn_app().await;
    let auth = &app.state.auth_service;

    let created = auth.add_user(payload("mgarcia", "mgarcia@crm.test")).await.unwrap();
    assert_eq!(created.role, Role::User);
    assert!(created.last_login.is_none());

    let validated = auth.validate_user("mgarcia@crm.test", "correct horse").await.unwrap();
    assert_eq!(validated.email, "mgarcia@crm.test");
    assert_eq!(validated.id, created.id);
    assert!(validated.last_login.is_some());
}

#[rstest]
#[case::wrong_password(ADMIN_EMAIL, "nope")]
#[case::unknown_email("ghost@crm.test", ADMIN_PASSWORD)]
#[tokio::test]
async fn login_failures_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
    let app = spawn_app().await;
    let result = app.state.auth_service.login(email, password).await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[rstest]
#[case::same_email("other", "mgarcia@crm.test")]
#[case::same_name("mgarcia", "other@crm.test")]
#[tokio::test]
async fn duplicate_name_or_email_is_rejected(#[case] name: &str, #[case] email: &str) {
    let app = spawn_app().await;
    let auth = &app.state.auth_service;
    auth.add_user(payload("mgarcia", "mgarcia@crm.test")).await.unwrap();

    let result = auth.add_user(payload(name, email)).await;
    assert!(matches!(result, Err(AppError::UniquenessViolation(_))));
}

#[tokio::test]
async fn listed_users_never_expose_hashes() {
    let app = spawn_app().await;
    let users = app.state.auth_service.list_users().await.unwrap();

    assert_eq!(users.len(), 1);
    let json = serde_json::to_string(&users).unwrap();
    assert!(!json.contains("passwordHash"));
    assert!(!json.contains("$2"));
}

#[tokio::test]
async fn bootstrap_admin_runs_only_on_empty_store() {
    let app = spawn_app().await;
    let auth = &app.state.auth_service;

    let admin = auth.validate_user(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    assert_eq!(admin.role, Role::Admin);

    let again = app.state.config.admin.clone().unwrap();
    auth.bootstrap_admin(&again).await.unwrap();
    assert_eq!(auth.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_user_is_idempotent_and_revokes_tokens() {
    let app = spawn_app().await;
    let auth = &app.state.auth_service;
    let user = auth.add_user(payload("temp", "temp@crm.test")).await.unwrap();
    let (token, _) = auth.login("temp@crm.test", "correct horse").await.unwrap();
    assert_eq!(auth.validate_token(&token).await.unwrap().id, user.id);

    auth.delete_user(user.id).await.unwrap();
    auth.delete_user(user.id).await.unwrap();

    assert!(matches!(auth.validate_token(&token).await, Err(AppError::InvalidToken)));
}

#[tokio::test]
async fn assign_role_changes_role_or_reports_missing_user() {
    let app = spawn_app().await;
    let auth = &app.state.auth_service;
    let user = auth.add_user(payload("ana", "ana@crm.test")).await.unwrap();

    let promoted = auth.assign_role(user.id, Role::Admin).await.unwrap();
    assert_eq!(promoted.role, Role::Admin);

    assert!(matches!(auth.assign_role(9999, Role::User).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn invalid_email_fails_validation() {
    let app = spawn_app().await;
    let result = app.state.auth_service.add_user(payload("bob", "not-an-email")).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}
