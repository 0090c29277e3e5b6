// tests/common/mod.rs
#![allow(dead_code)]

use std::str::FromStr;

use crm_backend::{
    config::{AdminBootstrap, AppState, Config},
    db::Stores,
    models::{
        auth::{NewUserPayload, Role, UserAccount},
        quote::{QuoteInput, ServiceLine},
    },
};
use rust_decimal::Decimal;
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "admin@crm.test";
pub const ADMIN_PASSWORD: &str = "admin-pass";

/// App state over in-memory stores; files go to a temp dir removed on drop.
pub struct TestApp {
    pub state: AppState,
    pub dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");

    let mut config = Config::with_defaults(dir.path().join("data"), "test-secret");
    config.bcrypt_cost = 4;
    // No fonts there: documents fail to render, which must never block a save.
    config.fonts_dir = dir.path().join("fonts");
    config.admin = Some(AdminBootstrap {
        name: "admin".into(),
        email: ADMIN_EMAIL.into(),
        password: ADMIN_PASSWORD.into(),
    });

    let stores = Stores::in_memory().await.expect("in-memory stores");
    let state = AppState::build(config, stores).await.expect("app state");

    TestApp { state, dir }
}

impl TestApp {
    pub async fn add_user(&self, name: &str, role: Role) -> UserAccount {
        self.state
            .auth_service
            .add_user(NewUserPayload {
                name: name.into(),
                email: format!("{name}@crm.test"),
                password: "secret-pass".into(),
                role: Some(role),
            })
            .await
            .expect("user created")
    }
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("decimal literal")
}

pub fn service(name: &str, hours: &str, rate: &str) -> ServiceLine {
    ServiceLine { name: name.into(), hours: dec(hours), rate: dec(rate), subtotal: Decimal::ZERO }
}

pub fn quote_input(number: &str, client: &str, services: Vec<ServiceLine>) -> QuoteInput {
    QuoteInput {
        number: number.into(),
        client: client.into(),
        services,
        ..QuoteInput::default()
    }
}
