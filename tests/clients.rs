// tests/clients.rs

mod common;

use common::spawn_app;
use crm_backend::{
    common::error::AppError,
    models::client::{ClientFilter, ClientStatus, NewClient, Sector},
    services::client_service::CREATION_ACTION,
};

fn new_client(company: &str, contact: &str, sector: Sector) -> NewClient {
    NewClient {
        company_name: company.into(),
        tax_id: "20123456789".into(),
        address: "Av. Lima 123".into(),
        phone: "+51 999 888 777".into(),
        contact_name: contact.into(),
        contact_title: "Gerente".into(),
        sector,
        status: None,
    }
}

#[tokio::test]
async fn created_client_is_listed_with_one_creation_entry() {
    let app = spawn_app().await;
    let clients = &app.state.client_service;

    let acme = clients
        .create_client(new_client("Acme", "Jane", Sector::Technology), "admin")
        .await
        .unwrap();

    let listed = clients.list_clients(&ClientFilter::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].company_name, "Acme");
    assert_eq!(listed[0].status, ClientStatus::Prospect);
    assert_eq!(listed[0].created_by, "admin");

    let history = clients.list_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].client_id, acme.id);
    assert_eq!(history[0].action, CREATION_ACTION);
}

#[tokio::test]
async fn blank_company_or_contact_writes_nothing() {
    let app = spawn_app().await;
    let clients = &app.state.client_service;

    for input in [
        new_client("  ", "Jane", Sector::Health),
        new_client("Acme", "", Sector::Health),
    ] {
        let result = clients.create_client(input, "admin").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    assert!(clients.list_clients(&ClientFilter::default()).await.unwrap().is_empty());
    assert!(clients.list_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn filters_combine_search_status_and_sector() {
    let app = spawn_app().await;
    let clients = &app.state.client_service;
    clients.create_client(new_client("Acme", "Jane", Sector::Technology), "admin").await.unwrap();
    clients.create_client(new_client("Globex", "Hank", Sector::Technology), "admin").await.unwrap();
    let initech = clients
        .create_client(new_client("Initech", "Bill", Sector::Finance), "admin")
        .await
        .unwrap();
    clients.update_status(initech.id, ClientStatus::Signed, "admin").await.unwrap();

    let tech = ClientFilter { sector: Some(Sector::Technology), ..Default::default() };
    assert_eq!(clients.list_clients(&tech).await.unwrap().len(), 2);

    let search = ClientFilter { search: Some("hank".into()), sector: Some(Sector::Technology), ..Default::default() };
    let found = clients.list_clients(&search).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].company_name, "Globex");

    let signed_tech = ClientFilter {
        status: Some(ClientStatus::Signed),
        sector: Some(Sector::Technology),
        ..Default::default()
    };
    assert!(clients.list_clients(&signed_tech).await.unwrap().is_empty());

    let summary = clients.summary(&ClientFilter::default()).await.unwrap();
    assert_eq!((summary.total, summary.signed, summary.prospects), (3, 1, 2));
}

#[tokio::test]
async fn status_change_is_recorded_in_history() {
    let app = spawn_app().await;
    let clients = &app.state.client_service;
    let acme = clients
        .create_client(new_client("Acme", "Jane", Sector::Industrial), "admin")
        .await
        .unwrap();

    let updated = clients.update_status(acme.id, ClientStatus::WantsQuote, "ana").await.unwrap();
    assert_eq!(updated.status, ClientStatus::WantsQuote);

    let history = clients.list_history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].action, format!("Status: {}", ClientStatus::WantsQuote.label()));
    assert_eq!(history[0].user_name, "ana");

    let missing = clients.update_status(9999, ClientStatus::Signed, "ana").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
