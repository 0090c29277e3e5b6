// tests/contracts.rs

mod common;

use chrono::NaiveDate;
use common::{dec, spawn_app};
use crm_backend::{
    common::error::AppError,
    models::contract::{
        ContractFilter, ContractStatus, EvidenceUpload, NewContract, SignaturesPayload,
        DEFAULT_PAYMENT_METHOD,
    },
};

fn new_contract(title: &str, client: &str, monto: &str) -> NewContract {
    NewContract {
        title: title.into(),
        client: client.into(),
        services: r#"[{"name":"Audit","hours":"10","rate":"50","subtotal":"500"}]"#.into(),
        monto: dec(monto),
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        ..NewContract::default()
    }
}

#[tokio::test]
async fn created_contract_gets_defaults() {
    let app = spawn_app().await;
    let contracts = &app.state.contract_service;

    let contract = contracts
        .create_contract(new_contract("Consultoría", "Acme", "5000"), None)
        .await
        .unwrap();

    assert_eq!(contract.status, ContractStatus::Active);
    assert_eq!(contract.payment_method, DEFAULT_PAYMENT_METHOD);
    assert_eq!(contract.monto, dec("5000"));
    assert!(contract.evidence_path.is_none());
    assert_eq!(contracts.get_contract(contract.id).await.unwrap().title, "Consultoría");
}

#[tokio::test]
async fn non_positive_monto_or_blank_title_is_rejected() {
    let app = spawn_app().await;
    let contracts = &app.state.contract_service;

    for input in [
        new_contract("Consultoría", "Acme", "0"),
        new_contract("Consultoría", "Acme", "-10"),
        new_contract(" ", "Acme", "100"),
    ] {
        let result = contracts.create_contract(input, None).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
    assert!(contracts.list_contracts(&ContractFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn evidence_is_stored_under_a_unique_name() {
    let app = spawn_app().await;
    let contracts = &app.state.contract_service;
    let upload = || EvidenceUpload { file_name: "voucher 1.png".into(), bytes: b"png-bytes".to_vec() };

    let first = contracts
        .create_contract(new_contract("A", "Acme Corp", "100"), Some(upload()))
        .await
        .unwrap();
    let second = contracts
        .create_contract(new_contract("B", "Acme Corp", "100"), Some(upload()))
        .await
        .unwrap();

    let first_path = first.evidence_path.unwrap();
    let second_path = second.evidence_path.unwrap();
    assert_ne!(first_path, second_path);
    assert!(first_path.starts_with(app.dir.path().to_string_lossy().as_ref()));

    let name = std::path::Path::new(&first_path).file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("Acme_Corp_"));
    assert!(name.ends_with("_voucher_1.png"));
    assert_eq!(std::fs::read(&first_path).unwrap(), b"png-bytes");
}

#[tokio::test]
async fn list_filters_by_search_and_status() {
    let app = spawn_app().await;
    let contracts = &app.state.contract_service;
    contracts.create_contract(new_contract("Auditoría", "Acme", "100"), None).await.unwrap();
    let mut to_sign = new_contract("Capacitación", "Globex", "200");
    to_sign.status = Some(ContractStatus::ToSign);
    contracts.create_contract(to_sign, None).await.unwrap();

    let by_title = ContractFilter { search: Some("capa".into()), ..Default::default() };
    let found = contracts.list_contracts(&by_title).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].client, "Globex");

    let active = ContractFilter { status: Some(ContractStatus::Active), ..Default::default() };
    assert_eq!(contracts.list_contracts(&active).await.unwrap()[0].client, "Acme");

    let none = ContractFilter { search: Some("acme".into()), status: Some(ContractStatus::ToSign) };
    assert!(contracts.list_contracts(&none).await.unwrap().is_empty());
}

#[tokio::test]
async fn signatures_are_trimmed_and_blank_clears() {
    let app = spawn_app().await;
    let contracts = &app.state.contract_service;

    let missing = contracts
        .update_signatures(42, SignaturesPayload { client_signature: Some("x".into()), company_signature: None })
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let contract = contracts.create_contract(new_contract("A", "Acme", "100"), None).await.unwrap();
    let signed = contracts
        .update_signatures(
            contract.id,
            SignaturesPayload {
                client_signature: Some("  Jane Doe ".into()),
                company_signature: Some("   ".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(signed.client_signature.as_deref(), Some("Jane Doe"));
    assert!(signed.company_signature.is_none());
}

#[tokio::test]
async fn deleting_an_unknown_id_changes_nothing() {
    let app = spawn_app().await;
    let contracts = &app.state.contract_service;
    let kept = contracts.create_contract(new_contract("A", "Acme", "100"), None).await.unwrap();

    contracts.delete_contract(kept.id + 100).await.unwrap();
    assert_eq!(contracts.list_contracts(&ContractFilter::default()).await.unwrap().len(), 1);

    contracts.delete_contract(kept.id).await.unwrap();
    contracts.delete_contract(kept.id).await.unwrap();
    assert!(matches!(contracts.get_contract(kept.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn failed_insert_leaves_no_evidence_file() {
    let app = spawn_app().await;
    sqlx::query("DROP TABLE contracts").execute(&app.state.stores.contracts).await.unwrap();

    let upload = EvidenceUpload { file_name: "voucher.png".into(), bytes: b"png-bytes".to_vec() };
    let result = app
        .state
        .contract_service
        .create_contract(new_contract("A", "Acme", "100"), Some(upload))
        .await;
    assert!(matches!(result, Err(AppError::DatabaseError(_))));

    let evidence_dir = app.dir.path().join("data").join("evidencias");
    let leftovers = std::fs::read_dir(&evidence_dir).map(|entries| entries.count()).unwrap_or(0);
    assert_eq!(leftovers, 0);
}
