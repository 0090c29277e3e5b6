// tests/quotes.rs

mod common;

use common::{dec, quote_input, service, spawn_app};
use crm_backend::{
    common::error::AppError,
    models::{
        client::{NewClient, Sector},
        contract::{ContractFilter, ContractStatus},
        quote::{DeliverableLine, Modality, QuoteStatus},
    },
};
use rstest::rstest;

#[tokio::test]
async fn monto_and_default_conditions_come_from_the_lines() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;

    let quote = quotes
        .create_quote(quote_input("Q-1", "Acme", vec![service("Audit", "10", "50")]), "admin")
        .await
        .unwrap();

    assert_eq!(quote.monto, dec("500"));
    assert_eq!(quote.services[0].subtotal, dec("500"));
    assert!(quote.payment_conditions.contains("250.00"));
    assert!(quote.payment_conditions.contains("90.00"));
    assert_eq!(quote.status, QuoteStatus::Drafted);
    assert_eq!(quote.modality, vec![Modality::Presencial]);
    assert_eq!((quote.hours_per_day, quote.sessions), (8, 1));
    assert_eq!(quote.estimated_days, dec("1.25"));

    let stored = quotes.get_quote("Q-1").await.unwrap();
    assert_eq!(stored.monto, dec("500"));
    assert_eq!(stored.payment_conditions, quote.payment_conditions);
}

#[rstest]
#[case::no_monto(None)]
#[case::too_high(Some("99999"))]
#[case::zero(Some("0"))]
#[tokio::test]
async fn submitted_monto_is_ignored(#[case] submitted: Option<&str>) {
    let app = spawn_app().await;
    let mut input = quote_input("Q-2", "Acme", vec![service("A", "2", "100"), service("B", "1.5", "40")]);
    input.deliverables = vec![DeliverableLine {
        name: "Informe".into(),
        description: "Final".into(),
        subtotal: dec("150.50"),
    }];
    input.monto = submitted.map(dec);

    let quote = app.state.quote_service.save_quote(input, "admin").await.unwrap();
    assert_eq!(quote.monto, dec("410.50"));
}

#[tokio::test]
async fn caller_conditions_text_is_kept_verbatim() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;
    let mut input = quote_input("Q-3", "Acme", vec![service("Audit", "10", "50")]);
    input.payment_conditions = "Pago único al cierre".into();

    let quote = quotes.create_quote(input, "admin").await.unwrap();
    assert_eq!(quote.payment_conditions, "Pago único al cierre");

    let recalculated = quotes.recalculate_conditions("Q-3").await.unwrap();
    assert!(recalculated.payment_conditions.contains("250.00"));
    assert_eq!(quotes.get_quote("Q-3").await.unwrap().payment_conditions, recalculated.payment_conditions);
}

#[tokio::test]
async fn saving_an_existing_number_replaces_and_traces_once_more() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;

    quotes
        .save_quote(quote_input("Q-1", "Acme", vec![service("Audit", "10", "50")]), "admin")
        .await
        .unwrap();
    let mut second = quote_input("Q-1", "Globex", vec![service("Training", "4", "25")]);
    second.problem = "Nuevo problema".into();
    quotes.save_quote(second, "ana").await.unwrap();

    assert_eq!(quotes.count().await.unwrap(), 1);
    let stored = quotes.get_quote("Q-1").await.unwrap();
    assert_eq!(stored.client, "Globex");
    assert_eq!(stored.monto, dec("100"));
    assert_eq!(stored.problem, "Nuevo problema");
    assert_eq!(stored.services.len(), 1);

    let trace = quotes.list_trace().await.unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace[0].user_name, "ana");
    assert_eq!(trace[0].monto, dec("100"));
    assert_eq!(trace[1].monto, dec("500"));
}

#[tokio::test]
async fn explicit_create_and_update_check_the_number() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;

    let missing = quotes.update_quote(quote_input("Q-9", "Acme", vec![]), "admin").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    quotes.create_quote(quote_input("Q-9", "Acme", vec![]), "admin").await.unwrap();
    let duplicate = quotes.create_quote(quote_input("Q-9", "Acme", vec![]), "admin").await;
    assert!(matches!(duplicate, Err(AppError::UniquenessViolation(_))));

    let updated = quotes
        .update_quote(quote_input("Q-9", "Acme", vec![service("x", "1", "10")]), "admin")
        .await
        .unwrap();
    assert_eq!(updated.monto, dec("10"));
    assert_eq!(quotes.list_trace().await.unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_write() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;

    let mut input = quote_input("Q-5", "Acme", vec![service("Audit", "-1", "50")]);
    assert!(matches!(quotes.save_quote(input.clone(), "admin").await, Err(AppError::ValidationError(_))));

    input.services = vec![];
    input.hours_per_day = Some(0);
    assert!(matches!(quotes.save_quote(input, "admin").await, Err(AppError::ValidationError(_))));

    let blank = quote_input(" ", "Acme", vec![]);
    assert!(matches!(quotes.save_quote(blank, "admin").await, Err(AppError::ValidationError(_))));

    assert_eq!(quotes.count().await.unwrap(), 0);
    assert!(quotes.list_trace().await.unwrap().is_empty());
}

#[tokio::test]
async fn registry_client_snapshot_is_copied_at_save_time() {
    let app = spawn_app().await;
    app.state
        .client_service
        .create_client(
            NewClient {
                company_name: "Acme".into(),
                tax_id: "20111111111".into(),
                address: "Av. Lima 1".into(),
                phone: "555".into(),
                contact_name: "Jane".into(),
                contact_title: "CEO".into(),
                sector: Sector::Technology,
                status: None,
            },
            "admin",
        )
        .await
        .unwrap();

    let mut input = quote_input("Q-7", "Acme", vec![]);
    input.contact = "Someone else".into();
    let quote = app.state.quote_service.save_quote(input, "admin").await.unwrap();

    assert_eq!(quote.tax_id, "20111111111");
    assert_eq!(quote.contact, "Jane");
    assert_eq!(quote.sector, Sector::Technology.label());

    let mut unknown = quote_input("Q-8", "Unknown Co", vec![]);
    unknown.contact = "Walk-in".into();
    let quote = app.state.quote_service.save_quote(unknown, "admin").await.unwrap();
    assert_eq!(quote.contact, "Walk-in");
}

#[tokio::test]
async fn converting_twice_yields_two_contracts() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;
    let contracts = &app.state.contract_service;

    let quote = quotes
        .create_quote(quote_input("Q-1", "Acme", vec![service("Audit", "10", "50")]), "admin")
        .await
        .unwrap();

    let first = quotes.convert_to_contract("Q-1").await.unwrap();
    assert_eq!(first.status, ContractStatus::ToSign);
    assert_eq!(first.client, "Acme");
    assert_eq!(first.monto, dec("500"));
    assert_eq!(first.start_date, quote.date);
    assert!(first.services.contains("Audit"));
    assert_eq!(quotes.get_quote("Q-1").await.unwrap().status, QuoteStatus::Converted);

    quotes.convert_to_contract("Q-1").await.unwrap();
    assert_eq!(contracts.list_contracts(&ContractFilter::default()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn converting_an_unknown_quote_creates_nothing() {
    let app = spawn_app().await;
    let result = app.state.quote_service.convert_to_contract("nope").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let contracts = app.state.contract_service.list_contracts(&ContractFilter::default()).await.unwrap();
    assert!(contracts.is_empty());
}

#[tokio::test]
async fn corrupted_lines_are_listed_empty_with_a_visible_error() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;
    quotes
        .save_quote(quote_input("Q-1", "Acme", vec![service("Audit", "10", "50")]), "admin")
        .await
        .unwrap();
    quotes.save_quote(quote_input("Q-2", "Acme", vec![]), "admin").await.unwrap();

    sqlx::query("UPDATE quotes SET services = '[{name: broken' WHERE number = 'Q-1'")
        .execute(&app.state.stores.quotes)
        .await
        .unwrap();

    let listed = quotes.list_quotes().await.unwrap();
    assert_eq!(listed.len(), 2);

    let broken = listed.iter().find(|q| q.number == "Q-1").unwrap();
    assert!(broken.services.is_empty());
    assert_eq!(broken.decode_errors.len(), 1);
    assert!(broken.decode_errors[0].contains("services"));

    let healthy = listed.iter().find(|q| q.number == "Q-2").unwrap();
    assert!(healthy.decode_errors.is_empty());
}

#[tokio::test]
async fn next_number_follows_the_count() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;
    assert_eq!(quotes.next_quote_number().await.unwrap(), "0001");

    quotes.save_quote(quote_input("A", "Acme", vec![]), "admin").await.unwrap();
    quotes.save_quote(quote_input("B", "Acme", vec![]), "admin").await.unwrap();
    assert_eq!(quotes.next_quote_number().await.unwrap(), "0003");
}

#[tokio::test]
async fn sharing_builds_the_link_and_marks_sent() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;
    quotes.save_quote(quote_input("0001", "Acme", vec![]), "admin").await.unwrap();

    let shared = quotes.share_quote("0001", "+51 987 654 321").await.unwrap();
    assert!(shared.link.starts_with("https://wa.me/51987654321?text="));
    assert_eq!(shared.status, QuoteStatus::Sent);
    assert_eq!(quotes.get_quote("0001").await.unwrap().status, QuoteStatus::Sent);

    let no_digits = quotes.share_quote("0001", "call me").await;
    assert!(matches!(no_digits, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;
    quotes.save_quote(quote_input("Q-1", "Acme", vec![]), "admin").await.unwrap();

    quotes.delete_quote("Q-1").await.unwrap();
    quotes.delete_quote("Q-1").await.unwrap();
    assert!(matches!(quotes.get_quote("Q-1").await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn render_failure_surfaces_only_on_explicit_request() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;

    // The save succeeds even though no font is available.
    quotes.save_quote(quote_input("Q-1", "Acme", vec![]), "admin").await.unwrap();

    let rendered = quotes.render_document("Q-1").await;
    assert!(matches!(rendered, Err(AppError::DocumentRender(_))));
}

#[rstest]
#[case::deliverables_beyond_the_bound("50000000000000000000000000000", "1", "1")]
#[case::subtotal_just_over("1000000000000.01", "1", "1")]
#[case::hours_over("1", "1000000000001", "1")]
#[case::rate_over("1", "1", "1000000000001")]
#[tokio::test]
async fn oversized_amounts_are_rejected_before_any_write(
    #[case] subtotal: &str,
    #[case] hours: &str,
    #[case] rate: &str,
) {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;
    let line = |name: &str| DeliverableLine { name: name.into(), description: String::new(), subtotal: dec(subtotal) };
    let mut input = quote_input("Q-1", "Acme", vec![service("Audit", hours, rate)]);
    input.deliverables = vec![line("a"), line("b")];

    let result = quotes.save_quote(input, "admin").await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(quotes.count().await.unwrap(), 0);
    assert!(quotes.list_trace().await.unwrap().is_empty());
}

#[tokio::test]
async fn amounts_at_the_bound_still_compute() {
    let app = spawn_app().await;
    let mut input = quote_input("Q-1", "Acme", vec![service("Audit", "1000000000000", "1000000000000")]);
    input.deliverables = vec![DeliverableLine {
        name: "Informe".into(),
        description: String::new(),
        subtotal: dec("1000000000000"),
    }];

    let quote = app.state.quote_service.save_quote(input, "admin").await.unwrap();
    assert_eq!(quote.monto, dec("1000000000001000000000000"));
    assert!(!quote.payment_conditions.is_empty());
}

#[tokio::test]
async fn failed_conversion_commit_removes_the_contract() {
    let app = spawn_app().await;
    let quotes = &app.state.quote_service;
    quotes
        .create_quote(quote_input("Q-1", "Acme", vec![service("Audit", "10", "50")]), "admin")
        .await
        .unwrap();

    // A deferred foreign key broken by every status change only fails at COMMIT.
    for statement in [
        "PRAGMA foreign_keys = ON",
        "CREATE TABLE status_owner (id INTEGER PRIMARY KEY)",
        "CREATE TABLE status_guard (owner INTEGER REFERENCES status_owner(id) DEFERRABLE INITIALLY DEFERRED)",
        "CREATE TRIGGER status_guard_insert AFTER UPDATE OF status ON quotes \
         BEGIN INSERT INTO status_guard (owner) VALUES (999); END",
    ] {
        sqlx::query(statement).execute(&app.state.stores.quotes).await.unwrap();
    }

    let result = quotes.convert_to_contract("Q-1").await;
    assert!(matches!(result, Err(AppError::DatabaseError(_))));

    let contracts = app.state.contract_service.list_contracts(&ContractFilter::default()).await.unwrap();
    assert!(contracts.is_empty());
    assert_ne!(quotes.get_quote("Q-1").await.unwrap().status, QuoteStatus::Converted);
}
