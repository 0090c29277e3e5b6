// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Public
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login));

    // Everything below requires a bearer token
    let protected_routes = Router::new()
        .route("/api/session", get(handlers::auth::get_session))
        // Users (admin)
        .route(
            "/api/users",
            get(handlers::auth::list_users).post(handlers::auth::create_user),
        )
        .route("/api/users/{id}", delete(handlers::auth::delete_user))
        .route("/api/users/{id}/role", put(handlers::auth::assign_role))
        // Company profile
        .route(
            "/api/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        // Clients
        .route(
            "/api/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route("/api/clients/summary", get(handlers::clients::client_summary))
        .route("/api/clients/history", get(handlers::clients::list_history))
        .route("/api/clients/{id}", get(handlers::clients::get_client))
        .route("/api/clients/{id}/status", put(handlers::clients::update_client_status))
        // Quotes
        .route(
            "/api/quotes",
            get(handlers::quotes::list_quotes).post(handlers::quotes::create_quote),
        )
        .route("/api/quotes/save", post(handlers::quotes::save_quote))
        .route("/api/quotes/next-number", get(handlers::quotes::next_quote_number))
        .route("/api/quotes/trace", get(handlers::quotes::list_trace))
        .route(
            "/api/quotes/{number}",
            get(handlers::quotes::get_quote)
                .put(handlers::quotes::update_quote)
                .delete(handlers::quotes::delete_quote),
        )
        .route("/api/quotes/{number}/convert", post(handlers::quotes::convert_quote))
        .route("/api/quotes/{number}/share", post(handlers::quotes::share_quote))
        .route("/api/quotes/{number}/status", put(handlers::quotes::set_quote_status))
        .route(
            "/api/quotes/{number}/conditions",
            post(handlers::quotes::recalculate_conditions),
        )
        .route("/api/quotes/{number}/document", get(handlers::documents::quote_document))
        // Contracts
        .route(
            "/api/contracts",
            get(handlers::contracts::list_contracts).post(handlers::contracts::create_contract),
        )
        .route(
            "/api/contracts/{id}",
            get(handlers::contracts::get_contract).delete(handlers::contracts::delete_contract),
        )
        .route("/api/contracts/{id}/signatures", put(handlers::contracts::update_signatures))
        .route("/api/contracts/{id}/document", get(handlers::documents::contract_document))
        // Finance
        .route(
            "/api/finance/clients",
            get(handlers::finance::list_client_finance).post(handlers::finance::record_client_finance),
        )
        .route("/api/finance/clients/{id}/payment", put(handlers::finance::record_payment))
        .route(
            "/api/finance/movements",
            get(handlers::finance::list_movements).post(handlers::finance::add_movement),
        )
        .route("/api/finance/summary", get(handlers::finance::ledger_summary))
        // Pipeline
        .route(
            "/api/pipeline",
            get(handlers::pipeline::get_board).post(handlers::pipeline::create_pipeline_client),
        )
        .route("/api/pipeline/counts", get(handlers::pipeline::get_stage_counts))
        .route("/api/pipeline/{id}/advance", post(handlers::pipeline::advance_stage))
        .route("/api/pipeline/{id}/observations", post(handlers::pipeline::add_observation))
        // Dashboard
        .route("/api/dashboard", get(handlers::dashboard::get_summary))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
