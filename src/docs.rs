// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_session,

        // --- Users ---
        handlers::auth::list_users,
        handlers::auth::create_user,
        handlers::auth::delete_user,
        handlers::auth::assign_role,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::client_summary,
        handlers::clients::list_history,
        handlers::clients::get_client,
        handlers::clients::update_client_status,

        // --- Quotes ---
        handlers::quotes::create_quote,
        handlers::quotes::save_quote,
        handlers::quotes::list_quotes,
        handlers::quotes::next_quote_number,
        handlers::quotes::list_trace,
        handlers::quotes::get_quote,
        handlers::quotes::update_quote,
        handlers::quotes::delete_quote,
        handlers::quotes::convert_quote,
        handlers::quotes::share_quote,
        handlers::quotes::set_quote_status,
        handlers::quotes::recalculate_conditions,
        handlers::documents::quote_document,

        // --- Contracts ---
        handlers::contracts::create_contract,
        handlers::contracts::list_contracts,
        handlers::contracts::get_contract,
        handlers::contracts::update_signatures,
        handlers::contracts::delete_contract,
        handlers::documents::contract_document,

        // --- Finance ---
        handlers::finance::record_client_finance,
        handlers::finance::list_client_finance,
        handlers::finance::record_payment,
        handlers::finance::add_movement,
        handlers::finance::list_movements,
        handlers::finance::ledger_summary,

        // --- Pipeline ---
        handlers::pipeline::get_board,
        handlers::pipeline::get_stage_counts,
        handlers::pipeline::create_pipeline_client,
        handlers::pipeline::advance_stage,
        handlers::pipeline::add_observation,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserAccount,
            models::auth::NewUserPayload,
            models::auth::LoginPayload,
            models::auth::AssignRolePayload,
            models::auth::AuthResponse,
            models::session::Screen,
            models::session::SessionInfo,

            // --- Settings ---
            models::settings::CompanyProfile,
            models::settings::SaveProfilePayload,

            // --- Clients ---
            models::client::Sector,
            models::client::ClientStatus,
            models::client::Client,
            models::client::NewClient,
            models::client::ClientSummary,
            models::client::HistoryEntry,
            models::client::UpdateClientStatusPayload,

            // --- Quotes ---
            models::quote::QuoteStatus,
            models::quote::Modality,
            models::quote::ServiceLine,
            models::quote::DeliverableLine,
            models::quote::Quote,
            models::quote::QuoteInput,
            models::quote::TraceEntry,
            models::quote::ShareQuotePayload,
            models::quote::ShareLinkResponse,
            models::quote::SetQuoteStatusPayload,
            models::quote::NextQuoteNumber,

            // --- Contracts ---
            models::contract::ContractStatus,
            models::contract::Contract,
            models::contract::NewContract,
            models::contract::ContractForm,
            models::contract::SignaturesPayload,

            // --- Finance ---
            models::finance::ClientFinance,
            models::finance::BalanceBucket,
            models::finance::BalanceBuckets,
            models::finance::NewClientFinance,
            models::finance::RecordPaymentPayload,
            models::finance::MovementKind,
            models::finance::Movement,
            models::finance::NewMovement,
            models::finance::MovementWithBalance,
            models::finance::LedgerSummary,

            // --- Pipeline ---
            models::pipeline::Stage,
            models::pipeline::Observation,
            models::pipeline::PipelineClient,
            models::pipeline::NewPipelineClient,
            models::pipeline::AddObservationPayload,
            models::pipeline::StageColumn,
            models::pipeline::StageCount,
            models::pipeline::StageCounts,

            // --- Dashboard ---
            models::dashboard::ContractStatusCount,
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Inicio de sesión y sesión actual"),
        (name = "Users", description = "Gestión de usuarios (administrador)"),
        (name = "Settings", description = "Membrete de la empresa"),
        (name = "Clients", description = "Registro de clientes e historial"),
        (name = "Quotes", description = "Cotizaciones, trazabilidad y conversión a contrato"),
        (name = "Contracts", description = "Contratos, evidencias y firmas"),
        (name = "Finance", description = "Finanzas por cliente y libro de movimientos"),
        (name = "Pipeline", description = "Seguimiento de proyectos por etapa"),
        (name = "Dashboard", description = "Indicadores generales")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
