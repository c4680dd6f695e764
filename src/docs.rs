// src/docs.rs

use utoipa::OpenApi;
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Despacho",
        description = "Painel de embarques, motoristas e compatibilidade de cargas"
    ),
    paths(
        // --- Embarques ---
        handlers::embarques::create_embarque,
        handlers::embarques::list_embarques,
        handlers::embarques::get_embarque,
        handlers::embarques::get_board,
        handlers::embarques::transition_embarque,
        handlers::embarques::assign_driver,

        // --- Matching ---
        handlers::embarques::compute_matches,
        handlers::embarques::list_matches,
        handlers::matching::global_matches,
        handlers::matching::offer_match,
        handlers::matching::accept_match,
        handlers::matching::reject_match,

        // --- Motoristas ---
        handlers::drivers::create_driver,
        handlers::drivers::list_drivers,
        handlers::drivers::driver_cards,
        handlers::drivers::driver_table,
        handlers::drivers::export_drivers,
        handlers::drivers::update_availability,

        // --- Alertas ---
        handlers::alerts::list_alerts,
        handlers::alerts::create_alert,
        handlers::alerts::resolve_alert,

        // --- Configurações ---
        handlers::settings::list_ranking_rules,
        handlers::settings::update_ranking_rules,
        handlers::settings::list_driver_fields,
        handlers::settings::update_driver_field,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Embarques ---
            models::embarque::EmbarqueStatus,
            models::embarque::Embarque,
            models::dashboard::Board,
            models::dashboard::BoardColumn,
            models::dashboard::BoardCard,

            // --- Matching ---
            models::matching::MatchStatus,
            models::matching::CompatibilityLevel,
            models::matching::VehicleMatch,
            models::matching::SubScores,
            models::matching::MatchCandidate,
            models::matching::GlobalMatch,

            // --- Motoristas ---
            models::driver::AvailabilityStatus,
            models::driver::Driver,
            models::field_config::DriverView,
            models::field_config::RenderedField,
            common::csv::Delimiter,

            // --- Alertas ---
            models::alert::AlertSeverity,
            models::alert::OperationalAlert,

            // --- Configurações ---
            models::ranking::RuleKey,
            models::ranking::RankingRule,
            models::field_config::DriverField,
            models::field_config::DriverFieldConfig,
            models::field_config::FieldView,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::StatusCount,
            models::dashboard::SeverityCount,

            // --- Payloads ---
            handlers::embarques::CreateEmbarquePayload,
            handlers::embarques::TransitionEmbarquePayload,
            handlers::embarques::AssignDriverPayload,
            handlers::drivers::CreateDriverPayload,
            handlers::drivers::UpdateAvailabilityPayload,
            handlers::alerts::CreateAlertPayload,
            handlers::settings::RuleUpdatePayload,
            handlers::settings::UpdateFieldPayload,
        )
    ),
    tags(
        (name = "Embarques", description = "Cadastro, quadro e ciclo de vida dos embarques"),
        (name = "Matching", description = "Sugestões de motoristas e ofertas"),
        (name = "Motoristas", description = "Cadastro, disponibilidade e exportação"),
        (name = "Alertas", description = "Alertas operacionais"),
        (name = "Configurações", description = "Pesos do ranking e campos do cadastro"),
        (name = "Dashboard", description = "Indicadores do painel")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/embarques",
            "/api/embarques/board",
            "/api/embarques/{embarque_id}/matches",
            "/api/matching/global",
            "/api/drivers/export",
            "/api/alerts/{alert_id}/resolve",
            "/api/settings/driver-fields/{field_key}",
            "/api/dashboard/summary",
        ] {
            assert!(paths.contains(&expected), "faltando {}", expected);
        }
    }
}
