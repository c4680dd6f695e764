// src/services/fixtures.rs
//
// Cadastros mínimos para os testes que rodam contra o Postgres.

use sqlx::PgPool;

use crate::{
    config::{AppConfig, AppState},
    models::{
        driver::{AvailabilityStatus, Driver, NewDriver},
        embarque::{Embarque, NewEmbarque},
    },
};

pub(crate) fn state(pool: &PgPool) -> AppState {
    AppState::with_pool(pool.clone(), &AppConfig::for_tests("postgres://despacho@localhost/despacho"))
}

pub(crate) async fn driver(state: &AppState, name: &str, location: &str) -> Driver {
    state
        .driver_service
        .create(
            &state.db_pool,
            NewDriver {
                name: name.to_string(),
                phone: None,
                truck_plate: None,
                vehicle_type: Some("Baú".to_string()),
                availability_status: AvailabilityStatus::Available,
                current_location: Some(location.to_string()),
            },
        )
        .await
        .expect("motorista de teste")
}

pub(crate) async fn embarque(state: &AppState, origin: &str) -> Embarque {
    state
        .embarque_service
        .create(
            &state.db_pool,
            NewEmbarque {
                origin: origin.to_string(),
                destination: "Curitiba - PR".to_string(),
                cargo_type: Some("Carga seca".to_string()),
                total_value: None,
                pickup_window_start: None,
                pickup_window_end: None,
                delivery_window_start: None,
                delivery_window_end: None,
                email_content: None,
                needs_manual_review: false,
            },
        )
        .await
        .expect("embarque de teste")
}
