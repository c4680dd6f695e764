// src/models/driver.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "availability_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Busy,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Busy => "busy",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    #[schema(example = "João da Silva")]
    pub name: String,
    #[schema(example = "(19) 99999-0000")]
    pub phone: Option<String>,
    #[schema(example = "ABC1D23")]
    pub truck_plate: Option<String>,
    #[schema(example = "Baú refrigerado")]
    pub vehicle_type: Option<String>,
    pub availability_status: AvailabilityStatus,
    #[schema(example = "Campinas - SP")]
    pub current_location: Option<String>,
    pub last_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Histórico agregado do motorista, usado na nota de compatibilidade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverHistory {
    pub driver_id: Uuid,
    pub completed_deliveries: i64,
    pub accepted_offers: i64,
    pub rejected_offers: i64,
    pub avg_accepted_value: Option<f64>,
}

// Filtros usados na listagem e na exportação
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DriverFilter {
    pub availability: Option<AvailabilityStatus>,
    pub vehicle_type: Option<String>,
    /// Busca por nome ou placa (sem diferenciar maiúsculas).
    pub search: Option<String>,
}

impl DriverFilter {
    pub fn matches(&self, driver: &Driver) -> bool {
        if let Some(status) = self.availability {
            if driver.availability_status != status {
                return false;
            }
        }

        if let Some(wanted) = non_blank(&self.vehicle_type) {
            let actual = driver.vehicle_type.as_deref().unwrap_or_default();
            if !actual.to_lowercase().contains(&wanted.to_lowercase()) {
                return false;
            }
        }

        if let Some(term) = non_blank(&self.search) {
            let term = term.to_lowercase();
            let in_name = driver.name.to_lowercase().contains(&term);
            let in_plate = driver
                .truck_plate
                .as_deref()
                .map(|p| p.to_lowercase().contains(&term))
                .unwrap_or(false);
            if !in_name && !in_plate {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, drivers: Vec<Driver>) -> Vec<Driver> {
        drivers.into_iter().filter(|d| self.matches(d)).collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct NewDriver {
    pub name: String,
    pub phone: Option<String>,
    pub truck_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub availability_status: AvailabilityStatus,
    pub current_location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(name: &str, plate: &str, vehicle: &str, status: AvailabilityStatus) -> Driver {
        Driver {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: None,
            truck_plate: Some(plate.to_string()),
            vehicle_type: Some(vehicle.to_string()),
            availability_status: status,
            current_location: Some("Campinas - SP".to_string()),
            last_update: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_filter_keeps_everyone() {
        let drivers = vec![
            driver("Ana", "AAA1111", "Truck", AvailabilityStatus::Available),
            driver("Bruno", "BBB2222", "Carreta", AvailabilityStatus::Busy),
        ];
        assert_eq!(DriverFilter::default().apply(drivers).len(), 2);
    }

    #[test]
    fn filters_by_availability_and_search() {
        let drivers = vec![
            driver("Ana Souza", "AAA1111", "Truck", AvailabilityStatus::Available),
            driver("Bruno Lima", "BBB2222", "Carreta", AvailabilityStatus::Available),
            driver("Carla Dias", "CCC3333", "Truck", AvailabilityStatus::Busy),
        ];
        let filter = DriverFilter {
            availability: Some(AvailabilityStatus::Available),
            vehicle_type: None,
            search: Some("bbb".to_string()),
        };
        let result = filter.apply(drivers);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Bruno Lima");
    }

    #[test]
    fn blank_search_is_ignored() {
        let drivers = vec![driver("Ana", "AAA1111", "Truck", AvailabilityStatus::Busy)];
        let filter = DriverFilter {
            search: Some("   ".to_string()),
            vehicle_type: Some("truck".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(drivers).len(), 1);
    }
}
