// src/models/field_config.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Campos do cadastro de motoristas que podem aparecer nas visões.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DriverField {
    Name,
    Phone,
    TruckPlate,
    VehicleType,
    AvailabilityStatus,
    CurrentLocation,
    LastUpdate,
}

impl DriverField {
    pub const ALL: [DriverField; 7] = [
        DriverField::Name,
        DriverField::Phone,
        DriverField::TruckPlate,
        DriverField::VehicleType,
        DriverField::AvailabilityStatus,
        DriverField::CurrentLocation,
        DriverField::LastUpdate,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DriverField::Name => "name",
            DriverField::Phone => "phone",
            DriverField::TruckPlate => "truck_plate",
            DriverField::VehicleType => "vehicle_type",
            DriverField::AvailabilityStatus => "availability_status",
            DriverField::CurrentLocation => "current_location",
            DriverField::LastUpdate => "last_update",
        }
    }

    pub fn parse(key: &str) -> Option<DriverField> {
        DriverField::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn default_label(&self) -> &'static str {
        match self {
            DriverField::Name => "Nome",
            DriverField::Phone => "Telefone",
            DriverField::TruckPlate => "Placa",
            DriverField::VehicleType => "Tipo de veículo",
            DriverField::AvailabilityStatus => "Disponibilidade",
            DriverField::CurrentLocation => "Localização atual",
            DriverField::LastUpdate => "Última atualização",
        }
    }

    // O cartão mostra só o essencial por padrão
    pub fn default_visible_in_card(&self) -> bool {
        matches!(
            self,
            DriverField::Name
                | DriverField::TruckPlate
                | DriverField::VehicleType
                | DriverField::AvailabilityStatus
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverFieldConfig {
    #[schema(example = "truck_plate")]
    pub field_key: String,
    #[schema(example = "Placa")]
    pub label: String,
    pub visible_in_card: bool,
    pub visible_in_table: bool,
    #[schema(example = 2)]
    pub position: i32,
}

impl DriverFieldConfig {
    pub fn defaults() -> Vec<DriverFieldConfig> {
        DriverField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| DriverFieldConfig {
                field_key: field.key().to_string(),
                label: field.default_label().to_string(),
                visible_in_card: field.default_visible_in_card(),
                visible_in_table: true,
                position: i as i32,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldView {
    Card,
    Table,
}

/// Um campo já resolvido (rótulo + valor formatado) para exibição.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub key: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverView {
    pub driver_id: uuid::Uuid,
    pub fields: Vec<RenderedField>,
}
