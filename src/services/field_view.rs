// src/services/field_view.rs

use crate::{
    common::csv::{CsvWriter, Delimiter},
    models::{
        driver::{AvailabilityStatus, Driver},
        field_config::{DriverField, DriverFieldConfig, DriverView, FieldView, RenderedField},
    },
};

/// Campos visíveis na visão pedida, na ordem configurada.
pub fn visible_fields(configs: &[DriverFieldConfig], view: FieldView) -> Vec<(DriverField, &DriverFieldConfig)> {
    let mut fields: Vec<(DriverField, &DriverFieldConfig)> = configs
        .iter()
        .filter(|c| match view {
            FieldView::Card => c.visible_in_card,
            FieldView::Table => c.visible_in_table,
        })
        .filter_map(|c| DriverField::parse(&c.field_key).map(|f| (f, c)))
        .collect();

    fields.sort_by_key(|(_, c)| c.position);
    fields
}

pub fn render_value(driver: &Driver, field: DriverField) -> String {
    match field {
        DriverField::Name => driver.name.clone(),
        DriverField::Phone => driver.phone.clone().unwrap_or_default(),
        DriverField::TruckPlate => driver.truck_plate.clone().unwrap_or_default(),
        DriverField::VehicleType => driver.vehicle_type.clone().unwrap_or_default(),
        DriverField::AvailabilityStatus => match driver.availability_status {
            AvailabilityStatus::Available => "Disponível".to_string(),
            AvailabilityStatus::Busy => "Ocupado".to_string(),
        },
        DriverField::CurrentLocation => driver.current_location.clone().unwrap_or_default(),
        DriverField::LastUpdate => driver.last_update.format("%d/%m/%Y %H:%M").to_string(),
    }
}

pub fn project(driver: &Driver, configs: &[DriverFieldConfig], view: FieldView) -> DriverView {
    let fields = visible_fields(configs, view)
        .into_iter()
        .map(|(field, config)| RenderedField {
            key: config.field_key.clone(),
            label: config.label.clone(),
            value: render_value(driver, field),
        })
        .collect();

    DriverView { driver_id: driver.id, fields }
}

/// Cabeçalho com os rótulos da tabela e uma linha por motorista.
pub fn export_csv(drivers: &[Driver], configs: &[DriverFieldConfig], delimiter: Delimiter) -> String {
    let columns = visible_fields(configs, FieldView::Table);
    let mut writer = CsvWriter::new(delimiter);

    writer.write_row(columns.iter().map(|(_, c)| c.label.as_str()));
    for driver in drivers {
        writer.write_row(columns.iter().map(|(field, _)| render_value(driver, *field)));
    }

    writer.finish()
}
