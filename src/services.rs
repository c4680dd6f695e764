pub mod alert_service;
pub mod board;
pub mod dashboard_service;
pub mod driver_service;
pub mod embarque_service;
pub mod field_view;
pub mod matching_service;
pub mod scoring;
pub mod settings_service;

#[cfg(test)]
pub(crate) mod fixtures;
