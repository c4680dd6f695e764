pub mod alert;
pub mod dashboard;
pub mod driver;
pub mod embarque;
pub mod field_config;
pub mod matching;
pub mod ranking;
