// src/handlers.rs

pub mod alerts;
pub mod dashboard;
pub mod drivers;
pub mod embarques;
pub mod matching;
pub mod settings;
