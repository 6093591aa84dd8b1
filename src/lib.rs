pub mod global_variables;
pub mod models;
pub mod monitoring;
pub mod simulation_engine;
pub mod status_engine;
