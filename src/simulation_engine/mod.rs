// simulation_engine/mod.rs
pub mod movement;
pub mod route_progress;
pub mod simulation;
pub mod vehicles;
