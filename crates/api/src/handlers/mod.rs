pub mod fabric;
pub mod simulation;
