//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod fabric_repo;
pub mod simulation_repo;

pub use fabric_repo::FabricRepo;
pub use simulation_repo::SimulationRepo;
