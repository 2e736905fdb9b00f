//! Row structs and insert DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row. Writable tables also get a create DTO.

pub mod fabric;
pub mod simulation;
