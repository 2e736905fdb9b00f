//! Domain types and pure logic shared by every crate in the workspace.
//!
//! Nothing in here talks to the network or the database. The image codec
//! reads local files, everything else is plain data and constants.

pub mod error;
pub mod image_codec;
pub mod pagination;
pub mod simulation;
pub mod types;
