//! REST client for an OpenAI-compatible API.
//!
//! Covers the two endpoints the simulation pipeline drives: vision chat
//! completions (furniture + fabric description) and image generations.

pub mod api;
pub mod config;
pub mod messages;
