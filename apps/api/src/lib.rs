//! Art Of Prompting API: role-aware prompt composition, two-model generation,
//! and report export over a small JSON API with a bundled browser UI.

pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod report;
pub mod routes;
pub mod state;
