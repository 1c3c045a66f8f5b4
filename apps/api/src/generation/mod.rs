// Prompt composition and the two-backend generation fan-out.
// All inference calls go through llm_client; nothing here talks HTTP directly.

pub mod composer;
pub mod generator;
pub mod handlers;
pub mod prompts;
