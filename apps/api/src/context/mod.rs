// Role catalog and role context: spreadsheet loading, relational lookup, bulk import.
// Lookups degrade to empty data; only startup and the importer fail hard.

pub mod handlers;
pub mod ingest;
pub mod roles;
pub mod sheet;
pub mod store;

pub use store::{ContextStore, SqlContextStore};
