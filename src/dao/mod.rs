/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
/// Tournament persistence backends.
pub mod tournament_store;
