//! Database module: models, schema, storage and seed data.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows plus request payloads
//! - `schema.rs`: SQL DDL for initializing and dropping the tables (SQLite-first)
//! - `sqlite.rs`: `CafeStorage`, the only place SQL is issued
//! - `seed.rs`: deterministic sample rows

pub mod models;
pub mod schema;
pub mod seed;
pub mod sqlite;

pub use models::{Coffee, NewCoffee, NewPug, Pug, PugUpdate};
pub use schema::SQLITE_INIT;
pub use seed::{Seeded, seed};
pub use sqlite::{CafeStorage, SqlitePool};
