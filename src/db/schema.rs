//! SQL DDL for the coffee and pug tables.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `coffees.name` UNIQUE
/// - `coffees.ingredients` JSON array serialized as text
/// - `pugs.favorite_coffee_id` nullable FK to `coffees(id)`, detached on coffee delete
/// - timestamps stored as RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS coffees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    ingredients TEXT NOT NULL DEFAULT '[]', -- JSON array
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS pugs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    age INTEGER NULL,
    favorite_coffee_id INTEGER NULL REFERENCES coffees(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_pugs_favorite_coffee_id ON pugs(favorite_coffee_id);
"#;

/// Drops both tables, children first.
pub const SQLITE_DROP: &str = r#"
DROP TABLE IF EXISTS pugs;
DROP TABLE IF EXISTS coffees;
"#;
