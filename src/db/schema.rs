//! SQL DDL for the users table.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, so ids follow insertion order
/// - `username` TEXT, deliberately not UNIQUE
/// - `password` TEXT holding an Argon2 PHC string, never plaintext
/// - `created_at` / `updated_at` TEXT (RFC3339, UTC)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
"#;

/// Run before `SQLITE_INIT` when a destructive reset is requested.
pub const SQLITE_RESET: &str = r#"
DROP INDEX IF EXISTS idx_users_username;
DROP TABLE IF EXISTS users;
"#;
