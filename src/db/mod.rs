//! Database module: the users table, its row types, and the store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and their public projections
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: `UserStore`, the only component that touches the pool

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{User, UserProfile, UserSummary};
pub use sqlite::UserStore;
