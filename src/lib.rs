pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod password;
pub mod router;

pub use config::{Config, LoginMode};
pub use db::UserStore;
pub use error::AppError;
