pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use client::ApiClient;
pub use config::Config;
pub use error::{AppError, Result};
pub use store::LocalBoard;
