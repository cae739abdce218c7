pub mod repository;

pub mod cart;
pub use cart::SledCartStorage;

pub mod config;
pub use config::{AppConfig, CartConfig, ServerConfig};
