/// Database configuration and connection management
pub mod database;

/// Seed users and books loaded from config.toml
pub mod catalog;
