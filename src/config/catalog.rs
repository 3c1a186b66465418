//! Catalog seed configuration loading from config.toml
//!
//! The users and books listed in config.toml are inserted on startup when the
//! catalog is still empty, which gives a fresh database something to show.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Users to create when missing
    #[serde(default)]
    pub users: Vec<UserConfig>,
    /// Books to create when the catalog is empty
    #[serde(default)]
    pub books: Vec<BookConfig>,
}

/// Configuration for a single user
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
}

/// Configuration for a single book
#[derive(Debug, Deserialize, Clone)]
pub struct BookConfig {
    pub name: String,
    pub author_name: String,
    /// Price as a decimal, e.g. `"100.00"`
    pub price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    /// Username of the owner; the book has no owner when absent
    pub owner: Option<String>,
}

/// Loads the seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration named by `BOOK_STORE_CONFIG`, defaulting to ./config.toml
///
/// A missing file yields an empty configuration; an unreadable or invalid one is an error.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("BOOK_STORE_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

    if Path::new(&path).exists() {
        load_config(&path)
    } else {
        tracing::info!("No seed configuration at {}, starting empty", path);
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            [[users]]
            username = "username1"
            first_name = "Ivan"
            last_name = "Petrov"

            [[users]]
            username = "admin"
            is_staff = true

            [[books]]
            name = "Test book 1"
            author_name = "Author 1"
            price = "100.00"
            discount = "15.00"
            owner = "username1"

            [[books]]
            name = "Test book 2"
            author_name = "Author 2"
            price = "200"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].first_name, "Ivan");
        assert!(!config.users[0].is_staff);
        assert!(config.users[1].is_staff);
        assert_eq!(config.users[1].first_name, "");

        assert_eq!(config.books.len(), 2);
        assert_eq!(config.books[0].price, Decimal::from_str("100").unwrap());
        assert_eq!(config.books[0].owner.as_deref(), Some("username1"));
        assert_eq!(config.books[1].discount, Decimal::ZERO);
        assert!(config.books[1].owner.is_none());
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.users.is_empty());
        assert!(config.books.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("does/not/exist.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
