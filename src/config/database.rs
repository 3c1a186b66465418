//! Database configuration module for the book store.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Book, User, UserBookRelation};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::debug;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/book_store.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, skipping tables that already exist.
///
/// Users come first because books reference their owner, and relations
/// reference both users and books.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema
        .create_table_from_entity(User)
        .if_not_exists()
        .to_owned();
    let book_table = schema
        .create_table_from_entity(Book)
        .if_not_exists()
        .to_owned();
    let relation_table = schema
        .create_table_from_entity(UserBookRelation)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&book_table)).await?;
    db.execute(builder.build(&relation_table)).await?;

    Ok(())
}
