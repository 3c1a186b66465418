//! Shared test utilities for the book store.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{book, payload::BookInput, user},
    entities::{self, user_book_relation},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::str::FromStr;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a regular (non-staff) test user with empty display names.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    user::create_user(db, username, "", "", false).await
}

/// Creates a staff user.
pub async fn create_staff_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    user::create_user(db, username, "", "", true).await
}

/// Creates a test user with first and last name.
pub async fn create_named_user(
    db: &DatabaseConnection,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> Result<entities::user::Model> {
    user::create_user(db, username, first_name, last_name, false).await
}

/// Creates a test book directly, bypassing permission checks.
///
/// # Arguments
/// * `price` / `discount` - decimal strings such as `"100.00"`
pub async fn create_custom_book(
    db: &DatabaseConnection,
    name: &str,
    author_name: &str,
    price: &str,
    discount: &str,
    owner_id: Option<i64>,
) -> Result<entities::book::Model> {
    let valid = BookInput {
        name: name.to_string(),
        author_name: author_name.to_string(),
        price: Decimal::from_str(price).unwrap_or_default(),
        discount: Decimal::from_str(discount).unwrap_or_default(),
    }
    .validate()?;

    book::insert_book(db, owner_id, valid).await
}

/// Creates a test book with sensible defaults.
///
/// # Defaults
/// * `author_name`: "Author 1"
/// * `price`: 100.00
/// * `discount`: 0.00
pub async fn create_test_book(
    db: &DatabaseConnection,
    name: &str,
    owner_id: Option<i64>,
) -> Result<entities::book::Model> {
    create_custom_book(db, name, "Author 1", "100.00", "0", owner_id).await
}

/// Writes a relation row directly, without recomputing the book rating.
pub async fn rate_directly(
    db: &DatabaseConnection,
    user_id: i64,
    book_id: i64,
    rate: Option<i32>,
) -> Result<entities::user_book_relation::Model> {
    let existing = entities::UserBookRelation::find_by_id((user_id, book_id))
        .one(db)
        .await?;

    match existing {
        Some(relation) => {
            let mut active: user_book_relation::ActiveModel = relation.into();
            active.rate = Set(rate);
            Ok(active.update(db).await?)
        }
        None => Ok(user_book_relation::ActiveModel {
            user_id: Set(user_id),
            book_id: Set(book_id),
            like: Set(false),
            in_bookmarks: Set(false),
            rate: Set(rate),
        }
        .insert(db)
        .await?),
    }
}

/// Sets up a database with one owner and one book owned by them.
/// Returns (db, owner, book) for permission tests.
pub async fn setup_with_book() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::book::Model,
)> {
    let db = setup_test_db().await?;
    let owner = create_test_user(&db, "owner").await?;
    let book = create_test_book(&db, "Test book 1", Some(owner.id)).await?;
    Ok((db, owner, book))
}

/// Sets up a book and three named readers without relations yet.
/// Returns (db, book, readers) for rating tests.
pub async fn setup_with_readers() -> Result<(
    DatabaseConnection,
    entities::book::Model,
    Vec<entities::user::Model>,
)> {
    let db = setup_test_db().await?;
    let users = vec![
        create_named_user(&db, "username1", "Ivan", "Petrov").await?,
        create_named_user(&db, "username2", "Shpak", "Shpakov").await?,
        create_named_user(&db, "username3", "Bisk", "Biskanov").await?,
    ];
    let book = create_custom_book(&db, "Test book 1", "Author 1", "100.00", "15.00", Some(users[0].id))
        .await?;
    Ok((db, book, users))
}
