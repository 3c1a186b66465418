//! Seeding the catalog from configuration.
//!
//! Users are created when their username is not taken yet. Books are only
//! inserted into an empty catalog so restarting never duplicates them.

use crate::{
    config::catalog::Config,
    core::{
        book::insert_book,
        payload::BookInput,
        user::{create_user, get_user_by_username},
    },
    entities::Book,
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users_created: usize,
    pub books_created: usize,
}

/// Inserts the configured users and, for an empty catalog, the configured books.
pub async fn seed_catalog(db: &DatabaseConnection, config: &Config) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    let txn = db.begin().await?;

    for user in &config.users {
        if get_user_by_username(&txn, user.username.trim()).await?.is_some() {
            debug!("User '{}' already exists. Skipping.", user.username);
            continue;
        }
        create_user(
            &txn,
            &user.username,
            &user.first_name,
            &user.last_name,
            user.is_staff,
        )
        .await?;
        summary.users_created += 1;
    }

    let existing_books = Book::find().count(&txn).await?;
    if existing_books > 0 {
        info!(
            "Catalog already holds {} books, not seeding books.",
            existing_books
        );
    } else {
        for book in &config.books {
            let owner_id = match &book.owner {
                Some(username) => Some(
                    get_user_by_username(&txn, username)
                        .await?
                        .ok_or_else(|| Error::UserNotFound {
                            username: username.clone(),
                        })?
                        .id,
                ),
                None => None,
            };

            let valid = BookInput {
                name: book.name.clone(),
                author_name: book.author_name.clone(),
                price: book.price,
                discount: book.discount,
            }
            .validate()?;
            insert_book(&txn, owner_id, valid).await?;
            summary.books_created += 1;
        }
    }

    txn.commit().await?;
    info!(
        users = summary.users_created,
        books = summary.books_created,
        "Seeded catalog"
    );
    Ok(summary)
}
