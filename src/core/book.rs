//! Book business logic - Creating, updating and deleting catalog books.
//!
//! Reads go through [`crate::core::listing`]. Every mutation needs an
//! [`Identity`]; updates and deletes additionally require ownership or staff.

use crate::{
    core::{
        listing,
        payload::{BookChanges, BookInput, BookRecord, ValidBook},
        permissions::{self, Identity},
    },
    entities::{Book, UserBookRelation, book, user_book_relation},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::info;

/// Inserts a validated book owned by `owner_id`.
pub async fn insert_book<C>(db: &C, owner_id: Option<i64>, book: ValidBook) -> Result<book::Model>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now().naive_utc();

    let model = book::ActiveModel {
        name: Set(book.name),
        author_name: Set(book.author_name),
        price_cents: Set(book.price_cents),
        discount_cents: Set(book.discount_cents),
        rating_hundredths: Set(None),
        owner_id: Set(owner_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(book_id = model.id, ?owner_id, name = %model.name, "Created book");
    Ok(model)
}

/// Finds a stored book by ID.
pub async fn get_book_model<C>(db: &C, book_id: i64) -> Result<book::Model>
where
    C: ConnectionTrait,
{
    Book::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or(Error::BookNotFound { id: book_id })
}

/// Creates a book owned by the caller and returns it with annotations.
pub async fn create_book(
    db: &DatabaseConnection,
    identity: Option<&Identity>,
    input: BookInput,
) -> Result<BookRecord> {
    let identity = permissions::require_authenticated(identity)?;
    let book = input.validate()?;

    let model = insert_book(db, Some(identity.user_id), book).await?;
    listing::get_book(db, model.id).await
}

/// Applies `changes` to a book owned by the caller, or to any book for staff.
///
/// Nothing is written when the book is missing, the caller lacks permission,
/// or a field is invalid. The permission check and the write share one
/// transaction.
pub async fn update_book(
    db: &DatabaseConnection,
    identity: Option<&Identity>,
    book_id: i64,
    changes: BookChanges,
) -> Result<BookRecord> {
    let txn = db.begin().await?;
    let book = get_book_model(&txn, book_id).await?;
    let identity = permissions::ensure_can_modify(identity, &book)?;
    let changes = changes.validate()?;

    let mut active: book::ActiveModel = book.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(author_name) = changes.author_name {
        active.author_name = Set(author_name);
    }
    if let Some(price_cents) = changes.price_cents {
        active.price_cents = Set(price_cents);
    }
    if let Some(discount_cents) = changes.discount_cents {
        active.discount_cents = Set(discount_cents);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(&txn).await?;
    let record = listing::get_book(&txn, book_id).await?;

    txn.commit().await?;

    info!(book_id, user_id = identity.user_id, "Updated book");
    Ok(record)
}

/// Deletes a book together with every user relation to it.
pub async fn delete_book(
    db: &DatabaseConnection,
    identity: Option<&Identity>,
    book_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;
    let book = get_book_model(&txn, book_id).await?;
    let identity = permissions::ensure_can_modify(identity, &book)?;

    let relations = UserBookRelation::delete_many()
        .filter(user_book_relation::Column::BookId.eq(book_id))
        .exec(&txn)
        .await?;
    Book::delete_by_id(book_id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        book_id,
        user_id = identity.user_id,
        relations_removed = relations.rows_affected,
        "Deleted book"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::money;
    use crate::test_utils::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::str::FromStr;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn input(name: &str, price: &str) -> BookInput {
        BookInput {
            name: name.to_string(),
            author_name: "Author 1".to_string(),
            price: dec(price),
            discount: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn test_create_book_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let identity = Identity::new(1, false);

        // Anonymous callers are refused before validation
        let result = create_book(&db, None, input("Test book", "100")).await;
        assert!(matches!(result.unwrap_err(), Error::NotAuthenticated));

        let result = create_book(&db, Some(&identity), input("", "100")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation(_)));

        let result = create_book(&db, Some(&identity), input("Test book", "100.001")).await;
        let err = result.unwrap_err();
        assert_eq!(
            err.validation().unwrap().field("price")[0].code,
            "max_decimal_places"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_book_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "username1").await?;

        let record = create_book(
            &db,
            Some(&Identity::from(&owner)),
            BookInput {
                name: "Test book 1".to_string(),
                author_name: "Author 1".to_string(),
                price: dec("100.00"),
                discount: dec("50.00"),
            },
        )
        .await?;

        assert_eq!(record.name, "Test book 1");
        assert_eq!(record.owner_name.as_deref(), Some("username1"));
        assert_eq!(record.price_with_discount.to_string(), "50.00");
        assert_eq!(record.annotated_likes, 0);
        assert!(record.rating.is_none());
        assert!(record.readers.is_empty());

        let stored = get_book_model(&db, record.id).await?;
        assert_eq!(stored.owner_id, Some(owner.id));
        assert_eq!(money::from_cents(stored.price_cents), dec("100"));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_book_by_owner() -> Result<()> {
        let (db, owner, book) = setup_with_book().await?;

        let record = update_book(
            &db,
            Some(&Identity::from(&owner)),
            book.id,
            BookChanges {
                price: Some(dec("575")),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(record.price.to_string(), "575.00");
        assert_eq!(record.name, book.name);

        let stored = get_book_model(&db, book.id).await?;
        assert_eq!(stored.price_cents, 57500);
        assert!(stored.updated_at >= book.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_book_by_other_user_is_denied() -> Result<()> {
        let (db, _owner, book) = setup_with_book().await?;
        let stranger = create_test_user(&db, "stranger").await?;

        let result = update_book(
            &db,
            Some(&Identity::from(&stranger)),
            book.id,
            BookChanges {
                price: Some(dec("575")),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::PermissionDenied));

        // The book is unchanged
        let stored = get_book_model(&db, book.id).await?;
        assert_eq!(stored, book);

        Ok(())
    }

    #[tokio::test]
    async fn test_refused_mutations_roll_back() -> Result<()> {
        let (db, owner, book) = setup_with_book().await?;
        let stranger = create_test_user(&db, "stranger").await?;
        let changes = || BookChanges {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };

        // Each refusal drops its transaction before anything is written
        for _ in 0..2 {
            let result = update_book(&db, Some(&Identity::from(&stranger)), book.id, changes()).await;
            assert!(matches!(result.unwrap_err(), Error::PermissionDenied));
            let result = delete_book(&db, Some(&Identity::from(&stranger)), book.id).await;
            assert!(matches!(result.unwrap_err(), Error::PermissionDenied));
        }
        assert_eq!(get_book_model(&db, book.id).await?, book);

        let record = update_book(&db, Some(&Identity::from(&owner)), book.id, changes()).await?;
        assert_eq!(record.name, "Renamed");
        delete_book(&db, Some(&Identity::from(&owner)), book.id).await?;
        assert!(Book::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_book_by_staff() -> Result<()> {
        let (db, _owner, book) = setup_with_book().await?;
        let staff = create_staff_user(&db, "admin").await?;

        let record = update_book(
            &db,
            Some(&Identity::from(&staff)),
            book.id,
            BookChanges {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(record.name, "Renamed");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_book_invalid_changes_are_not_saved() -> Result<()> {
        let (db, owner, book) = setup_with_book().await?;

        let result = update_book(
            &db,
            Some(&Identity::from(&owner)),
            book.id,
            BookChanges {
                name: Some("New name".to_string()),
                price: Some(dec("-1")),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation(_)));

        let stored = get_book_model(&db, book.id).await?;
        assert_eq!(stored, book);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_book() -> Result<()> {
        let db = setup_test_db().await?;
        let staff = create_staff_user(&db, "admin").await?;

        let result = update_book(
            &db,
            Some(&Identity::from(&staff)),
            42,
            BookChanges::default(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::BookNotFound { id: 42 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_book_permissions() -> Result<()> {
        let (db, owner, book) = setup_with_book().await?;
        let stranger = create_test_user(&db, "stranger").await?;

        let result = delete_book(&db, None, book.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotAuthenticated));

        let result = delete_book(&db, Some(&Identity::from(&stranger)), book.id).await;
        assert!(matches!(result.unwrap_err(), Error::PermissionDenied));
        assert_eq!(get_book_model(&db, book.id).await?, book);

        delete_book(&db, Some(&Identity::from(&owner)), book.id).await?;
        assert!(matches!(
            get_book_model(&db, book.id).await,
            Err(Error::BookNotFound { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_book_by_staff_removes_relations() -> Result<()> {
        let (db, _owner, book) = setup_with_book().await?;
        let staff = create_staff_user(&db, "admin").await?;
        rate_directly(&db, staff.id, book.id, Some(4)).await?;

        delete_book(&db, Some(&Identity::from(&staff)), book.id).await?;

        let remaining = UserBookRelation::find()
            .filter(user_book_relation::Column::BookId.eq(book.id))
            .all(&db)
            .await?;
        assert!(remaining.is_empty());

        Ok(())
    }
}
