//! User/book relation logic - likes, bookmarks and rates.
//!
//! A relation is created the first time a user interacts with a book. Changing
//! the rate (or creating the relation) recomputes the book rating inside the
//! same transaction, so the stored rating never lags behind the relations.

use crate::{
    core::{
        book::get_book_model,
        payload::{RelationPatch, RelationRecord},
        permissions::{self, Identity},
        rating,
    },
    entities::{UserBookRelation, user_book_relation},
    errors::Result,
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Returns the caller's relation to `book_id`, if one exists.
pub async fn get_relation(
    db: &DatabaseConnection,
    identity: Option<&Identity>,
    book_id: i64,
) -> Result<Option<RelationRecord>> {
    let identity = permissions::require_authenticated(identity)?;

    Ok(UserBookRelation::find_by_id((identity.user_id, book_id))
        .one(db)
        .await?
        .map(RelationRecord::from))
}

/// Applies `patch` to the caller's relation to `book_id`, creating it if needed.
///
/// An invalid rate is rejected before anything is written.
pub async fn update_relation(
    db: &DatabaseConnection,
    identity: Option<&Identity>,
    book_id: i64,
    patch: RelationPatch,
) -> Result<RelationRecord> {
    let identity = permissions::require_authenticated(identity)?;
    let patch = patch.validate()?;

    let txn = db.begin().await?;
    get_book_model(&txn, book_id).await?;

    let existing = UserBookRelation::find_by_id((identity.user_id, book_id))
        .one(&txn)
        .await?;
    let created = existing.is_none();

    let relation = match existing {
        Some(relation) => relation,
        None => {
            debug!(user_id = identity.user_id, book_id, "Creating relation");
            user_book_relation::ActiveModel {
                user_id: Set(identity.user_id),
                book_id: Set(book_id),
                like: Set(false),
                in_bookmarks: Set(false),
                rate: Set(None),
            }
            .insert(&txn)
            .await?
        }
    };
    let old_rate = relation.rate;

    let mut active: user_book_relation::ActiveModel = relation.clone().into();
    if let Some(like) = patch.like {
        active.like = Set(like);
    }
    if let Some(in_bookmarks) = patch.in_bookmarks {
        active.in_bookmarks = Set(in_bookmarks);
    }
    if let Some(rate) = patch.rate {
        active.rate = Set(rate);
    }

    let relation = if active.is_changed() {
        active.update(&txn).await?
    } else {
        relation
    };

    if created || relation.rate != old_rate {
        let book_rating = rating::set_rating(&txn, book_id).await?;
        info!(book_id, rating = ?book_rating, "Book rating updated");
    }

    txn.commit().await?;

    Ok(relation.into())
}
