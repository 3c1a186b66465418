//! Rating aggregation - Keeps each book's stored rating equal to the mean of its user rates.
//!
//! The stored value is the arithmetic mean of every non-null rate on the book,
//! rounded half-up to two decimal places, or `NULL` when nobody rated it.
//! [`set_rating`] must run whenever a relation's rate is created or changed.

use crate::{
    entities::{Book, UserBookRelation, book, user_book_relation},
    errors::{Error, Result},
};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{QuerySelect, prelude::*, sea_query::Expr};
use tracing::debug;

/// Computes the rounded mean of `count` rates adding up to `total`.
///
/// Returns `None` when there are no rates. The result always has two decimal places.
#[must_use]
pub fn mean_rating(total: i64, count: i64) -> Option<Decimal> {
    if count <= 0 {
        return None;
    }

    let mut mean = (Decimal::from(total) / Decimal::from(count))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    mean.rescale(2);
    Some(mean)
}

fn to_hundredths(rating: Decimal) -> Option<i64> {
    let mut scaled = rating;
    scaled.rescale(2);
    i64::try_from(scaled.mantissa()).ok()
}

/// Recomputes and persists the rating of `book_id` from its relations.
///
/// Accepts a connection or an open transaction so it can run in the same
/// transaction as the relation write that triggered it.
pub async fn set_rating<C>(db: &C, book_id: i64) -> Result<Option<Decimal>>
where
    C: ConnectionTrait,
{
    let (total, count): (Option<i64>, i64) = UserBookRelation::find()
        .select_only()
        .column_as(user_book_relation::Column::Rate.sum(), "rate_total")
        .column_as(user_book_relation::Column::Rate.count(), "rate_count")
        .filter(user_book_relation::Column::BookId.eq(book_id))
        .into_tuple()
        .one(db)
        .await?
        .unwrap_or((None, 0));

    let rating = mean_rating(total.unwrap_or(0), count);
    debug!(book_id, count, ?rating, "Recomputed book rating");

    let result = Book::update_many()
        .col_expr(
            book::Column::RatingHundredths,
            Expr::value(rating.and_then(to_hundredths)),
        )
        .filter(book::Column::Id.eq(book_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::BookNotFound { id: book_id });
    }

    Ok(rating)
}
