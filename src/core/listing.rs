//! Annotated book listing.
//!
//! Every listed book carries its owner's username, the discounted price, the
//! number of likes and the mean rate. These come from one grouped query with
//! left joins to the owner and to the relations; the readers of all listed
//! books are then loaded with a single extra query.
//!
//! Search terms are matched against the rows in Rust, since `SQLite` only
//! folds ASCII case in `lower()` and `LIKE`.

use crate::{
    core::{
        money,
        payload::{BookRecord, Reader},
        query::{BookQuery, OrderField},
        rating,
    },
    entities::{Book, User, UserBookRelation, book, user, user_book_relation},
    errors::{Error, Result},
};
use sea_orm::{
    FromQueryResult, JoinType, QueryOrder, QuerySelect, Select,
    prelude::*,
    sea_query::{Expr, Func, SimpleExpr},
};
use std::collections::HashMap;
use tracing::debug;

/// One row of the annotated query, before readers are attached.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
struct BookRow {
    id: i64,
    name: String,
    author_name: String,
    price_cents: i64,
    discount_cents: i64,
    owner_name: Option<String>,
    price_with_discount_cents: i64,
    annotated_likes: i64,
    rate_total: Option<i64>,
    rate_count: i64,
}

impl BookRow {
    /// Whether every lowercased term occurs in the name or the author.
    fn matches(&self, terms: &[String]) -> bool {
        let name = self.name.to_lowercase();
        let author_name = self.author_name.to_lowercase();
        terms
            .iter()
            .all(|term| name.contains(term.as_str()) || author_name.contains(term.as_str()))
    }

    fn into_record(self, readers: Vec<Reader>) -> BookRecord {
        BookRecord {
            id: self.id,
            name: self.name,
            author_name: self.author_name,
            price: money::from_cents(self.price_cents),
            discount: money::from_cents(self.discount_cents),
            price_with_discount: money::from_cents(self.price_with_discount_cents),
            owner_name: self.owner_name,
            annotated_likes: self.annotated_likes,
            rating: rating::mean_rating(self.rate_total.unwrap_or(0), self.rate_count),
            readers,
        }
    }
}

fn annotated_books() -> Select<Book> {
    let liked = Expr::case(
        Expr::col((UserBookRelation, user_book_relation::Column::Like)).eq(true),
        1,
    )
    .finally(0);

    Book::find()
        .select_only()
        .column(book::Column::Id)
        .column(book::Column::Name)
        .column(book::Column::AuthorName)
        .column(book::Column::PriceCents)
        .column(book::Column::DiscountCents)
        .column_as(user::Column::Username, "owner_name")
        .column_as(
            Expr::col((Book, book::Column::PriceCents))
                .sub(Expr::col((Book, book::Column::DiscountCents))),
            "price_with_discount_cents",
        )
        .column_as(SimpleExpr::from(Func::sum(liked)), "annotated_likes")
        .column_as(user_book_relation::Column::Rate.sum(), "rate_total")
        .column_as(user_book_relation::Column::Rate.count(), "rate_count")
        .join(JoinType::LeftJoin, book::Relation::Owner.def())
        .join(JoinType::LeftJoin, book::Relation::UserBookRelations.def())
        .group_by(book::Column::Id)
        .group_by(user::Column::Username)
}

fn apply_query(select: Select<Book>, price_cents: Option<i64>, query: &BookQuery) -> Select<Book> {
    let mut select = select;

    if let Some(cents) = price_cents {
        select = select.filter(book::Column::PriceCents.eq(cents));
    }

    for term in &query.ordering {
        let column = match term.field {
            OrderField::Name => book::Column::Name,
            OrderField::Price => book::Column::PriceCents,
        };
        select = select.order_by(column, term.order.clone());
    }

    select.order_by_asc(book::Column::Id)
}

/// Loads the first and last names of everyone with a relation to one of `book_ids`.
async fn load_readers<C>(db: &C, book_ids: Vec<i64>) -> Result<HashMap<i64, Vec<Reader>>>
where
    C: ConnectionTrait,
{
    let mut readers: HashMap<i64, Vec<Reader>> = HashMap::new();
    if book_ids.is_empty() {
        return Ok(readers);
    }

    let relations = UserBookRelation::find()
        .filter(user_book_relation::Column::BookId.is_in(book_ids))
        .find_also_related(User)
        .order_by_asc(user_book_relation::Column::UserId)
        .all(db)
        .await?;

    for (relation, reader) in relations {
        if let Some(reader) = reader {
            readers.entry(relation.book_id).or_default().push(Reader {
                first_name: reader.first_name,
                last_name: reader.last_name,
            });
        }
    }

    Ok(readers)
}

async fn attach_readers<C>(db: &C, rows: Vec<BookRow>) -> Result<Vec<BookRecord>>
where
    C: ConnectionTrait,
{
    let mut readers = load_readers(db, rows.iter().map(|row| row.id).collect()).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let book_readers = readers.remove(&row.id).unwrap_or_default();
            row.into_record(book_readers)
        })
        .collect())
}

/// Lists books matching `query` with all annotated fields.
pub async fn list_books<C>(db: &C, query: &BookQuery) -> Result<Vec<BookRecord>>
where
    C: ConnectionTrait,
{
    let price_cents = match query.price {
        Some(price) => match money::to_cents(price) {
            Some(cents) => Some(cents),
            // No stored price has more than two decimals
            None => return Ok(Vec::new()),
        },
        None => None,
    };

    let terms = query.search_terms();
    let rows: Vec<BookRow> = apply_query(annotated_books(), price_cents, query)
        .into_model::<BookRow>()
        .all(db)
        .await?
        .into_iter()
        .filter(|row| row.matches(&terms))
        .collect();
    debug!(count = rows.len(), ?query, "Listed books");

    attach_readers(db, rows).await
}

/// Retrieves one annotated book.
pub async fn get_book<C>(db: &C, book_id: i64) -> Result<BookRecord>
where
    C: ConnectionTrait,
{
    let row = annotated_books()
        .filter(book::Column::Id.eq(book_id))
        .into_model::<BookRow>()
        .one(db)
        .await?
        .ok_or(Error::BookNotFound { id: book_id })?;

    attach_readers(db, vec![row])
        .await?
        .pop()
        .ok_or(Error::BookNotFound { id: book_id })
}
