//! Book entity - Represents a book in the catalog.
//!
//! Money and the derived rating are stored as integer hundredths so that
//! comparisons and ordering stay exact; [`money::from_cents`] turns them
//! into [`Decimal`] values with two decimal places.

use crate::core::money;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Book database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    /// Unique identifier for the book
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Title of the book
    pub name: String,
    pub author_name: String,
    /// Price in cents
    pub price_cents: i64,
    /// Discount in cents, subtracted from the price
    pub discount_cents: i64,
    /// Mean of all user rates in hundredths, `None` while nobody rated the book
    pub rating_hundredths: Option<i64>,
    /// User who created the book, `None` once that user is gone
    pub owner_id: Option<i64>,
    /// When the book was created
    pub created_at: DateTime,
    /// When the book was last modified
    pub updated_at: DateTime,
}

impl Model {
    /// Stored rating, kept in sync by [`crate::core::rating::set_rating`].
    #[must_use]
    pub fn rating(&self) -> Option<Decimal> {
        self.rating_hundredths.map(money::from_cents)
    }
}

/// Defines relationships between Book and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each book belongs to at most one owner
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Owner,
    /// One book has many user relations
    #[sea_orm(has_many = "super::user_book_relation::Entity")]
    UserBookRelations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::user_book_relation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBookRelations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
