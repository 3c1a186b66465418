//! User/book relation entity - One row per (user, book) pair.
//!
//! Holds the like flag, bookmark flag and optional 1-5 rate a user gave a book.
//! The composite primary key guarantees a single relation per pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User/book relation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_book_relations")]
pub struct Model {
    /// The user this relation belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// The book this relation is about
    #[sea_orm(primary_key, auto_increment = false)]
    pub book_id: i64,
    /// Whether the user likes the book
    pub like: bool,
    /// Whether the user bookmarked the book
    pub in_bookmarks: bool,
    /// Rating between 1 and 5, `None` until the user rates the book
    pub rate: Option<i32>,
}

/// Defines relationships between `UserBookRelation` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
