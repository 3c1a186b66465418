//! User entity - The accounts that own books and keep per-book relations.
//!
//! Authentication is handled outside this crate; a user row only carries the
//! fields the catalog needs (display names and the staff flag).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across users
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Staff users may modify books they do not own
    pub is_staff: bool,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many books
    #[sea_orm(has_many = "super::book::Entity")]
    OwnedBooks,
    /// One user has many book relations (likes, bookmarks, rates)
    #[sea_orm(has_many = "super::user_book_relation::Entity")]
    BookRelations,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnedBooks.def()
    }
}

impl Related<super::user_book_relation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookRelations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
