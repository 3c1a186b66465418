//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod book;
pub mod user;
pub mod user_book_relation;

// Re-export specific types to avoid conflicts
pub use book::{Column as BookColumn, Entity as Book, Model as BookModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_book_relation::{
    Column as UserBookRelationColumn, Entity as UserBookRelation,
    Model as UserBookRelationModel,
};
