//! Core business logic - framework-agnostic book, relation and rating operations.

/// Book creation, updates and deletion
pub mod book;
/// Annotated book listing and retrieval
pub mod listing;
/// Decimal amounts and their stored cents
pub mod money;
/// Input validation and output records
pub mod payload;
/// Ownership-based permission checks
pub mod permissions;
/// Listing filters and ordering
pub mod query;
/// Book rating aggregation
pub mod rating;
/// Likes, bookmarks and rates
pub mod relation;
/// Catalog seeding from configuration
pub mod seed;
/// User creation and lookup
pub mod user;
