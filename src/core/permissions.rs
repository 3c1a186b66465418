//! Ownership-based permissions for book mutations.
//!
//! Anyone may read the catalog. Changing or deleting a book is reserved for
//! its owner and for staff users; every mutation needs an identity.

use crate::{
    entities::{book, user},
    errors::{Error, Result},
};
use tracing::warn;

/// The authenticated caller of a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// ID of the authenticated user
    pub user_id: i64,
    /// Whether the user has staff privileges
    pub is_staff: bool,
}

impl Identity {
    #[must_use]
    pub const fn new(user_id: i64, is_staff: bool) -> Self {
        Self { user_id, is_staff }
    }
}

impl From<&user::Model> for Identity {
    fn from(user: &user::Model) -> Self {
        Self::new(user.id, user.is_staff)
    }
}

/// Returns true when `identity` may update or delete `book`.
#[must_use]
pub fn can_modify(identity: &Identity, book: &book::Model) -> bool {
    identity.is_staff || book.owner_id == Some(identity.user_id)
}

/// Fails with [`Error::NotAuthenticated`] for anonymous callers.
pub fn require_authenticated(identity: Option<&Identity>) -> Result<&Identity> {
    identity.ok_or(Error::NotAuthenticated)
}

/// Fails unless the caller is authenticated and may modify `book`.
pub fn ensure_can_modify<'a>(
    identity: Option<&'a Identity>,
    book: &book::Model,
) -> Result<&'a Identity> {
    let identity = require_authenticated(identity)?;

    if can_modify(identity, book) {
        Ok(identity)
    } else {
        warn!(
            user_id = identity.user_id,
            book_id = book.id,
            "Refused modification of a book owned by someone else"
        );
        Err(Error::PermissionDenied)
    }
}
