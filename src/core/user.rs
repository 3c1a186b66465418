//! User business logic - Creating and looking up catalog users.

use crate::{
    entities::{User, user},
    errors::{Result, ValidationErrors},
};
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Finds a user by login name.
pub async fn get_user_by_username<C>(db: &C, username: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a user after checking that the username is present and unused.
pub async fn create_user<C>(
    db: &C,
    username: &str,
    first_name: &str,
    last_name: &str,
    is_staff: bool,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let username = username.trim();
    let mut errors = ValidationErrors::new();

    if username.is_empty() {
        errors.add("username", "blank", "This field may not be blank.");
    } else if get_user_by_username(db, username).await?.is_some() {
        errors.add(
            "username",
            "unique",
            "A user with that username already exists.",
        );
    }
    errors.into_result()?;

    let user = user::ActiveModel {
        username: Set(username.to_string()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        is_staff: Set(is_staff),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = user.id, username = %user.username, "Created user");
    Ok(user)
}
