//! Request and response shapes for books and relations.
//!
//! Inputs are deserialized with serde and then validated into the values the
//! database stores. Outputs serialize decimals as strings with two places.

use crate::{
    core::money,
    entities::user_book_relation,
    errors::{Result, ValidationErrors},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

const MAX_NAME_LENGTH: usize = 255;

/// Lowest and highest accepted rate
pub const RATE_CHOICES: std::ops::RangeInclusive<i64> = 1..=5;

/// Fields accepted when creating a book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookInput {
    pub name: String,
    pub author_name: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

/// Fields accepted when updating a book; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookChanges {
    pub name: Option<String>,
    pub author_name: Option<String>,
    pub price: Option<Decimal>,
    pub discount: Option<Decimal>,
}

/// A book input that passed validation, in storage units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBook {
    pub name: String,
    pub author_name: String,
    pub price_cents: i64,
    pub discount_cents: i64,
}

/// Book changes that passed validation, in storage units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidBookChanges {
    pub name: Option<String>,
    pub author_name: Option<String>,
    pub price_cents: Option<i64>,
    pub discount_cents: Option<i64>,
}

fn validate_text(field: &str, value: &str, errors: &mut ValidationErrors) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "blank", "This field may not be blank.");
        return None;
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            field,
            "max_length",
            format!("Ensure this field has no more than {MAX_NAME_LENGTH} characters."),
        );
        return None;
    }
    Some(trimmed.to_string())
}

impl BookInput {
    /// Validates every field, reporting all problems at once.
    pub fn validate(&self) -> Result<ValidBook> {
        let mut errors = ValidationErrors::new();

        let name = validate_text("name", &self.name, &mut errors);
        let author_name = validate_text("author_name", &self.author_name, &mut errors);
        let price_cents = money::validate_amount("price", self.price, &mut errors);
        let discount_cents = money::validate_amount("discount", self.discount, &mut errors);

        match (name, author_name, price_cents, discount_cents) {
            (Some(name), Some(author_name), Some(price_cents), Some(discount_cents)) => {
                Ok(ValidBook {
                    name,
                    author_name,
                    price_cents,
                    discount_cents,
                })
            }
            _ => Err(errors.into()),
        }
    }
}

impl BookChanges {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<ValidBookChanges> {
        let mut errors = ValidationErrors::new();

        let changes = ValidBookChanges {
            name: self
                .name
                .as_deref()
                .and_then(|value| validate_text("name", value, &mut errors)),
            author_name: self
                .author_name
                .as_deref()
                .and_then(|value| validate_text("author_name", value, &mut errors)),
            price_cents: self
                .price
                .and_then(|value| money::validate_amount("price", value, &mut errors)),
            discount_cents: self
                .discount
                .and_then(|value| money::validate_amount("discount", value, &mut errors)),
        };

        errors.into_result()?;
        Ok(changes)
    }
}

/// Distinguishes an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Partial update of the caller's relation to a book.
///
/// `rate` is `None` when absent, `Some(None)` to clear the rate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelationPatch {
    pub like: Option<bool>,
    pub in_bookmarks: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub rate: Option<Option<i64>>,
}

/// A relation patch that passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidRelationPatch {
    pub like: Option<bool>,
    pub in_bookmarks: Option<bool>,
    pub rate: Option<Option<i32>>,
}

impl RelationPatch {
    /// Checks that a given rate is one of the accepted choices.
    pub fn validate(&self) -> Result<ValidRelationPatch> {
        let mut errors = ValidationErrors::new();

        let rate = match self.rate {
            Some(Some(value)) if RATE_CHOICES.contains(&value) => {
                i32::try_from(value).ok().map(Some)
            }
            Some(Some(value)) => {
                errors.add(
                    "rate",
                    "invalid_choice",
                    format!("\"{value}\" is not a valid choice."),
                );
                None
            }
            Some(None) => Some(None),
            None => None,
        };

        errors.into_result()?;
        Ok(ValidRelationPatch {
            like: self.like,
            in_bookmarks: self.in_bookmarks,
            rate,
        })
    }
}

/// First and last name of a user who has a relation to a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reader {
    pub first_name: String,
    pub last_name: String,
}

/// A book as returned by listing and retrieval, with annotated fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub id: i64,
    pub name: String,
    pub author_name: String,
    pub price: Decimal,
    pub discount: Decimal,
    /// Price minus discount
    pub price_with_discount: Decimal,
    /// Username of the owner, `None` for books without owner
    pub owner_name: Option<String>,
    /// Number of users who like the book
    pub annotated_likes: i64,
    /// Mean user rate with two decimals
    pub rating: Option<Decimal>,
    pub readers: Vec<Reader>,
}

/// The caller's relation to a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationRecord {
    pub book: i64,
    pub like: bool,
    pub in_bookmarks: bool,
    pub rate: Option<i32>,
}

impl From<user_book_relation::Model> for RelationRecord {
    fn from(model: user_book_relation::Model) -> Self {
        Self {
            book: model.book_id,
            like: model.like,
            in_bookmarks: model.in_bookmarks,
            rate: model.rate,
        }
    }
}
