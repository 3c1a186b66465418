//! Listing parameters - price filter, free-text search and ordering.
//!
//! `BookQuery::from_params` accepts raw query-string pairs:
//! `price=200`, `search=author 1`, `ordering=-price,name`.

use crate::{
    core::money,
    errors::{Result, ValidationErrors},
};
use rust_decimal::Decimal;
use sea_orm::Order;

/// Fields a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Name,
    Price,
}

impl OrderField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            _ => None,
        }
    }
}

/// One ordering term such as `-price`
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTerm {
    pub field: OrderField,
    pub order: Order,
}

/// Filters and ordering for [`crate::core::listing::list_books`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    /// Only books with exactly this price
    pub price: Option<Decimal>,
    /// Every term must appear in the name or the author
    pub search: Option<String>,
    /// Applied in order, the book ID is always the last tie-breaker
    pub ordering: Vec<OrderTerm>,
}

impl BookQuery {
    /// Builds a query from raw `(key, value)` pairs, ignoring unknown keys.
    ///
    /// An unparsable price is a validation error on `price`.
    pub fn from_params<'a, I>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        let mut errors = ValidationErrors::new();

        for (key, value) in params {
            match key {
                "price" => match money::parse_amount(value) {
                    Some(price) => query.price = Some(price),
                    None => errors.add("price", "invalid", "Enter a number."),
                },
                "search" => query.search = Some(value.to_string()),
                "ordering" => query.ordering = parse_ordering(value),
                _ => {}
            }
        }

        errors.into_result()?;
        Ok(query)
    }

    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: &str) -> Self {
        self.ordering = parse_ordering(ordering);
        self
    }

    /// Search terms, lowercased. Empty when no search was requested.
    #[must_use]
    pub fn search_terms(&self) -> Vec<String> {
        self.search.as_deref().map(search_terms).unwrap_or_default()
    }
}

/// Splits a search string into lowercased terms on whitespace and commas.
#[must_use]
pub fn search_terms(search: &str) -> Vec<String> {
    search
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Parses `name,-price` into ordering terms; unknown fields are dropped.
#[must_use]
pub fn parse_ordering(ordering: &str) -> Vec<OrderTerm> {
    ordering
        .split(',')
        .map(str::trim)
        .filter_map(|term| {
            let (order, name) = term
                .strip_prefix('-')
                .map_or((Order::Asc, term), |name| (Order::Desc, name));
            OrderField::parse(name).map(|field| OrderTerm { field, order })
        })
        .collect()
}
