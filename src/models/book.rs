//! Book model and request payloads

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Largest integer part allowed by NUMERIC(10, 2)
const PRICE_INTEGER_LIMIT: i64 = 100_000_000;

/// Book genre. Exposed on the wire under the historical field name `gender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Genre {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Fantasy,
    Biography,
    History,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::SciFi,
        Genre::Fantasy,
        Genre::Biography,
        Genre::History,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::SciFi => "Sci-Fi",
            Genre::Fantasy => "Fantasy",
            Genre::Biography => "Biography",
            Genre::History => "History",
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Invalid genre: {}", s))
    }
}

// Stored as TEXT
impl sqlx::Type<Postgres> for Genre {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Genre {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Genre {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Book record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[schema(example = "2020-01-01")]
    pub published_date: NaiveDate,
    pub gender: Genre,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}

/// Create / full update request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author must be 1 to 255 characters"))]
    pub author: String,
    #[schema(example = "2020-01-01")]
    pub published_date: NaiveDate,
    pub gender: Genre,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}

/// Partial update request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookPatch {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must be 1 to 255 characters"))]
    pub author: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub gender: Option<Genre>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "19.99")]
    pub price: Option<Decimal>,
}

impl BookPatch {
    /// Overlay the supplied fields onto an existing book
    pub fn apply(self, book: Book) -> BookInput {
        BookInput {
            title: self.title.unwrap_or(book.title),
            author: self.author.unwrap_or(book.author),
            published_date: self.published_date.unwrap_or(book.published_date),
            gender: self.gender.unwrap_or(book.gender),
            price: self.price.unwrap_or(book.price),
        }
    }
}

impl From<Book> for BookInput {
    fn from(book: Book) -> Self {
        BookPatch::default().apply(book)
    }
}

/// Book list query parameters. Kept as raw strings so malformed values can
/// fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Page number (default: 1)
    pub page: Option<String>,
    /// Items per page (default: 5, max: 10)
    pub page_size: Option<String>,
}

/// Non-negative, at most 2 decimal places and 10 digits in total
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("price_negative");
        err.message = Some("Price must not be negative".into());
        return Err(err);
    }

    let normalized = price.normalize();
    if normalized.scale() > 2 {
        let mut err = ValidationError::new("price_decimal_places");
        err.message = Some("Price must have at most 2 decimal places".into());
        return Err(err);
    }

    if normalized.trunc() >= Decimal::from(PRICE_INTEGER_LIMIT) {
        let mut err = ValidationError::new("price_max_digits");
        err.message = Some("Price must have at most 10 digits".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn input(price: &str) -> BookInput {
        BookInput {
            title: "Test Book".to_string(),
            author: "Test Author".to_string(),
            published_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            gender: Genre::Fiction,
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn accepts_well_formed_prices() {
        assert!(input("19.99").validate().is_ok());
        assert!(input("0").validate().is_ok());
        assert!(input("99999999.99").validate().is_ok());
        assert!(input("10.500").validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_prices() {
        assert!(input("-0.01").validate().is_err());
        assert!(input("1.999").validate().is_err());
        assert!(input("100000000").validate().is_err());
    }

    #[test]
    fn rejects_blank_title() {
        let mut book = input("10");
        book.title.clear();
        assert!(book.validate().is_err());
    }

    #[test]
    fn genre_uses_display_labels_on_the_wire() {
        assert_eq!(serde_json::to_string(&Genre::SciFi).unwrap(), "\"Sci-Fi\"");
        let g: Genre = serde_json::from_str("\"Non-Fiction\"").unwrap();
        assert_eq!(g, Genre::NonFiction);
        assert!(serde_json::from_str::<Genre>("\"Poetry\"").is_err());
        assert_eq!("History".parse::<Genre>(), Ok(Genre::History));
    }

    #[test]
    fn price_is_accepted_as_number_or_string() {
        let body = r#"{"title":"T","author":"A","published_date":"2020-01-01","gender":"Fiction","price":19.99}"#;
        let parsed: BookInput = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.price, Decimal::from_str("19.99").unwrap());

        let body = r#"{"title":"T","author":"A","published_date":"2020-01-01","gender":"Fiction","price":"19.99"}"#;
        let parsed: BookInput = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.price, Decimal::from_str("19.99").unwrap());
    }

    #[test]
    fn patch_only_overrides_supplied_fields() {
        let book = Book {
            id: 7,
            title: "Old".to_string(),
            author: "Someone".to_string(),
            published_date: NaiveDate::from_ymd_opt(1999, 5, 4).unwrap(),
            gender: Genre::History,
            price: Decimal::from_str("12.50").unwrap(),
        };
        let patch = BookPatch {
            title: Some("New".to_string()),
            price: Some(Decimal::from_str("8.00").unwrap()),
            ..Default::default()
        };

        let merged = patch.apply(book.clone());
        assert_eq!(merged.title, "New");
        assert_eq!(merged.author, book.author);
        assert_eq!(merged.published_date, book.published_date);
        assert_eq!(merged.gender, Genre::History);
        assert_eq!(merged.price, Decimal::from_str("8.00").unwrap());
    }
}
