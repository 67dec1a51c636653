//! Data models for Biblioteca

pub mod book;
pub mod pagination;
pub mod price;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookInput, BookPatch, BookQuery, Genre};
pub use pagination::PageRequest;
pub use price::YearAvgPrice;
pub use user::{TokenKind, User, UserClaims};
