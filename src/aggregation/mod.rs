//! Average-price-per-year aggregation over the document mirror
//!
//! The pipeline is built from scratch on every call; there is no shared
//! template to mutate, so concurrent requests never see each other's bounds.

pub mod bounds;
pub mod pipeline;

pub use bounds::YearBounds;
pub use pipeline::avg_price_pipeline;
