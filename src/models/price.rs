//! Per-year price aggregation result

use bson::Document;
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Average book price for one publication year
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct YearAvgPrice {
    pub year: i32,
    /// Rounded to 2 decimal places
    #[schema(value_type = String, example = "20.00")]
    pub avg_price: Decimal,
}

/// Shape of one `$project`ed aggregation row
#[derive(Debug, Deserialize)]
struct AggregationRow {
    year: i32,
    avg_price: Option<f64>,
}

impl YearAvgPrice {
    /// Decode an aggregation row. Years whose books carry no price yield `None`.
    pub fn from_document(doc: Document) -> AppResult<Option<Self>> {
        let row: AggregationRow = bson::from_document(doc)
            .map_err(|e| AppError::Internal(format!("Malformed aggregation row: {}", e)))?;

        let Some(avg) = row.avg_price else {
            return Ok(None);
        };

        let mut avg_price = Decimal::from_f64(avg)
            .ok_or_else(|| AppError::Internal(format!("Average price {} is not a number", avg)))?
            .round_dp(2);
        avg_price.rescale(2);

        Ok(Some(Self {
            year: row.year,
            avg_price,
        }))
    }
}
