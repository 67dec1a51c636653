//! Price statistics computed by the document mirror

use std::sync::Arc;

use crate::{
    aggregation::{avg_price_pipeline, YearBounds},
    error::{AppError, AppResult},
    models::price::YearAvgPrice,
    services::mirror::BookMirror,
};

#[derive(Clone)]
pub struct StatsService {
    mirror: Arc<dyn BookMirror>,
}

impl StatsService {
    pub fn new(mirror: Arc<dyn BookMirror>) -> Self {
        Self { mirror }
    }

    /// Average price of the books published in `year`.
    /// An empty result is reported as not found.
    pub async fn avg_price_by_year(&self, year: &str) -> AppResult<Vec<YearAvgPrice>> {
        let bounds = YearBounds::parse(year)?;
        let pipeline = avg_price_pipeline(&bounds);

        let rows = self.mirror.aggregate(pipeline).await?;
        tracing::debug!("Aggregation for {} returned {} row(s)", bounds.year, rows.len());

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(entry) = YearAvgPrice::from_document(row)? {
                results.push(entry);
            }
        }

        if results.is_empty() {
            return Err(AppError::NotFound(format!(
                "No books were published in {}.",
                bounds.year
            )));
        }

        Ok(results)
    }
}
