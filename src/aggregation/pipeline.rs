//! Pipeline construction

use bson::{doc, DateTime as BsonDateTime, Document};

use super::YearBounds;

/// Build the average-price pipeline for one year:
/// `$match` on the date range, `$group` by `$year` averaging `price` as a
/// double, `$project` to `{year, avg_price}`, then `$sort` by year.
pub fn avg_price_pipeline(bounds: &YearBounds) -> Vec<Document> {
    let start = BsonDateTime::from_chrono(bounds.start);
    let end = BsonDateTime::from_chrono(bounds.end);

    vec![
        doc! {
            "$match": {
                "published_date": { "$gte": start, "$lt": end }
            }
        },
        doc! {
            "$group": {
                "_id": { "$year": "$published_date" },
                "avg_price": { "$avg": { "$toDouble": "$price" } }
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "year": "$_id",
                "avg_price": 1
            }
        },
        doc! {
            "$sort": { "year": 1 }
        },
    ]
}
