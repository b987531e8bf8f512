// src/domain/dataset.rs

use crate::domain::listing::{ListingRecord, ResultSet, Schema};
use crate::domain::price::{parse_price, PriceError};
use crate::scraper::{Field, RawListing};
use chrono::NaiveDateTime;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("row {row}: cannot cast price `{raw}`: {source}")]
    Price {
        row: usize,
        raw: String,
        source: PriceError,
    },
}

/// Casts raw listings into a result set.
///
/// A present price that does not parse fails the whole build. An item with
/// no price node at all is skipped, and absent titles or links become empty
/// strings. With `queried_at` set every record carries it and the set uses
/// the timestamped schema.
pub fn build_dataset(
    raw: Vec<RawListing>,
    queried_at: Option<NaiveDateTime>,
) -> Result<ResultSet, DatasetError> {
    let schema = match queried_at {
        Some(_) => Schema::Timestamped,
        None => Schema::Basic,
    };

    let mut records = Vec::with_capacity(raw.len());

    for (row, listing) in raw.into_iter().enumerate() {
        let price_text = match listing.price {
            Field::Present(text) => text,
            Field::Absent => {
                warn!(row, title = ?listing.title.as_option(), "listing without price, skipped");
                continue;
            }
        };

        let price = parse_price(&price_text).map_err(|source| DatasetError::Price {
            row,
            raw: price_text.clone(),
            source,
        })?;

        records.push(ListingRecord {
            title: listing.title.into_text_or_empty(),
            price,
            link: listing.link.into_text_or_empty(),
            queried_at,
        });
    }

    Ok(ResultSet { schema, records })
}
