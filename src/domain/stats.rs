use crate::domain::listing::ListingRecord;

/// Summary of the price column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl PriceStats {
    /// `None` for an empty slice.
    pub fn from_records(records: &[ListingRecord]) -> Option<Self> {
        let first = records.first()?.price;

        let (sum, max, min) = records.iter().fold((0.0, first, first), |(sum, max, min), r| {
            (sum + r.price, max.max(r.price), min.min(r.price))
        });

        Some(Self {
            count: records.len(),
            mean: sum / records.len() as f64,
            max,
            min,
        })
    }
}
