// src/domain/listing.rs

use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Written into the `fecha_consulta` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
/// Accepts any number of fractional digits when reading the column back.
pub const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub title: String,
    /// Always positive.
    pub price: f64,
    pub link: String,
    pub queried_at: Option<NaiveDateTime>,
}

/// Column layout shared by every record of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Basic,
    Timestamped,
}

impl Schema {
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Schema::Basic => &["Titulo", "Precio", "Link"],
            Schema::Timestamped => &["Titulo", "Precio", "Link", "fecha_consulta"],
        }
    }

    pub fn from_headers(headers: &[&str]) -> Option<Self> {
        [Schema::Basic, Schema::Timestamped]
            .into_iter()
            .find(|schema| schema.headers() == headers)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub schema: Schema,
    pub records: Vec<ListingRecord>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Links in `self` that `previous` did not have. Empty links are not counted.
    pub fn new_links_since(&self, previous: &ResultSet) -> usize {
        let known: HashSet<&str> = previous.records.iter().map(|r| r.link.as_str()).collect();
        self.records
            .iter()
            .filter(|r| !r.link.is_empty() && !known.contains(r.link.as_str()))
            .count()
    }

    /// (title, price, link) of every record, in order.
    #[cfg(test)]
    pub fn triples(&self) -> Vec<(&str, f64, &str)> {
        self.records
            .iter()
            .map(|r| (r.title.as_str(), r.price, r.link.as_str()))
            .collect()
    }
}
