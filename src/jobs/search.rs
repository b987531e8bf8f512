//! Fetch + build + export for one query.

use crate::config::ExportConfig;
use crate::domain::{build_dataset, PriceStats, ResultSet};
use crate::errors::JobError;
use crate::scraper::ListingSource;
use crate::spreadsheets::{read_listings_csv, ExportFormat};
use chrono::{Local, NaiveDateTime};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const STEM_QUERY_CHARS: usize = 20;

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    /// Adds the `fecha_consulta` column.
    pub timestamped: bool,
    /// Export file name without extension.
    pub file_stem: String,
}

#[derive(Debug)]
pub struct SearchReport {
    pub results: ResultSet,
    pub stats: PriceStats,
    pub file: PathBuf,
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// Nothing matched; no file was written.
    Empty,
    Found(SearchReport),
}

pub struct SearchJob {
    source: Arc<dyn ListingSource>,
    export: ExportConfig,
}

impl SearchJob {
    pub fn new(source: Arc<dyn ListingSource>, export: ExportConfig) -> Self {
        Self { source, export }
    }

    pub async fn run(&self, request: &SearchRequest) -> Result<SearchOutcome, JobError> {
        let queried_at = request.timestamped.then(now);

        let raw = self.source.fetch_listings(&request.query).await?;
        let results = build_dataset(raw, queried_at)?;

        let Some(stats) = PriceStats::from_records(&results.records) else {
            info!(query = %request.query, "no listings found");
            return Ok(SearchOutcome::Empty);
        };

        tokio::fs::create_dir_all(&self.export.output_dir).await?;
        let file = self.export_path(&request.file_stem);

        // csv and rust_xlsxwriter write synchronously.
        let format = self.export.format;
        let (results, file) = tokio::task::spawn_blocking(move || {
            format.write(&results, &file).map(|()| (results, file))
        })
        .await??;

        info!(
            query = %request.query,
            items = results.len(),
            file = %file.display(),
            "search exported"
        );

        Ok(SearchOutcome::Found(SearchReport {
            results,
            stats,
            file,
        }))
    }

    pub fn export_path(&self, file_stem: &str) -> PathBuf {
        self.export
            .output_dir
            .join(format!("{file_stem}.{}", self.export.format.extension()))
    }

    /// Reads back an earlier CSV export with this stem, if there is one.
    pub async fn previous_export(&self, file_stem: &str) -> Option<ResultSet> {
        if self.export.format != ExportFormat::Csv {
            return None;
        }

        let path = self.export_path(file_stem);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }

        let read = tokio::task::spawn_blocking({
            let path = path.clone();
            move || read_listings_csv(&path)
        })
        .await;

        match read {
            Ok(Ok(previous)) => Some(previous),
            Ok(Err(e)) => {
                warn!(file = %path.display(), "previous export unreadable: {e}");
                None
            }
            Err(e) => {
                warn!(file = %path.display(), "reading previous export failed: {e}");
                None
            }
        }
    }
}

/// `resultados_<first 20 query chars>_<random suffix>`, safe as a file name
/// and unique across concurrent searches for the same query.
pub fn results_file_stem(query: &str) -> String {
    let slug: String = query
        .trim()
        .chars()
        .take(STEM_QUERY_CHARS)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let suffix: u32 = rand::thread_rng().gen();
    format!("resultados_{slug}_{suffix:08x}")
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
