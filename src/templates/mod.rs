pub mod messages;

// Re-exports for convenience
pub use messages::{
    no_products, price_alert, results_caption, searching, stats_summary, ASK_QUERY,
    CANCELLED, GREETING, IDLE_HINT, NO_RESULTS, PRODUCTS_FOUND, SEARCH_FAILED,
};
