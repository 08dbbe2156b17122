// Text utilities
pub mod clean;

// Discovery
pub mod browse;
pub mod extract;
pub mod harvest;
pub mod scrape;

// Ranking
pub mod analyze;
