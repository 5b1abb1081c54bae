//! Portfolio Sim - buy-and-hold basket simulation library.
//!
//! Given a set of tickers, target weights, an initial cash amount and a
//! lookback window, this crate answers "how would this basket have done?":
//!
//! - **Price normalization**: strict cleaning of raw closing-price tables
//! - **Portfolio engine**: share allocation, value series, return/risk metrics
//! - **Benchmark comparison**: an index series rescaled to the same cash basis
//! - **Reporting**: console summary, JSON envelope, CSV output
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use portfolio_sim::{normalize, simulate, PortfolioRequest, RawPriceTable};
//!
//! let d0 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let d1 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
//!
//! let request = PortfolioRequest::new(
//!     vec!["A".into(), "B".into()],
//!     vec![0.5, 0.5],
//!     1000.0,
//!     d0,
//!     d1,
//! )
//! .unwrap();
//!
//! let mut raw = RawPriceTable::new();
//! raw.insert(d0, "A", 100.0);
//! raw.insert(d0, "B", 50.0);
//! raw.insert(d1, "A", 110.0);
//! raw.insert(d1, "B", 55.0);
//!
//! let table = normalize(&raw, request.tickers()).unwrap();
//! let (values, metrics) = simulate(&request, &table).unwrap();
//!
//! assert_eq!(values.last_value(), 1100.0);
//! assert!((metrics.total_return - 0.10).abs() < 1e-12);
//! ```

pub mod benchmark;
pub mod config;
pub mod input;
pub mod portfolio;
pub mod prices;
pub mod report;
pub mod simulator;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, BenchmarkSeries, PerformanceMetrics, PortfolioRequest, PortfolioValueSeries,
    ShareAllocation, ValuePoint,
};

// Re-export main functionality
pub use benchmark::compare;
pub use config::SimulatorConfig;
pub use input::{parse_holding, prompt_request, Lookback};
pub use portfolio::{simulate, simulate_with_allocation, RISK_FREE_RATE, TRADING_DAYS_PER_YEAR};
pub use prices::{normalize, InMemoryPriceSource, PriceSource, PriceTable, RawPriceTable};
pub use report::{chart_hint, SimulationReport};
pub use simulator::Simulator;

#[cfg(feature = "yahoo")]
pub use prices::YahooPriceSource;

/// Error types for portfolio-sim operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No price data returned")]
    EmptyData,

    #[error("No usable price data for: {}", .0.join(", "))]
    MissingSymbolData(Vec<String>),

    #[error("Not enough complete price rows to analyze: {rows} (need at least 2)")]
    InsufficientHistory { rows: usize },

    #[error("Invalid price {price} for {symbol} on {date}")]
    InvalidPrice {
        symbol: String,
        date: chrono::NaiveDate,
        price: f64,
    },

    #[error("Data fetch failed: {0}")]
    DataFetch(String),
}

/// Result type for portfolio-sim operations.
pub type Result<T> = std::result::Result<T, Error>;
