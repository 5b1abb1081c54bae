//! Portfolio engine.
//!
//! Provides share allocation, the buy-and-hold value series, performance
//! analytics, and risk metrics.

mod engine;
mod performance;
mod risk;

pub use engine::{allocate_shares, simulate, simulate_with_allocation, value_series};
pub use performance::{
    annualized_return, best_and_worst, daily_returns, individual_returns, total_return,
};
pub use risk::{annualized_volatility, max_drawdown, sharpe_ratio};

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annual risk-free rate used by the Sharpe ratio.
pub const RISK_FREE_RATE: f64 = 0.02;
