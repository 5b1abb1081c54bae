//! Core data types for the portfolio simulator.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that normalized weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// A validated simulation request.
///
/// Built once from user input and never mutated. Tickers are uppercased and
/// weights are normalized to sum to 1.0 on construction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioRequest {
    tickers: Vec<String>,
    weights: Vec<f64>,
    initial_cash: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl PortfolioRequest {
    /// Validate raw input and build a request.
    ///
    /// Weights may be given in any positive magnitude (`[2.0, 1.0, 1.0]` is
    /// the same basket as `[0.5, 0.25, 0.25]`). Duplicate tickers are kept as
    /// independent positions.
    pub fn new(
        tickers: Vec<String>,
        weights: Vec<f64>,
        initial_cash: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        if tickers.is_empty() {
            return Err(Error::InvalidInput(
                "At least one ticker is required".to_string(),
            ));
        }

        if tickers.len() != weights.len() {
            return Err(Error::InvalidInput(format!(
                "{} tickers but {} weights",
                tickers.len(),
                weights.len()
            )));
        }

        if !initial_cash.is_finite() || initial_cash <= 0.0 {
            return Err(Error::InvalidInput(
                "Initial cash must be positive".to_string(),
            ));
        }

        if start_date >= end_date {
            return Err(Error::InvalidInput(format!(
                "Start date {} must be before end date {}",
                start_date, end_date
            )));
        }

        let mut symbols = Vec::with_capacity(tickers.len());
        for ticker in &tickers {
            let symbol = ticker.trim().to_uppercase();
            if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
                return Err(Error::InvalidInput(format!("Malformed ticker: '{}'", ticker)));
            }
            symbols.push(symbol);
        }

        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(Error::InvalidInput(format!(
                "Weight must be positive, got {}",
                w
            )));
        }

        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(Error::InvalidInput(
                "Weights must sum to a positive value".to_string(),
            ));
        }

        Ok(Self {
            tickers: symbols,
            weights: weights.iter().map(|w| w / total).collect(),
            initial_cash,
            start_date,
            end_date,
        })
    }

    /// Requested tickers, uppercase, in input order.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Normalized weights, aligned with `tickers()`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Iterate `(ticker, weight)` pairs.
    pub fn holdings(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }
}

/// Share counts bought at the first date. Never resized afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareAllocation {
    /// `(symbol, shares)` in request order
    pub positions: Vec<(String, f64)>,
    /// Date the shares were bought
    pub date: NaiveDate,
}

impl ShareAllocation {
    /// Shares held for a symbol, summed over duplicate positions.
    pub fn shares(&self, symbol: &str) -> Option<f64> {
        let mut found = false;
        let mut total = 0.0;
        for (s, shares) in &self.positions {
            if s == symbol {
                found = true;
                total += shares;
            }
        }
        found.then_some(total)
    }
}

/// A single dated value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily value of the simulated buy-and-hold portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioValueSeries {
    pub points: Vec<ValuePoint>,
}

impl PortfolioValueSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values without dates.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Value on the last date, 0.0 for an empty series.
    pub fn last_value(&self) -> f64 {
        self.points.last().map(|p| p.value).unwrap_or(0.0)
    }
}

/// Benchmark prices rescaled to start at the portfolio's initial cash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkSeries {
    /// Benchmark ticker (e.g. SPY)
    pub symbol: String,
    pub points: Vec<ValuePoint>,
}

impl BenchmarkSeries {
    /// Value on the last date, 0.0 for an empty series.
    pub fn last_value(&self) -> f64 {
        self.points.last().map(|p| p.value).unwrap_or(0.0)
    }

    /// Return over the whole window as a fraction.
    pub fn total_return(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if first.value > 0.0 => last.value / first.value - 1.0,
            _ => 0.0,
        }
    }
}

/// Return/risk statistics for one simulation run.
///
/// All ratios are fractions (0.10 for 10%).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceMetrics {
    /// Portfolio value on the last date
    pub final_value: f64,
    /// `(final - initial) / initial`
    pub total_return: f64,
    /// Geometric annualization over the cleaned row count
    pub annualized_return: f64,
    /// Sample stddev of daily returns scaled by sqrt(252)
    pub annualized_volatility: f64,
    /// Excess annualized return over volatility, 0 when volatility is 0
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline as a fraction of the peak
    pub max_drawdown: f64,
    /// Ticker with the highest individual return
    pub best_performer: String,
    /// Ticker with the lowest individual return
    pub worst_performer: String,
    /// `(ticker, return)` per requested ticker, in request order
    pub individual_returns: Vec<(String, f64)>,
}

/// JSON envelope printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(tickers: &[&str], weights: Vec<f64>) -> Result<PortfolioRequest> {
        PortfolioRequest::new(
            tickers.iter().map(|t| t.to_string()).collect(),
            weights,
            10_000.0,
            date(2024, 1, 1),
            date(2024, 12, 31),
        )
    }

    #[test]
    fn test_request_uppercases_tickers() {
        let req = request(&["aapl", " msft "], vec![1.0, 1.0]).unwrap();
        assert_eq!(req.tickers(), &["AAPL".to_string(), "MSFT".to_string()]);
    }

    #[test]
    fn test_request_normalizes_weights() {
        let req = request(&["A", "B", "C"], vec![2.0, 1.0, 1.0]).unwrap();
        assert_relative_eq!(req.weights()[0], 0.5);
        assert_relative_eq!(req.weights()[1], 0.25);
        assert_relative_eq!(req.weights()[2], 0.25);
    }

    #[test]
    fn test_weights_sum_to_one_for_any_magnitude() {
        for raw in [
            vec![0.1, 0.2, 0.3],
            vec![1e-6, 3e-6],
            vec![1e9, 7.0, 123.456],
            vec![0.3; 7],
        ] {
            let tickers: Vec<&str> = ["A", "B", "C", "D", "E", "F", "G"][..raw.len()].to_vec();
            let req = request(&tickers, raw).unwrap();
            let sum: f64 = req.weights().iter().sum();
            assert!((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
        }
    }

    #[test]
    fn test_request_rejects_bad_input() {
        assert!(matches!(request(&[], vec![]), Err(Error::InvalidInput(_))));
        assert!(matches!(
            request(&["A", "B"], vec![1.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            request(&["A"], vec![0.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            request(&["A"], vec![-1.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            request(&["A"], vec![f64::NAN]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            request(&["A B"], vec![1.0]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_request_rejects_bad_cash_and_dates() {
        let tickers = vec!["A".to_string()];
        let bad_cash = PortfolioRequest::new(
            tickers.clone(),
            vec![1.0],
            0.0,
            date(2024, 1, 1),
            date(2024, 2, 1),
        );
        assert!(matches!(bad_cash, Err(Error::InvalidInput(_))));

        let same_day = PortfolioRequest::new(
            tickers,
            vec![1.0],
            100.0,
            date(2024, 1, 1),
            date(2024, 1, 1),
        );
        assert!(matches!(same_day, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_share_allocation_sums_duplicates() {
        let alloc = ShareAllocation {
            positions: vec![
                ("A".to_string(), 2.0),
                ("B".to_string(), 1.0),
                ("A".to_string(), 3.0),
            ],
            date: date(2024, 1, 2),
        };
        assert_eq!(alloc.shares("A"), Some(5.0));
        assert_eq!(alloc.shares("C"), None);
    }

    #[test]
    fn test_benchmark_total_return() {
        let series = BenchmarkSeries {
            symbol: "SPY".to_string(),
            points: vec![
                ValuePoint {
                    date: date(2024, 1, 2),
                    value: 1000.0,
                },
                ValuePoint {
                    date: date(2024, 1, 3),
                    value: 1050.0,
                },
            ],
        };
        assert_relative_eq!(series.total_return(), 0.05, epsilon = 1e-12);
        assert_eq!(series.last_value(), 1050.0);
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
