//! Benchmark comparison.
//!
//! Rescales an index price series so it starts at the portfolio's initial
//! cash, giving a like-for-like "what if I had bought the index" curve.

use crate::prices::PriceTable;
use crate::types::{BenchmarkSeries, ValuePoint};
use crate::{Error, Result};

/// Rescale a single-symbol price table onto an initial-cash basis.
///
/// `value[d] = price[d] / price[first] * initial_cash`
pub fn compare(prices: &PriceTable, initial_cash: f64) -> Result<BenchmarkSeries> {
    let [symbol] = prices.symbols() else {
        return Err(Error::InvalidInput(format!(
            "Benchmark table must hold exactly one symbol, got {}",
            prices.symbols().len()
        )));
    };

    if !initial_cash.is_finite() || initial_cash <= 0.0 {
        return Err(Error::InvalidInput(
            "Initial cash must be positive".to_string(),
        ));
    }

    let base = prices.row(0)[0];
    if !base.is_finite() || base <= 0.0 {
        return Err(Error::InvalidPrice {
            symbol: symbol.clone(),
            date: prices.first_date(),
            price: base,
        });
    }

    let points = prices
        .rows()
        .map(|(date, row)| ValuePoint {
            date,
            value: row[0] / base * initial_cash,
        })
        .collect();

    Ok(BenchmarkSeries {
        symbol: symbol.clone(),
        points,
    })
}
