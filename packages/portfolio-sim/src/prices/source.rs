//! Price source abstraction.

use super::RawPriceTable;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Anything that can return daily closing prices for a set of symbols.
///
/// Implementations report every retrieval failure (network, unknown symbol,
/// provider error) as [`Error::DataFetch`]. An empty result is not an error
/// here; the normalizer decides what is usable.
pub trait PriceSource {
    /// Fetch closes for `symbols` between `start` and `end`.
    fn fetch_closes(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceTable>;
}

impl<T: PriceSource + ?Sized> PriceSource for &T {
    fn fetch_closes(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceTable> {
        (**self).fetch_closes(symbols, start, end)
    }
}

/// Price source backed by in-memory series.
///
/// Useful for tests and for callers that already hold the data. Unknown
/// symbols fail the whole fetch, like an upstream provider would.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    series: HashMap<String, Vec<(NaiveDate, f64)>>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a close series for a symbol (builder style).
    pub fn with_series(mut self, symbol: &str, closes: Vec<(NaiveDate, f64)>) -> Self {
        self.series.insert(symbol.to_uppercase(), closes);
        self
    }
}

impl PriceSource for InMemoryPriceSource {
    fn fetch_closes(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceTable> {
        let mut table = RawPriceTable::new();

        for symbol in symbols {
            let symbol = symbol.to_uppercase();
            let closes = self
                .series
                .get(&symbol)
                .ok_or_else(|| Error::DataFetch(format!("Unknown symbol: {}", symbol)))?;

            for (date, close) in closes {
                if *date >= start && *date <= end {
                    table.insert(*date, &symbol, *close);
                }
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_in_memory_filters_window() {
        let source = InMemoryPriceSource::new().with_series(
            "spy",
            vec![(day(1), 400.0), (day(2), 401.0), (day(3), 402.0)],
        );

        let raw = source
            .fetch_closes(&["SPY".to_string()], day(2), day(3))
            .unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get(day(1), "SPY"), None);
        assert_eq!(raw.get(day(3), "SPY"), Some(402.0));
    }

    #[test]
    fn test_in_memory_unknown_symbol() {
        let source = InMemoryPriceSource::new();
        let result = source.fetch_closes(&["NOPE".to_string()], day(1), day(2));
        assert!(matches!(result, Err(Error::DataFetch(_))));
    }
}
