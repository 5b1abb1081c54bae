//! Closing-price tables.
//!
//! A [`RawPriceTable`] is whatever the price source returned: dates may have
//! gaps for some symbols. [`normalize`] turns it into a [`PriceTable`] where
//! every date has a price for every symbol.

mod source;
#[cfg(feature = "yahoo")]
mod yahoo;

pub use source::{InMemoryPriceSource, PriceSource};
#[cfg(feature = "yahoo")]
pub use yahoo::YahooPriceSource;

use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Date-keyed closing prices as returned by a price source.
///
/// A cell is missing when it was never inserted or holds a non-finite value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPriceTable {
    rows: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

impl RawPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a closing price. Later inserts for the same cell overwrite.
    pub fn insert(&mut self, date: NaiveDate, symbol: &str, price: f64) {
        self.rows
            .entry(date)
            .or_default()
            .insert(symbol.to_uppercase(), price);
    }

    /// Add a date with no prices yet.
    pub fn insert_date(&mut self, date: NaiveDate) {
        self.rows.entry(date).or_default();
    }

    /// Merge another table into this one.
    pub fn extend(&mut self, other: RawPriceTable) {
        for (date, prices) in other.rows {
            self.rows.entry(date).or_default().extend(prices);
        }
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Usable price for a cell, `None` if absent or non-finite.
    pub fn get(&self, date: NaiveDate, symbol: &str) -> Option<f64> {
        self.rows
            .get(&date)
            .and_then(|prices| prices.get(symbol))
            .copied()
            .filter(|p| p.is_finite())
    }

    fn has_any(&self, symbol: &str) -> bool {
        self.rows.keys().any(|date| self.get(*date, symbol).is_some())
    }
}

/// Complete closing-price table: ascending unique dates, fixed symbol set,
/// one price per cell, at least two dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    // prices[row][column], columns aligned with `symbols`
    prices: Vec<Vec<f64>>,
}

impl PriceTable {
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false for a normalized table.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Column index for a symbol.
    pub fn column(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Prices on the row at `index`, aligned with `symbols()`.
    pub fn row(&self, index: usize) -> &[f64] {
        &self.prices[index]
    }

    /// Iterate `(date, prices)` in ascending date order.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &[f64])> + '_ {
        self.dates
            .iter()
            .copied()
            .zip(self.prices.iter().map(Vec::as_slice))
    }

    /// Full price history for one symbol.
    pub fn series(&self, symbol: &str) -> Option<Vec<f64>> {
        let col = self.column(symbol)?;
        Some(self.prices.iter().map(|row| row[col]).collect())
    }
}

/// Clean a raw table down to the rows that have every requested symbol.
///
/// Fails with `EmptyData` on an empty table, `MissingSymbolData` when a
/// symbol has no usable price at all, `InvalidPrice` when a complete row
/// holds a zero or negative close, and `InsufficientHistory` when fewer than
/// two complete rows survive.
pub fn normalize(raw: &RawPriceTable, symbols: &[String]) -> Result<PriceTable> {
    if raw.is_empty() {
        return Err(Error::EmptyData);
    }

    let mut columns: Vec<String> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let symbol = symbol.to_uppercase();
        if !columns.contains(&symbol) {
            columns.push(symbol);
        }
    }

    if columns.is_empty() {
        return Err(Error::InvalidInput(
            "No symbols requested".to_string(),
        ));
    }

    let missing: Vec<String> = columns
        .iter()
        .filter(|s| !raw.has_any(s))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingSymbolData(missing));
    }

    let mut dates = Vec::with_capacity(raw.len());
    let mut prices = Vec::with_capacity(raw.len());

    for date in raw.rows.keys() {
        let row: Option<Vec<f64>> = columns.iter().map(|s| raw.get(*date, s)).collect();
        if let Some(row) = row {
            if let Some(i) = row.iter().position(|p| *p <= 0.0) {
                return Err(Error::InvalidPrice {
                    symbol: columns[i].clone(),
                    date: *date,
                    price: row[i],
                });
            }
            dates.push(*date);
            prices.push(row);
        }
    }

    tracing::debug!(
        raw_rows = raw.len(),
        complete_rows = dates.len(),
        "normalized price table"
    );

    if dates.len() < 2 {
        return Err(Error::InsufficientHistory { rows: dates.len() });
    }

    Ok(PriceTable {
        symbols: columns,
        dates,
        prices,
    })
}
