//! Yahoo Finance chart-API price source.

use super::{PriceSource, RawPriceTable};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fetches daily closes from the public Yahoo Finance chart endpoint.
///
/// One blocking request per symbol, no retries.
#[derive(Debug, Clone)]
pub struct YahooPriceSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooPriceSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the source at a different chart endpoint (proxies, mirrors).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::DataFetch(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn fetch_one(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<RawPriceTable> {
        let (period1, period2) = period_bounds(start, end);

        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        );

        debug!("Fetching from Yahoo Finance: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::DataFetch(format!("{}: {}", symbol, e)))?;

        if !response.status().is_success() {
            return Err(Error::DataFetch(format!(
                "Yahoo Finance API error: {} for symbol {}",
                response.status(),
                symbol
            )));
        }

        let body: YahooResponse = response
            .json()
            .map_err(|e| Error::DataFetch(format!("{}: {}", symbol, e)))?;

        parse_chart(symbol, body)
    }
}

impl PriceSource for YahooPriceSource {
    fn fetch_closes(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawPriceTable> {
        let mut table = RawPriceTable::new();

        for symbol in symbols {
            let closes = self.fetch_one(&symbol.to_uppercase(), start, end)?;
            info!("Downloaded {} closes for {}", closes.len(), symbol);
            table.extend(closes);
        }

        Ok(table)
    }
}

/// `period1`/`period2` query bounds: midnight UTC of each date.
///
/// The end date itself is excluded, matching the usual `[start, end)`
/// download window.
fn period_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN).and_utc().timestamp();
    (midnight(start), midnight(end))
}

fn parse_chart(symbol: &str, body: YahooResponse) -> Result<RawPriceTable> {
    if let Some(err) = body.chart.error {
        return Err(Error::DataFetch(format!(
            "{}: {} ({})",
            symbol, err.description, err.code
        )));
    }

    let result = body
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| Error::DataFetch(format!("No data returned for symbol {}", symbol)))?;

    let mut table = RawPriceTable::new();
    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    for (i, ts) in timestamps.iter().enumerate() {
        let Some(date) = DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        // null closes become missing cells; the normalizer drops the row
        match closes.get(i).copied().flatten() {
            Some(close) => table.insert(date, symbol, close),
            None => table.insert_date(date),
        }
    }

    Ok(table)
}

// ==================== Yahoo Finance response types ====================

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
