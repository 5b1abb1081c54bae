//! User input parsing and the interactive prompt.

use crate::types::PortfolioRequest;
use crate::{Error, Result};
use chrono::{Days, NaiveDate};
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Relative lookback window ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// N years, counted as N * 365 days
    Years(u32),
    /// N months, counted as N * 30 days
    Months(u32),
}

impl Lookback {
    /// Length of the window in calendar days.
    pub fn days(&self) -> u64 {
        match self {
            Self::Years(n) => u64::from(*n) * 365,
            Self::Months(n) => u64::from(*n) * 30,
        }
    }

    /// `(start, end)` for a window ending on `today`.
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let start = today
            .checked_sub_days(Days::new(self.days()))
            .ok_or_else(|| Error::InvalidInput(format!("Period {} is too long", self)))?;
        Ok((start, today))
    }
}

impl FromStr for Lookback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        let invalid = || Error::InvalidInput(format!("Invalid period '{}': use '1y', '6m', etc.", s));

        let count = |digits: &str| match digits.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(invalid()),
        };

        if let Some(n) = s.strip_suffix('y') {
            count(n).map(Lookback::Years)
        } else if let Some(n) = s.strip_suffix('m') {
            count(n).map(Lookback::Months)
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(n) => write!(f, "{}y", n),
            Self::Months(n) => write!(f, "{}m", n),
        }
    }
}

/// Parse a `TICKER WEIGHT` or `TICKER=WEIGHT` pair.
///
/// The ticker is uppercased; the weight must be a positive number.
pub fn parse_holding(entry: &str) -> Result<(String, f64)> {
    let malformed = || {
        Error::InvalidInput(format!(
            "Invalid holding '{}': use 'TICKER WEIGHT' (e.g., 'AAPL 0.5')",
            entry.trim()
        ))
    };

    let parts: Vec<&str> = entry
        .split(|c: char| c == '=' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    let [ticker, weight] = parts.as_slice() else {
        return Err(malformed());
    };

    let weight: f64 = weight.parse().map_err(|_| malformed())?;
    if !weight.is_finite() || weight <= 0.0 {
        return Err(Error::InvalidInput("Weight must be positive".to_string()));
    }

    Ok((ticker.to_uppercase(), weight))
}

/// Collect a request interactively.
///
/// Asks for the initial cash, then `TICKER WEIGHT` lines until `done`, then
/// the lookback period. Invalid answers print an error and ask again. Running
/// out of input aborts with `InvalidInput`.
pub fn prompt_request<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    today: NaiveDate,
) -> Result<PortfolioRequest> {
    writeln!(output, "\n=== Portfolio Simulator ===")?;

    let initial_cash = loop {
        let line = ask(
            &mut input,
            &mut output,
            "Enter initial investment amount (e.g., 10000): ",
        )?;
        match line.parse::<f64>() {
            Ok(cash) if cash.is_finite() && cash > 0.0 => break cash,
            Ok(_) => writeln!(output, "Error: Investment must be positive!")?,
            Err(_) => writeln!(output, "Error: Enter a valid number (e.g., 10000)!")?,
        }
    };

    writeln!(
        output,
        "Starting with ${:.2}. Enter stock tickers and weights (e.g., 'AAPL 0.5' for 50%). Type 'done' when finished.",
        initial_cash
    )?;

    let mut tickers = Vec::new();
    let mut weights = Vec::new();
    loop {
        let line = ask(
            &mut input,
            &mut output,
            "Stock ticker and weight (e.g., 'AAPL 0.5'): ",
        )?;

        if line.eq_ignore_ascii_case("done") {
            if tickers.is_empty() {
                writeln!(output, "Error: You must enter at least one stock!")?;
                continue;
            }
            break;
        }

        match parse_holding(&line) {
            Ok((ticker, weight)) => {
                tickers.push(ticker);
                weights.push(weight);
            }
            Err(e) => writeln!(output, "Error: {}", e)?,
        }
    }

    let (start, end) = loop {
        let line = ask(
            &mut input,
            &mut output,
            "Enter time period (e.g., '1y' for 1 year, '6m' for 6 months): ",
        )?;
        match line.parse::<Lookback>().and_then(|p| p.date_range(today)) {
            Ok(range) => break range,
            Err(_) => writeln!(output, "Invalid period! Use '1y', '6m', etc.")?,
        }
    };

    PortfolioRequest::new(tickers, weights, initial_cash, start, end)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::InvalidInput("Input ended early".to_string()));
    }
    Ok(line.trim().to_string())
}
