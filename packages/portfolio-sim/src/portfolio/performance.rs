//! Portfolio performance analytics.

use super::TRADING_DAYS_PER_YEAR;
use crate::prices::PriceTable;
use crate::{Error, Result};

/// Simple daily returns `v[i] / v[i-1] - 1`.
///
/// The result is one shorter than the input; fewer than two values give an
/// empty vector.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Return over the whole holding period as a fraction.
pub fn total_return(initial_value: f64, final_value: f64) -> f64 {
    if initial_value <= 0.0 {
        return 0.0;
    }
    (final_value - initial_value) / initial_value
}

/// Geometric annualization: `(1 + total_return)^(252 / periods) - 1`.
///
/// `periods` is the number of observed trading days, so a window thinned out
/// by data cleaning annualizes as if it were shorter.
pub fn annualized_return(total_return: f64, periods: usize) -> f64 {
    if periods == 0 {
        return 0.0;
    }

    (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / periods as f64) - 1.0
}

/// First-to-last return for each ticker, in the order given.
pub fn individual_returns(tickers: &[String], table: &PriceTable) -> Result<Vec<(String, f64)>> {
    let first = table.row(0);
    let last = table.row(table.len() - 1);

    tickers
        .iter()
        .map(|ticker| {
            let col = table
                .column(ticker)
                .ok_or_else(|| Error::MissingSymbolData(vec![ticker.clone()]))?;

            if !first[col].is_finite() || first[col] <= 0.0 {
                return Err(Error::InvalidPrice {
                    symbol: ticker.clone(),
                    date: table.first_date(),
                    price: first[col],
                });
            }

            Ok((ticker.clone(), last[col] / first[col] - 1.0))
        })
        .collect()
}

/// Best and worst entries by return.
///
/// Ties resolve to the earliest entry. Returns `None` for an empty slice.
pub fn best_and_worst(returns: &[(String, f64)]) -> Option<(&str, &str)> {
    let (first, rest) = returns.split_first()?;
    let mut best = first;
    let mut worst = first;

    for entry in rest {
        if entry.1 > best.1 {
            best = entry;
        }
        if entry.1 < worst.1 {
            worst = entry;
        }
    }

    Some((best.0.as_str(), worst.0.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::{normalize, RawPriceTable};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn owned(list: &[(&str, f64)]) -> Vec<(String, f64)> {
        list.iter().map(|(s, r)| (s.to_string(), *r)).collect()
    }

    #[test]
    fn test_daily_returns() {
        let returns = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[1], -0.10, epsilon = 1e-12);

        assert!(daily_returns(&[100.0]).is_empty());
    }

    #[test]
    fn test_total_return() {
        assert_relative_eq!(total_return(10_000.0, 11_500.0), 0.15, epsilon = 1e-12);
        assert_eq!(total_return(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_annualized_return_full_year() {
        // 252 observations is exactly one year
        assert_relative_eq!(annualized_return(0.10, 252), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_annualized_return_half_year() {
        // 10% over 126 days compounds to 21% a year
        assert_relative_eq!(annualized_return(0.10, 126), 0.21, epsilon = 1e-9);
    }

    #[test]
    fn test_annualized_return_zero_periods() {
        assert_eq!(annualized_return(0.10, 0), 0.0);
    }

    #[test]
    fn test_best_and_worst() {
        let returns = owned(&[("A", 0.05), ("B", 0.20), ("C", -0.10), ("D", 0.0)]);
        assert_eq!(best_and_worst(&returns), Some(("B", "C")));
    }

    #[test]
    fn test_best_and_worst_ties_use_first_occurrence() {
        let returns = owned(&[("A", 0.10), ("B", 0.10), ("C", -0.05), ("D", -0.05)]);
        assert_eq!(best_and_worst(&returns), Some(("A", "C")));

        let flat = owned(&[("X", 0.0), ("Y", 0.0)]);
        assert_eq!(best_and_worst(&flat), Some(("X", "X")));
    }

    #[test]
    fn test_best_and_worst_empty() {
        assert_eq!(best_and_worst(&[]), None);
    }

    #[test]
    fn test_individual_returns() {
        let d0 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let mut raw = RawPriceTable::new();
        raw.insert(d0, "A", 100.0);
        raw.insert(d0, "B", 50.0);
        raw.insert(d1, "A", 120.0);
        raw.insert(d1, "B", 45.0);
        let symbols = vec!["A".to_string(), "B".to_string()];
        let table = normalize(&raw, &symbols).unwrap();

        let returns = individual_returns(&symbols, &table).unwrap();
        assert_eq!(returns[0].0, "A");
        assert_relative_eq!(returns[0].1, 0.20, epsilon = 1e-12);
        assert_relative_eq!(returns[1].1, -0.10, epsilon = 1e-12);

        let unknown = individual_returns(&["Z".to_string()], &table);
        assert!(matches!(unknown, Err(Error::MissingSymbolData(_))));
    }
}
