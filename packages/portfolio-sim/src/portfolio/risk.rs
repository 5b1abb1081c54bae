//! Portfolio risk metrics calculation.
//!
//! Provides annualized volatility, Sharpe ratio, and max drawdown.

use super::{RISK_FREE_RATE, TRADING_DAYS_PER_YEAR};

/// Calculate annualized volatility from daily returns.
///
/// Uses the sample standard deviation (N-1 denominator) scaled by
/// `sqrt(252)`. With fewer than two returns the deviation is undefined and
/// 0.0 is returned.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Calculate the Sharpe ratio from annualized figures.
///
/// # Arguments
///
/// * `annualized_return` - Annualized portfolio return
/// * `annualized_volatility` - Annualized volatility of daily returns
///
/// # Returns
///
/// `(annualized_return - RISK_FREE_RATE) / annualized_volatility`, or exactly
/// 0.0 when volatility is not positive.
pub fn sharpe_ratio(annualized_return: f64, annualized_volatility: f64) -> f64 {
    if annualized_volatility.is_nan() || annualized_volatility <= 0.0 {
        return 0.0;
    }

    (annualized_return - RISK_FREE_RATE) / annualized_volatility
}

/// Calculate maximum drawdown from a value series.
///
/// Returns the maximum peak-to-trough decline as a decimal (e.g., 0.15 for
/// 15% drawdown), measured against the running peak.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };

    let mut running_max = first;
    let mut max_drawdown = 0.0;

    for &value in values {
        if value > running_max {
            running_max = value;
        }
        if running_max <= 0.0 {
            continue;
        }
        let drawdown = (running_max - value) / running_max;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }

    max_drawdown
}
