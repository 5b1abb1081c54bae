//! Buy-and-hold simulation.

use super::performance::{
    annualized_return, best_and_worst, daily_returns, individual_returns, total_return,
};
use super::risk::{annualized_volatility, max_drawdown, sharpe_ratio};
use crate::prices::PriceTable;
use crate::types::{
    PerformanceMetrics, PortfolioRequest, PortfolioValueSeries, ShareAllocation, ValuePoint,
};
use crate::{Error, Result};

/// Buy shares on the first date of the table.
///
/// `shares = initial_cash * weight / first_price` for each requested ticker.
pub fn allocate_shares(request: &PortfolioRequest, table: &PriceTable) -> Result<ShareAllocation> {
    let date = table.first_date();
    let first = table.row(0);

    let positions = request
        .holdings()
        .map(|(ticker, weight)| {
            let col = table
                .column(ticker)
                .ok_or_else(|| Error::MissingSymbolData(vec![ticker.to_string()]))?;
            let price = first[col];

            if !price.is_finite() || price <= 0.0 {
                return Err(Error::InvalidPrice {
                    symbol: ticker.to_string(),
                    date,
                    price,
                });
            }

            Ok((ticker.to_string(), request.initial_cash() * weight / price))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ShareAllocation { positions, date })
}

/// Value the fixed allocation on every date of the table.
pub fn value_series(allocation: &ShareAllocation, table: &PriceTable) -> Result<PortfolioValueSeries> {
    let columns = allocation
        .positions
        .iter()
        .map(|(symbol, shares)| {
            table
                .column(symbol)
                .map(|col| (col, *shares))
                .ok_or_else(|| Error::MissingSymbolData(vec![symbol.clone()]))
        })
        .collect::<Result<Vec<_>>>()?;

    let points = table
        .rows()
        .map(|(date, prices)| ValuePoint {
            date,
            value: columns.iter().map(|(col, shares)| shares * prices[*col]).sum(),
        })
        .collect();

    Ok(PortfolioValueSeries { points })
}

/// Run the full return/risk pipeline for a request over a cleaned table.
///
/// Steps: allocate shares on the first date, value them on every date,
/// derive daily returns, then total/annualized return, volatility, Sharpe,
/// max drawdown and best/worst performer. Any failure aborts the run.
pub fn simulate(
    request: &PortfolioRequest,
    table: &PriceTable,
) -> Result<(PortfolioValueSeries, PerformanceMetrics)> {
    let (_, series, metrics) = simulate_with_allocation(request, table)?;
    Ok((series, metrics))
}

/// Same as [`simulate`], also returning the share allocation it bought.
pub fn simulate_with_allocation(
    request: &PortfolioRequest,
    table: &PriceTable,
) -> Result<(ShareAllocation, PortfolioValueSeries, PerformanceMetrics)> {
    if table.len() < 2 {
        return Err(Error::InsufficientHistory { rows: table.len() });
    }

    let allocation = allocate_shares(request, table)?;
    let series = value_series(&allocation, table)?;
    let values = series.values();

    let returns = daily_returns(&values);
    let final_value = series.last_value();
    let total = total_return(request.initial_cash(), final_value);
    let annualized = annualized_return(total, table.len());
    let volatility = annualized_volatility(&returns);

    let individual = individual_returns(request.tickers(), table)?;
    let (best, worst) = best_and_worst(&individual)
        .map(|(b, w)| (b.to_string(), w.to_string()))
        .ok_or_else(|| Error::InvalidInput("No tickers to rank".to_string()))?;

    tracing::debug!(
        rows = table.len(),
        final_value,
        total_return = total,
        "simulated portfolio"
    );

    let metrics = PerformanceMetrics {
        final_value,
        total_return: total,
        annualized_return: annualized,
        annualized_volatility: volatility,
        sharpe_ratio: sharpe_ratio(annualized, volatility),
        max_drawdown: max_drawdown(&values),
        best_performer: best,
        worst_performer: worst,
        individual_returns: individual,
    };

    Ok((allocation, series, metrics))
}
