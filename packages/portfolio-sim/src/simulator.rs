//! End-to-end simulation pipeline.

use crate::benchmark::compare;
use crate::config::SimulatorConfig;
use crate::portfolio::simulate_with_allocation;
use crate::prices::{normalize, PriceSource};
use crate::report::SimulationReport;
use crate::types::{BenchmarkSeries, PortfolioRequest};
use crate::{Error, Result};
use tracing::{info, warn};

/// Runs fetch → normalize → simulate → benchmark for a request.
///
/// The portfolio path is all-or-nothing. The benchmark path is best-effort:
/// its failures are logged and the report simply carries no benchmark.
#[derive(Debug)]
pub struct Simulator<S> {
    source: S,
    config: SimulatorConfig,
}

impl<S: PriceSource> Simulator<S> {
    pub fn new(source: S, config: SimulatorConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulate the request and compare it to the configured benchmark.
    pub fn run(&self, request: &PortfolioRequest) -> Result<SimulationReport> {
        info!(
            "Simulating {} tickers from {} to {}",
            request.tickers().len(),
            request.start_date(),
            request.end_date()
        );

        let raw = self
            .source
            .fetch_closes(request.tickers(), request.start_date(), request.end_date())
            .map_err(into_fetch_error)?;
        let table = normalize(&raw, request.tickers())?;

        let (allocation, values, metrics) = simulate_with_allocation(request, &table)?;

        info!(
            "Portfolio final value {:.2} ({:.2}% total return)",
            metrics.final_value,
            metrics.total_return * 100.0
        );

        let benchmark = match self.benchmark(request) {
            Ok(series) => Some(series),
            Err(e) => {
                warn!(
                    "Benchmark {} unavailable, continuing without it: {}",
                    self.config.benchmark_symbol, e
                );
                None
            }
        };

        Ok(SimulationReport {
            request: request.clone(),
            allocation,
            values,
            metrics,
            benchmark,
        })
    }

    /// Fetch and rescale the benchmark over the request's window.
    pub fn benchmark(&self, request: &PortfolioRequest) -> Result<BenchmarkSeries> {
        let symbols = [self.config.benchmark_symbol.to_uppercase()];
        let raw = self
            .source
            .fetch_closes(&symbols, request.start_date(), request.end_date())
            .map_err(into_fetch_error)?;
        let table = normalize(&raw, &symbols)?;

        compare(&table, request.initial_cash())
    }
}

// Sources should already report DataFetch; anything else they raise is
// still a retrieval failure from the pipeline's point of view.
fn into_fetch_error(e: Error) -> Error {
    match e {
        Error::DataFetch(_) => e,
        other => Error::DataFetch(other.to_string()),
    }
}
