//! Simulation report: console summary and CSV output.

use crate::config::SimulatorConfig;
use crate::types::{
    BenchmarkSeries, PerformanceMetrics, PortfolioRequest, PortfolioValueSeries, ShareAllocation,
    ValuePoint,
};
use crate::Result;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one run produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimulationReport {
    pub request: PortfolioRequest,
    pub allocation: ShareAllocation,
    pub values: PortfolioValueSeries,
    pub metrics: PerformanceMetrics,
    /// Absent when the benchmark could not be fetched or rescaled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkSeries>,
}

impl SimulationReport {
    /// Write the value series as `date,value` CSV files.
    ///
    /// The benchmark file is only written when a benchmark is present.
    /// Returns the paths that were written.
    pub fn write_csv(&self, config: &SimulatorConfig) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&config.output_dir)?;

        let mut written = Vec::new();

        let value_path = config.value_path();
        write_series(&value_path, &self.values.points)?;
        written.push(value_path);

        if let Some(benchmark) = &self.benchmark {
            let benchmark_path = config.benchmark_path();
            write_series(&benchmark_path, &benchmark.points)?;
            written.push(benchmark_path);
        }

        for path in &written {
            tracing::info!("Wrote {}", path.display());
        }

        Ok(written)
    }
}

fn write_series(path: &Path, points: &[ValuePoint]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["date", "value"])?;
    for point in points {
        wtr.write_record([point.date.to_string(), point.value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// One-line pointer telling the user how to chart the written files.
///
/// The first path is the portfolio series, any others are plotted against it.
pub fn chart_hint(written: &[PathBuf]) -> Option<String> {
    let names: Vec<String> = written
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();

    match names.as_slice() {
        [] => None,
        [value] => Some(format!("Chart input: plot {} (date,value) over time", value)),
        [value, others @ ..] => Some(format!(
            "Chart input: plot {} against {} (date,value)",
            value,
            others.join(", ")
        )),
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.metrics;
        let stocks: Vec<String> = self
            .request
            .holdings()
            .map(|(t, w)| format!("{} ({:.0}%)", t, w * 100.0))
            .collect();

        writeln!(f, "=== Portfolio Simulator Results ===")?;
        writeln!(f)?;
        writeln!(f, "Stocks: {}", stocks.join(", "))?;
        writeln!(
            f,
            "Time Period: {} to {}",
            self.request.start_date(),
            self.request.end_date()
        )?;
        writeln!(f, "Initial Investment: ${:.2}", self.request.initial_cash())?;
        writeln!(f, "Final Portfolio Value: ${:.2}", m.final_value)?;
        writeln!(f, "Total Return: {:.2}%", m.total_return * 100.0)?;
        writeln!(f, "Annualized Return: {:.2}%", m.annualized_return * 100.0)?;
        writeln!(
            f,
            "Annualized Volatility: {:.2}%",
            m.annualized_volatility * 100.0
        )?;
        writeln!(f, "Maximum Drawdown: {:.2}%", m.max_drawdown * 100.0)?;
        writeln!(f, "Sharpe Ratio: {:.2}", m.sharpe_ratio)?;
        writeln!(f, "Best Performer: {}", m.best_performer)?;
        write!(f, "Worst Performer: {}", m.worst_performer)?;

        if let Some(benchmark) = &self.benchmark {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "Benchmark ({}) Final Value: ${:.2}", benchmark.symbol, benchmark.last_value())?;
            write!(
                f,
                "Benchmark ({}) Total Return: {:.2}%",
                benchmark.symbol,
                benchmark.total_return() * 100.0
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{allocate_shares, simulate};
    use crate::prices::{normalize, RawPriceTable};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn report(with_benchmark: bool) -> SimulationReport {
        let request = PortfolioRequest::new(
            vec!["A".to_string(), "B".to_string()],
            vec![0.5, 0.5],
            1000.0,
            day(1),
            day(3),
        )
        .unwrap();

        let mut raw = RawPriceTable::new();
        raw.insert(day(2), "A", 100.0);
        raw.insert(day(2), "B", 50.0);
        raw.insert(day(3), "A", 110.0);
        raw.insert(day(3), "B", 55.0);
        let table = normalize(&raw, request.tickers()).unwrap();

        let allocation = allocate_shares(&request, &table).unwrap();
        let (values, metrics) = simulate(&request, &table).unwrap();

        let benchmark = with_benchmark.then(|| BenchmarkSeries {
            symbol: "SPY".to_string(),
            points: vec![
                ValuePoint {
                    date: day(2),
                    value: 1000.0,
                },
                ValuePoint {
                    date: day(3),
                    value: 1050.0,
                },
            ],
        });

        SimulationReport {
            request,
            allocation,
            values,
            metrics,
            benchmark,
        }
    }

    #[test]
    fn test_display_summary() {
        let text = report(false).to_string();

        assert!(text.contains("Stocks: A (50%), B (50%)"));
        assert!(text.contains("Time Period: 2024-01-01 to 2024-01-03"));
        assert!(text.contains("Initial Investment: $1000.00"));
        assert!(text.contains("Final Portfolio Value: $1100.00"));
        assert!(text.contains("Total Return: 10.00%"));
        assert!(text.contains("Maximum Drawdown: 0.00%"));
        assert!(text.contains("Sharpe Ratio: 0.00"));
        assert!(!text.contains("Benchmark"));
    }

    #[test]
    fn test_display_with_benchmark() {
        let text = report(true).to_string();
        assert!(text.contains("Benchmark (SPY) Final Value: $1050.00"));
        assert!(text.contains("Benchmark (SPY) Total Return: 5.00%"));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempdir().unwrap();
        let config = SimulatorConfig {
            output_dir: dir.path().join("out"),
            ..Default::default()
        };

        let written = report(true).write_csv(&config).unwrap();
        assert_eq!(written, vec![config.value_path(), config.benchmark_path()]);

        let values = fs::read_to_string(config.value_path()).unwrap();
        assert_eq!(values, "date,value\n2024-01-02,1000\n2024-01-03,1100\n");

        let benchmark = fs::read_to_string(config.benchmark_path()).unwrap();
        assert!(benchmark.starts_with("date,value\n2024-01-02,1000\n"));
    }

    #[test]
    fn test_write_csv_without_benchmark() {
        let dir = tempdir().unwrap();
        let config = SimulatorConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let written = report(false).write_csv(&config).unwrap();
        assert_eq!(written.len(), 1);
        assert!(!config.benchmark_path().exists());
    }

    #[test]
    fn test_write_csv_unwritable_target() {
        let dir = tempdir().unwrap();
        let config = SimulatorConfig {
            output_dir: dir.path().to_path_buf(),
            value_file: "taken".to_string(),
            ..Default::default()
        };
        fs::create_dir(config.value_path()).unwrap();

        assert!(matches!(
            report(false).write_csv(&config),
            Err(crate::Error::Csv(_))
        ));
    }

    #[test]
    fn test_chart_hint_names_written_files() {
        let dir = tempdir().unwrap();
        let config = SimulatorConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let written = report(true).write_csv(&config).unwrap();
        assert_eq!(
            chart_hint(&written).unwrap(),
            "Chart input: plot portfolio_value.csv against benchmark_value.csv (date,value)"
        );

        let written = report(false).write_csv(&config).unwrap();
        assert_eq!(
            chart_hint(&written).unwrap(),
            "Chart input: plot portfolio_value.csv (date,value) over time"
        );

        assert!(chart_hint(&[]).is_none());
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(report(false)).unwrap();
        assert_eq!(json["metrics"]["best_performer"], "A");
        assert_eq!(json["request"]["tickers"][1], "B");
        assert!(json.get("benchmark").is_none());
    }
}
