//! Portfolio Sim CLI - simulate a weighted basket against a benchmark.
//!
//! Prints a human-readable summary by default, or an `ApiResponse` JSON
//! envelope with `--json`. Logs go to stderr (`RUST_LOG`, default `warn`).

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use portfolio_sim::{
    chart_hint, parse_holding, prompt_request, ApiResponse, Lookback, PortfolioRequest,
    SimulationReport, Simulator, SimulatorConfig, YahooPriceSource,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portfolio-sim")]
#[command(about = "Historical buy-and-hold basket simulator with benchmark comparison")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a basket given on the command line
    Run {
        /// Initial investment amount
        #[arg(short, long)]
        cash: f64,
        /// Holding as TICKER=WEIGHT (repeatable)
        #[arg(short = 's', long = "holding", required = true)]
        holdings: Vec<String>,
        /// Lookback period, e.g. 1y or 6m
        #[arg(short, long)]
        period: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Ask for the basket interactively
    Prompt {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Benchmark ticker (overrides config)
    #[arg(short, long)]
    benchmark: Option<String>,
    /// Directory for CSV output (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Skip writing CSV files
    #[arg(long)]
    no_files: bool,
    /// Print a JSON envelope instead of the text summary
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (request, output) = match cli.command {
        Commands::Run {
            cash,
            holdings,
            period,
            output,
        } => (build_request(cash, &holdings, &period), output),
        Commands::Prompt { output } => {
            let today = Local::now().date_naive();
            // keep stdout clean for the JSON envelope
            let prompts: Box<dyn Write> = if output.json {
                Box::new(io::stderr())
            } else {
                Box::new(io::stdout())
            };
            (prompt_request(io::stdin().lock(), prompts, today), output)
        }
    };

    let result = request.and_then(|req| {
        let config = load_config(&output)?;
        let source = YahooPriceSource::new()?;
        let report = Simulator::new(source, config.clone()).run(&req)?;
        let written = if output.no_files {
            Vec::new()
        } else {
            report.write_csv(&config)?
        };
        Ok((report, written))
    });

    match result {
        Ok((report, written)) => {
            print_report(&report, &written, output.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if output.json {
                println!(
                    "{}",
                    to_json(&ApiResponse::<()>::err(e.to_string()))
                );
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn build_request(cash: f64, holdings: &[String], period: &str) -> portfolio_sim::Result<PortfolioRequest> {
    let (tickers, weights): (Vec<String>, Vec<f64>) = holdings
        .iter()
        .map(|h| parse_holding(h))
        .collect::<portfolio_sim::Result<Vec<_>>>()?
        .into_iter()
        .unzip();

    let today = Local::now().date_naive();
    let (start, end) = period.parse::<Lookback>()?.date_range(today)?;

    PortfolioRequest::new(tickers, weights, cash, start, end)
}

fn load_config(output: &OutputArgs) -> portfolio_sim::Result<SimulatorConfig> {
    let mut config = SimulatorConfig::load()?;
    if let Some(benchmark) = &output.benchmark {
        config.benchmark_symbol = benchmark.to_uppercase();
    }
    if let Some(dir) = &output.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn print_report(report: &SimulationReport, written: &[PathBuf], json: bool) {
    if json {
        println!("{}", to_json(&ApiResponse::ok(report)));
        return;
    }

    println!();
    println!("{}", report);
    if report.benchmark.is_none() {
        println!("(benchmark unavailable, comparison omitted)");
    }
    for path in written {
        println!("Saved {}", path.display());
    }
    if let Some(hint) = chart_hint(written) {
        println!("{}", hint);
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{}\"}}", e))
}
