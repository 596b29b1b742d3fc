//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::stooq_adapter::StooqAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::analysis::{self, Analysis, AnalysisRequest, IndicatorParams};
use crate::domain::error::SigchartError;
use crate::domain::indicator::{macd, rsi, IndicatorPoint};
use crate::domain::price;
use crate::domain::signal::{SignalThresholds, DEFAULT_RSI_BUY_BELOW, DEFAULT_RSI_SELL_ABOVE};
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_TICKER: &str = "AAPL.US";
pub const DEFAULT_START_DATE: &str = "2024-01-01";
pub const DEFAULT_CHART_OUTPUT: &str = "signals.svg";

#[derive(Parser, Debug)]
#[command(name = "sigchart", about = "Single-ticker RSI/MACD signal analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Ticker symbol (e.g. AAPL.US)
    #[arg(short, long)]
    pub ticker: Option<String>,
    /// Range start, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// Range end, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub end: Option<String>,
    /// INI config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Read bars from <DIR>/<TICKER>.csv instead of the network
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch price history, compute RSI/MACD signals, and render a chart
    Analyze {
        #[command(flatten)]
        args: RequestArgs,
        /// Chart output path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Rows of the summary table to print
        #[arg(long, default_value_t = 8)]
        tail: usize,
    },
    /// Download daily bars and print them as CSV
    Fetch {
        #[command(flatten)]
        args: RequestArgs,
    },
    /// Validate a config file without fetching anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze { args, output, tail } => run_analyze(args, output, tail),
        Command::Fetch { args } => run_fetch(args),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SigchartError> {
    FileConfigAdapter::from_file(path).map_err(|reason| SigchartError::ConfigParse {
        file: path.display().to_string(),
        reason,
    })
}

fn parse_date(value: &str, key: &str) -> Result<NaiveDate, SigchartError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| SigchartError::ConfigInvalid {
        section: "analysis".into(),
        key: key.into(),
        reason: format!("invalid date {:?} (expected YYYY-MM-DD)", value),
    })
}

fn period(value: i64, key: &str) -> Result<usize, SigchartError> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| SigchartError::ConfigInvalid {
            section: "indicators".into(),
            key: key.into(),
            reason: format!("{} is not a positive period", value),
        })
}

/// Build a validated [`AnalysisRequest`] from an optional config file with CLI
/// overrides taking precedence. Every value has a default.
pub fn build_request(
    config: Option<&dyn ConfigPort>,
    ticker: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<AnalysisRequest, SigchartError> {
    let cfg_string = |section: &str, key: &str| config.and_then(|c| c.get_string(section, key));
    let cfg_int = |section: &str, key: &str, default: i64| {
        config.map_or(default, |c| c.get_int(section, key, default))
    };
    let cfg_double = |section: &str, key: &str, default: f64| {
        config.map_or(default, |c| c.get_double(section, key, default))
    };

    let ticker = ticker
        .map(str::to_string)
        .or_else(|| cfg_string("analysis", "ticker"))
        .unwrap_or_else(|| DEFAULT_TICKER.to_string());

    let start_date = match start
        .map(str::to_string)
        .or_else(|| cfg_string("analysis", "start_date"))
    {
        Some(s) => parse_date(&s, "start_date")?,
        None => parse_date(DEFAULT_START_DATE, "start_date")?,
    };

    let end_date = match end
        .map(str::to_string)
        .or_else(|| cfg_string("analysis", "end_date"))
    {
        Some(s) => parse_date(&s, "end_date")?,
        None => chrono::Local::now().date_naive(),
    };

    let params = IndicatorParams {
        rsi_period: period(
            cfg_int("indicators", "rsi_period", rsi::DEFAULT_PERIOD as i64),
            "rsi_period",
        )?,
        macd_fast: period(
            cfg_int("indicators", "macd_fast", macd::DEFAULT_FAST as i64),
            "macd_fast",
        )?,
        macd_slow: period(
            cfg_int("indicators", "macd_slow", macd::DEFAULT_SLOW as i64),
            "macd_slow",
        )?,
        macd_signal: period(
            cfg_int("indicators", "macd_signal", macd::DEFAULT_SIGNAL as i64),
            "macd_signal",
        )?,
    };

    let thresholds = SignalThresholds {
        rsi_buy_below: cfg_double("signals", "rsi_buy_below", DEFAULT_RSI_BUY_BELOW),
        rsi_sell_above: cfg_double("signals", "rsi_sell_above", DEFAULT_RSI_SELL_ABOVE),
    };

    let request = AnalysisRequest {
        ticker,
        start_date,
        end_date,
        params,
        thresholds,
    };
    request.validate()?;
    Ok(request)
}

/// Resolve chart output path and dimensions from config plus an optional
/// path override.
pub fn chart_settings(
    config: Option<&dyn ConfigPort>,
    output: Option<PathBuf>,
) -> Result<(PathBuf, u32, u32), SigchartError> {
    let output = output
        .or_else(|| {
            config
                .and_then(|c| c.get_string("chart", "output"))
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_OUTPUT));

    let dimension = |key: &str, default: i64| -> Result<u32, SigchartError> {
        let value = config.map_or(default, |c| c.get_int("chart", key, default));
        u32::try_from(value)
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| SigchartError::ConfigInvalid {
                section: "chart".into(),
                key: key.into(),
                reason: format!("{} is not a positive dimension", value),
            })
    };

    Ok((output, dimension("width", 800)?, dimension("height", 400)?))
}

fn make_data_port(data_dir: Option<PathBuf>) -> Box<dyn DataPort> {
    match data_dir {
        Some(dir) => Box::new(CsvDataAdapter::new(dir)),
        None => Box::new(StooqAdapter::new()),
    }
}

struct Prepared {
    config: Option<FileConfigAdapter>,
    request: AnalysisRequest,
    data_port: Box<dyn DataPort>,
}

fn prepare(args: RequestArgs) -> Result<Prepared, SigchartError> {
    let config = match &args.config {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            Some(load_config(path)?)
        }
        None => None,
    };

    let request = build_request(
        config.as_ref().map(|c| c as &dyn ConfigPort),
        args.ticker.as_deref(),
        args.start.as_deref(),
        args.end.as_deref(),
    )?;

    Ok(Prepared {
        config,
        request,
        data_port: make_data_port(args.data_dir),
    })
}

fn run_analyze(args: RequestArgs, output: Option<PathBuf>, tail: usize) -> ExitCode {
    let prepared = match prepare(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let request = &prepared.request;

    eprintln!(
        "Fetching {} from {} to {}",
        request.ticker, request.start_date, request.end_date
    );

    let result = analysis::run(prepared.data_port.as_ref(), request);
    let analysis = match result {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if analysis.is_empty() {
        let err = SigchartError::NoData {
            ticker: request.ticker.clone(),
            start: request.start_date,
            end: request.end_date,
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    eprintln!(
        "Computed {} and {} over {} bars",
        analysis.rsi.indicator_type,
        analysis.macd.indicator_type,
        analysis.bars.len()
    );

    print_tail(&analysis, tail);
    eprintln!(
        "Signals: {} buy, {} sell",
        analysis.signals.buy_count(),
        analysis.signals.sell_count()
    );

    let chart_config = prepared.config.as_ref().map(|c| c as &dyn ConfigPort);
    let (chart_path, width, height) = match chart_settings(chart_config, output) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let chart = SvgChartAdapter::new(width, height);
    match chart.write(&analysis, &chart_path) {
        Ok(()) => {
            eprintln!("Chart written to: {}", chart_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write chart: {e}");
            (&e).into()
        }
    }
}

fn run_fetch(args: RequestArgs) -> ExitCode {
    let prepared = match prepare(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let request = &prepared.request;

    eprintln!(
        "Fetching {} from {} to {}",
        request.ticker, request.start_date, request.end_date
    );

    let bars = match prepared.data_port.fetch_daily(
        &request.ticker,
        request.start_date,
        request.end_date,
    ) {
        Ok(bars) => price::normalize(bars),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if bars.is_empty() {
        let err = SigchartError::NoData {
            ticker: request.ticker.clone(),
            start: request.start_date,
            end: request.end_date,
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    println!("date,open,high,low,close,volume");
    for bar in &bars {
        println!(
            "{},{},{},{},{},{}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }
    eprintln!("{} bars fetched", bars.len());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let request = match build_request(Some(&adapter), None, None, None) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (chart_path, width, height) = match chart_settings(Some(&adapter), None) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  ticker:     {}", request.ticker);
    eprintln!(
        "  range:      {} to {}",
        request.start_date, request.end_date
    );
    eprintln!(
        "  indicators: RSI({}), MACD({},{},{})",
        request.params.rsi_period,
        request.params.macd_fast,
        request.params.macd_slow,
        request.params.macd_signal
    );
    eprintln!(
        "  signals:    buy RSI < {}, sell RSI > {}",
        request.thresholds.rsi_buy_below, request.thresholds.rsi_sell_above
    );
    eprintln!("  chart:      {} ({}x{})", chart_path.display(), width, height);
    eprintln!("Config is valid.");
    ExitCode::SUCCESS
}

/// Print the last `rows` dates as an aligned table on stdout.
fn print_tail(analysis: &Analysis, rows: usize) {
    let n = analysis.bars.len();
    let from = n.saturating_sub(rows);

    println!(
        "{:<12} {:>10} {:>8} {:>9} {:>9} {:>4} {:>4}",
        "date", "close", "rsi", "macd", "signal", "buy", "sell"
    );
    for i in from..n {
        let bar = &analysis.bars[i];
        let (macd_str, signal_str) = match analysis.macd.values[i].macd() {
            Some((line, signal, _)) => (format!("{:.3}", line), format!("{:.3}", signal)),
            None => ("-".to_string(), "-".to_string()),
        };
        println!(
            "{:<12} {:>10.2} {:>8} {:>9} {:>9} {:>4} {:>4}",
            bar.date.to_string(),
            bar.close,
            fmt_simple(&analysis.rsi.values[i]),
            macd_str,
            signal_str,
            flag(analysis.signals.points[i].buy),
            flag(analysis.signals.points[i].sell),
        );
    }
}

fn fmt_simple(point: &IndicatorPoint) -> String {
    point
        .simple()
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn flag(set: bool) -> &'static str {
    if set { "*" } else { "." }
}
