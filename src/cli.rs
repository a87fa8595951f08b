//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report::{format_metrics, format_scan};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::config_validation::{
    DEFAULT_LOOKBACK_DAYS, parse_date, parse_end_date, validate_data_config,
    validate_performance_config, validate_scan_config, validate_signal_config,
};
use crate::domain::error::SamperfError;
use crate::domain::metrics::PerformanceReport;
use crate::domain::performance::{PerformanceAccumulator, PerformanceConfig};
use crate::domain::scan::{ScanRequest, parse_codes, scan_universe};
use crate::domain::signal::SignalConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "samperf",
    about = "Portfolio performance analytics and technical signal scanner"
)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute performance metrics for a portfolio ledger
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        portfolio: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate technical signals across a universe of codes
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List available symbols on an exchange
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        exchange: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            portfolio,
            output,
        } => run_analyze(&config, &portfolio, output.as_deref()),
        Command::Scan {
            config,
            code,
            exchange,
            end_date,
            output,
        } => run_scan(
            &config,
            code.as_deref(),
            exchange.as_deref(),
            end_date.as_deref(),
            output.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config, exchange } => {
            run_list_symbols(&config, exchange.as_deref())
        }
    }
}

fn fail(err: &SamperfError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

pub fn build_performance_config(
    adapter: &dyn ConfigPort,
) -> Result<PerformanceConfig, SamperfError> {
    validate_performance_config(adapter)?;
    let defaults = PerformanceConfig::default();
    Ok(PerformanceConfig {
        risk_free_rate: adapter.get_double(
            "performance",
            "risk_free_rate",
            defaults.risk_free_rate,
        ),
        trading_days_per_year: adapter.get_double(
            "performance",
            "trading_days_per_year",
            defaults.trading_days_per_year,
        ),
    })
}

pub fn build_signal_config(adapter: &dyn ConfigPort) -> Result<SignalConfig, SamperfError> {
    validate_signal_config(adapter)?;
    let defaults = SignalConfig::default();
    Ok(SignalConfig {
        ma_short: adapter.get_usize("signal", "ma_short", defaults.ma_short),
        ma_long: adapter.get_usize("signal", "ma_long", defaults.ma_long),
        rsi_period: adapter.get_usize("signal", "rsi_period", defaults.rsi_period),
        bollinger_period: adapter.get_usize(
            "signal",
            "bollinger_period",
            defaults.bollinger_period,
        ),
        bollinger_multiplier: adapter.get_double(
            "signal",
            "bollinger_multiplier",
            defaults.bollinger_multiplier,
        ),
        rsi_oversold: adapter.get_double("signal", "rsi_oversold", defaults.rsi_oversold),
        rsi_overbought: adapter.get_double("signal", "rsi_overbought", defaults.rsi_overbought),
        trading_days_per_year: adapter.get_double(
            "signal",
            "trading_days_per_year",
            defaults.trading_days_per_year,
        ),
    })
}

/// Resolves the scan universe and window; command-line overrides win over
/// the config file, and the window ends today when no end date is given.
pub fn build_scan_request(
    adapter: &dyn ConfigPort,
    code: Option<&str>,
    exchange: Option<&str>,
    end_date: Option<&str>,
) -> Result<ScanRequest, SamperfError> {
    validate_scan_config(adapter, code.is_some())?;

    let exchange = match exchange {
        Some(e) if !e.trim().is_empty() => e.trim().to_string(),
        _ => adapter
            .get_string("data", "exchange")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SamperfError::ConfigMissing {
                section: "data".into(),
                key: "exchange".into(),
            })?,
    };

    let codes_str = match code {
        Some(c) => c.to_string(),
        None => adapter.get_string("data", "codes").unwrap_or_default(),
    };
    let codes = parse_codes(&codes_str).map_err(|e| SamperfError::ConfigInvalid {
        section: "data".into(),
        key: "codes".into(),
        reason: e.to_string(),
    })?;

    let end_date = match end_date {
        Some(s) => parse_date(s).map_err(|_| SamperfError::ConfigInvalid {
            section: "scan".into(),
            key: "end_date".into(),
            reason: format!("invalid end_date {s:?}, expected YYYY-MM-DD"),
        })?,
        None => parse_end_date(adapter)?.unwrap_or_else(today),
    };

    let lookback = adapter.get_int("scan", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    ScanRequest::lookback(&exchange, codes, end_date, lookback)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn build_data_adapter(adapter: &dyn ConfigPort) -> Result<CsvAdapter, SamperfError> {
    let directory = adapter
        .get_string("data", "directory")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| SamperfError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(directory)))
}

fn output_path(adapter: &dyn ConfigPort, cli_output: Option<&Path>) -> Option<PathBuf> {
    cli_output
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
}

/// Feeds every observation of `portfolio` through a fresh accumulator.
///
/// Returns `Ok(None)` when the ledger has fewer than two observations.
pub fn analyze_portfolio(
    ledger: &dyn LedgerPort,
    portfolio: &str,
    config: PerformanceConfig,
) -> Result<Option<PerformanceReport>, SamperfError> {
    let observations = ledger.fetch_observations(portfolio)?;
    let mut acc = PerformanceAccumulator::new(config);
    for observation in observations {
        acc.record_observation(observation)?;
    }
    tracing::info!(%portfolio, observations = acc.len(), "ledger recorded");
    Ok(PerformanceReport::build(portfolio, &acc))
}

fn run_analyze(config_path: &Path, portfolio: &str, output: Option<&Path>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = build_performance_config(&adapter).and_then(|perf_config| {
        let data = build_data_adapter(&adapter)?;
        analyze_portfolio(&data, portfolio, perf_config)
    });

    let report = match result {
        Ok(Some(report)) => report,
        Ok(None) => {
            println!("insufficient data: {portfolio} needs at least 2 observations");
            return ExitCode::from(5);
        }
        Err(e) => return fail(&e),
    };

    print!("{}", format_metrics(&report));

    if let Some(path) = output_path(&adapter, output) {
        if let Err(e) = JsonReportAdapter::new().write_performance(&report, &path) {
            return fail(&e);
        }
        println!("\nReport written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_scan(
    config_path: &Path,
    code: Option<&str>,
    exchange: Option<&str>,
    end_date: Option<&str>,
    output: Option<&Path>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = build_signal_config(&adapter).and_then(|signal_config| {
        let request = build_scan_request(&adapter, code, exchange, end_date)?;
        let data = build_data_adapter(&adapter)?;
        tracing::info!(
            codes = request.codes.len(),
            exchange = %request.exchange,
            start = %request.start_date,
            end = %request.end_date,
            "scanning"
        );
        scan_universe(&data, &request, &signal_config)
    });

    let report = match result {
        Ok(report) => report,
        Err(e) => return fail(&e),
    };

    print!("{}", format_scan(&report));

    if let Some(path) = output_path(&adapter, output) {
        if let Err(e) = JsonReportAdapter::new().write_scan(&report, &path) {
            return fail(&e);
        }
        println!("\nReport written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let perf = match build_performance_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let signal = match build_signal_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    if let Err(e) = validate_data_config(&adapter) {
        return fail(&e);
    }
    // Configs used only by `analyze` may omit codes.
    let has_codes = adapter.get_string("data", "codes").is_some();
    if let Err(e) = validate_scan_config(&adapter, !has_codes) {
        return fail(&e);
    }

    println!("Config validated successfully");
    println!("\n[performance]");
    println!("  risk_free_rate:        {}", perf.risk_free_rate);
    println!("  trading_days_per_year: {}", perf.trading_days_per_year);
    println!("\n[signal]");
    println!("  ma_short / ma_long:    {} / {}", signal.ma_short, signal.ma_long);
    println!("  rsi_period:            {}", signal.rsi_period);
    println!(
        "  rsi oversold / bought: {} / {}",
        signal.rsi_oversold, signal.rsi_overbought
    );
    println!(
        "  bollinger:             {} x {}",
        signal.bollinger_period, signal.bollinger_multiplier
    );
    println!("  minimum bars:          {}", signal.min_bars());
    println!("\n[data]");
    println!(
        "  directory: {}",
        adapter.get_string("data", "directory").unwrap_or_default()
    );
    println!(
        "  exchange:  {}",
        adapter.get_string("data", "exchange").unwrap_or_default()
    );
    if let Some(codes) = adapter.get_string("data", "codes") {
        match parse_codes(&codes) {
            Ok(parsed) => println!("  codes:     {}", parsed.join(", ")),
            Err(e) => {
                eprintln!("error: failed to parse codes: {e}");
                return ExitCode::from(2);
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path, exchange: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let exchange = match exchange
        .map(str::to_string)
        .or_else(|| adapter.get_string("data", "exchange"))
    {
        Some(e) => e,
        None => {
            return fail(&SamperfError::ConfigMissing {
                section: "data".into(),
                key: "exchange".into(),
            });
        }
    };

    let symbols = build_data_adapter(&adapter).and_then(|data| data.list_symbols(&exchange));
    match symbols {
        Ok(symbols) if symbols.is_empty() => {
            println!("No symbols found for exchange {exchange}");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            println!("Symbols on {exchange} ({}):", symbols.len());
            for symbol in &symbols {
                println!("  {symbol}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
