//! CLI integration tests over real INI and CSV files on disk.
//!
//! Tests cover:
//! - analyze: metrics, JSON output, insufficient data, bad ledgers
//! - scan: universe evaluation and JSON output
//! - validate and list-symbols
//! - analyze_portfolio with the CSV ledger adapter

mod common;

use clap::Parser;
use common::*;
use samperf::adapters::csv_adapter::CsvAdapter;
use samperf::cli::{self, Cli};
use samperf::domain::error::SamperfError;
use samperf::domain::performance::PerformanceConfig;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn assert_exit(actual: ExitCode, expected: u8) {
    assert_eq!(
        format!("{actual:?}"),
        format!("{:?}", ExitCode::from(expected)),
        "unexpected exit code"
    );
}

fn run(args: &[&str]) -> ExitCode {
    let argv = std::iter::once("samperf").chain(args.iter().copied());
    cli::run(Cli::parse_from(argv))
}

fn data_ini(dir: &Path, extra: &str) -> String {
    format!(
        "[performance]\nrisk_free_rate = 0.02\n\n[data]\ndirectory = {}\nexchange = ASX\ncodes = UP,DOWN\n\n[scan]\nlookback_days = 365\nend_date = 2024-03-31\n{extra}",
        dir.display()
    )
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    let path = dir.path();

    write_file(
        path,
        "growth_equity.csv",
        "date,value\n2024-01-02,100000\n2024-01-03,110000\n2024-01-04,99000\n2024-02-01,104000\n",
    );
    write_file(
        path,
        "growth_trades.csv",
        "date,code,profit\n2024-01-03,BHP,10000\n2024-01-04,CBA,-11000\n2024-02-01,BHP,5000\n",
    );
    write_file(path, "solo_equity.csv", "date,value\n2024-01-02,100000\n");
    write_file(
        path,
        "broken_equity.csv",
        "date,value\n2024-01-02,100000\n2024-01-03,-5\n",
    );

    let start = date(2024, 1, 1);
    write_file(
        path,
        "UP_ASX.csv",
        &price_csv(&trending_bars("UP", start, 80, 100.0, 1.0)),
    );
    write_file(
        path,
        "DOWN_ASX.csv",
        &price_csv(&trending_bars("DOWN", start, 80, 200.0, -1.0)),
    );
    write_file(
        path,
        "TINY_ASX.csv",
        &price_csv(&trending_bars("TINY", start, 10, 5.0, 0.1)),
    );

    write_file(path, "config.ini", &data_ini(path, ""));
    dir
}

fn config_path(dir: &TempDir) -> String {
    dir.path().join("config.ini").display().to_string()
}

mod analyze {
    use super::*;

    #[test]
    fn writes_json_report() {
        let dir = setup();
        let out = dir.path().join("growth.json");
        let code = run(&[
            "analyze",
            "-c",
            &config_path(&dir),
            "-p",
            "growth",
            "-o",
            &out.display().to_string(),
        ]);
        assert_exit(code, 0);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["portfolio"], "growth");
        assert_eq!(value["metrics"]["total_trades"], 3);
        assert_eq!(value["metrics"]["profitable_trades"], 2);
        assert_eq!(value["metrics"]["trading_days"], 3);
        assert_eq!(value["monthly_returns"].as_array().unwrap().len(), 2);
        assert_eq!(value["drawdowns"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn single_observation_exits_with_insufficient_data() {
        let dir = setup();
        let code = run(&["analyze", "-c", &config_path(&dir), "-p", "solo"]);
        assert_exit(code, 5);
    }

    #[test]
    fn invalid_valuation_is_an_input_error() {
        let dir = setup();
        let code = run(&["analyze", "-c", &config_path(&dir), "-p", "broken"]);
        assert_exit(code, 3);
    }

    #[test]
    fn missing_ledger_is_a_data_error() {
        let dir = setup();
        let code = run(&["analyze", "-c", &config_path(&dir), "-p", "nobody"]);
        assert_exit(code, 3);
    }

    #[test]
    fn invalid_config_exits_with_config_error() {
        let dir = setup();
        let bad = dir.path().join("bad.ini");
        write_file(
            dir.path(),
            "bad.ini",
            &data_ini(dir.path(), "").replace("risk_free_rate = 0.02", "risk_free_rate = 2"),
        );
        let code = run(&["analyze", "-c", &bad.display().to_string(), "-p", "growth"]);
        assert_exit(code, 2);
    }

    #[test]
    fn analyze_portfolio_reads_csv_ledger() {
        let dir = setup();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let report = cli::analyze_portfolio(&adapter, "growth", PerformanceConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(report.metrics.total_trades, 3);
        assert_eq!(report.metrics.loss_trades, 1);
        assert_eq!(report.trades[1].code, "CBA");
        assert!((report.metrics.max_drawdown - 0.1).abs() < 1e-12);

        let none = cli::analyze_portfolio(&adapter, "solo", PerformanceConfig::default()).unwrap();
        assert!(none.is_none());

        let err = cli::analyze_portfolio(&adapter, "broken", PerformanceConfig::default())
            .unwrap_err();
        assert!(matches!(err, SamperfError::InvalidObservation { .. }));
    }
}

mod scan {
    use super::*;

    #[test]
    fn scan_writes_json_report() {
        let dir = setup();
        let out = dir.path().join("scan.json");
        let code = run(&[
            "scan",
            "-c",
            &config_path(&dir),
            "-o",
            &out.display().to_string(),
        ]);
        assert_exit(code, 0);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let entries = value["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["code"], "UP");
        assert_eq!(entries[0]["signal"], "uptrend");
        assert_eq!(entries[1]["signal"], "downtrend");
        assert_eq!(value["end_date"], "2024-03-31");
    }

    #[test]
    fn code_override_with_too_little_history_fails() {
        let dir = setup();
        let code = run(&["scan", "-c", &config_path(&dir), "--code", "TINY"]);
        assert_exit(code, 5);
    }

    #[test]
    fn bad_end_date_is_config_error() {
        let dir = setup();
        let code = run(&[
            "scan",
            "-c",
            &config_path(&dir),
            "--end-date",
            "31/03/2024",
        ]);
        assert_exit(code, 2);
    }

    #[test]
    fn oversized_lookback_is_config_error() {
        let dir = setup();
        write_file(
            dir.path(),
            "wide.ini",
            &data_ini(dir.path(), "").replace("lookback_days = 365", "lookback_days = 1000000000"),
        );
        let wide = dir.path().join("wide.ini").display().to_string();
        assert_exit(run(&["scan", "-c", &wide]), 2);
    }

    #[test]
    fn malformed_price_file_is_reported_as_fetch_failure() {
        let dir = setup();
        write_file(dir.path(), "BAD_ASX.csv", "date,open,high,low,close,volume
not-a-date,1,1,1,1,1
");
        let out = dir.path().join("scan.json");
        let code = run(&[
            "scan",
            "-c",
            &config_path(&dir),
            "--code",
            "UP,BAD",
            "-o",
            &out.display().to_string(),
        ]);
        assert_exit(code, 0);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let skipped = &value["skipped"][0];
        assert_eq!(skipped["code"], "BAD");
        assert_eq!(skipped["reason"]["kind"], "fetch_error");
        assert!(
            skipped["reason"]["reason"]
                .as_str()
                .unwrap()
                .contains("invalid date format")
        );
    }
}

mod validate_and_list {
    use super::*;

    #[test]
    fn validate_accepts_good_config() {
        let dir = setup();
        assert_exit(run(&["validate", "-c", &config_path(&dir)]), 0);
    }

    #[test]
    fn validate_rejects_inverted_moving_averages() {
        let dir = setup();
        write_file(
            dir.path(),
            "bad.ini",
            &data_ini(dir.path(), "\n[signal]\nma_short = 80\nma_long = 40\n"),
        );
        let bad = dir.path().join("bad.ini").display().to_string();
        assert_exit(run(&["validate", "-c", &bad]), 2);
    }

    #[test]
    fn validate_missing_file_fails() {
        assert_exit(run(&["validate", "-c", "/nonexistent/config.ini"]), 2);
    }

    #[test]
    fn list_symbols_succeeds() {
        let dir = setup();
        assert_exit(run(&["list-symbols", "-c", &config_path(&dir)]), 0);
        assert_exit(
            run(&["list-symbols", "-c", &config_path(&dir), "--exchange", "NYSE"]),
            0,
        );
    }

    #[test]
    fn verbose_flag_is_global() {
        let dir = setup();
        let cli = Cli::parse_from(["samperf", "validate", "-c", &config_path(&dir), "-v"]);
        assert!(cli.verbose);
    }
}
