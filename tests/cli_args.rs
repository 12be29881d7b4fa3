//! Integration tests for CLI argument handling
//!
//! Every run here stops before any network call: either clap rejects the
//! arguments or the config file is missing or broken.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_vaporwair"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute vaporwair")
}

fn run_in_home(home: &Path, args: &[&str]) -> std::process::Output {
    let home = home.to_str().expect("temp path should be UTF-8");
    let mut all = vec!["--home", home];
    all.extend_from_slice(args);
    run_cli(&all)
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vaporwair"), "Help should mention vaporwair");
    assert!(stdout.contains("--hourly"));
    assert!(stdout.contains("--week"));
    assert!(stdout.contains("--air"));
    assert!(stdout.contains("--home"));
}

#[test]
fn test_conflicting_report_flags_are_rejected() {
    let output = run_cli(&["--hourly", "--air"]);

    assert_eq!(output.status.code(), Some(2), "clap usage errors exit with 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_flag_is_rejected() {
    let output = run_cli(&["--tomorrow"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_config_prints_hint() {
    let temp_dir = TempDir::new().unwrap();

    let output = run_in_home(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not find config file"), "stderr: {}", stderr);
    assert!(stderr.contains("weather_api_key"));
    assert!(stderr.contains("air_api_key"));
    assert!(output.stdout.is_empty(), "nothing is rendered without a config");
}

#[test]
fn test_malformed_config_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.json"), "{ \"weather_api_key\": ").unwrap();

    let output = run_in_home(temp_dir.path(), &["--week"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config.json"), "stderr: {}", stderr);
    assert!(stderr.contains("does not contain valid JSON"));
    assert!(!temp_dir.path().join("last-call.json").exists());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use vaporwair::cli::Cli;
    use vaporwair::report::ReportMode;

    #[test]
    fn test_cli_defaults_to_summary() {
        let cli = Cli::parse_from(["vaporwair"]);
        assert_eq!(cli.report_mode(), ReportMode::Summary);
    }

    #[test]
    fn test_cli_short_flags() {
        assert_eq!(Cli::parse_from(["vaporwair", "-H"]).report_mode(), ReportMode::Hourly);
        assert_eq!(Cli::parse_from(["vaporwair", "-w"]).report_mode(), ReportMode::Week);
        assert_eq!(Cli::parse_from(["vaporwair", "-a"]).report_mode(), ReportMode::AirQuality);
    }

    #[test]
    fn test_cli_week_and_air_conflict() {
        assert!(Cli::try_parse_from(["vaporwair", "-w", "-a"]).is_err());
    }
}
