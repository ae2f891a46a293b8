//! # Audit Runner
//!
//! CLI for evaluating check fixtures with the comparator engine

mod fixture;
mod report;

use audit_comparators::{create_registry_with_config, ComparatorRegistry, EngineConfig};
use clap::{Parser, ValueEnum};
use fixture::Fixture;
use report::{CheckReport, RunReport};
use std::path::{Path, PathBuf};

/// Evaluate audit check fixtures
#[derive(Parser, Debug)]
#[command(name = "audit_runner")]
#[command(version)]
#[command(about = "Evaluate comparator rules against collected values", long_about = None)]
struct Args {
    /// Fixture file (.json) or directory searched recursively for fixtures
    path: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };
    log::info!(
        "audit_runner v{} starting (max_nesting_depth={})",
        env!("CARGO_PKG_VERSION"),
        config.max_nesting_depth
    );

    let registry = create_registry_with_config(config);
    let report = run_path(&registry, &args.path)?;

    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if !report.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise `-v` flags pick the level
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

/// Evaluate every check in every fixture found at `path`
fn run_path(registry: &ComparatorRegistry, path: &Path) -> Result<RunReport, fixture::FixtureError> {
    let files = fixture::discover(path)?;
    log::info!("Found {} fixture file(s) under {}", files.len(), path.display());

    let mut report = RunReport::new();
    for file in files {
        let label = file.display().to_string();
        match Fixture::from_file(&file) {
            Ok(fixture) => evaluate_fixture(registry, &fixture, &label, &mut report),
            Err(e) => {
                log::error!("Skipping fixture {}: {}", label, e);
                report.push(CheckReport::fixture_error(&label, e.to_string()));
            }
        }
    }

    Ok(report)
}

fn evaluate_fixture(
    registry: &ComparatorRegistry,
    fixture: &Fixture,
    label: &str,
    report: &mut RunReport,
) {
    for check in &fixture.checks {
        let result = registry.run(&check.id, &check.comparator, &check.actual);
        report.push(CheckReport::from_result(
            label,
            &check.id,
            check.description.as_deref(),
            result,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report::CheckStatus;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> ComparatorRegistry {
        create_registry_with_config(EngineConfig::default())
    }

    #[test]
    fn test_run_fixture_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("services.json");
        fs::write(
            &path,
            r#"{
                "checks": [
                    {
                        "id": "svc-abc-stopped",
                        "comparator": {
                            "type": "list",
                            "match_any_if_keyvalue_matches": {
                                "match_key": "name",
                                "args": [{"name": "abc", "running": false}]
                            }
                        },
                        "actual": [{"name": "hjk", "running": false}, {"name": "bnm", "running": false}]
                    },
                    {
                        "id": "pkg-count",
                        "comparator": {"type": "list", "size": ">= 2"},
                        "actual": ["a"]
                    },
                    {
                        "id": "broken",
                        "comparator": {"type": "list"},
                        "actual": []
                    }
                ]
            }"#,
        )
        .unwrap();

        let report = run_path(&registry(), &path).unwrap();
        let statuses: Vec<CheckStatus> = report.checks.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![CheckStatus::NotApplicable, CheckStatus::Failed, CheckStatus::Error]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn test_malformed_fixture_becomes_error_row() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ok.json"), r#"{"checks": [
            {"id": "ok", "comparator": {"type": "boolean", "match": true}, "actual": true}
        ]}"#)
        .unwrap();
        fs::write(dir.path().join("zz.json"), "not json").unwrap();

        let report = run_path(&registry(), dir.path()).unwrap();
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.checks[1].id, "-");
    }

    #[test]
    fn test_clean_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mounts.json"), r#"{"checks": [
            {
                "id": "tmp-mounted",
                "comparator": {
                    "type": "list",
                    "filter_compare": {"filter": {"target": "/tmp"}, "compare": {"size": 1}}
                },
                "actual": [{"target": "/"}, {"target": "/tmp"}]
            }
        ]}"#)
        .unwrap();

        let report = run_path(&registry(), dir.path()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.summary.total, 1);
    }
}
