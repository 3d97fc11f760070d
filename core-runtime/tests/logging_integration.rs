//! Integration tests for logging system

use core_runtime::config::Environment;
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};

#[test]
fn test_logging_config_for_production() {
    let config = LoggingConfig::for_environment(Environment::Production).with_log_dir("logs");

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Info);
    assert!(config.log_dir.is_some());
}

// The global subscriber can only be installed once per process, so the
// whole lifecycle is exercised in a single test.
#[test]
fn test_init_logging_writes_rolling_file_and_rejects_second_init() {
    let dir = tempfile::tempdir().unwrap();

    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_filter("info")
        .with_log_dir(dir.path())
        .with_file_prefix("integration.log");

    let guard = init_logging(config).expect("first initialization should succeed");
    assert!(guard.has_file_output());

    tracing::info!(song_id = "abc", "hello from file");

    // Dropping the guard flushes the non-blocking writer
    drop(guard);

    let mut contents = String::new();
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if name.starts_with("integration.log") {
            contents.push_str(&std::fs::read_to_string(&path).unwrap());
        }
    }

    assert!(contents.contains("hello from file"), "log file was: {contents}");
    assert!(contents.contains("\"song_id\":\"abc\""));

    let second = init_logging(LoggingConfig::default());
    assert!(second.is_err(), "second initialization must fail");
}
