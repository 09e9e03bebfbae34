//! End-to-end tests: configuration to files on disk

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use flog::{Level, LogConfig, Logger, kv, kv_string};
use tempfile::TempDir;

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn file_logger(dir: &Path, level: &str) -> Logger {
    let toml = format!(
        r#"
level = "{level}"
console = false
dir = "{}"
pattern = "%L|%S|%M"

[file]
flush_interval = "1ms"
"#,
        dir.display()
    );
    Logger::new(&LogConfig::from_str(&toml).unwrap()).unwrap()
}

#[test]
fn test_macros_route_to_severity_files() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), "debug");

    flog::debug!(logger, "cache warmed in {}ms", 12);
    flog::info!(logger, "listening on {}", 8080);
    flog::warn!(logger, "slow upstream");
    flog::error!(logger, "request failed: {}", 503);
    logger.close().unwrap();

    let info = read(dir.path(), "info.log");
    let lines: Vec<&str> = info.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("DEBUG|"));
    assert!(lines[0].ends_with("|cache warmed in 12ms"));
    assert!(lines[1].ends_with("|listening on 8080"));

    // caller location points at this file
    let source = lines[1].split('|').nth(1).unwrap();
    assert!(source.contains("logger.rs:"), "{source}");

    assert!(read(dir.path(), "warning.log").starts_with("WARN|"));
    assert!(read(dir.path(), "error.log").ends_with("|request failed: 503\n"));
}

#[test]
fn test_level_threshold_and_fields() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), "warn");

    flog::info!(logger, "filtered");
    logger.log(
        Level::Error,
        vec![kv("status", 500u16), kv_string("path", "/api"), kv_string("log", "handler panicked")],
    );
    logger.close().unwrap();

    assert_eq!(read(dir.path(), "info.log"), "");
    let error = read(dir.path(), "error.log");
    assert!(error.ends_with("|status=500 path=/api handler panicked\n"), "{error}");
}

#[test]
fn test_concurrent_logging_keeps_lines_whole() {
    let dir = TempDir::new().unwrap();
    let logger = Arc::new(file_logger(dir.path(), "info"));

    let threads = 4;
    let per_thread = 500;
    let handles: Vec<_> = (0..threads)
        .map(|id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for seq in 0..per_thread {
                    flog::info!(logger, "thread={id} seq={seq}");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.close().unwrap();

    let info = read(dir.path(), "info.log");
    assert_eq!(info.lines().count(), threads * per_thread);
    assert!(info.lines().all(|line| line.starts_with("INFO|") && line.contains(" seq=")));
}

#[test]
fn test_close_twice() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), "info");
    logger.close().unwrap();
    logger.close().unwrap();
}
