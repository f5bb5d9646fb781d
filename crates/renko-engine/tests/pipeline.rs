//! End-to-end tests over tick files on disk.

use renko_engine::{CacheStatus, EngineConfig, HealthStatus, RenkoEngine};
use renko_estimate::{BrickStrategy, SizingMethod};
use renko_source::DirectorySource;
use renko_types::{RenkoError, Timeframe};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Writes a CSV with one tick every `step_secs` seconds.
fn write_csv(dir: &Path, name: &str, prices: &[f64], step_secs: i64) {
    let start = 1_750_685_400; // 2025-06-23T13:30:00Z
    let mut text = String::from("timestamp,price,size\n");
    for (i, price) in prices.iter().enumerate() {
        let ts = chrono::DateTime::from_timestamp(start + i as i64 * step_secs, 0).unwrap();
        writeln!(text, "{},{price},1", ts.to_rfc3339()).unwrap();
    }
    std::fs::write(dir.join(name), text).unwrap();
}

fn zigzag(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + ((i % 10) as f64 - 5.0).abs() * 0.8 + (i / 10) as f64 * 0.3)
        .collect()
}

#[test]
fn test_same_key_twice_within_a_second() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "btcusd.csv", &zigzag(300), 15);

    let engine = RenkoEngine::new(DirectorySource::new(dir.path()), EngineConfig::default()).unwrap();
    let first = engine.render("btcusd").unwrap();
    let second = engine.render("btcusd").unwrap();

    assert_eq!(first.metadata.cache_status, CacheStatus::Miss);
    assert_eq!(second.metadata.cache_status, CacheStatus::Hit);
    assert!(second.metadata.cache_age_seconds < 1.0);
    assert!(Arc::ptr_eq(&first.chart, &second.chart));

    let info = engine.inspect_cache();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].key, "btcusd");
    assert_eq!(info[0].original_row_count, 300);
    assert_eq!(info[0].brick_count, first.metadata.brick_count);
    assert_eq!(info[0].source_path, dir.path().join("btcusd.csv"));
}

#[test]
fn test_brick_invariants_from_file() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "walk.csv", &zigzag(500), 20);

    let engine = RenkoEngine::new(DirectorySource::new(dir.path()), EngineConfig::default()).unwrap();
    let chart = engine.compute("walk.csv").unwrap();
    let size = chart.brick_size();

    assert!(size > 0.0);
    assert_eq!(chart.estimate.method, SizingMethod::Atr);
    for pair in chart.bricks.windows(2) {
        assert_eq!(pair[1].open, pair[0].value);
        assert!(((pair[1].value - pair[1].open).abs() - size).abs() < 1e-9);
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
    for brick in &chart.bricks {
        assert!(brick.low <= brick.open.min(brick.close));
        assert!(brick.high >= brick.open.max(brick.close));
    }
    assert!(chart.bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_cache_expiry_resets_age() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "eth.csv", &zigzag(120), 30);

    let config = EngineConfig {
        cache_ttl: Duration::from_millis(50),
        ..EngineConfig::default()
    };
    let engine = RenkoEngine::new(DirectorySource::new(dir.path()), config).unwrap();

    engine.render("eth").unwrap();
    thread::sleep(Duration::from_millis(100));
    assert!(engine.inspect_cache()[0].expired);

    let again = engine.render("eth").unwrap();
    assert_eq!(again.metadata.cache_status, CacheStatus::Miss);
    assert!(again.metadata.cache_age_seconds < 0.05);
}

#[test]
fn test_concurrent_renders_share_one_computation() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "a.csv", &zigzag(2_000), 5);
    write_csv(dir.path(), "b.csv", &zigzag(2_000), 5);

    let engine = Arc::new(
        RenkoEngine::new(DirectorySource::new(dir.path()), EngineConfig::default()).unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.render(if i % 2 == 0 { "a" } else { "b" }).unwrap())
        })
        .collect();
    let responses: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for key in ["a", "b"] {
        let misses = responses
            .iter()
            .filter(|r| r.chart.key == key && r.metadata.cache_status == CacheStatus::Miss)
            .count();
        assert_eq!(misses, 1, "key {key} computed more than once");
    }
}

#[test]
fn test_statistical_strategy_and_bucket_width() {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "s.csv", &zigzag(600), 10);

    let config = EngineConfig {
        bucket_width: Timeframe::Minute5,
        brick_strategy: BrickStrategy::Statistical,
        ..EngineConfig::default()
    };
    let engine = RenkoEngine::new(DirectorySource::new(dir.path()), config).unwrap();
    let response = engine.render("s").unwrap();

    // 600 ticks at 10 s span 13:30:00..15:09:50. The first tick sits on a
    // boundary and closes the 13:30 bucket; the rest fill 13:35..15:10.
    assert_eq!(response.metadata.bar_count, 21);
    assert_eq!(response.metadata.sizing_method, SizingMethod::Statistical);
    assert!(response.metadata.fallback_reason.is_none());
}

#[test]
fn test_source_errors_surface() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.csv"), "time,last\n2025-06-23T13:30:00Z,1\n").unwrap();
    std::fs::write(dir.path().join("blob.h5"), "x").unwrap();

    let engine = RenkoEngine::new(DirectorySource::new(dir.path()), EngineConfig::default()).unwrap();

    assert!(matches!(
        engine.render("bad"),
        Err(RenkoError::MissingRequiredField { .. })
    ));
    assert!(matches!(
        engine.render("blob.h5"),
        Err(RenkoError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        engine.render("missing"),
        Err(RenkoError::SourceNotFound(_))
    ));
    assert!(engine.inspect_cache().is_empty());
}

#[test]
fn test_health_of_data_directory() {
    let dir = TempDir::new().unwrap();
    let missing = RenkoEngine::new(
        DirectorySource::new(dir.path().join("absent")),
        EngineConfig::default(),
    )
    .unwrap();
    let report = missing.health();
    assert_eq!(report.status, HealthStatus::Warning);
    assert!(!report.source_available);
    assert!(report.warnings[0].starts_with("Data folder does not exist"));

    let engine = RenkoEngine::new(DirectorySource::new(dir.path()), EngineConfig::default()).unwrap();
    assert_eq!(engine.health().warnings, vec!["No data files found".to_string()]);

    write_csv(dir.path(), "spy.csv", &zigzag(120), 30);
    engine.render("spy").unwrap();
    assert!(engine.render("nope").is_err());

    let report = engine.health();
    assert_eq!(report.status, HealthStatus::Healthy);
    assert_eq!(report.available_sources, 1);
    assert_eq!(report.cached_entries, 1);
    assert_eq!(report.stats.renders, 2);
    assert_eq!(report.stats.errors, 1);
}
