use anyhow::Result;

use pcdindex::symbol::CompletionMode;
use pcdindex::Config;

use crate::helpers::test_harness::TestHarness;

#[tokio::test]
async fn test_configured_completion_mode_is_used() -> Result<()> {
    let mut harness = TestHarness::new()?;
    harness.create_test_file("Pkg.dec", "  g.PcdUsePcdBase|1\n  g.PcdBaseAddress|2\n")?;
    harness.config.index.completion_mode = CompletionMode::Substring;

    let workspace = harness.open().await?;

    assert_eq!(
        workspace.completions("PcdBase").await,
        vec!["PcdBaseAddress", "PcdUsePcdBase"]
    );
    Ok(())
}

#[tokio::test]
async fn test_custom_extensions_and_pattern() -> Result<()> {
    let mut harness = TestHarness::new()?;
    harness.create_test_file("Pkg.dec", "  g.PcdInDec|1\n")?;
    harness.create_test_file("Pkg.inc", "  g.PcdInInc = 1\n")?;
    harness.config.index.extensions = vec!["inc".to_string()];
    harness.config.index.declaration_pattern =
        Some(r"\b[A-Za-z0-9_]+\.(Pcd[A-Za-z0-9_]+) *=.+\b".to_string());

    let workspace = harness.open().await?;

    let names: Vec<_> = workspace.entries().await.into_iter().map(|e| e.symbol).collect();
    assert_eq!(names, vec!["PcdInInc"]);
    Ok(())
}

#[tokio::test]
async fn test_invalid_pattern_fails_to_open() -> Result<()> {
    let mut harness = TestHarness::new()?;
    harness.config.index.declaration_pattern = Some("[unclosed".to_string());

    assert!(harness.open().await.is_err());
    Ok(())
}

#[test]
fn test_saved_config_round_trips_through_disk() -> Result<()> {
    let harness = TestHarness::new()?;
    assert!(!Config::is_initialized(harness.path()));

    let mut config = Config::default();
    config.index.completion_mode = CompletionMode::Substring;
    config.watcher.debounce_ms = 250;
    config.save(harness.path())?;

    assert!(Config::is_initialized(harness.path()));
    let loaded = Config::load(harness.path())?;
    assert_eq!(loaded.index.completion_mode, CompletionMode::Substring);
    assert_eq!(loaded.watcher.debounce_ms, 250);
    Ok(())
}
