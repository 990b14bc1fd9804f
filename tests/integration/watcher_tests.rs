use anyhow::Result;
use std::future::Future;
use std::time::Duration;

use pcdindex::watcher::{ChangeHandler, DeclarationWatcher, FileChange, WatcherConfig, WatcherHandle};

use crate::helpers::test_harness::TestHarness;

/// Poll `check` until it holds or a few seconds pass
async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

#[tokio::test]
async fn test_change_handler_applies_batch() -> Result<()> {
    let harness = TestHarness::new()?;
    let a = harness.create_test_file("A.dec", "  g.PcdA|1\n")?;
    let workspace = harness.open().await?;

    let b = harness.create_test_file("B.dec", "  g.PcdB|1\n")?;
    harness.remove_test_file("A.dec")?;

    let handler = ChangeHandler::new(workspace.clone());
    let stats = handler
        .process_changes(vec![FileChange::created(b), FileChange::deleted(a)])
        .await;

    assert_eq!(stats.files_added, 1);
    assert_eq!(stats.files_deleted, 1);
    assert_eq!(stats.symbols_added, 1);
    assert_eq!(stats.symbols_removed, 1);

    let names: Vec<_> = workspace.entries().await.into_iter().map(|e| e.symbol).collect();
    assert_eq!(names, vec!["PcdB"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_follows_file_system() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("Pkg/Pkg.dec", "  g.PcdFirst|1\n")?;
    let workspace = harness.open().await?;

    let config = WatcherConfig {
        debounce_ms: 50,
        ..WatcherConfig::from_config(&harness.config)
    };
    let handle = WatcherHandle::spawn(DeclarationWatcher::new(
        harness.path().to_path_buf(),
        config,
        workspace.clone(),
    ));
    // Let the watch registration settle
    tokio::time::sleep(Duration::from_millis(200)).await;
    let ws = &*workspace;

    harness.create_test_file("Pkg/Pkg.dec", "  g.PcdSecond|1\n")?;
    assert!(
        eventually(|| async move { ws.definition("PcdSecond").await.is_some() }).await,
        "modification was not picked up"
    );
    assert!(workspace.definition("PcdFirst").await.is_none());

    harness.remove_test_file("Pkg/Pkg.dec")?;
    assert!(
        eventually(|| async move { ws.is_empty().await }).await,
        "deletion was not picked up"
    );

    let stats = handle.stop().await?;
    assert!(stats.has_changes());
    Ok(())
}
