use anyhow::Result;

use pcdindex::document::{Document, DocumentId, Position};
use pcdindex::symbol::CompletionMode;
use pcdindex::Workspace;

use crate::helpers::test_harness::{TestHarness, SAMPLE_DEC};

#[tokio::test]
async fn test_open_indexes_declaration_files() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("SamplePkg/SamplePkg.dec", SAMPLE_DEC)?;
    harness.create_test_file("SamplePkg/SamplePkg.dsc", "  gSamplePkgTokenSpaceGuid.PcdIgnored|1\n")?;

    let workspace = harness.open().await?;

    let names: Vec<_> = workspace.entries().await.into_iter().map(|e| e.symbol).collect();
    assert_eq!(
        names,
        vec![
            "PcdDebugPrintErrorLevel",
            "PcdFlashBase",
            "PcdMaxVariableSize",
            "PcdMaximumUnicodeStringLength",
            "PcdUsePcdBase",
        ]
    );
    assert_eq!(workspace.document_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_definition_points_at_declaration_line() -> Result<()> {
    let harness = TestHarness::new()?;
    let dec = harness.create_test_file("SamplePkg/SamplePkg.dec", SAMPLE_DEC)?;

    let workspace = harness.open().await?;

    let span = workspace.definition("PcdFlashBase").await.expect("declared");
    assert_eq!(span.document, DocumentId::new(dec));
    assert_eq!(span.start, Position::new(18, 2));
    assert_eq!(
        &SAMPLE_DEC[span.offsets.clone()],
        "gSamplePkgTokenSpaceGuid.PcdFlashBase | 0xFF000000|UINT32|0x00000002"
    );

    assert!(workspace.definition("PcdNotDeclared").await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_definition_under_cursor_in_consumer() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("SamplePkg/SamplePkg.dec", SAMPLE_DEC)?;
    let workspace = harness.open().await?;

    let consumer = Document::new(
        DocumentId::from("Board.dsc"),
        "[PcdsFixedAtBuild]\n  gSamplePkgTokenSpaceGuid.PcdMaxVariableSize|0x2000\n".to_string(),
    );

    let span = workspace
        .definition_at(&consumer, Position::new(1, 35))
        .await
        .expect("cursor on a declared PCD");
    assert_eq!(span.start.line, 21);

    assert!(workspace
        .definition_at(&consumer, Position::new(0, 3))
        .await
        .is_none());
    Ok(())
}

#[tokio::test]
async fn test_completion_modes() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("SamplePkg/SamplePkg.dec", SAMPLE_DEC)?;
    let workspace = harness.open().await?;

    assert_eq!(
        workspace.completions("PcdMax").await,
        vec!["PcdMaxVariableSize", "PcdMaximumUnicodeStringLength"]
    );
    assert!(workspace
        .completions_with_mode("PcdBase", CompletionMode::Prefix)
        .await
        .is_empty());
    assert_eq!(
        workspace
            .completions_with_mode("PcdBase", CompletionMode::Substring)
            .await,
        vec!["PcdUsePcdBase"]
    );
    assert!(workspace.completions("gEfi").await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_change_and_delete_through_file_system() -> Result<()> {
    let harness = TestHarness::new()?;
    let a = harness.create_test_file("A/A.dec", "  gA.PcdOne|1\n  gA.PcdTwo|2\n")?;
    harness.create_test_file("B/B.dec", "  gB.PcdThree|3\n")?;
    let workspace = harness.open().await?;
    assert_eq!(workspace.len().await, 3);

    harness.create_test_file("A/A.dec", "  gA.PcdOne|1\n")?;
    let stats = workspace.on_document_changed(&DocumentId::new(&a)).await;
    assert_eq!(stats.symbols_removed, 1);
    assert!(workspace.definition("PcdTwo").await.is_none());
    assert!(workspace.definition("PcdOne").await.is_some());

    harness.remove_test_file("A/A.dec")?;
    let stats = workspace.on_document_deleted(&DocumentId::new(&a)).await;
    assert_eq!(stats.symbols_removed, 1);

    let names: Vec<_> = workspace.entries().await.into_iter().map(|e| e.symbol).collect();
    assert_eq!(names, vec!["PcdThree"]);
    Ok(())
}

#[tokio::test]
async fn test_redeclaration_across_packages_is_recorded() -> Result<()> {
    let harness = TestHarness::new()?;
    let first = harness.create_test_file("APkg/APkg.dec", "  gA.PcdShared|1\n")?;
    let second = harness.create_test_file("BPkg/BPkg.dec", "\n  gB.PcdShared|2\n")?;

    let workspace = harness.open().await?;

    let span = workspace.definition("PcdShared").await.expect("declared");
    assert_eq!(span.document, DocumentId::new(&second));

    let collisions = workspace.collisions().await;
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].symbol, "PcdShared");
    assert_eq!(collisions[0].previous.document, DocumentId::new(first));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_changes_to_one_document_settle() -> Result<()> {
    let harness = TestHarness::new()?;
    let path = harness.create_test_file("Pkg.dec", "  g.PcdOld|1\n")?;
    let workspace = harness.open().await?;

    harness.create_test_file("Pkg.dec", "  g.PcdNew|1\n")?;
    let id = DocumentId::new(&path);
    let (left, right) = tokio::join!(
        workspace.on_document_changed(&id),
        workspace.on_document_changed(&id)
    );
    assert_eq!(left.errors + right.errors, 0);

    let names: Vec<_> = workspace.entries().await.into_iter().map(|e| e.symbol).collect();
    assert_eq!(names, vec!["PcdNew"]);
    Ok(())
}

#[tokio::test]
async fn test_ignored_directories_are_not_indexed() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("Pkg/Pkg.dec", "  g.PcdKept|1\n")?;
    harness.create_test_file("Build/Pkg/Pkg.dec", "  g.PcdCopied|1\n")?;

    let workspace = harness.open().await?;

    assert!(workspace.definition("PcdKept").await.is_some());
    assert!(workspace.definition("PcdCopied").await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_root_below_ignored_directory_name_is_indexed() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("Build/edk2-target-ws/MdePkg/MdePkg.dec", "  g.PcdA|1\n")?;
    harness.create_test_file("Build/edk2-target-ws/.github/Copy.dec", "  g.PcdGithub|1\n")?;

    let root = harness.path().join("Build").join("edk2-target-ws");
    let workspace = Workspace::open(root, &harness.config).await?;

    assert!(workspace.definition("PcdA").await.is_some());
    assert_eq!(workspace.len().await, 1);
    Ok(())
}
