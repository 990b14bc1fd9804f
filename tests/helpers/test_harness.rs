use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use pcdindex::{Config, Workspace};

pub const SAMPLE_DEC: &str = include_str!("../fixtures/SamplePkg.dec");

pub struct TestHarness {
    pub temp_dir: TempDir,
    root: PathBuf,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix("pcdindex").tempdir()?;
        // Watcher events report canonical paths
        let root = temp_dir.path().canonicalize()?;

        Ok(Self {
            temp_dir,
            root,
            config: Config::default(),
        })
    }

    pub fn create_test_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn remove_test_file(&self, path: &str) -> Result<PathBuf> {
        let file_path = self.root.join(path);
        std::fs::remove_file(&file_path)?;
        Ok(file_path)
    }

    pub async fn open(&self) -> Result<Arc<Workspace>> {
        Workspace::open(self.root.clone(), &self.config).await
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}
