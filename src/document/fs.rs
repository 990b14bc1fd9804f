use async_trait::async_trait;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{Document, DocumentError, DocumentId, DocumentSource};
use crate::config::IndexConfig;

/// Declaration documents found on disk under a workspace root
///
/// Enumeration respects .gitignore files, the configured ignore patterns and
/// the configured declaration suffixes.
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    root: PathBuf,
    extensions: HashSet<String>,
    ignore_patterns: Vec<String>,
}

impl FsDocumentSource {
    pub fn new(root: PathBuf, config: &IndexConfig) -> Self {
        Self {
            root,
            extensions: config.extensions.iter().cloned().collect(),
            ignore_patterns: config.ignore_patterns.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a path names a declaration document this source would list.
    ///
    /// Ignore patterns apply to path components below the root only, so a
    /// root that itself sits under `Build/` or `target/` is still indexed.
    pub fn matches(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        has_extension(path, &self.extensions) && !is_ignored(relative, &self.ignore_patterns)
    }

    /// Walk the root and collect every declaration document, sorted by path
    pub fn collect_files(&self) -> Vec<PathBuf> {
        let mut builder = WalkBuilder::new(&self.root);
        builder.git_ignore(true);
        builder.git_global(true);
        builder.git_exclude(true);
        builder.hidden(true);
        builder.sort_by_file_name(|a, b| a.cmp(b));

        let mut override_builder = ignore::overrides::OverrideBuilder::new(&self.root);
        for pattern in &self.ignore_patterns {
            let _ = override_builder.add(&format!("!{}", pattern));
            let _ = override_builder.add(&format!("!{}/**", pattern));
        }
        if let Ok(overrides) = override_builder.build() {
            builder.overrides(overrides);
        }

        builder
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|entry| entry.into_path())
            .filter(|path| self.matches(path))
            .collect()
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn enumerate(&self) -> Vec<DocumentId> {
        let source = self.clone();
        match tokio::task::spawn_blocking(move || source.collect_files()).await {
            Ok(files) => {
                debug!("Found {} declaration files under {:?}", files.len(), self.root);
                files.into_iter().map(DocumentId::from).collect()
            }
            Err(e) => {
                warn!("Declaration file walk failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn read(&self, id: &DocumentId) -> Result<Document, DocumentError> {
        match tokio::fs::read_to_string(id.path()).await {
            Ok(text) => Ok(Document::new(id.clone(), text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DocumentError::NotFound(id.clone()))
            }
            Err(source) => Err(DocumentError::Io {
                id: id.clone(),
                source,
            }),
        }
    }
}

fn has_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| extensions.contains(ext))
        .unwrap_or(false)
}

/// A path is ignored when one of its components equals a pattern, or when
/// a multi-component pattern (`Build/Out`) is a leading part of it.
fn is_ignored(relative: &Path, ignore_patterns: &[String]) -> bool {
    ignore_patterns.iter().any(|pattern| {
        let pattern = Path::new(pattern.trim_end_matches('/'));
        if pattern.components().count() > 1 {
            relative.starts_with(pattern)
        } else {
            relative
                .components()
                .any(|component| component.as_os_str() == pattern.as_os_str())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn test_config() -> IndexConfig {
        IndexConfig {
            extensions: vec!["dec".to_string()],
            ignore_patterns: vec!["Build".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_collect_finds_declaration_files() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("MdePkg");
        fs::create_dir_all(&pkg).unwrap();

        fs::write(pkg.join("MdePkg.dec"), "[PcdsFixedAtBuild]").unwrap();
        fs::write(pkg.join("MdePkg.dsc"), "[Defines]").unwrap();
        fs::write(pkg.join("Readme.md"), "# MdePkg").unwrap();

        let source = FsDocumentSource::new(dir.path().to_path_buf(), &test_config());
        let files = source.collect_files();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("MdePkg.dec"));
    }

    #[test]
    fn test_collect_skips_ignored_directories() {
        let dir = tempdir().unwrap();
        let build = dir.path().join("Build");
        fs::create_dir_all(&build).unwrap();

        fs::write(dir.path().join("A.dec"), "").unwrap();
        fs::write(build.join("Copy.dec"), "").unwrap();

        let source = FsDocumentSource::new(dir.path().to_path_buf(), &test_config());
        let files = source.collect_files();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("A.dec"));
    }

    #[test]
    fn test_matches() {
        let source = FsDocumentSource::new(PathBuf::from("/ws"), &test_config());
        assert!(source.matches(Path::new("/ws/MdePkg/MdePkg.dec")));
        assert!(!source.matches(Path::new("/ws/MdePkg/MdePkg.dsc")));
        assert!(!source.matches(Path::new("/ws/Build/MdePkg.dec")));
    }

    #[test]
    fn test_matches_ignores_components_above_root() {
        let root = PathBuf::from("/home/u/Build/edk2-target-ws");
        let source = FsDocumentSource::new(root, &test_config());
        assert!(source.matches(Path::new("/home/u/Build/edk2-target-ws/MdePkg/MdePkg.dec")));
        assert!(!source.matches(Path::new("/home/u/Build/edk2-target-ws/Build/MdePkg.dec")));
    }

    #[test]
    fn test_ignore_patterns_match_whole_components() {
        let patterns = vec![".git".to_string(), "Build".to_string(), "Out/Tmp".to_string()];

        assert!(is_ignored(Path::new(".git/Pkg.dec"), &patterns));
        assert!(is_ignored(Path::new("Pkg/Build/Pkg.dec"), &patterns));
        assert!(is_ignored(Path::new("Out/Tmp/Pkg.dec"), &patterns));
        assert!(!is_ignored(Path::new(".github/Pkg.dec"), &patterns));
        assert!(!is_ignored(Path::new("BuildTools/Pkg.dec"), &patterns));
        assert!(!is_ignored(Path::new("Out/Pkg.dec"), &patterns));
    }

    #[test]
    fn test_collect_under_root_with_ignored_name() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Build").join("edk2-target-ws");
        fs::create_dir_all(root.join("MdePkg")).unwrap();
        fs::write(root.join("MdePkg").join("MdePkg.dec"), "g.PcdA|1\n").unwrap();

        let source = FsDocumentSource::new(root, &test_config());
        let files = source.collect_files();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("MdePkg/MdePkg.dec"));
    }

    #[tokio::test]
    async fn test_read_missing_document() {
        let dir = tempdir().unwrap();
        let source = FsDocumentSource::new(dir.path().to_path_buf(), &test_config());
        let id = DocumentId::new(dir.path().join("Gone.dec"));

        let result = source.read(&id).await;
        assert!(matches!(result, Err(DocumentError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_enumerate_and_read() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("B.dec"), "b").unwrap();
        fs::write(dir.path().join("A.dec"), "a").unwrap();

        let source = FsDocumentSource::new(dir.path().to_path_buf(), &test_config());
        let ids = source.enumerate().await;

        assert_eq!(ids.len(), 2);
        assert!(ids[0].path().ends_with("A.dec"));

        let doc = source.read(&ids[1]).await.unwrap();
        assert_eq!(doc.text(), "b");
    }
}
