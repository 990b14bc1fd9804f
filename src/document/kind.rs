//! Kinds of documents that consume PCD lookups

use std::path::Path;

/// A document in which PCD names are referenced and can be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// C source or header
    CSource,
    /// Platform build description (.dsc)
    PlatformDescription,
    /// Flash layout description (.fdf)
    FlashDescription,
}

impl DocumentKind {
    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "c" | "h" => Some(Self::CSource),
            "dsc" => Some(Self::PlatformDescription),
            "fdf" => Some(Self::FlashDescription),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CSource => "c",
            Self::PlatformDescription => "dsc",
            Self::FlashDescription => "fdf",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("Platform/Board.dsc")),
            Some(DocumentKind::PlatformDescription)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("Platform/Board.FDF")),
            Some(DocumentKind::FlashDescription)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("Library/Foo.h")),
            Some(DocumentKind::CSource)
        );
        assert_eq!(DocumentKind::from_path(Path::new("MdePkg.dec")), None);
        assert_eq!(DocumentKind::from_path(Path::new("Makefile")), None);
    }
}
