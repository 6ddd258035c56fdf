use crate::error::{PersistenceError, PersistenceResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Kind of document file, decided from the extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Markdown,
    Html,
    Text,
}

impl FileKind {
    pub fn detect(path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" => Some(FileKind::Markdown),
            "html" | "htm" => Some(FileKind::Html),
            "txt" => Some(FileKind::Text),
            _ => None,
        }
    }

    /// Markdown and plain text open in the flat-text surface, markup opens
    /// in the tree.
    pub fn opens_as_text(self) -> bool {
        matches!(self, FileKind::Markdown | FileKind::Text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub kind: Option<FileKind>,
}

/// Storage collaborator of the editor.
///
/// The engine only reads, writes and lists. Where files live and how they
/// are picked is up to the implementation.
pub trait PersistenceBridge {
    fn read(&self, path: &Path) -> PersistenceResult<String>;

    fn write(&mut self, path: &Path, contents: &str) -> PersistenceResult<()>;

    fn list(&self, dir: &Path) -> PersistenceResult<Vec<DirEntry>>;
}

/// Real file system confined to one root directory.
///
/// Relative paths are resolved against the root. Paths that would escape the
/// root (through `..` or an absolute path elsewhere) are rejected, as are
/// files whose extension is not a supported document kind.
pub struct RootedFileSystem {
    root: PathBuf,
}

impl RootedFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` lexically under the root.
    pub fn resolve(&self, path: &Path) -> PersistenceResult<PathBuf> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root)
                .map_err(|_| PersistenceError::disallowed(path))?
        } else {
            path
        };

        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(PersistenceError::disallowed(path));
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PersistenceError::disallowed(path));
                }
            }
        }
        Ok(resolved)
    }

    fn resolve_document(&self, path: &Path) -> PersistenceResult<PathBuf> {
        let resolved = self.resolve(path)?;
        if FileKind::detect(&resolved).is_none() {
            return Err(PersistenceError::unsupported(path));
        }
        Ok(resolved)
    }
}

impl PersistenceBridge for RootedFileSystem {
    fn read(&self, path: &Path) -> PersistenceResult<String> {
        let resolved = self.resolve_document(path)?;
        if !resolved.exists() {
            return Err(PersistenceError::not_found(path));
        }
        debug!(path = %resolved.display(), "reading document");
        Ok(std::fs::read_to_string(resolved)?)
    }

    fn write(&mut self, path: &Path, contents: &str) -> PersistenceResult<()> {
        let resolved = self.resolve_document(path)?;
        if let Some(parent) = resolved.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %resolved.display(), bytes = contents.len(), "writing document");
        std::fs::write(resolved, contents)?;
        Ok(())
    }

    fn list(&self, dir: &Path) -> PersistenceResult<Vec<DirEntry>> {
        let resolved = self.resolve(dir)?;
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&resolved)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            let is_dir = entry.file_type()?.is_dir();
            let kind = FileKind::detect(&path);
            if !is_dir && kind.is_none() {
                continue;
            }
            entries.push(DirEntry {
                name,
                path,
                is_dir,
                kind,
            });
        }
        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
        Ok(entries)
    }
}

/// In-memory persistence for tests.
#[derive(Debug, Default)]
pub struct MockPersistence {
    pub files: BTreeMap<PathBuf, String>,
}

impl MockPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl PersistenceBridge for MockPersistence {
    fn read(&self, path: &Path) -> PersistenceResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| PersistenceError::not_found(path))
    }

    fn write(&mut self, path: &Path, contents: &str) -> PersistenceResult<()> {
        if FileKind::detect(path).is_none() {
            return Err(PersistenceError::unsupported(path));
        }
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn list(&self, dir: &Path) -> PersistenceResult<Vec<DirEntry>> {
        Ok(self
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .map(|path| DirEntry {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: path.clone(),
                is_dir: false,
                kind: FileKind::detect(path),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_file_kind() {
        assert_eq!(FileKind::detect(Path::new("a/notes.MD")), Some(FileKind::Markdown));
        assert_eq!(FileKind::detect(Path::new("post.markdown")), Some(FileKind::Markdown));
        assert_eq!(FileKind::detect(Path::new("index.htm")), Some(FileKind::Html));
        assert_eq!(FileKind::detect(Path::new("x.txt")), Some(FileKind::Text));
        assert_eq!(FileKind::detect(Path::new("x.pdf")), None);
        assert_eq!(FileKind::detect(Path::new("Makefile")), None);
        assert!(FileKind::Markdown.opens_as_text());
        assert!(!FileKind::Html.opens_as_text());
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let fs = RootedFileSystem::new("/work");
        assert_eq!(
            fs.resolve(Path::new("docs/../a.md")).unwrap(),
            PathBuf::from("/work/a.md")
        );
        assert!(matches!(
            fs.resolve(Path::new("../a.md")),
            Err(PersistenceError::Disallowed { .. })
        ));
        assert!(matches!(
            fs.resolve(Path::new("/etc/passwd")),
            Err(PersistenceError::Disallowed { .. })
        ));
        assert_eq!(
            fs.resolve(Path::new("/work/b.md")).unwrap(),
            PathBuf::from("/work/b.md")
        );
    }

    #[test]
    fn test_mock_roundtrip() {
        let mut mock = MockPersistence::new();
        mock.write(Path::new("d/a.md"), "# hi").unwrap();
        assert_eq!(mock.read(Path::new("d/a.md")).unwrap(), "# hi");
        assert!(mock.write(Path::new("d/a.exe"), "x").is_err());
        let listed = mock.list(Path::new("d")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, Some(FileKind::Markdown));
    }
}
