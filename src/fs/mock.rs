use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Option<String>,
    pub file_type: FileType,
}

/// In-memory file system rooted at `/mock` unless another root is given
pub struct MockFileSystem {
    files: RwLock<BTreeMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: Some(content.to_string()),
                file_type: FileType::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        Self::ensure_parents(&mut files, &path);
    }

    /// Paths of every file currently held, in sorted order
    pub fn files(&self) -> Vec<PathBuf> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, entry)| entry.file_type == FileType::File)
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(files: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry {
                content: None,
                file_type: FileType::Directory,
            });
        }
    }

    fn entry_type(&self, path: &Path) -> Option<FileType> {
        let path = self.normalize_path(path);
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&path)
            .map(|e| e.file_type)
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entry_type(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.entry_type(path) == Some(FileType::Directory)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.entry_type(path) == Some(FileType::File)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        let entry = files
            .get(&path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;

        entry
            .content
            .clone()
            .ok_or_else(|| anyhow!("Not a file: {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);

        if !files.contains_key(&path) {
            return Err(anyhow!("Directory not found: {:?}", path));
        }

        let entries = files
            .iter()
            .filter(|(file_path, _)| file_path.parent() == Some(path.as_path()))
            .map(|(file_path, entry)| DirEntry {
                path: file_path.clone(),
                name: file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("")
                    .to_string(),
                file_type: entry.file_type,
            })
            .collect();

        Ok(entries)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if self.is_dir(path) {
            return Err(anyhow!("Cannot write over directory: {:?}", path));
        }
        self.add_file(path, contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file() {
        let fs = MockFileSystem::new();
        fs.add_file("src/bin/export_openapi.rs", "fn main() {}");

        assert!(fs.exists(Path::new("/mock/src/bin/export_openapi.rs")));
        assert!(fs.is_file(Path::new("/mock/src/bin/export_openapi.rs")));
        assert!(fs.is_dir(Path::new("/mock/src/bin")));
    }

    #[test]
    fn test_add_dir() {
        let fs = MockFileSystem::new();
        fs.add_dir("docs");

        assert!(fs.is_dir(Path::new("/mock/docs")));
        assert!(fs.files().is_empty());
    }

    #[test]
    fn test_read_dir_lists_direct_children_only() {
        let fs = MockFileSystem::new();
        fs.add_file("a.txt", "a");
        fs.add_file("sub/b.txt", "b");

        let entries = fs.read_dir(Path::new("/mock")).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();

        assert_eq!(names, vec!["a.txt", "sub"]);
    }

    #[test]
    fn test_write_overwrites() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("docs/report.txt"), "first").unwrap();
        fs.write(Path::new("docs/report.txt"), "second").unwrap();

        assert_eq!(
            fs.read_to_string(Path::new("docs/report.txt")).unwrap(),
            "second"
        );
        assert_eq!(fs.files(), vec![PathBuf::from("/mock/docs/report.txt")]);
    }

    #[test]
    fn test_write_over_directory_fails() {
        let fs = MockFileSystem::new();
        fs.add_dir("docs");

        assert!(fs.write(Path::new("docs"), "oops").is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let fs = MockFileSystem::new();
        assert!(fs.read_to_string(Path::new("missing.txt")).is_err());
        assert!(fs.read_dir(Path::new("missing")).is_err());
    }
}
