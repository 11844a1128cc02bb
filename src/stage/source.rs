use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, warn};
use tokio::fs::File;
use tokio::sync::mpsc::Sender;
use tokio::task;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::models::{FileInfo, FileItem};
use crate::stage::{send_or_cancel, Source, StageError};

/// Emits the files found under a list of local paths.
///
/// A path naming a file produces one item named after the file. A path naming
/// a directory produces an item for each entry below it, named relative to
/// that directory with `/` separators; subdirectories are emitted as
/// directory items. Without [`FsSource::recursive`] only the directory's
/// immediate children are listed.
pub struct FsSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        FsSource { paths, recursive: false }
    }

    /// Descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

#[async_trait]
impl Source for FsSource {
    async fn produce(
        self,
        cancel: CancellationToken,
        output: Sender<FileItem>,
    ) -> Result<(), StageError> {
        let mut emitted = 0usize;

        for root in self.paths {
            let entries = list_entries_blocking(root, self.recursive).await?;
            for (path, name, metadata) in entries {
                if cancel.is_cancelled() {
                    return Err(StageError::Cancelled);
                }

                let item = open_item(&path, name, &metadata).await?;
                send_or_cancel(&output, &cancel, item).await?;
                emitted += 1;
            }
        }

        debug!("Filesystem source finished after {} items", emitted);
        Ok(())
    }
}

/// Run [`list_entries`] on the blocking pool so the walk does not stall the runtime
async fn list_entries_blocking(root: PathBuf, recursive: bool) -> Result<Vec<Entry>, StageError> {
    let path = root.display().to_string();
    task::spawn_blocking(move || list_entries(&root, recursive))
        .await
        .map_err(|e| StageError::Source {
            path,
            source: io::Error::new(io::ErrorKind::Other, e),
        })?
}

type Entry = (PathBuf, String, Metadata);

/// List `(path, item name, metadata)` for everything under `root`
fn list_entries(root: &Path, recursive: bool) -> Result<Vec<Entry>, StageError> {
    let source_error = |source: io::Error| StageError::Source {
        path: root.display().to_string(),
        source,
    };

    let metadata = std::fs::metadata(root).map_err(source_error)?;
    if !metadata.is_dir() {
        let name = root.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        return Ok(vec![(root.to_path_buf(), name, metadata)]);
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| source_error(e.into()))?;
        let metadata = entry.metadata().map_err(|e| source_error(e.into()))?;

        if !metadata.is_dir() && !metadata.is_file() {
            warn!("Skipping {}: not a regular file", entry.path().display());
            continue;
        }

        let name = relative_name(root, entry.path());
        entries.push((entry.into_path(), name, metadata));
    }

    Ok(entries)
}

/// Name of `path` relative to `root`, always using `/` as the separator
fn relative_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

async fn open_item(path: &Path, name: String, metadata: &Metadata) -> Result<FileItem, StageError> {
    let info = FileInfo {
        name,
        is_dir: metadata.is_dir(),
        size: if metadata.is_dir() { 0 } else { metadata.len() },
        modified: metadata.modified().ok(),
    };

    if info.is_dir {
        return Ok(FileItem::new(info, tokio::io::empty()));
    }

    let file = File::open(path).await
        .map_err(|source| StageError::Read { name: info.name.clone(), source })?;
    Ok(FileItem::new(info, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{collect_items, read_body};
    use std::fs;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn create_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::create_dir_all(base.join("css")).unwrap();
        fs::write(base.join("index.html"), b"<html></html>").unwrap();
        fs::write(base.join("css/main.css"), b"body {}").unwrap();
        temp_dir
    }

    async fn produce_all(source: FsSource) -> (Result<(), StageError>, Vec<FileItem>) {
        let (tx, rx) = mpsc::channel(64);
        let result = source.produce(CancellationToken::new(), tx).await;
        (result, collect_items(rx).await)
    }

    #[tokio::test]
    async fn test_single_file() {
        let temp_dir = create_tree();
        let path = temp_dir.path().join("index.html");

        let (result, items) = produce_all(FsSource::new(vec![path])).await;

        assert!(result.is_ok());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "index.html");
        assert_eq!(items[0].info().size, 13);
        assert_eq!(read_body(items.into_iter().next().unwrap()).await, b"<html></html>");
    }

    #[tokio::test]
    async fn test_directory_not_recursive() {
        let temp_dir = create_tree();

        let (result, items) = produce_all(FsSource::new(vec![temp_dir.path().to_path_buf()])).await;

        assert!(result.is_ok());
        let listed: Vec<_> = items.iter().map(|i| (i.name().to_string(), i.is_dir())).collect();
        assert_eq!(listed, vec![("css".to_string(), true), ("index.html".to_string(), false)]);
    }

    #[tokio::test]
    async fn test_directory_recursive() {
        let temp_dir = create_tree();

        let source = FsSource::new(vec![temp_dir.path().to_path_buf()]).recursive(true);
        let (result, items) = produce_all(source).await;

        assert!(result.is_ok());
        let names: Vec<_> = items.iter().map(|i| i.name().to_string()).collect();
        assert_eq!(names, vec!["css", "css/main.css", "index.html"]);
    }

    #[tokio::test]
    async fn test_missing_path() {
        let (result, items) = produce_all(FsSource::new(vec![PathBuf::from("/nonexistent/site")])).await;

        assert!(matches!(result, Err(StageError::Source { .. })));
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_listing_runs_off_runtime() {
        let temp_dir = create_tree();

        let entries = list_entries_blocking(temp_dir.path().to_path_buf(), true).await.unwrap();
        let names: Vec<_> = entries.iter().map(|(_, name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["css", "css/main.css", "index.html"]);

        match list_entries_blocking(PathBuf::from("/nonexistent/site"), false).await {
            Err(StageError::Source { path, .. }) => assert_eq!(path, "/nonexistent/site"),
            other => panic!("expected source error, got {:?}", other.map(|e| e.len())),
        }
    }

    #[tokio::test]
    async fn test_multiple_roots_in_order() {
        let first = create_tree();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("robots.txt"), b"User-agent: *").unwrap();

        let source = FsSource::new(vec![
            second.path().join("robots.txt"),
            first.path().to_path_buf(),
        ]);
        let (result, items) = produce_all(source).await;

        assert!(result.is_ok());
        let names: Vec<_> = items.iter().map(|i| i.name().to_string()).collect();
        assert_eq!(names, vec!["robots.txt", "css", "index.html"]);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let temp_dir = create_tree();
        let (tx, rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = FsSource::new(vec![temp_dir.path().to_path_buf()]).produce(cancel, tx).await;

        assert!(matches!(result, Err(StageError::Cancelled)));
        assert!(collect_items(rx).await.is_empty());
    }

    #[test]
    fn test_relative_name() {
        let root = Path::new("/srv/site");
        assert_eq!(relative_name(root, Path::new("/srv/site/css/main.css")), "css/main.css");
        assert_eq!(relative_name(root, Path::new("/srv/site/a.txt")), "a.txt");
    }
}
