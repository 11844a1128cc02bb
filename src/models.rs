use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::time::SystemTime;

use bytes::Bytes;
use serde::{Serialize, Deserialize};
use tokio::io::AsyncRead;

/// Readable body of a file item.
pub type FileBody = Box<dyn AsyncRead + Send + Unpin>;

/// Metadata describing a file item as it travels through the pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Name of the file, relative to the root it was collected from
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FileInfo {
    /// Metadata for a regular file
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        FileInfo {
            name: name.into(),
            is_dir: false,
            size,
            modified: None,
        }
    }

    /// Metadata for a directory
    pub fn dir(name: impl Into<String>) -> Self {
        FileInfo {
            name: name.into(),
            is_dir: true,
            size: 0,
            modified: None,
        }
    }
}

/// Key/value annotations attached to an item by the stages it passed through.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations(BTreeMap<String, String>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A file-like resource flowing between pipeline stages.
///
/// The body is read at most once. Stages that consume it and want to pass the
/// file on build a new item from the buffered bytes with [`FileItem::from_bytes`].
pub struct FileItem {
    info: FileInfo,
    body: FileBody,
    annotations: Annotations,
}

impl FileItem {
    /// Create an item from metadata and any async reader
    pub fn new(info: FileInfo, body: impl AsyncRead + Send + Unpin + 'static) -> Self {
        FileItem {
            info,
            body: Box::new(body),
            annotations: Annotations::new(),
        }
    }

    /// Create an item whose body is already fully buffered in memory
    pub fn from_bytes(info: FileInfo, content: Bytes) -> Self {
        Self::new(info, Cursor::new(content))
    }

    /// Replace the annotations carried by this item
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn is_dir(&self) -> bool {
        self.info.is_dir
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Split the item into its metadata, body and annotations
    pub fn into_parts(self) -> (FileInfo, FileBody, Annotations) {
        (self.info, self.body, self.annotations)
    }
}

impl fmt::Debug for FileItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileItem")
            .field("info", &self.info)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}
