//! Test utilities for s3-put-stage
//!
//! This module provides common testing helpers for building file items and
//! draining pipeline channels.

#![cfg(test)]

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tokio::sync::mpsc::Receiver;

use crate::models::{FileInfo, FileItem};

/// Creates an in-memory file item with the given content
pub fn file_item(name: &str, content: &[u8]) -> FileItem {
    FileItem::from_bytes(
        FileInfo::file(name, content.len() as u64),
        Bytes::copy_from_slice(content),
    )
}

/// Creates a file item whose body fails on the first read
pub fn failing_item(name: &str) -> FileItem {
    FileItem::new(FileInfo::file(name, 16), FailingReader)
}

/// Creates a file item that sets `read` the first time its body is polled
pub fn tracked_item(name: &str, content: &[u8], read: Arc<AtomicBool>) -> FileItem {
    let reader = TrackedReader {
        inner: io::Cursor::new(content.to_vec()),
        read,
    };
    FileItem::new(FileInfo::file(name, content.len() as u64), reader)
}

/// Drains a channel until every sender is gone
pub async fn collect_items(mut rx: Receiver<FileItem>) -> Vec<FileItem> {
    let mut items = Vec::new();
    while let Some(item) = rx.recv().await {
        items.push(item);
    }
    items
}

/// Reads an item's body to the end
pub async fn read_body(item: FileItem) -> Vec<u8> {
    let (_, mut body, _) = item.into_parts();
    let mut content = Vec::new();
    body.read_to_end(&mut content).await.unwrap();
    content
}

/// Reader that always returns an I/O error
pub struct FailingReader;

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "simulated read failure")))
    }
}

/// Reader that records whether it has been polled
pub struct TrackedReader {
    inner: io::Cursor<Vec<u8>>,
    read: Arc<AtomicBool>,
}

impl AsyncRead for TrackedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.read.store(true, Ordering::SeqCst);
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}
