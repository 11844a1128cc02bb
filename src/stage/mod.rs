//! Pipeline stages connected by channels of [`FileItem`]s.
//!
//! A stage consumes items from an inbound channel, performs its work on each
//! one and emits the result on an outbound channel. Stages run as independent
//! tokio tasks and share a [`CancellationToken`] for cooperative shutdown.
//!
//! ```text
//! ┌───────────┐  FileItem  ┌───────────┐  FileItem  ┌───────────┐
//! │  Source   │───────────▶│   Stage   │───────────▶│ consumer  │
//! └───────────┘   mpsc     └─────┬─────┘   mpsc     └───────────┘
//!                                │ put
//!                          ┌─────▼─────┐
//!                          │ S3 bucket │
//!                          └───────────┘
//! ```
//!
//! Closing the inbound channel (dropping every sender) ends a stage cleanly.
//! Cancelling the token ends it with [`StageError::Cancelled`].
//!
//! ## Usage Example
//!
//! ```no_run
//! use s3_put_stage::config::{Acl, Region, UploadConfig};
//! use s3_put_stage::stage::{spawn_source, spawn_stage, FsSource, S3Put};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UploadConfig {
//!     access_key: "KEY".to_string(),
//!     secret_key: "SECRET".to_string(),
//!     region: Some(Region::UsEast),
//!     bucket: "static-site".to_string(),
//!     acl: Some(Acl::PublicRead),
//!     ..Default::default()
//! };
//!
//! let cancel = CancellationToken::new();
//! let (files_tx, files_rx) = mpsc::channel(16);
//! let (done_tx, mut done_rx) = mpsc::channel(16);
//!
//! let source = spawn_source(FsSource::new(vec!["public".into()]), cancel.clone(), files_tx);
//! let upload = spawn_stage(S3Put::new(config), cancel.clone(), files_rx, done_tx);
//!
//! while let Some(file) = done_rx.recv().await {
//!     println!("uploaded {}", file.name());
//! }
//! upload.await??;
//! source.await??;
//! # Ok(())
//! # }
//! ```

use std::io;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::ConfigError;
use crate::models::FileItem;

/// Stage that uploads every file it receives to S3
pub mod put;

/// Stage source that reads files from the local filesystem
pub mod source;

pub use put::S3Put;
pub use source::FsSource;

/// Reasons a stage stops with an error.
///
/// Every variant is fatal: a stage never skips a failed item and carries on.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create object store client")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to read {name}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to upload {key}")]
    Upload {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to list {path}")]
    Source {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Stage cancelled")]
    Cancelled,

    #[error("Output channel closed by downstream consumer")]
    OutputClosed,
}

/// A unit of pipeline work between an inbound and an outbound channel.
#[async_trait]
pub trait Stage: Send + 'static {
    /// Process items from `input` until it closes or `cancel` fires
    async fn run(
        self,
        cancel: CancellationToken,
        input: Receiver<FileItem>,
        output: Sender<FileItem>,
    ) -> Result<(), StageError>;
}

/// The head of a pipeline: produces items without consuming any.
#[async_trait]
pub trait Source: Send + 'static {
    /// Emit items on `output`; the channel closes when this returns
    async fn produce(
        self,
        cancel: CancellationToken,
        output: Sender<FileItem>,
    ) -> Result<(), StageError>;
}

/// Run a stage on its own task
pub fn spawn_stage<S: Stage>(
    stage: S,
    cancel: CancellationToken,
    input: Receiver<FileItem>,
    output: Sender<FileItem>,
) -> JoinHandle<Result<(), StageError>> {
    tokio::spawn(stage.run(cancel, input, output))
}

/// Run a source on its own task
pub fn spawn_source<S: Source>(
    source: S,
    cancel: CancellationToken,
    output: Sender<FileItem>,
) -> JoinHandle<Result<(), StageError>> {
    tokio::spawn(source.produce(cancel, output))
}

/// Send an item downstream unless cancellation fires first.
///
/// Either event may win when both are ready.
pub(crate) async fn send_or_cancel(
    output: &Sender<FileItem>,
    cancel: &CancellationToken,
    item: FileItem,
) -> Result<(), StageError> {
    tokio::select! {
        sent = output.send(item) => sent.map_err(|_| StageError::OutputClosed),
        _ = cancel.cancelled() => Err(StageError::Cancelled),
    }
}
