//! # s3-put-stage
//!
//! A pipeline stage that uploads files to an Amazon S3 (or S3-compatible)
//! bucket and forwards each uploaded file downstream.
//!
//! ## Overview
//!
//! Files travel between stages as [`models::FileItem`]s over tokio channels.
//! The [`stage::S3Put`] stage reads each item fully, resolves its content
//! type, stores it with the configured ACL, and emits an item wrapping the
//! buffered bytes so later stages can keep working with the content.
//!
//! ## Features
//!
//! - **Fail-fast uploads**: the first read or upload error stops the stage
//! - **Order preserving**: items leave in the order they arrived
//! - **Cooperative cancellation**: via `tokio_util::sync::CancellationToken`
//! - **Content types**: extension lookup with content sniffing as fallback
//! - **YAML configuration**: with `${VAR}` expansion and AWS env defaults
//!
//! ## Usage
//!
//! ```no_run
//! use s3_put_stage::config::UploadConfig;
//! use s3_put_stage::stage::{S3Put, Stage};
//! use std::path::Path;
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut config = UploadConfig::from_yaml_file(Path::new("upload.yaml"))?;
//! config.apply_env_defaults()?;
//!
//! let (files_tx, files_rx) = mpsc::channel(16);
//! let (done_tx, _done_rx) = mpsc::channel(16);
//! drop(files_tx);
//!
//! S3Put::new(config).run(CancellationToken::new(), files_rx, done_tx).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: File items and their metadata
//! - [`config`]: Upload configuration, regions and ACLs
//! - [`cloud`]: Object store abstraction and the S3 client
//! - [`stage`]: Pipeline stages: the S3 put stage and the filesystem source
//! - [`utils`]: Content type resolution
//! - [`constants`]: Application constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Cloud storage integration (S3)
pub mod cloud;

/// Configuration management
pub mod config;

/// Pipeline stages
pub mod stage;

/// Utility functions
pub mod utils;

/// Application constants and configuration values
pub mod constants;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
