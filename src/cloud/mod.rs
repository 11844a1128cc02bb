//! Cloud storage integration for uploaded files.
//!
//! The put stage talks to storage only through the [`s3::ObjectStore`] trait,
//! so tests and alternative backends can stand in for S3. [`s3::S3Store`] is
//! the production implementation, built on rusoto.
//!
//! ## Usage Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use s3_put_stage::cloud::s3::{ObjectStore, S3Store};
//! use s3_put_stage::config::{Acl, Region, UploadConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UploadConfig {
//!     access_key: "KEY".to_string(),
//!     secret_key: "SECRET".to_string(),
//!     region: Some(Region::EuWest),
//!     bucket: "static-site".to_string(),
//!     acl: Some(Acl::PublicRead),
//!     ..Default::default()
//! };
//!
//! let store = S3Store::from_config(&config)?;
//! store.put("index.html", Bytes::from_static(b"<html></html>"), "text/html", Acl::PublicRead).await?;
//! # Ok(())
//! # }
//! ```

/// Amazon S3 object store
pub mod s3;

/// S3 client construction
pub mod client;
