//! Global constants for the s3-put-stage application.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Pipeline constants
/// Default capacity of the channels connecting pipeline stages
pub const DEFAULT_QUEUE_SIZE: usize = 16;

/// Number of leading bytes inspected when sniffing a content type
pub const SNIFF_LEN: usize = 512;

// Content type constants
/// Content type used for UTF-8 text that has no recognizable extension
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Content type used when nothing better can be determined
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Annotation key under which the resolved content type is recorded
pub const CONTENT_TYPE_KEY: &str = "Content-Type";

// Environment variables
/// Environment variable consulted for the access key when the config leaves it empty
pub const ENV_ACCESS_KEY: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable consulted for the secret key when the config leaves it empty
pub const ENV_SECRET_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Environment variable consulted for the region when the config leaves it empty
pub const ENV_REGION: &str = "AWS_REGION";
