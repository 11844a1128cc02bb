//! Utility functions for uploaded content.
//!
//! ### Resolving a Content Type
//!
//! ```
//! use s3_put_stage::utils::content_type::resolve_content_type;
//!
//! assert_eq!(resolve_content_type("report.json", b"{}"), "application/json");
//! assert_eq!(resolve_content_type("photo", &[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
//! ```

/// Content type lookup and sniffing
pub mod content_type;
