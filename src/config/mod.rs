// Re-export all items from the submodules
mod env_vars;
mod storage_types;
mod upload_config;

// Re-export storage vocabulary
pub use storage_types::{
    Acl,
    ParseNameError,
    Region,
};

// Re-export upload config
pub use upload_config::{
    ConfigError,
    UploadConfig,
};

// Re-export environment variable functions
pub use env_vars::expand_env_vars;
