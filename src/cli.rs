use clap::Parser;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{Acl, Region, UploadConfig};
use crate::constants::DEFAULT_QUEUE_SIZE;

/// Command-line arguments for the s3-put-stage tool.
///
/// Settings given here override the configuration file, which in turn
/// overrides the standard AWS environment variables.
#[derive(Parser, Debug)]
#[clap(name = "s3-put-stage", about = "Upload files to an S3 bucket")]
pub struct Args {
    /// Files or directories to upload
    #[clap(required = true)]
    pub paths: Vec<PathBuf>,

    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// S3 bucket name
    #[clap(short, long)]
    pub bucket: Option<String>,

    /// AWS region of the bucket (e.g. us-east-1)
    #[clap(long)]
    pub region: Option<Region>,

    /// Canned ACL applied to uploaded objects (e.g. public-read)
    #[clap(long)]
    pub acl: Option<Acl>,

    /// Custom endpoint for S3-compatible storage
    #[clap(long)]
    pub endpoint: Option<String>,

    /// Prefix prepended to every object key
    #[clap(short, long)]
    pub prefix: Option<String>,

    /// Descend into subdirectories
    #[clap(short, long)]
    pub recursive: bool,

    /// Capacity of the channels between pipeline stages
    #[clap(long, default_value_t = DEFAULT_QUEUE_SIZE)]
    pub queue_size: usize,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Override configuration values with any that were given on the command line
    pub fn apply_overrides(&self, config: &mut UploadConfig) {
        if let Some(bucket) = &self.bucket {
            config.bucket = bucket.clone();
        }
        if let Some(region) = self.region {
            config.region = Some(region);
        }
        if let Some(acl) = self.acl {
            config.acl = Some(acl);
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
    }
}

/// Assemble the upload configuration from file, command line and environment.
///
/// The result is not validated; the stage does that when it starts.
pub fn build_upload_config(args: &Args) -> Result<UploadConfig> {
    let mut config = match &args.config {
        Some(path) => UploadConfig::from_yaml_file(path)
            .context("Failed to load upload configuration")?,
        None => UploadConfig::default(),
    };

    config.process_environment_variables();
    args.apply_overrides(&mut config);
    config.apply_env_defaults()
        .context("Failed to apply environment defaults")?;

    Ok(config)
}
