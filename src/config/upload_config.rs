use std::fs;
use std::path::Path;

use log::debug;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::config::env_vars::{expand_env_vars, non_empty_env};
use crate::config::storage_types::{Acl, Region};
use crate::constants::{ENV_ACCESS_KEY, ENV_REGION, ENV_SECRET_KEY};

/// Errors produced while loading or validating an [`UploadConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required fields are empty, listed in declaration order
    #[error("Missing Required Field {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Settings for the S3 put stage.
///
/// Every field defaults to empty so that a partially written config file
/// still loads and [`UploadConfig::validate`] can report everything missing
/// in one go.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UploadConfig {
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<Region>,
    /// Bucket name
    pub bucket: String,
    pub acl: Option<Acl>,
    /// Custom endpoint for S3-compatible storage
    pub endpoint: Option<String>,
    /// Prepended to every object key
    pub prefix: String,
}

impl UploadConfig {
    /// Check that every required field is populated.
    ///
    /// The error names all missing fields, not only the first one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validated_acl().map(|_| ())
    }

    /// Validate the config and return the ACL objects are stored with
    pub fn validated_acl(&self) -> Result<Acl, ConfigError> {
        let mut missing = Vec::new();

        if self.access_key.is_empty() {
            missing.push("access_key");
        }
        if self.secret_key.is_empty() {
            missing.push("secret_key");
        }
        if self.region.is_none() {
            missing.push("region");
        }
        if self.bucket.is_empty() {
            missing.push("bucket");
        }
        if self.acl.is_none() {
            missing.push("acl");
        }

        match self.acl {
            Some(acl) if missing.is_empty() => Ok(acl),
            _ => Err(ConfigError::MissingFields(missing)),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: UploadConfig = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Expand `$VAR` and `${VAR}` references in the string fields
    pub fn process_environment_variables(&mut self) {
        for value in [
            &mut self.access_key,
            &mut self.secret_key,
            &mut self.bucket,
            &mut self.prefix,
        ] {
            if value.contains('$') {
                *value = expand_env_vars(value);
            }
        }

        if let Some(endpoint) = self.endpoint.as_mut() {
            if endpoint.contains('$') {
                *endpoint = expand_env_vars(endpoint);
            }
        }
    }

    /// Fill empty credential and region fields from the standard AWS variables
    pub fn apply_env_defaults(&mut self) -> Result<(), ConfigError> {
        if self.access_key.is_empty() {
            if let Some(value) = non_empty_env(ENV_ACCESS_KEY) {
                self.access_key = value;
            }
        }
        if self.secret_key.is_empty() {
            if let Some(value) = non_empty_env(ENV_SECRET_KEY) {
                self.secret_key = value;
            }
        }
        if self.region.is_none() {
            if let Some(value) = non_empty_env(ENV_REGION) {
                let region = value.parse::<Region>().map_err(|e| ConfigError::InvalidValue {
                    field: "region",
                    reason: e.to_string(),
                })?;
                self.region = Some(region);
            }
        }
        Ok(())
    }

    /// Object key for a file name, honoring the configured prefix
    pub fn object_key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            return name.to_string();
        }
        format!("{}/{}", self.prefix.trim_end_matches('/'), name.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::NamedTempFile;
    use std::io::Write;

    fn complete_config() -> UploadConfig {
        UploadConfig {
            access_key: "AKIA".to_string(),
            secret_key: "secret".to_string(),
            region: Some(Region::UsEast),
            bucket: "assets".to_string(),
            acl: Some(Acl::PublicRead),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_complete() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_validated_acl() {
        assert_eq!(complete_config().validated_acl().unwrap(), Acl::PublicRead);

        let config = UploadConfig { bucket: String::new(), ..complete_config() };
        match config.validated_acl() {
            Err(ConfigError::MissingFields(fields)) => assert_eq!(fields, vec!["bucket"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_reports_all_missing() {
        let err = UploadConfig::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing Required Field access_key, secret_key, region, bucket, acl"
        );
    }

    #[test]
    fn test_validate_reports_only_missing() {
        let config = UploadConfig {
            secret_key: String::new(),
            acl: None,
            ..complete_config()
        };

        match config.validate() {
            Err(ConfigError::MissingFields(fields)) => assert_eq!(fields, vec!["secret_key", "acl"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_optional_fields_not_required() {
        let config = complete_config();
        assert!(config.endpoint.is_none());
        assert!(config.prefix.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "access_key: AKIA\nsecret_key: s3cr3t\nregion: eu-west-1\nbucket: site\nacl: public-read\nprefix: static"
        )
        .unwrap();

        let config = UploadConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.region, Some(Region::EuWest));
        assert_eq!(config.acl, Some(Acl::PublicRead));
        assert_eq!(config.prefix, "static");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_file_partial_loads() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bucket: site").unwrap();

        let config = UploadConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.bucket, "site");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml_file_errors() {
        let err = UploadConfig::from_yaml_file(Path::new("/nonexistent/s3put.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "region: moon-base-1").unwrap();
        let err = UploadConfig::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_process_environment_variables() {
        env::set_var("S3PUT_CFG_SECRET", "from-env");

        let mut config = UploadConfig {
            secret_key: "${S3PUT_CFG_SECRET}".to_string(),
            ..complete_config()
        };
        config.process_environment_variables();
        assert_eq!(config.secret_key, "from-env");

        env::remove_var("S3PUT_CFG_SECRET");
    }

    #[test]
    fn test_object_key() {
        let mut config = complete_config();
        assert_eq!(config.object_key("a.txt"), "a.txt");

        config.prefix = "site/".to_string();
        assert_eq!(config.object_key("a.txt"), "site/a.txt");
        assert_eq!(config.object_key("/css/main.css"), "site/css/main.css");
    }
}
