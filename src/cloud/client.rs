use anyhow::{Context, Result, anyhow};
use log::debug;
use rusoto_core::{HttpClient, Region as AwsRegion};
use rusoto_credential::StaticProvider;
use rusoto_s3::S3Client;

use crate::config::{Region, UploadConfig};

/// Map a configured region onto the client library's region type.
///
/// With an endpoint the region becomes a custom one, which is how
/// S3-compatible services (MinIO, Ceph, R2, ...) are addressed.
pub fn aws_region(region: Region, endpoint: Option<&str>) -> AwsRegion {
    if let Some(endpoint) = endpoint {
        return AwsRegion::Custom {
            name: region.name().to_string(),
            endpoint: endpoint.to_string(),
        };
    }

    match region {
        Region::ApNortheast => AwsRegion::ApNortheast1,
        Region::ApSoutheast => AwsRegion::ApSoutheast1,
        Region::ApSoutheast2 => AwsRegion::ApSoutheast2,
        Region::EuWest => AwsRegion::EuWest1,
        Region::UsEast => AwsRegion::UsEast1,
        Region::UsWest => AwsRegion::UsWest1,
        Region::UsWest2 => AwsRegion::UsWest2,
        Region::SaEast => AwsRegion::SaEast1,
        Region::CnNorth => AwsRegion::CnNorth1,
    }
}

/// Create an S3 client authenticated with the configured static credentials
pub fn create_s3_client(config: &UploadConfig) -> Result<S3Client> {
    let region = config.region
        .ok_or_else(|| anyhow!("Cannot create S3 client without a region"))?;
    let region = aws_region(region, config.endpoint.as_deref());

    let provider = StaticProvider::new_minimal(
        config.access_key.clone(),
        config.secret_key.clone(),
    );
    let http_client = HttpClient::new().context("Failed to create HTTP client")?;

    debug!("Creating S3 client for region {}", region.name());
    Ok(S3Client::new_with(http_client, provider, region))
}
