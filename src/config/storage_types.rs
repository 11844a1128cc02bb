use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Returned when a region or ACL name is not one of the known values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

/// Canned access policy applied to every uploaded object
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Acl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl Acl {
    pub const ALL: [Acl; 6] = [
        Acl::Private,
        Acl::PublicRead,
        Acl::PublicReadWrite,
        Acl::AuthenticatedRead,
        Acl::BucketOwnerRead,
        Acl::BucketOwnerFullControl,
    ];

    /// Value sent in the `x-amz-acl` header
    pub fn as_str(&self) -> &'static str {
        match self {
            Acl::Private => "private",
            Acl::PublicRead => "public-read",
            Acl::PublicReadWrite => "public-read-write",
            Acl::AuthenticatedRead => "authenticated-read",
            Acl::BucketOwnerRead => "bucket-owner-read",
            Acl::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Acl {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Acl::ALL
            .iter()
            .copied()
            .find(|acl| acl.as_str() == s)
            .ok_or_else(|| ParseNameError { kind: "ACL", value: s.to_string() })
    }
}

/// AWS regions the stage can target.
///
/// Kept independent of the client library; [`crate::cloud::client`] maps each
/// one to a `rusoto_core::Region` when the client is built.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    #[serde(rename = "ap-northeast-1")]
    ApNortheast,
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast,
    #[serde(rename = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "eu-west-1")]
    EuWest,
    #[serde(rename = "us-east-1")]
    UsEast,
    #[serde(rename = "us-west-1")]
    UsWest,
    #[serde(rename = "us-west-2")]
    UsWest2,
    #[serde(rename = "sa-east-1")]
    SaEast,
    #[serde(rename = "cn-north-1")]
    CnNorth,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::ApNortheast,
        Region::ApSoutheast,
        Region::ApSoutheast2,
        Region::EuWest,
        Region::UsEast,
        Region::UsWest,
        Region::UsWest2,
        Region::SaEast,
        Region::CnNorth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::ApNortheast => "ap-northeast-1",
            Region::ApSoutheast => "ap-southeast-1",
            Region::ApSoutheast2 => "ap-southeast-2",
            Region::EuWest => "eu-west-1",
            Region::UsEast => "us-east-1",
            Region::UsWest => "us-west-1",
            Region::UsWest2 => "us-west-2",
            Region::SaEast => "sa-east-1",
            Region::CnNorth => "cn-north-1",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|region| region.name() == s)
            .ok_or_else(|| ParseNameError { kind: "region", value: s.to_string() })
    }
}
