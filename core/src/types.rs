//! Domain DTOs for the CloudHealth AWS account resource.
//!
//! # Design
//! Field names follow the CloudHealth JSON schema exactly. Optional metadata
//! is skipped when absent so that create and update payloads only carry what
//! the caller set; the server leaves omitted fields untouched.

use serde::{Deserialize, Serialize};

fn is_unassigned(id: &u64) -> bool {
    *id == 0
}

/// An AWS account registered with CloudHealth.
///
/// `id` is assigned by the server; `0` means "not created yet" and is left out
/// of request bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccount {
    #[serde(default, skip_serializing_if = "is_unassigned")]
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_public_fields: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AwsAccountAuthentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<AwsAccountBilling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudtrail: Option<AwsAccountFeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_config: Option<AwsAccountFeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudwatch: Option<AwsAccountCloudwatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<AwsAccountTag>,
}

impl AwsAccount {
    /// A not-yet-created account with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// How CloudHealth authenticates against the account.
///
/// `protocol` is `"access_key"` (uses the key pair) or `"assume_role"` (uses
/// the role ARN and external id).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccountAuthentication {
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_external_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccountBilling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

/// An S3-delivered feed (CloudTrail or AWS Config).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccountFeed {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccountCloudwatch {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccountTag {
    pub key: String,
    pub value: String,
}

/// List envelope returned by `GET /aws_accounts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccounts {
    #[serde(default)]
    pub aws_accounts: Vec<AwsAccount>,
}
