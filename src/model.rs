//! API data model
//!
//! Request and response types of the VictoriaMetrics Cloud API, with their
//! JSON wire names. Enumerated literals are closed enums: an unknown literal
//! is rejected by `FromStr` and by JSON decoding.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed, string-backed enum with its wire literals.
///
/// The generated type serializes as its literal and parses through `FromStr`,
/// so decoding an unknown literal fails with the same message as parsing it.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $literal:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(try_from = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire literal
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $literal,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok($name::$variant),)+
                    other => Err(Error::invalid_argument(format!(
                        concat!("invalid ", $what, ": {}"),
                        other
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

wire_enum! {
    /// Type of the deployment
    DeploymentType, "deployment type" {
        #[default]
        SingleNode => "single_node",
        Cluster => "cluster",
    }
}

wire_enum! {
    /// Unit of a retention or deduplication period
    DurationUnit, "duration unit" {
        Millisecond => "ms",
        Second => "s",
        #[default]
        Day => "d",
        Month => "m",
    }
}

wire_enum! {
    /// Access mode of a deployment access token
    AccessMode, "access token type" {
        #[default]
        Read => "r",
        Write => "w",
        ReadWrite => "rw",
    }
}

wire_enum! {
    /// Unit of the deployment storage size
    StorageUnit, "storage size unit" {
        #[default]
        Gb => "GB",
        Tb => "TB",
    }
}

wire_enum! {
    /// Scheduled window for disruptive maintenance
    MaintenanceWindow, "maintenance window" {
        #[default]
        WeekendDays => "Sat-Sun 3-4am",
        BusinessDays => "Mon-Fri 4-5am",
    }
}

/// Cloud provider hosting a deployment
///
/// Only AWS is accepted for new deployments, but listings may name providers
/// this client does not know yet; those are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CloudProvider {
    #[default]
    Aws,
    Other(String),
}

impl CloudProvider {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Aws => "aws",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CloudProvider {
    fn from(value: String) -> Self {
        if value == "aws" {
            Self::Aws
        } else {
            Self::Other(value)
        }
    }
}

impl From<CloudProvider> for String {
    fn from(value: CloudProvider) -> Self {
        match value {
            CloudProvider::Aws => "aws".to_string(),
            CloudProvider::Other(name) => name,
        }
    }
}

impl FromStr for CloudProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::invalid_argument("cloud provider cannot be empty"));
        }
        Ok(Self::from(s.to_string()))
    }
}

/// Current status of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatus {
    Provisioning,
    Running,
    Error,
    Stopped,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Provisioning => "PROVISIONING",
            Self::Running => "RUNNING",
            Self::Error => "ERROR",
            Self::Stopped => "STOPPED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Cloud provider available for deployments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudProviderInfo {
    pub id: CloudProvider,
    pub url: String,
}

/// Region available for deployments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionInfo {
    pub cloud_provider: CloudProvider,
    pub name: String,
}

/// Capacity class of a deployment and its limits
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TierInfo {
    pub id: u32,
    #[serde(rename = "type")]
    pub deployment_type: DeploymentType,
    pub cloud_provider: CloudProvider,
    pub name: String,
    pub compute_cost_per_hour: f64,
    pub ingestion_rate: i64,
    pub active_time_series: i64,
    pub new_series_over_24h: i64,
    pub datapoints_read_rate: i64,
    pub series_read_per_query: i64,
    /// Maximum number of concurrent requests for each access token
    pub access_token_concurrent_requests: i64,
}

/// Deployment as shown in listings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub deployment_type: DeploymentType,
    pub tier: u32,
    /// VictoriaMetrics version running in the deployment
    pub version: String,
    pub cloud_provider: CloudProvider,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub status: DeploymentStatus,
}

/// Monthly price of a deployment in USD
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentPrice {
    pub compute_cost: f64,
    pub storage_cost: f64,
    /// Compute plus storage, network costs excluded
    pub total_cost: f64,
}

/// Full deployment details
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub deployment_type: DeploymentType,
    pub tier: u32,
    pub version: String,
    pub cloud_provider: CloudProvider,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub status: DeploymentStatus,
    pub retention_value: u32,
    pub retention_unit: DurationUnit,
    pub deduplication_value: u32,
    pub deduplication_unit: DurationUnit,
    pub storage_size_gb: u64,
    pub maintenance_window: MaintenanceWindow,
    pub price: DeploymentPrice,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vmsingle_settings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vmstorage_settings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vmselect_settings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vminsert_settings: Vec<String>,
    /// URL entrypoint to the deployment's own API
    pub access_endpoint: String,
}

/// Payload for creating a deployment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeploymentCreationRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub deployment_type: DeploymentType,
    pub provider: CloudProvider,
    pub region: String,
    pub tier: u32,
    /// Size in units of `storage_size_unit`
    pub storage_size: u64,
    pub storage_size_unit: StorageUnit,
    pub deduplication: u32,
    pub deduplication_unit: DurationUnit,
    pub retention: u32,
    pub retention_unit: DurationUnit,
    pub maintenance_window: MaintenanceWindow,
}

/// Customized command-line flags per VictoriaMetrics component
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentFlags {
    pub single_flags: Vec<String>,
    pub select_flags: Vec<String>,
    pub storage_flags: Vec<String>,
    pub insert_flags: Vec<String>,
}

/// Payload for updating a deployment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeploymentUpdateRequest {
    pub name: String,
    pub tier: u32,
    pub storage_size: u64,
    pub storage_size_unit: StorageUnit,
    pub deduplication: u32,
    pub deduplication_unit: DurationUnit,
    pub retention: u32,
    pub retention_unit: DurationUnit,
    pub maintenance_window: MaintenanceWindow,
    #[serde(default)]
    pub flags: DeploymentFlags,
}

/// Access token of a deployment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessToken {
    pub id: String,
    /// Listings only return the first 4 symbols; use the reveal operation for
    /// the full secret
    #[serde(rename = "value")]
    pub secret: String,
    #[serde(rename = "type")]
    pub mode: AccessMode,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,
    /// Last usage within the last 7 days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Payload for creating an access token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessTokenCreateRequest {
    #[serde(rename = "type")]
    pub mode: AccessMode,
    pub description: String,
    /// `<accountID>` or `<accountID>:<projectID>`, empty for no tenant
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_enum_literals() {
        assert_eq!(DeploymentType::SingleNode.to_string(), "single_node");
        assert_eq!(StorageUnit::Tb.as_str(), "TB");
        assert_eq!(MaintenanceWindow::BusinessDays.as_str(), "Mon-Fri 4-5am");
        assert_eq!("rw".parse::<AccessMode>().unwrap(), AccessMode::ReadWrite);
        assert_eq!(DurationUnit::ALL.len(), 4);
    }

    #[test]
    fn test_unknown_literal_is_rejected() {
        let err = "daily".parse::<MaintenanceWindow>().unwrap_err();
        assert_eq!(err.to_string(), "invalid maintenance window: daily");

        let err = "PB".parse::<StorageUnit>().unwrap_err();
        assert!(err.is_invalid_argument());

        let decoded = serde_json::from_value::<DeploymentType>(json!("serverless"));
        let message = decoded.unwrap_err().to_string();
        assert!(message.contains("invalid deployment type: serverless"));
    }

    #[test]
    fn test_cloud_provider_keeps_unknown_names() {
        let provider: CloudProvider = serde_json::from_value(json!("gcp")).unwrap();
        assert_eq!(provider, CloudProvider::Other("gcp".to_string()));
        assert_eq!(serde_json::to_value(&provider).unwrap(), json!("gcp"));

        let aws: CloudProvider = serde_json::from_value(json!("aws")).unwrap();
        assert_eq!(aws, CloudProvider::Aws);
        assert!("".parse::<CloudProvider>().is_err());
    }

    #[test]
    fn test_unknown_status_decodes() {
        let status: DeploymentStatus = serde_json::from_value(json!("MIGRATING")).unwrap();
        assert_eq!(status, DeploymentStatus::Unknown);
        let status: DeploymentStatus = serde_json::from_value(json!("RUNNING")).unwrap();
        assert_eq!(status, DeploymentStatus::Running);
    }

    #[test]
    fn test_access_token_wire_names() {
        let token: AccessToken = serde_json::from_value(json!({
            "id": "tok-1",
            "value": "abcd",
            "type": "rw",
            "description": "ingest",
            "created_by": "ops@example.com",
            "created_at": "2025-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(token.secret, "abcd");
        assert_eq!(token.mode, AccessMode::ReadWrite);
        assert!(token.tenant_id.is_empty());
        assert!(token.last_used_at.is_none());

        let encoded = serde_json::to_value(&token).unwrap();
        assert!(encoded.get("tenant_id").is_none());
        assert!(encoded.get("last_used_at").is_none());
    }

    #[test]
    fn test_token_request_omits_empty_tenant() {
        let request = AccessTokenCreateRequest {
            mode: AccessMode::Read,
            description: "dashboards".to_string(),
            tenant_id: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "r", "description": "dashboards"})
        );
    }

    #[test]
    fn test_deployment_info_tolerates_missing_fields() {
        let info: DeploymentInfo = serde_json::from_value(json!({
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "name": "prod",
            "type": "cluster",
            "status": "RUNNING",
            "storage_size_gb": 100
        }))
        .unwrap();

        assert_eq!(info.deployment_type, DeploymentType::Cluster);
        assert_eq!(info.storage_size_gb, 100);
        assert!(info.vmsingle_settings.is_empty());
        assert_eq!(info.price, DeploymentPrice::default());
    }
}
