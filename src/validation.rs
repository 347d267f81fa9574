//! Pre-flight validation
//!
//! Shape checks for identifiers and domain checks for deployment parameters.
//! Every rule set is ordered and reports the first violated rule. Nothing
//! here consults remote state.

use crate::error::{Error, Result};
use crate::model::{
    CloudProvider, DeploymentCreationRequest, DeploymentType, DeploymentUpdateRequest,
    DurationUnit, MaintenanceWindow, StorageUnit,
};
use uuid::Uuid;

/// Smallest storage size accepted when the unit is gigabytes
pub const MIN_STORAGE_SIZE_GB: u64 = 10;

/// Largest storage size a single-node deployment accepts, in terabytes
pub const MAX_SINGLE_NODE_STORAGE_TB: u64 = 16;

/// Check for the canonical 8-4-4-4-12 hex form, in either case
pub fn is_valid_uuid(s: &str) -> bool {
    // The hyphenated form is the only 36 character form the parser accepts
    s.len() == 36 && Uuid::try_parse(s).is_ok()
}

pub fn check_deployment_id(deployment_id: &str) -> Result<()> {
    if deployment_id.is_empty() {
        return Err(Error::invalid_argument("deployment ID cannot be empty"));
    }
    if !is_valid_uuid(deployment_id) {
        return Err(Error::invalid_argument(format!(
            "invalid deployment ID format: {}",
            deployment_id
        )));
    }
    Ok(())
}

/// Check for `<digits>` or `<digits>:<digits>`
pub fn is_valid_tenant_id(s: &str) -> bool {
    let is_number = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once(':') {
        Some((account, project)) => is_number(account) && is_number(project),
        None => is_number(s),
    }
}

/// Tenant IDs are optional: empty passes, anything else must be well-formed
pub fn check_tenant_id(tenant_id: &str) -> Result<()> {
    if tenant_id.is_empty() || is_valid_tenant_id(tenant_id) {
        return Ok(());
    }
    Err(Error::invalid_argument(format!(
        "invalid tenant ID format: {}, expected <accountID> or <accountID>:<projectID>",
        tenant_id
    )))
}

pub(crate) fn check_non_empty(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{} cannot be empty", what)));
    }
    Ok(())
}

/// Parameters shared by deployment creation and update
#[derive(Debug, Clone, Copy)]
pub struct DeploymentParams<'a> {
    pub name: &'a str,
    pub tier: u32,
    pub maintenance_window: MaintenanceWindow,
    pub storage_size: u64,
    pub storage_size_unit: StorageUnit,
    pub retention: u32,
    pub retention_unit: DurationUnit,
    pub deduplication_unit: DurationUnit,
}

impl<'a> From<&'a DeploymentCreationRequest> for DeploymentParams<'a> {
    fn from(request: &'a DeploymentCreationRequest) -> Self {
        Self {
            name: &request.name,
            tier: request.tier,
            maintenance_window: request.maintenance_window,
            storage_size: request.storage_size,
            storage_size_unit: request.storage_size_unit,
            retention: request.retention,
            retention_unit: request.retention_unit,
            deduplication_unit: request.deduplication_unit,
        }
    }
}

impl<'a> From<&'a DeploymentUpdateRequest> for DeploymentParams<'a> {
    fn from(request: &'a DeploymentUpdateRequest) -> Self {
        Self {
            name: &request.name,
            tier: request.tier,
            maintenance_window: request.maintenance_window,
            storage_size: request.storage_size,
            storage_size_unit: request.storage_size_unit,
            retention: request.retention,
            retention_unit: request.retention_unit,
            deduplication_unit: request.deduplication_unit,
        }
    }
}

/// Rules applied to both deployment creation and update.
///
/// Maintenance window and storage unit are closed enums, so an out-of-set
/// literal never reaches this point: it fails when parsed or decoded.
pub fn validate_common_deployment_params(params: &DeploymentParams<'_>) -> Result<()> {
    if params.name.is_empty() {
        return Err(Error::invalid_argument("deployment name cannot be empty"));
    }
    if params.tier == 0 {
        return Err(Error::invalid_argument("deployment tier cannot be empty"));
    }
    if params.storage_size == 0 {
        return Err(Error::invalid_argument(
            "deployment storage size cannot be zero",
        ));
    }
    if params.storage_size_unit == StorageUnit::Gb && params.storage_size < MIN_STORAGE_SIZE_GB {
        return Err(Error::invalid_argument(format!(
            "deployment storage size must be at least {} GB",
            MIN_STORAGE_SIZE_GB
        )));
    }
    if params.retention == 0 {
        return Err(Error::invalid_argument("deployment retention cannot be zero"));
    }
    if !matches!(params.retention_unit, DurationUnit::Day | DurationUnit::Month) {
        return Err(Error::invalid_argument(format!(
            "invalid retention unit: {}, only days and months are supported",
            params.retention_unit
        )));
    }
    if !matches!(
        params.deduplication_unit,
        DurationUnit::Second | DurationUnit::Millisecond
    ) {
        return Err(Error::invalid_argument(format!(
            "invalid deduplication unit: {}, only seconds and milliseconds are supported",
            params.deduplication_unit
        )));
    }
    Ok(())
}

/// Rules applied only when creating a deployment
pub fn validate_create_deployment_params(
    deployment_type: DeploymentType,
    region: &str,
    provider: &CloudProvider,
    storage_size: u64,
    storage_size_unit: StorageUnit,
) -> Result<()> {
    if region.is_empty() {
        return Err(Error::invalid_argument("deployment region cannot be empty"));
    }
    if *provider != CloudProvider::Aws {
        return Err(Error::invalid_argument(format!(
            "unsupported deployment cloud provider: {}",
            provider
        )));
    }
    if deployment_type == DeploymentType::SingleNode
        && storage_size_unit == StorageUnit::Tb
        && storage_size > MAX_SINGLE_NODE_STORAGE_TB
    {
        return Err(Error::invalid_argument(format!(
            "single-node deployments cannot have more than {} TB of storage",
            MAX_SINGLE_NODE_STORAGE_TB
        )));
    }
    Ok(())
}

pub(crate) fn validate_creation_request(request: &DeploymentCreationRequest) -> Result<()> {
    validate_common_deployment_params(&DeploymentParams::from(request))?;
    validate_create_deployment_params(
        request.deployment_type,
        &request.region,
        &request.provider,
        request.storage_size,
        request.storage_size_unit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> DeploymentParams<'static> {
        DeploymentParams {
            name: "test",
            tier: 21,
            maintenance_window: MaintenanceWindow::WeekendDays,
            storage_size: 10,
            storage_size_unit: StorageUnit::Gb,
            retention: 30,
            retention_unit: DurationUnit::Day,
            deduplication_unit: DurationUnit::Second,
        }
    }

    fn common_error(params: DeploymentParams<'_>) -> String {
        validate_common_deployment_params(&params)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn test_deployment_id() {
        assert!(check_deployment_id("123e4567-e89b-12d3-a456-426614174000").is_ok());
        assert!(check_deployment_id("123E4567-E89B-12D3-A456-426614174000").is_ok());

        let err = check_deployment_id("").unwrap_err();
        assert_eq!(err.to_string(), "deployment ID cannot be empty");

        let err = check_deployment_id("not-a-uuid").unwrap_err();
        assert_eq!(err.to_string(), "invalid deployment ID format: not-a-uuid");
    }

    #[test]
    fn test_uuid_rejects_other_forms() {
        assert!(!is_valid_uuid(""));
        assert!(!is_valid_uuid("123e4567e89b12d3a456426614174000"));
        assert!(!is_valid_uuid("{123e4567-e89b-12d3-a456-426614174000}"));
        assert!(!is_valid_uuid("urn:uuid:123e4567-e89b-12d3-a456-426614174000"));
        assert!(!is_valid_uuid("123e4567-e89b-12d3-a456-42661417400g"));
        assert!(!is_valid_uuid("123e4567-e89b12d3-a456-4266141740000"));
    }

    #[test]
    fn test_tenant_id() {
        assert!(check_tenant_id("").is_ok());
        assert!(check_tenant_id("123").is_ok());
        assert!(check_tenant_id("123:456").is_ok());

        for bad in ["abc", "1:2:3", "12:", ":12", "1 2", "-1"] {
            let err = check_tenant_id(bad).unwrap_err();
            assert!(
                err.to_string().contains("invalid tenant ID format"),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_common_params_valid() {
        assert!(validate_common_deployment_params(&valid_params()).is_ok());

        let terabytes = DeploymentParams {
            storage_size: 1,
            storage_size_unit: StorageUnit::Tb,
            retention_unit: DurationUnit::Month,
            deduplication_unit: DurationUnit::Millisecond,
            ..valid_params()
        };
        assert!(validate_common_deployment_params(&terabytes).is_ok());
    }

    #[test]
    fn test_common_params_rules() {
        let cases = [
            (DeploymentParams { name: "", ..valid_params() }, "name cannot be empty"),
            (DeploymentParams { tier: 0, ..valid_params() }, "tier cannot be empty"),
            (
                DeploymentParams { storage_size: 0, ..valid_params() },
                "storage size cannot be zero",
            ),
            (
                DeploymentParams { storage_size: 5, ..valid_params() },
                "must be at least 10 GB",
            ),
            (
                DeploymentParams { retention: 0, ..valid_params() },
                "retention cannot be zero",
            ),
            (
                DeploymentParams { retention_unit: DurationUnit::Second, ..valid_params() },
                "invalid retention unit",
            ),
            (
                DeploymentParams { retention_unit: DurationUnit::Millisecond, ..valid_params() },
                "invalid retention unit: ms",
            ),
            (
                DeploymentParams { deduplication_unit: DurationUnit::Day, ..valid_params() },
                "invalid deduplication unit: d",
            ),
            (
                DeploymentParams { deduplication_unit: DurationUnit::Month, ..valid_params() },
                "invalid deduplication unit",
            ),
        ];

        for (params, expected) in cases {
            let message = common_error(params);
            assert!(
                message.contains(expected),
                "expected {:?} in {:?}",
                expected,
                message
            );
        }
    }

    #[test]
    fn test_first_violation_wins() {
        let params = DeploymentParams {
            name: "",
            tier: 0,
            storage_size: 0,
            ..valid_params()
        };
        assert_eq!(common_error(params), "deployment name cannot be empty");
    }

    #[test]
    fn test_create_params() {
        let check = |deployment_type, size, unit| {
            validate_create_deployment_params(
                deployment_type,
                "us-east-2",
                &CloudProvider::Aws,
                size,
                unit,
            )
        };

        assert!(check(DeploymentType::SingleNode, 10, StorageUnit::Tb).is_ok());
        assert!(check(DeploymentType::SingleNode, 16, StorageUnit::Tb).is_ok());
        assert!(check(DeploymentType::Cluster, 20, StorageUnit::Tb).is_ok());
        assert!(check(DeploymentType::SingleNode, 20, StorageUnit::Gb).is_ok());

        let err = check(DeploymentType::SingleNode, 17, StorageUnit::Tb).unwrap_err();
        assert!(err.to_string().contains("16 TB"));
        let err = check(DeploymentType::SingleNode, 20, StorageUnit::Tb).unwrap_err();
        assert!(err.to_string().contains("16 TB"));
    }

    #[test]
    fn test_create_params_region_and_provider() {
        let err = validate_create_deployment_params(
            DeploymentType::Cluster,
            "",
            &CloudProvider::Aws,
            10,
            StorageUnit::Gb,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "deployment region cannot be empty");

        let err = validate_create_deployment_params(
            DeploymentType::Cluster,
            "us-east-2",
            &CloudProvider::Other("gcp".to_string()),
            10,
            StorageUnit::Gb,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "unsupported deployment cloud provider: gcp");
    }

    #[test]
    fn test_creation_request_runs_common_rules_first() {
        let request = DeploymentCreationRequest {
            name: "metrics".to_string(),
            region: String::new(),
            tier: 21,
            storage_size: 5,
            retention: 30,
            deduplication_unit: DurationUnit::Second,
            ..Default::default()
        };
        let err = validate_creation_request(&request).unwrap_err();
        assert!(err.to_string().contains("at least 10 GB"));
    }
}
