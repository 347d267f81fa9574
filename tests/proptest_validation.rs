//! Property-based tests using proptest
//!
//! These tests check the identifier and deployment parameter rules with
//! randomized inputs.

use proptest::prelude::*;
use vmcloud::model::{CloudProvider, DeploymentType, DurationUnit, MaintenanceWindow, StorageUnit};
use vmcloud::validation::{
    check_deployment_id, check_tenant_id, is_valid_tenant_id, is_valid_uuid,
    validate_common_deployment_params, validate_create_deployment_params, DeploymentParams,
    MAX_SINGLE_NODE_STORAGE_TB, MIN_STORAGE_SIZE_GB,
};

/// Generate canonical hyphenated UUIDs in mixed case
fn arb_uuid() -> impl Strategy<Value = String> {
    "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
}

/// Reference check: 8-4-4-4-12 hex groups separated by hyphens
fn looks_like_uuid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn params(storage_size: u64, storage_size_unit: StorageUnit) -> DeploymentParams<'static> {
    DeploymentParams {
        name: "prod",
        tier: 21,
        maintenance_window: MaintenanceWindow::WeekendDays,
        storage_size,
        storage_size_unit,
        retention: 30,
        retention_unit: DurationUnit::Day,
        deduplication_unit: DurationUnit::Second,
    }
}

proptest! {
    /// Every canonical UUID is accepted as a deployment ID
    #[test]
    fn canonical_uuids_are_accepted(id in arb_uuid()) {
        prop_assert!(is_valid_uuid(&id));
        prop_assert!(check_deployment_id(&id).is_ok());
    }

    /// Arbitrary strings are accepted exactly when they have the canonical shape
    #[test]
    fn uuid_check_matches_reference(s in ".{0,40}") {
        prop_assert_eq!(is_valid_uuid(&s), looks_like_uuid(&s));
    }

    /// Rejected deployment IDs are reported with the offending value
    #[test]
    fn invalid_deployment_id_names_value(s in "[g-z]{1,36}") {
        let err = check_deployment_id(&s).unwrap_err();
        prop_assert!(err.is_invalid_argument());
        prop_assert!(err.to_string().ends_with(&s));
    }
}

/// Tests for tenant IDs
mod tenant_id_tests {
    use super::*;

    proptest! {
        /// Account IDs alone are valid
        #[test]
        fn account_id_is_valid(account in 0u64..u64::MAX) {
            prop_assert!(check_tenant_id(&account.to_string()).is_ok());
        }

        /// Account and project IDs joined by a colon are valid
        #[test]
        fn account_and_project_is_valid(account in "[0-9]{1,10}", project in "[0-9]{1,10}") {
            let tenant = format!("{}:{}", account, project);
            prop_assert!(is_valid_tenant_id(&tenant));
        }

        /// Any non-digit character makes a tenant ID invalid
        #[test]
        fn non_digit_is_rejected(prefix in "[0-9]{0,5}", bad in "[a-zA-Z _/.-]", suffix in "[0-9]{0,5}") {
            let tenant = format!("{}{}{}", prefix, bad, suffix);
            prop_assert!(!is_valid_tenant_id(&tenant));
            let err = check_tenant_id(&tenant).unwrap_err();
            prop_assert!(err.to_string().contains("invalid tenant ID format"));
        }

        /// More than one colon is never valid
        #[test]
        fn extra_colon_is_rejected(parts in prop::collection::vec("[0-9]{1,4}", 3..6)) {
            prop_assert!(!is_valid_tenant_id(&parts.join(":")));
        }
    }

    #[test]
    fn empty_tenant_is_allowed() {
        assert!(check_tenant_id("").is_ok());
        assert!(!is_valid_tenant_id(""));
    }
}

/// Tests for storage size limits
mod storage_size_tests {
    use super::*;

    proptest! {
        /// Sizes below the minimum are rejected in gigabytes
        #[test]
        fn small_gb_sizes_are_rejected(size in 1..MIN_STORAGE_SIZE_GB) {
            let err = validate_common_deployment_params(&params(size, StorageUnit::Gb)).unwrap_err();
            prop_assert!(err.to_string().contains("at least 10 GB"));
        }

        /// The gigabyte minimum does not apply to terabytes
        #[test]
        fn small_tb_sizes_are_accepted(size in 1..MIN_STORAGE_SIZE_GB) {
            prop_assert!(validate_common_deployment_params(&params(size, StorageUnit::Tb)).is_ok());
        }

        /// Single-node storage up to the limit passes
        #[test]
        fn single_node_within_limit(size in 1..=MAX_SINGLE_NODE_STORAGE_TB) {
            let result = validate_create_deployment_params(
                DeploymentType::SingleNode,
                "us-east-2",
                &CloudProvider::Aws,
                size,
                StorageUnit::Tb,
            );
            prop_assert!(result.is_ok());
        }

        /// Single-node storage above the limit fails, clusters are not capped
        #[test]
        fn single_node_above_limit(size in (MAX_SINGLE_NODE_STORAGE_TB + 1)..10_000) {
            let err = validate_create_deployment_params(
                DeploymentType::SingleNode,
                "us-east-2",
                &CloudProvider::Aws,
                size,
                StorageUnit::Tb,
            )
            .unwrap_err();
            prop_assert!(err.to_string().contains("16 TB"));

            let result = validate_create_deployment_params(
                DeploymentType::Cluster,
                "us-east-2",
                &CloudProvider::Aws,
                size,
                StorageUnit::Tb,
            );
            prop_assert!(result.is_ok());
        }
    }
}
