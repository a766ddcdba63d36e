// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `dataflow_application.rs`

#[cfg(test)]
mod tests {
    use crate::crd::DataFlowApplicationSpec;
    use crate::kinds::dataflow_application::*;
    use crate::kinds::ResourceKind;
    use crate::lifecycle::{LifecycleClass, LifecycleState};
    use std::collections::BTreeMap;

    fn spec() -> DataFlowApplicationSpec {
        DataFlowApplicationSpec {
            id: None,
            compartment_id: "ocid1.compartment.oc1..analytics".to_string(),
            display_name: "nightly-rollup".to_string(),
            language: "PYTHON".to_string(),
            spark_version: "3.2.1".to_string(),
            driver_shape: "VM.Standard.E4.Flex".to_string(),
            executor_shape: "VM.Standard.E4.Flex".to_string(),
            num_executors: 2,
            file_uri: "oci://jobs@axaxnpcrorw5/rollup.py".to_string(),
            class_name: None,
            arguments: None,
            description: None,
            freeform_tags: None,
        }
    }

    fn remote() -> RemoteApplication {
        RemoteApplication {
            id: "ocid1.dataflowapplication.oc1..rollup".to_string(),
            compartment_id: "ocid1.compartment.oc1..analytics".to_string(),
            display_name: "nightly-rollup".to_string(),
            lifecycle_state: DataFlowApplicationState::Active,
            language: "PYTHON".to_string(),
            spark_version: "3.2.1".to_string(),
            driver_shape: "VM.Standard.E4.Flex".to_string(),
            executor_shape: "VM.Standard.E4.Flex".to_string(),
            num_executors: 2,
            file_uri: Some("oci://jobs@axaxnpcrorw5/rollup.py".to_string()),
            class_name: None,
            arguments: vec![],
            description: None,
            freeform_tags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_no_secret_is_published() {
        assert!(!DataFlowApplicationKind::MATERIALIZES_SECRET);
        assert!(DataFlowApplicationKind::credentials(&spec(), &remote()).is_empty());
    }

    #[test]
    fn test_deleted_is_failed() {
        assert_eq!(
            DataFlowApplicationState::Deleted.class(),
            LifecycleClass::Failed
        );
        assert!(!DataFlowApplicationState::Deleted.is_live());
        assert!(DataFlowApplicationState::ALL
            .iter()
            .all(|state| !state.is_creating()));
    }

    #[test]
    fn test_executor_count_change_needs_update() {
        let mut spec = spec();
        assert!(!DataFlowApplicationKind::needs_update(&spec, &remote()));

        spec.num_executors = 4;
        assert!(DataFlowApplicationKind::needs_update(&spec, &remote()));
    }

    #[test]
    fn test_arguments_change_needs_update() {
        let mut spec = spec();
        spec.arguments = Some(vec!["--date".to_string(), "2025-01-01".to_string()]);
        assert!(DataFlowApplicationKind::needs_update(&spec, &remote()));
    }

    #[test]
    fn test_language_is_create_only() {
        let mut spec = spec();
        spec.language = "SQL".to_string();
        assert!(!DataFlowApplicationKind::needs_update(&spec, &remote()));
    }

    #[test]
    fn test_create_details_requires_class_for_jvm() {
        let mut spec = spec();
        spec.language = "SCALA".to_string();
        let err = DataFlowApplicationKind::create_details(&spec).unwrap_err();
        assert!(err.to_string().contains("className"));

        spec.class_name = Some("com.example.Rollup".to_string());
        assert!(DataFlowApplicationKind::create_details(&spec).is_ok());
    }

    #[test]
    fn test_create_details_rejects_unknown_language() {
        let mut spec = spec();
        spec.language = "R".to_string();
        assert!(DataFlowApplicationKind::create_details(&spec).is_err());
    }
}
