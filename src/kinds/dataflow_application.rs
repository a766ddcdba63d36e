// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Data Flow (Spark) applications.
//!
//! Applications are definitions rather than running infrastructure: they are created
//! `ACTIVE` and expose no endpoint, so no secret is published.

use super::{invalid_spec, opaque_id, DeletePolicy, ResourceKind};
use crate::constants::KIND_DATAFLOW_APPLICATION;
use crate::crd::{DataFlowApplication, DataFlowApplicationSpec, ResourceStatus};
use crate::errors::ReconcileError;
use crate::identity::ResourceId;
use crate::labels::FINALIZER_DATAFLOW_APPLICATION;
use crate::predicate::{
    list_differs, required_number_differs, required_string_differs, string_differs, tags_differ,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::lifecycle_states! {
    /// Lifecycle of a Data Flow application.
    DataFlowApplicationState {
        Active => "ACTIVE": Active,
        Inactive => "INACTIVE": Transitional,
        Deleted => "DELETED": Failed,
    }
    creating = [];
    live = [Active, Inactive];
}

const LANGUAGES: [&str; 4] = ["PYTHON", "SCALA", "JAVA", "SQL"];

/// An application as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteApplication {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    pub lifecycle_state: DataFlowApplicationState,
    pub language: String,
    pub spark_version: String,
    pub driver_shape: String,
    pub executor_shape: String,
    pub num_executors: i32,
    #[serde(default)]
    pub file_uri: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
}

/// An application list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: DataFlowApplicationState,
}

/// Body of a create application call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub language: String,
    pub spark_version: String,
    pub driver_shape: String,
    pub executor_shape: String,
    pub num_executors: i32,
    pub file_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub freeform_tags: BTreeMap<String, String>,
}

/// Body of an update application call. The language is fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationDetails {
    pub display_name: String,
    pub spark_version: String,
    pub driver_shape: String,
    pub executor_shape: String,
    pub num_executors: i32,
    pub file_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// [`ResourceKind`] implementation for [`DataFlowApplication`].
pub struct DataFlowApplicationKind;

impl ResourceKind for DataFlowApplicationKind {
    type Resource = DataFlowApplication;
    type Spec = DataFlowApplicationSpec;
    type Remote = RemoteApplication;
    type Summary = ApplicationSummary;
    type CreateDetails = CreateApplicationDetails;
    type UpdateDetails = UpdateApplicationDetails;
    type State = DataFlowApplicationState;

    const KIND: &'static str = KIND_DATAFLOW_APPLICATION;
    const FINALIZER: &'static str = FINALIZER_DATAFLOW_APPLICATION;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Swallow;
    const MATERIALIZES_SECRET: bool = false;

    fn spec(resource: &DataFlowApplication) -> &DataFlowApplicationSpec {
        &resource.spec
    }

    fn spec_mut(resource: &mut DataFlowApplication) -> &mut DataFlowApplicationSpec {
        &mut resource.spec
    }

    fn status(resource: &DataFlowApplication) -> Option<&ResourceStatus> {
        resource.status.as_ref()
    }

    fn status_mut(resource: &mut DataFlowApplication) -> &mut Option<ResourceStatus> {
        &mut resource.status
    }

    fn display_name(spec: &DataFlowApplicationSpec) -> &str {
        &spec.display_name
    }

    fn compartment_id(spec: &DataFlowApplicationSpec) -> &str {
        &spec.compartment_id
    }

    fn explicit_id(spec: &DataFlowApplicationSpec) -> Option<&str> {
        spec.id.as_deref()
    }

    fn remote_id(remote: &RemoteApplication) -> Option<ResourceId> {
        opaque_id(&remote.id)
    }

    fn remote_state(remote: &RemoteApplication) -> DataFlowApplicationState {
        remote.lifecycle_state
    }

    fn summary_id(summary: &ApplicationSummary) -> Option<ResourceId> {
        opaque_id(&summary.id)
    }

    fn summary_name(summary: &ApplicationSummary) -> &str {
        &summary.display_name
    }

    fn summary_state(summary: &ApplicationSummary) -> DataFlowApplicationState {
        summary.lifecycle_state
    }

    fn create_details(
        spec: &DataFlowApplicationSpec,
    ) -> Result<CreateApplicationDetails, ReconcileError> {
        if !LANGUAGES.contains(&spec.language.as_str()) {
            return Err(invalid_spec::<Self>(
                spec,
                format!("language must be one of {LANGUAGES:?}, got '{}'", spec.language),
            ));
        }
        if spec.num_executors < 1 {
            return Err(invalid_spec::<Self>(spec, "numExecutors must be at least 1"));
        }
        if matches!(spec.language.as_str(), "JAVA" | "SCALA")
            && spec.class_name.as_deref().is_none_or(str::is_empty)
        {
            return Err(invalid_spec::<Self>(
                spec,
                format!("className is required for {} applications", spec.language),
            ));
        }

        Ok(CreateApplicationDetails {
            compartment_id: spec.compartment_id.clone(),
            display_name: spec.display_name.clone(),
            language: spec.language.clone(),
            spark_version: spec.spark_version.clone(),
            driver_shape: spec.driver_shape.clone(),
            executor_shape: spec.executor_shape.clone(),
            num_executors: spec.num_executors,
            file_uri: spec.file_uri.clone(),
            class_name: spec.class_name.clone(),
            arguments: spec.arguments.clone().unwrap_or_default(),
            description: spec.description.clone(),
            freeform_tags: spec.freeform_tags.clone().unwrap_or_default(),
        })
    }

    fn needs_update(spec: &DataFlowApplicationSpec, remote: &RemoteApplication) -> bool {
        required_string_differs(&spec.display_name, &remote.display_name)
            || required_string_differs(&spec.spark_version, &remote.spark_version)
            || required_string_differs(&spec.driver_shape, &remote.driver_shape)
            || required_string_differs(&spec.executor_shape, &remote.executor_shape)
            || required_number_differs(spec.num_executors, remote.num_executors)
            || string_differs(Some(spec.file_uri.as_str()), remote.file_uri.as_deref())
            || string_differs(spec.class_name.as_deref(), remote.class_name.as_deref())
            || list_differs(spec.arguments.as_deref(), &remote.arguments)
            || string_differs(spec.description.as_deref(), remote.description.as_deref())
            || tags_differ(spec.freeform_tags.as_ref(), &remote.freeform_tags)
    }

    fn update_details(spec: &DataFlowApplicationSpec) -> UpdateApplicationDetails {
        UpdateApplicationDetails {
            display_name: spec.display_name.clone(),
            spark_version: spec.spark_version.clone(),
            driver_shape: spec.driver_shape.clone(),
            executor_shape: spec.executor_shape.clone(),
            num_executors: spec.num_executors,
            file_uri: spec.file_uri.clone(),
            class_name: spec.class_name.clone(),
            arguments: spec.arguments.clone(),
            description: spec.description.clone(),
            freeform_tags: spec.freeform_tags.clone(),
        }
    }
}

#[cfg(test)]
#[path = "dataflow_application_tests.rs"]
mod dataflow_application_tests;
