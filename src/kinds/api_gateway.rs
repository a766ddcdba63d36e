// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! API gateways.
//!
//! The gateway hostname is published under `hostname` once the gateway is active.

use super::{credential_map, invalid_spec, opaque_id, DeletePolicy, ResourceKind};
use crate::constants::KIND_API_GATEWAY;
use crate::crd::{ApiGateway, ApiGatewaySpec, ResourceStatus};
use crate::errors::ReconcileError;
use crate::identity::ResourceId;
use crate::labels::FINALIZER_API_GATEWAY;
use crate::predicate::{list_differs, required_string_differs, string_differs, tags_differ};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::lifecycle_states! {
    /// Lifecycle of an API gateway.
    ApiGatewayState {
        Creating => "CREATING": Transitional,
        Active => "ACTIVE": Active,
        Updating => "UPDATING": Transitional,
        Deleting => "DELETING": Transitional,
        Deleted => "DELETED": Failed,
        Failed => "FAILED": Failed,
    }
    creating = [Creating];
    live = [Creating, Active, Updating];
}

/// Secret key holding the gateway hostname.
pub const SECRET_KEY_HOSTNAME: &str = "hostname";

const ENDPOINT_TYPES: [&str; 2] = ["PUBLIC", "PRIVATE"];

/// An API gateway as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteApiGateway {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    pub lifecycle_state: ApiGatewayState,
    pub endpoint_type: String,
    pub subnet_id: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub network_security_group_ids: Vec<String>,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
}

/// An API gateway list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewaySummary {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: ApiGatewayState,
}

/// Body of a create gateway call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatewayDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub endpoint_type: String,
    pub subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network_security_group_ids: Vec<String>,
    pub freeform_tags: BTreeMap<String, String>,
}

/// Body of an update gateway call. Endpoint type and subnet are fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGatewayDetails {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_security_group_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// [`ResourceKind`] implementation for [`ApiGateway`].
pub struct ApiGatewayKind;

impl ResourceKind for ApiGatewayKind {
    type Resource = ApiGateway;
    type Spec = ApiGatewaySpec;
    type Remote = RemoteApiGateway;
    type Summary = ApiGatewaySummary;
    type CreateDetails = CreateGatewayDetails;
    type UpdateDetails = UpdateGatewayDetails;
    type State = ApiGatewayState;

    const KIND: &'static str = KIND_API_GATEWAY;
    const FINALIZER: &'static str = FINALIZER_API_GATEWAY;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Propagate;

    fn spec(resource: &ApiGateway) -> &ApiGatewaySpec {
        &resource.spec
    }

    fn spec_mut(resource: &mut ApiGateway) -> &mut ApiGatewaySpec {
        &mut resource.spec
    }

    fn status(resource: &ApiGateway) -> Option<&ResourceStatus> {
        resource.status.as_ref()
    }

    fn status_mut(resource: &mut ApiGateway) -> &mut Option<ResourceStatus> {
        &mut resource.status
    }

    fn display_name(spec: &ApiGatewaySpec) -> &str {
        &spec.display_name
    }

    fn compartment_id(spec: &ApiGatewaySpec) -> &str {
        &spec.compartment_id
    }

    fn explicit_id(spec: &ApiGatewaySpec) -> Option<&str> {
        spec.id.as_deref()
    }

    fn remote_id(remote: &RemoteApiGateway) -> Option<ResourceId> {
        opaque_id(&remote.id)
    }

    fn remote_state(remote: &RemoteApiGateway) -> ApiGatewayState {
        remote.lifecycle_state
    }

    fn summary_id(summary: &ApiGatewaySummary) -> Option<ResourceId> {
        opaque_id(&summary.id)
    }

    fn summary_name(summary: &ApiGatewaySummary) -> &str {
        &summary.display_name
    }

    fn summary_state(summary: &ApiGatewaySummary) -> ApiGatewayState {
        summary.lifecycle_state
    }

    fn create_details(spec: &ApiGatewaySpec) -> Result<CreateGatewayDetails, ReconcileError> {
        if !ENDPOINT_TYPES.contains(&spec.endpoint_type.as_str()) {
            return Err(invalid_spec::<Self>(
                spec,
                format!(
                    "endpointType must be one of {ENDPOINT_TYPES:?}, got '{}'",
                    spec.endpoint_type
                ),
            ));
        }
        if spec.subnet_id.is_empty() {
            return Err(invalid_spec::<Self>(spec, "subnetId is required"));
        }

        Ok(CreateGatewayDetails {
            compartment_id: spec.compartment_id.clone(),
            display_name: spec.display_name.clone(),
            endpoint_type: spec.endpoint_type.clone(),
            subnet_id: spec.subnet_id.clone(),
            certificate_id: spec.certificate_id.clone(),
            network_security_group_ids: spec.network_security_group_ids.clone().unwrap_or_default(),
            freeform_tags: spec.freeform_tags.clone().unwrap_or_default(),
        })
    }

    fn needs_update(spec: &ApiGatewaySpec, remote: &RemoteApiGateway) -> bool {
        required_string_differs(&spec.display_name, &remote.display_name)
            || string_differs(spec.certificate_id.as_deref(), remote.certificate_id.as_deref())
            || list_differs(
                spec.network_security_group_ids.as_deref(),
                &remote.network_security_group_ids,
            )
            || tags_differ(spec.freeform_tags.as_ref(), &remote.freeform_tags)
    }

    fn update_details(spec: &ApiGatewaySpec) -> UpdateGatewayDetails {
        UpdateGatewayDetails {
            display_name: spec.display_name.clone(),
            certificate_id: spec.certificate_id.clone(),
            network_security_group_ids: spec.network_security_group_ids.clone(),
            freeform_tags: spec.freeform_tags.clone(),
        }
    }

    fn credentials(_spec: &ApiGatewaySpec, remote: &RemoteApiGateway) -> BTreeMap<String, Vec<u8>> {
        credential_map([(SECRET_KEY_HOSTNAME, remote.hostname.as_deref())])
    }
}

#[cfg(test)]
#[path = "api_gateway_tests.rs"]
mod api_gateway_tests;
