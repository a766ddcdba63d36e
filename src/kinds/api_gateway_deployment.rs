// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! API gateway deployments.
//!
//! Deployments usually become active within seconds, so the create pass polls with an
//! exponential backoff instead of waiting for the next requeue. The deployment endpoint
//! is published under `endpoint`.

use super::{
    credential_map, invalid_spec, opaque_id, DeletePolicy, PollStrategy, ResourceKind,
};
use crate::constants::KIND_API_GATEWAY_DEPLOYMENT;
use crate::crd::{ApiGatewayDeployment, ApiGatewayDeploymentSpec, DeploymentRoute, ResourceStatus};
use crate::errors::ReconcileError;
use crate::identity::ResourceId;
use crate::labels::FINALIZER_API_GATEWAY_DEPLOYMENT;
use crate::predicate::{list_differs, required_string_differs, tags_differ};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::lifecycle_states! {
    /// Lifecycle of an API deployment.
    DeploymentState {
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

/// Secret key holding the deployment endpoint.
pub const SECRET_KEY_ENDPOINT: &str = "endpoint";

const BACKEND_HTTP: &str = "HTTP_BACKEND";
const BACKEND_STOCK_RESPONSE: &str = "STOCK_RESPONSE_BACKEND";

/// Route table of a deployment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpecification {
    #[serde(default)]
    pub routes: Vec<DeploymentRoute>,
}

/// An API deployment as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDeployment {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    pub gateway_id: String,
    pub path_prefix: String,
    pub lifecycle_state: DeploymentState,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub specification: ApiSpecification,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
}

/// An API deployment list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: DeploymentState,
}

/// Body of a create deployment call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub gateway_id: String,
    pub path_prefix: String,
    pub specification: ApiSpecification,
    pub freeform_tags: BTreeMap<String, String>,
}

/// Body of an update deployment call. Gateway and path prefix are fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeploymentDetails {
    pub display_name: String,
    pub specification: ApiSpecification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

fn validate_routes(spec: &ApiGatewayDeploymentSpec) -> Result<(), ReconcileError> {
    if !spec.path_prefix.starts_with('/') {
        return Err(invalid_spec::<ApiGatewayDeploymentKind>(
            spec,
            format!("pathPrefix '{}' must start with '/'", spec.path_prefix),
        ));
    }
    for route in &spec.routes {
        if !route.path.starts_with('/') {
            return Err(invalid_spec::<ApiGatewayDeploymentKind>(
                spec,
                format!("route path '{}' must start with '/'", route.path),
            ));
        }
        match route.backend.r#type.as_str() {
            BACKEND_HTTP if route.backend.url.as_deref().is_none_or(str::is_empty) => {
                return Err(invalid_spec::<ApiGatewayDeploymentKind>(
                    spec,
                    format!("route '{}' uses {BACKEND_HTTP} without a url", route.path),
                ));
            }
            BACKEND_HTTP | BACKEND_STOCK_RESPONSE => {}
            other => {
                return Err(invalid_spec::<ApiGatewayDeploymentKind>(
                    spec,
                    format!("route '{}' has unsupported backend type '{other}'", route.path),
                ));
            }
        }
    }
    Ok(())
}

/// [`ResourceKind`] implementation for [`ApiGatewayDeployment`].
pub struct ApiGatewayDeploymentKind;

impl ResourceKind for ApiGatewayDeploymentKind {
    type Resource = ApiGatewayDeployment;
    type Spec = ApiGatewayDeploymentSpec;
    type Remote = RemoteDeployment;
    type Summary = DeploymentSummary;
    type CreateDetails = CreateDeploymentDetails;
    type UpdateDetails = UpdateDeploymentDetails;
    type State = DeploymentState;

    const KIND: &'static str = KIND_API_GATEWAY_DEPLOYMENT;
    const FINALIZER: &'static str = FINALIZER_API_GATEWAY_DEPLOYMENT;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Swallow;
    const CREATE_POLL: Option<PollStrategy> = Some(PollStrategy::Exponential);

    fn spec(resource: &ApiGatewayDeployment) -> &ApiGatewayDeploymentSpec {
        &resource.spec
    }

    fn spec_mut(resource: &mut ApiGatewayDeployment) -> &mut ApiGatewayDeploymentSpec {
        &mut resource.spec
    }

    fn status(resource: &ApiGatewayDeployment) -> Option<&ResourceStatus> {
        resource.status.as_ref()
    }

    fn status_mut(resource: &mut ApiGatewayDeployment) -> &mut Option<ResourceStatus> {
        &mut resource.status
    }

    fn display_name(spec: &ApiGatewayDeploymentSpec) -> &str {
        &spec.display_name
    }

    fn compartment_id(spec: &ApiGatewayDeploymentSpec) -> &str {
        &spec.compartment_id
    }

    fn explicit_id(spec: &ApiGatewayDeploymentSpec) -> Option<&str> {
        spec.id.as_deref()
    }

    fn remote_id(remote: &RemoteDeployment) -> Option<ResourceId> {
        opaque_id(&remote.id)
    }

    fn remote_state(remote: &RemoteDeployment) -> DeploymentState {
        remote.lifecycle_state
    }

    fn summary_id(summary: &DeploymentSummary) -> Option<ResourceId> {
        opaque_id(&summary.id)
    }

    fn summary_name(summary: &DeploymentSummary) -> &str {
        &summary.display_name
    }

    fn summary_state(summary: &DeploymentSummary) -> DeploymentState {
        summary.lifecycle_state
    }

    fn create_details(
        spec: &ApiGatewayDeploymentSpec,
    ) -> Result<CreateDeploymentDetails, ReconcileError> {
        if spec.gateway_id.is_empty() {
            return Err(invalid_spec::<Self>(spec, "gatewayId is required"));
        }
        validate_routes(spec)?;

        Ok(CreateDeploymentDetails {
            compartment_id: spec.compartment_id.clone(),
            display_name: spec.display_name.clone(),
            gateway_id: spec.gateway_id.clone(),
            path_prefix: spec.path_prefix.clone(),
            specification: ApiSpecification {
                routes: spec.routes.clone(),
            },
            freeform_tags: spec.freeform_tags.clone().unwrap_or_default(),
        })
    }

    fn needs_update(spec: &ApiGatewayDeploymentSpec, remote: &RemoteDeployment) -> bool {
        required_string_differs(&spec.display_name, &remote.display_name)
            || list_differs(Some(spec.routes.as_slice()), &remote.specification.routes)
            || tags_differ(spec.freeform_tags.as_ref(), &remote.freeform_tags)
    }

    fn update_details(spec: &ApiGatewayDeploymentSpec) -> UpdateDeploymentDetails {
        UpdateDeploymentDetails {
            display_name: spec.display_name.clone(),
            specification: ApiSpecification {
                routes: spec.routes.clone(),
            },
            freeform_tags: spec.freeform_tags.clone(),
        }
    }

    fn credentials(
        _spec: &ApiGatewayDeploymentSpec,
        remote: &RemoteDeployment,
    ) -> BTreeMap<String, Vec<u8>> {
        credential_map([(SECRET_KEY_ENDPOINT, remote.endpoint.as_deref())])
    }
}

#[cfg(test)]
#[path = "api_gateway_deployment_tests.rs"]
mod api_gateway_deployment_tests;
