// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! NAT gateways.
//!
//! Provisioning takes a few seconds, so the create pass polls at a fixed interval. The
//! gateway's public IP is published under `natIp`.

use super::{
    credential_map, invalid_spec, opaque_id, DeletePolicy, PollStrategy, ResourceKind,
};
use crate::constants::KIND_NAT_GATEWAY;
use crate::crd::{NatGateway, NatGatewaySpec, ResourceStatus};
use crate::errors::ReconcileError;
use crate::identity::ResourceId;
use crate::labels::FINALIZER_NAT_GATEWAY;
use crate::predicate::{flag_differs, required_string_differs, tags_differ};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::lifecycle_states! {
    /// Lifecycle of a NAT gateway.
    NatGatewayState {
        Provisioning => "PROVISIONING": Transitional,
        Available => "AVAILABLE": Active,
        Terminating => "TERMINATING": Transitional,
        Terminated => "TERMINATED": Failed,
    }
    creating = [Provisioning];
    live = [Provisioning, Available];
}

/// Secret key holding the gateway public IP.
pub const SECRET_KEY_NAT_IP: &str = "natIp";

/// A NAT gateway as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteNatGateway {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    pub vcn_id: String,
    pub lifecycle_state: NatGatewayState,
    #[serde(default)]
    pub block_traffic: bool,
    #[serde(default)]
    pub nat_ip: Option<String>,
    #[serde(default)]
    pub public_ip_id: Option<String>,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
}

/// A NAT gateway list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatGatewaySummary {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: NatGatewayState,
}

/// Body of a create NAT gateway call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNatGatewayDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub vcn_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_traffic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_id: Option<String>,
    pub freeform_tags: BTreeMap<String, String>,
}

/// Body of an update NAT gateway call. VCN and public IP are fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNatGatewayDetails {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_traffic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// [`ResourceKind`] implementation for [`NatGateway`].
pub struct NatGatewayKind;

impl ResourceKind for NatGatewayKind {
    type Resource = NatGateway;
    type Spec = NatGatewaySpec;
    type Remote = RemoteNatGateway;
    type Summary = NatGatewaySummary;
    type CreateDetails = CreateNatGatewayDetails;
    type UpdateDetails = UpdateNatGatewayDetails;
    type State = NatGatewayState;

    const KIND: &'static str = KIND_NAT_GATEWAY;
    const FINALIZER: &'static str = FINALIZER_NAT_GATEWAY;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Propagate;
    const CREATE_POLL: Option<PollStrategy> = Some(PollStrategy::Fixed);

    fn spec(resource: &NatGateway) -> &NatGatewaySpec {
        &resource.spec
    }

    fn spec_mut(resource: &mut NatGateway) -> &mut NatGatewaySpec {
        &mut resource.spec
    }

    fn status(resource: &NatGateway) -> Option<&ResourceStatus> {
        resource.status.as_ref()
    }

    fn status_mut(resource: &mut NatGateway) -> &mut Option<ResourceStatus> {
        &mut resource.status
    }

    fn display_name(spec: &NatGatewaySpec) -> &str {
        &spec.display_name
    }

    fn compartment_id(spec: &NatGatewaySpec) -> &str {
        &spec.compartment_id
    }

    fn explicit_id(spec: &NatGatewaySpec) -> Option<&str> {
        spec.id.as_deref()
    }

    fn remote_id(remote: &RemoteNatGateway) -> Option<ResourceId> {
        opaque_id(&remote.id)
    }

    fn remote_state(remote: &RemoteNatGateway) -> NatGatewayState {
        remote.lifecycle_state
    }

    fn summary_id(summary: &NatGatewaySummary) -> Option<ResourceId> {
        opaque_id(&summary.id)
    }

    fn summary_name(summary: &NatGatewaySummary) -> &str {
        &summary.display_name
    }

    fn summary_state(summary: &NatGatewaySummary) -> NatGatewayState {
        summary.lifecycle_state
    }

    fn create_details(spec: &NatGatewaySpec) -> Result<CreateNatGatewayDetails, ReconcileError> {
        if spec.vcn_id.is_empty() {
            return Err(invalid_spec::<Self>(spec, "vcnId is required"));
        }

        Ok(CreateNatGatewayDetails {
            compartment_id: spec.compartment_id.clone(),
            display_name: spec.display_name.clone(),
            vcn_id: spec.vcn_id.clone(),
            block_traffic: spec.block_traffic,
            public_ip_id: spec.public_ip_id.clone(),
            freeform_tags: spec.freeform_tags.clone().unwrap_or_default(),
        })
    }

    fn needs_update(spec: &NatGatewaySpec, remote: &RemoteNatGateway) -> bool {
        required_string_differs(&spec.display_name, &remote.display_name)
            || flag_differs(spec.block_traffic, remote.block_traffic)
            || tags_differ(spec.freeform_tags.as_ref(), &remote.freeform_tags)
    }

    fn update_details(spec: &NatGatewaySpec) -> UpdateNatGatewayDetails {
        UpdateNatGatewayDetails {
            display_name: spec.display_name.clone(),
            block_traffic: spec.block_traffic,
            freeform_tags: spec.freeform_tags.clone(),
        }
    }

    fn credentials(_spec: &NatGatewaySpec, remote: &RemoteNatGateway) -> BTreeMap<String, Vec<u8>> {
        credential_map([(SECRET_KEY_NAT_IP, remote.nat_ip.as_deref())])
    }
}

#[cfg(test)]
#[path = "nat_gateway_tests.rs"]
mod nat_gateway_tests;
