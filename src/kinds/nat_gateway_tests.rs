// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `nat_gateway.rs`

#[cfg(test)]
mod tests {
    use crate::crd::NatGatewaySpec;
    use crate::kinds::nat_gateway::*;
    use crate::kinds::{PollStrategy, ResourceKind};
    use crate::lifecycle::{map_lifecycle, LifecycleState};
    use std::collections::BTreeMap;

    fn spec() -> NatGatewaySpec {
        NatGatewaySpec {
            id: None,
            compartment_id: "ocid1.compartment.oc1..net".to_string(),
            display_name: "egress".to_string(),
            vcn_id: "ocid1.vcn.oc1..main".to_string(),
            block_traffic: None,
            public_ip_id: None,
            freeform_tags: None,
        }
    }

    fn remote() -> RemoteNatGateway {
        RemoteNatGateway {
            id: "ocid1.natgateway.oc1..egress".to_string(),
            compartment_id: "ocid1.compartment.oc1..net".to_string(),
            display_name: "egress".to_string(),
            vcn_id: "ocid1.vcn.oc1..main".to_string(),
            lifecycle_state: NatGatewayState::Available,
            block_traffic: false,
            nat_ip: Some("203.0.113.10".to_string()),
            public_ip_id: None,
            freeform_tags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_polls_at_fixed_interval() {
        assert_eq!(NatGatewayKind::CREATE_POLL, Some(PollStrategy::Fixed));
    }

    #[test]
    fn test_provisioning_is_creating() {
        assert!(NatGatewayState::Provisioning.is_creating());
        assert!(!NatGatewayState::Terminating.is_creating());
    }

    #[test]
    fn test_available_is_active_and_terminated_is_failed() {
        assert!(map_lifecycle(NatGatewayState::Available).is_successful);
        let terminated = map_lifecycle(NatGatewayState::Terminated);
        assert!(!terminated.is_successful);
        assert!(!terminated.should_requeue);
    }

    #[test]
    fn test_block_traffic_change_needs_update() {
        let mut spec = spec();
        assert!(!NatGatewayKind::needs_update(&spec, &remote()));

        spec.block_traffic = Some(true);
        assert!(NatGatewayKind::needs_update(&spec, &remote()));

        spec.block_traffic = Some(false);
        assert!(!NatGatewayKind::needs_update(&spec, &remote()));
    }

    #[test]
    fn test_public_ip_is_create_only() {
        let mut spec = spec();
        spec.public_ip_id = Some("ocid1.publicip.oc1..reserved".to_string());
        assert!(!NatGatewayKind::needs_update(&spec, &remote()));
    }

    #[test]
    fn test_credentials_publish_nat_ip() {
        let secret = NatGatewayKind::credentials(&spec(), &remote());
        assert_eq!(secret.get(SECRET_KEY_NAT_IP), Some(&b"203.0.113.10".to_vec()));
    }
}
