//! `DescribeGroups` (api_key=15), versions 0-3.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `DescribeGroupsRequest_v{0..3}` / `DescribeGroupsResponse_v{0..3}`.

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;
use crate::types::AclOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeGroupsRequest {
    pub groups: Vec<String>,
    /// Present from v3 (spec §4.3 feature gate, §9.5 forwarding fix).
    pub include_authorized_operations: bool,
}

impl DescribeGroupsRequest {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_array(buf, &self.groups, |buf, g| p::put_string(buf, g));
        if version >= 3 {
            p::put_bool(buf, self.include_authorized_operations);
        }
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let groups = p::get_array(buf, "groups", |buf| p::get_string(buf, "group"))?;
        let include_authorized_operations = if version >= 3 { p::get_bool(buf)? } else { false };
        Ok(DescribeGroupsRequest {
            groups,
            include_authorized_operations,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub member_id: String,
    pub client_id: String,
    pub client_host: String,
    pub member_metadata: Vec<u8>,
    pub member_assignment: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDescription {
    pub error_code: i16,
    pub group: String,
    pub state: String,
    pub protocol_type: String,
    pub protocol: String,
    pub members: Vec<GroupMember>,
    /// Present from v3, decoded from the wire `BitField` into the
    /// ordered set of `AclOperation`s whose bit is set (spec §4.1).
    pub authorized_operations: Vec<AclOperation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeGroupsResponse {
    /// Present from v1.
    pub throttle_time_ms: i32,
    pub groups: Vec<GroupDescription>,
}

/// Bit `i` of the `authorized_operations` field names the `AclOperation`
/// whose wire value equals `i` (the standard Kafka ACL bit-vocabulary).
fn acl_operation_vocabulary() -> Vec<(u8, AclOperation)> {
    (0u8..=12).map(|bit| (bit, AclOperation::from_wire(bit as i8))).collect()
}

impl DescribeGroupsResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        if version >= 1 {
            p::put_i32(buf, self.throttle_time_ms);
        }
        p::put_array(buf, &self.groups, |buf, g| {
            p::put_i16(buf, g.error_code);
            p::put_string(buf, &g.group);
            p::put_string(buf, &g.state);
            p::put_string(buf, &g.protocol_type);
            p::put_string(buf, &g.protocol);
            p::put_array(buf, &g.members, |buf, m| {
                p::put_string(buf, &m.member_id);
                p::put_string(buf, &m.client_id);
                p::put_string(buf, &m.client_host);
                p::put_bytes(buf, &m.member_metadata);
                p::put_bytes(buf, &m.member_assignment);
            });
            if version >= 3 {
                let vocab = acl_operation_vocabulary();
                let bits = p::encode_bitfield(&g.authorized_operations, &vocab);
                p::put_i32(buf, bits);
            }
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = if version >= 1 { p::get_i32(buf)? } else { 0 };
        let groups = p::get_array(buf, "groups", |buf| {
            let error_code = p::get_i16(buf)?;
            let group = p::get_string(buf, "group")?;
            let state = p::get_string(buf, "state")?;
            let protocol_type = p::get_string(buf, "protocol_type")?;
            let protocol = p::get_string(buf, "protocol")?;
            let members = p::get_array(buf, "members", |buf| {
                let member_id = p::get_string(buf, "member_id")?;
                let client_id = p::get_string(buf, "client_id")?;
                let client_host = p::get_string(buf, "client_host")?;
                let member_metadata = p::get_bytes(buf, "member_metadata")?;
                let member_assignment = p::get_bytes(buf, "member_assignment")?;
                Ok(GroupMember {
                    member_id,
                    client_id,
                    client_host,
                    member_metadata,
                    member_assignment,
                })
            })?;
            let authorized_operations = if version >= 3 {
                let bits = p::get_i32(buf)?;
                p::decode_bitfield(bits, &acl_operation_vocabulary())
            } else {
                Vec::new()
            };
            Ok(GroupDescription {
                error_code,
                group,
                state,
                protocol_type,
                protocol,
                members,
                authorized_operations,
            })
        })?;
        Ok(DescribeGroupsResponse {
            throttle_time_ms,
            groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn sample_group(authorized_operations: Vec<AclOperation>) -> GroupDescription {
        GroupDescription {
            error_code: 0,
            group: "g1".to_string(),
            state: "Stable".to_string(),
            protocol_type: "consumer".to_string(),
            protocol: "range".to_string(),
            members: vec![GroupMember {
                member_id: "m1".to_string(),
                client_id: "c1".to_string(),
                client_host: "/127.0.0.1".to_string(),
                member_metadata: vec![1, 2],
                member_assignment: vec![3, 4],
            }],
            authorized_operations,
        }
    }

    #[test]
    fn response_roundtrip_v0_ignores_authorized_operations() {
        let resp = DescribeGroupsResponse {
            throttle_time_ms: 0,
            groups: vec![sample_group(vec![])],
        };
        let mut buf = BytesMut::new();
        resp.encode(0, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = DescribeGroupsResponse::decode(0, &mut frozen).unwrap();
        assert_eq!(decoded.groups[0].group, "g1");
        assert!(decoded.groups[0].authorized_operations.is_empty());
    }

    #[test]
    fn response_roundtrip_v3_decodes_bitfield() {
        let resp = DescribeGroupsResponse {
            throttle_time_ms: 5,
            groups: vec![sample_group(vec![AclOperation::Read, AclOperation::Describe])],
        };
        let mut buf = BytesMut::new();
        resp.encode(3, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = DescribeGroupsResponse::decode(3, &mut frozen).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn request_roundtrip_forwards_include_authorized_operations() {
        let req = DescribeGroupsRequest {
            groups: vec!["g1".to_string()],
            include_authorized_operations: true,
        };
        let mut buf = BytesMut::new();
        req.encode(3, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DescribeGroupsRequest::decode(3, &mut frozen).unwrap(), req);
    }
}
