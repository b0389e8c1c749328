//! Group-membership wire structs beyond Describe/List (api_keys 11-14).
//!
//! The façade (C8) exposes no `join_group`/`sync_group`/`heartbeat`/
//! `leave_group` methods — rebalance protocol execution stays out of
//! scope (spec §1) — but `DescribeGroups`' member decode depends on the
//! same `ConsumerProtocolMemberMetadata`/`ConsumerProtocolMemberAssignment`
//! wire shapes these produce (SPEC_FULL §10.1/§10.2), so the registry and
//! codec carry full schemas for all four.
//!
//! Grounded on `original_source/kafka/protocol/group.py`.

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupProtocol {
    pub name: String,
    pub metadata: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGroupRequest {
    pub group_id: String,
    pub session_timeout_ms: i32,
    /// Present from v1.
    pub rebalance_timeout_ms: i32,
    pub member_id: String,
    pub protocol_type: String,
    pub group_protocols: Vec<GroupProtocol>,
}

impl JoinGroupRequest {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_string(buf, &self.group_id);
        p::put_i32(buf, self.session_timeout_ms);
        if version >= 1 {
            p::put_i32(buf, self.rebalance_timeout_ms);
        }
        p::put_string(buf, &self.member_id);
        p::put_string(buf, &self.protocol_type);
        p::put_array(buf, &self.group_protocols, |buf, proto| {
            p::put_string(buf, &proto.name);
            p::put_bytes(buf, &proto.metadata);
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let group_id = p::get_string(buf, "group_id")?;
        let session_timeout_ms = p::get_i32(buf)?;
        let rebalance_timeout_ms = if version >= 1 { p::get_i32(buf)? } else { 0 };
        let member_id = p::get_string(buf, "member_id")?;
        let protocol_type = p::get_string(buf, "protocol_type")?;
        let group_protocols = p::get_array(buf, "group_protocols", |buf| {
            let name = p::get_string(buf, "protocol_name")?;
            let metadata = p::get_bytes(buf, "protocol_metadata")?;
            Ok(GroupProtocol { name, metadata })
        })?;
        Ok(JoinGroupRequest {
            group_id,
            session_timeout_ms,
            rebalance_timeout_ms,
            member_id,
            protocol_type,
            group_protocols,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGroupMember {
    pub member_id: String,
    pub member_metadata: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGroupResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub generation_id: i32,
    pub group_protocol: String,
    pub leader_id: String,
    pub member_id: String,
    pub members: Vec<JoinGroupMember>,
}

impl JoinGroupResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        if version >= 2 {
            p::put_i32(buf, self.throttle_time_ms);
        }
        p::put_i16(buf, self.error_code);
        p::put_i32(buf, self.generation_id);
        p::put_string(buf, &self.group_protocol);
        p::put_string(buf, &self.leader_id);
        p::put_string(buf, &self.member_id);
        p::put_array(buf, &self.members, |buf, m| {
            p::put_string(buf, &m.member_id);
            p::put_bytes(buf, &m.member_metadata);
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = if version >= 2 { p::get_i32(buf)? } else { 0 };
        let error_code = p::get_i16(buf)?;
        let generation_id = p::get_i32(buf)?;
        let group_protocol = p::get_string(buf, "group_protocol")?;
        let leader_id = p::get_string(buf, "leader_id")?;
        let member_id = p::get_string(buf, "member_id")?;
        let members = p::get_array(buf, "members", |buf| {
            let member_id = p::get_string(buf, "member_id")?;
            let member_metadata = p::get_bytes(buf, "member_metadata")?;
            Ok(JoinGroupMember {
                member_id,
                member_metadata,
            })
        })?;
        Ok(JoinGroupResponse {
            throttle_time_ms,
            error_code,
            generation_id,
            group_protocol,
            leader_id,
            member_id,
            members,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    pub member_id: String,
    pub member_assignment: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncGroupRequest {
    pub group_id: String,
    pub generation_id: i32,
    pub member_id: String,
    pub group_assignment: Vec<GroupAssignment>,
}

impl SyncGroupRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_string(buf, &self.group_id);
        p::put_i32(buf, self.generation_id);
        p::put_string(buf, &self.member_id);
        p::put_array(buf, &self.group_assignment, |buf, a| {
            p::put_string(buf, &a.member_id);
            p::put_bytes(buf, &a.member_assignment);
        });
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let group_id = p::get_string(buf, "group_id")?;
        let generation_id = p::get_i32(buf)?;
        let member_id = p::get_string(buf, "member_id")?;
        let group_assignment = p::get_array(buf, "group_assignment", |buf| {
            let member_id = p::get_string(buf, "member_id")?;
            let member_assignment = p::get_bytes(buf, "member_assignment")?;
            Ok(GroupAssignment {
                member_id,
                member_assignment,
            })
        })?;
        Ok(SyncGroupRequest {
            group_id,
            generation_id,
            member_id,
            group_assignment,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncGroupResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub member_assignment: Vec<u8>,
}

impl SyncGroupResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        if version >= 1 {
            p::put_i32(buf, self.throttle_time_ms);
        }
        p::put_i16(buf, self.error_code);
        p::put_bytes(buf, &self.member_assignment);
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = if version >= 1 { p::get_i32(buf)? } else { 0 };
        let error_code = p::get_i16(buf)?;
        let member_assignment = p::get_bytes(buf, "member_assignment")?;
        Ok(SyncGroupResponse {
            throttle_time_ms,
            error_code,
            member_assignment,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatRequest {
    pub group_id: String,
    pub generation_id: i32,
    pub member_id: String,
}

impl HeartbeatRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_string(buf, &self.group_id);
        p::put_i32(buf, self.generation_id);
        p::put_string(buf, &self.member_id);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        Ok(HeartbeatRequest {
            group_id: p::get_string(buf, "group_id")?,
            generation_id: p::get_i32(buf)?,
            member_id: p::get_string(buf, "member_id")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
}

impl HeartbeatResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        if version >= 1 {
            p::put_i32(buf, self.throttle_time_ms);
        }
        p::put_i16(buf, self.error_code);
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = if version >= 1 { p::get_i32(buf)? } else { 0 };
        let error_code = p::get_i16(buf)?;
        Ok(HeartbeatResponse {
            throttle_time_ms,
            error_code,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveGroupRequest {
    pub group_id: String,
    pub member_id: String,
}

impl LeaveGroupRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_string(buf, &self.group_id);
        p::put_string(buf, &self.member_id);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        Ok(LeaveGroupRequest {
            group_id: p::get_string(buf, "group_id")?,
            member_id: p::get_string(buf, "member_id")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveGroupResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
}

impl LeaveGroupResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        if version >= 1 {
            p::put_i32(buf, self.throttle_time_ms);
        }
        p::put_i16(buf, self.error_code);
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = if version >= 1 { p::get_i32(buf)? } else { 0 };
        let error_code = p::get_i16(buf)?;
        Ok(LeaveGroupResponse {
            throttle_time_ms,
            error_code,
        })
    }
}

/// `ProtocolMetadata` (SPEC_FULL §10.2): the consumer-protocol payload
/// carried inside `member_metadata`/`JoinGroup`'s `protocol_metadata`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerProtocolMemberMetadataV0 {
    pub version: i16,
    pub subscription: Vec<String>,
    pub user_data: Vec<u8>,
}

impl ConsumerProtocolMemberMetadataV0 {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i16(buf, self.version);
        p::put_array(buf, &self.subscription, |buf, s| p::put_string(buf, s));
        p::put_bytes(buf, &self.user_data);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let version = p::get_i16(buf)?;
        let subscription = p::get_array(buf, "subscription", |buf| p::get_string(buf, "topic"))?;
        let user_data = p::get_bytes(buf, "user_data")?;
        Ok(ConsumerProtocolMemberMetadataV0 {
            version,
            subscription,
            user_data,
        })
    }
}

/// `MemberAssignment` (SPEC_FULL §10.2): the consumer-protocol payload
/// carried inside `member_assignment`/`SyncGroup`'s `group_assignment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerProtocolMemberAssignmentV0 {
    pub version: i16,
    pub assignment: Vec<(String, Vec<i32>)>,
    pub user_data: Vec<u8>,
}

impl ConsumerProtocolMemberAssignmentV0 {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i16(buf, self.version);
        p::put_array(buf, &self.assignment, |buf, (topic, partitions)| {
            p::put_string(buf, topic);
            p::put_array(buf, partitions, |buf, part| p::put_i32(buf, *part));
        });
        p::put_bytes(buf, &self.user_data);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let version = p::get_i16(buf)?;
        let assignment = p::get_array(buf, "assignment", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let partitions = p::get_array(buf, "partitions", |buf| p::get_i32(buf))?;
            Ok((topic, partitions))
        })?;
        let user_data = p::get_bytes(buf, "user_data")?;
        Ok(ConsumerProtocolMemberAssignmentV0 {
            version,
            assignment,
            user_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn consumer_protocol_metadata_roundtrip() {
        let meta = ConsumerProtocolMemberMetadataV0 {
            version: 0,
            subscription: vec!["t1".to_string(), "t2".to_string()],
            user_data: vec![9, 9],
        };
        let mut buf = BytesMut::new();
        meta.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(ConsumerProtocolMemberMetadataV0::decode(&mut frozen).unwrap(), meta);
    }

    #[test]
    fn consumer_protocol_assignment_roundtrip() {
        let assignment = ConsumerProtocolMemberAssignmentV0 {
            version: 0,
            assignment: vec![("t1".to_string(), vec![0, 1])],
            user_data: vec![],
        };
        let mut buf = BytesMut::new();
        assignment.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(
            ConsumerProtocolMemberAssignmentV0::decode(&mut frozen).unwrap(),
            assignment
        );
    }

    #[test]
    fn join_group_request_roundtrip_v1_has_rebalance_timeout() {
        let req = JoinGroupRequest {
            group_id: "g".to_string(),
            session_timeout_ms: 10000,
            rebalance_timeout_ms: 20000,
            member_id: "".to_string(),
            protocol_type: "consumer".to_string(),
            group_protocols: vec![GroupProtocol {
                name: "range".to_string(),
                metadata: vec![1, 2, 3],
            }],
        };
        let mut buf = BytesMut::new();
        req.encode(1, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(JoinGroupRequest::decode(1, &mut frozen).unwrap(), req);
    }
}
