//! `DeleteAcls` (api_key=31), versions 0-1.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `DeleteAclsRequest_v{0,1}` / `DeleteAclsResponse_v{0,1}`. v0's matched
//! ACL tuple lacks `resource_pattern_type`; the façade fills it with
//! `LITERAL` on decode, matching `describe_acls` (spec §4.5 DeleteAcls).

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;
use crate::types::{AclOperation, AclPermissionType, PatternType, ResourceType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclFilterWire {
    pub resource_type: ResourceType,
    pub resource_name: Option<String>,
    /// Present from v1.
    pub resource_pattern_type_filter: PatternType,
    pub principal: Option<String>,
    pub host: Option<String>,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAclsRequest {
    pub filters: Vec<AclFilterWire>,
}

impl DeleteAclsRequest {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_array(buf, &self.filters, |buf, f| {
            p::put_i8(buf, f.resource_type.wire_value());
            p::put_nullable_string(buf, f.resource_name.as_deref());
            if version >= 1 {
                p::put_i8(buf, f.resource_pattern_type_filter.wire_value());
            }
            p::put_nullable_string(buf, f.principal.as_deref());
            p::put_nullable_string(buf, f.host.as_deref());
            p::put_i8(buf, f.operation.wire_value());
            p::put_i8(buf, f.permission_type.wire_value());
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let filters = p::get_array(buf, "filters", |buf| {
            let resource_type = ResourceType::from_wire(p::get_i8(buf)?);
            let resource_name = p::get_nullable_string(buf, "resource_name")?;
            let resource_pattern_type_filter = if version >= 1 {
                PatternType::from_wire(p::get_i8(buf)?)
            } else {
                PatternType::Literal
            };
            let principal = p::get_nullable_string(buf, "principal")?;
            let host = p::get_nullable_string(buf, "host")?;
            let operation = AclOperation::from_wire(p::get_i8(buf)?);
            let permission_type = AclPermissionType::from_wire(p::get_i8(buf)?);
            Ok(AclFilterWire {
                resource_type,
                resource_name,
                resource_pattern_type_filter,
                principal,
                host,
                operation,
                permission_type,
            })
        })?;
        Ok(DeleteAclsRequest { filters })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingAcl {
    pub error_code: i16,
    pub error_message: Option<String>,
    pub resource_type: ResourceType,
    pub resource_name: String,
    /// Present from v1; filled with `Literal` when decoding v0.
    pub resource_pattern_type: PatternType,
    pub principal: String,
    pub host: String,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAclsFilterResult {
    pub error_code: i16,
    pub error_message: Option<String>,
    pub matching_acls: Vec<MatchingAcl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAclsResponse {
    pub throttle_time_ms: i32,
    pub filter_responses: Vec<DeleteAclsFilterResult>,
}

impl DeleteAclsResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_array(buf, &self.filter_responses, |buf, fr| {
            p::put_i16(buf, fr.error_code);
            p::put_nullable_string(buf, fr.error_message.as_deref());
            p::put_array(buf, &fr.matching_acls, |buf, m| {
                p::put_i16(buf, m.error_code);
                p::put_nullable_string(buf, m.error_message.as_deref());
                p::put_i8(buf, m.resource_type.wire_value());
                p::put_string(buf, &m.resource_name);
                if version >= 1 {
                    p::put_i8(buf, m.resource_pattern_type.wire_value());
                }
                p::put_string(buf, &m.principal);
                p::put_string(buf, &m.host);
                p::put_i8(buf, m.operation.wire_value());
                p::put_i8(buf, m.permission_type.wire_value());
            });
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let filter_responses = p::get_array(buf, "filter_responses", |buf| {
            let error_code = p::get_i16(buf)?;
            let error_message = p::get_nullable_string(buf, "error_message")?;
            let matching_acls = p::get_array(buf, "matching_acls", |buf| {
                let error_code = p::get_i16(buf)?;
                let error_message = p::get_nullable_string(buf, "error_message")?;
                let resource_type = ResourceType::from_wire(p::get_i8(buf)?);
                let resource_name = p::get_string(buf, "resource_name")?;
                let resource_pattern_type = if version >= 1 {
                    PatternType::from_wire(p::get_i8(buf)?)
                } else {
                    PatternType::Literal
                };
                let principal = p::get_string(buf, "principal")?;
                let host = p::get_string(buf, "host")?;
                let operation = AclOperation::from_wire(p::get_i8(buf)?);
                let permission_type = AclPermissionType::from_wire(p::get_i8(buf)?);
                Ok(MatchingAcl {
                    error_code,
                    error_message,
                    resource_type,
                    resource_name,
                    resource_pattern_type,
                    principal,
                    host,
                    operation,
                    permission_type,
                })
            })?;
            Ok(DeleteAclsFilterResult {
                error_code,
                error_message,
                matching_acls,
            })
        })?;
        Ok(DeleteAclsResponse {
            throttle_time_ms,
            filter_responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn v0_matching_acl_gets_literal_pattern_type() {
        let resp = DeleteAclsResponse {
            throttle_time_ms: 0,
            filter_responses: vec![DeleteAclsFilterResult {
                error_code: 0,
                error_message: None,
                matching_acls: vec![MatchingAcl {
                    error_code: 0,
                    error_message: None,
                    resource_type: ResourceType::Topic,
                    resource_name: "t".to_string(),
                    resource_pattern_type: PatternType::Literal,
                    principal: "User:a".to_string(),
                    host: "*".to_string(),
                    operation: AclOperation::Read,
                    permission_type: AclPermissionType::Allow,
                }],
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(0, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = DeleteAclsResponse::decode(0, &mut frozen).unwrap();
        assert_eq!(
            decoded.filter_responses[0].matching_acls[0].resource_pattern_type,
            PatternType::Literal
        );
    }
}
