//! `DescribeAcls` (api_key=29), versions 0-2.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `DescribeAclsRequest_v{0..2}` / `DescribeAclsResponse_v{0..2}`. v0's
//! resource tuple lacks `resource_pattern_type`; the façade fills it with
//! `LITERAL` on decode (spec §4.5 DescribeAcls).

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;
use crate::types::{AclOperation, AclPermissionType, PatternType, ResourceType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeAclsRequest {
    pub resource_type: ResourceType,
    pub resource_name: Option<String>,
    /// Present from v1.
    pub resource_pattern_type_filter: PatternType,
    pub principal: Option<String>,
    pub host: Option<String>,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

impl DescribeAclsRequest {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_i8(buf, self.resource_type.wire_value());
        p::put_nullable_string(buf, self.resource_name.as_deref());
        if version >= 1 {
            p::put_i8(buf, self.resource_pattern_type_filter.wire_value());
        }
        p::put_nullable_string(buf, self.principal.as_deref());
        p::put_nullable_string(buf, self.host.as_deref());
        p::put_i8(buf, self.operation.wire_value());
        p::put_i8(buf, self.permission_type.wire_value());
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
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
        Ok(DescribeAclsRequest {
            resource_type,
            resource_name,
            resource_pattern_type_filter,
            principal,
            host,
            operation,
            permission_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclDescription {
    pub principal: String,
    pub host: String,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeAclsResource {
    pub resource_type: ResourceType,
    pub resource_name: String,
    /// Present from v1; filled with `Literal` when decoding v0 (spec §4.5).
    pub resource_pattern_type: PatternType,
    pub acls: Vec<AclDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeAclsResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub error_message: Option<String>,
    pub resources: Vec<DescribeAclsResource>,
}

impl DescribeAclsResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_i16(buf, self.error_code);
        p::put_nullable_string(buf, self.error_message.as_deref());
        p::put_array(buf, &self.resources, |buf, r| {
            p::put_i8(buf, r.resource_type.wire_value());
            p::put_string(buf, &r.resource_name);
            if version >= 1 {
                p::put_i8(buf, r.resource_pattern_type.wire_value());
            }
            p::put_array(buf, &r.acls, |buf, a| {
                p::put_string(buf, &a.principal);
                p::put_string(buf, &a.host);
                p::put_i8(buf, a.operation.wire_value());
                p::put_i8(buf, a.permission_type.wire_value());
            });
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let error_code = p::get_i16(buf)?;
        let error_message = p::get_nullable_string(buf, "error_message")?;
        let resources = p::get_array(buf, "resources", |buf| {
            let resource_type = ResourceType::from_wire(p::get_i8(buf)?);
            let resource_name = p::get_string(buf, "resource_name")?;
            let resource_pattern_type = if version >= 1 {
                PatternType::from_wire(p::get_i8(buf)?)
            } else {
                PatternType::Literal
            };
            let acls = p::get_array(buf, "acls", |buf| {
                let principal = p::get_string(buf, "principal")?;
                let host = p::get_string(buf, "host")?;
                let operation = AclOperation::from_wire(p::get_i8(buf)?);
                let permission_type = AclPermissionType::from_wire(p::get_i8(buf)?);
                Ok(AclDescription {
                    principal,
                    host,
                    operation,
                    permission_type,
                })
            })?;
            Ok(DescribeAclsResource {
                resource_type,
                resource_name,
                resource_pattern_type,
                acls,
            })
        })?;
        Ok(DescribeAclsResponse {
            throttle_time_ms,
            error_code,
            error_message,
            resources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn v0_response_fills_literal_pattern_type() {
        let resp = DescribeAclsResponse {
            throttle_time_ms: 0,
            error_code: 0,
            error_message: None,
            resources: vec![DescribeAclsResource {
                resource_type: ResourceType::Topic,
                resource_name: "t".to_string(),
                resource_pattern_type: PatternType::Literal,
                acls: vec![AclDescription {
                    principal: "User:alice".to_string(),
                    host: "*".to_string(),
                    operation: AclOperation::Read,
                    permission_type: AclPermissionType::Allow,
                }],
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(0, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = DescribeAclsResponse::decode(0, &mut frozen).unwrap();
        assert_eq!(decoded.resources[0].resource_pattern_type, PatternType::Literal);
    }
}
