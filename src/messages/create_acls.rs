//! `CreateAcls` (api_key=30), versions 0-1.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `CreateAclsRequest_v{0,1}` / `CreateAclsResponse_v{0,1}`.

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;
use crate::types::{AclOperation, AclPermissionType, PatternType, ResourceType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclCreation {
    pub resource_type: ResourceType,
    pub resource_name: String,
    /// Present from v1.
    pub resource_pattern_type: PatternType,
    pub principal: String,
    pub host: String,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAclsRequest {
    pub creations: Vec<AclCreation>,
}

impl CreateAclsRequest {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_array(buf, &self.creations, |buf, c| {
            p::put_i8(buf, c.resource_type.wire_value());
            p::put_string(buf, &c.resource_name);
            if version >= 1 {
                p::put_i8(buf, c.resource_pattern_type.wire_value());
            }
            p::put_string(buf, &c.principal);
            p::put_string(buf, &c.host);
            p::put_i8(buf, c.operation.wire_value());
            p::put_i8(buf, c.permission_type.wire_value());
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let creations = p::get_array(buf, "creations", |buf| {
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
            Ok(AclCreation {
                resource_type,
                resource_name,
                resource_pattern_type,
                principal,
                host,
                operation,
                permission_type,
            })
        })?;
        Ok(CreateAclsRequest { creations })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclCreationResult {
    pub error_code: i16,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAclsResponse {
    pub throttle_time_ms: i32,
    pub creation_responses: Vec<AclCreationResult>,
}

impl CreateAclsResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_array(buf, &self.creation_responses, |buf, r| {
            p::put_i16(buf, r.error_code);
            p::put_nullable_string(buf, r.error_message.as_deref());
        });
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let creation_responses = p::get_array(buf, "creation_responses", |buf| {
            let error_code = p::get_i16(buf)?;
            let error_message = p::get_nullable_string(buf, "error_message")?;
            Ok(AclCreationResult {
                error_code,
                error_message,
            })
        })?;
        Ok(CreateAclsResponse {
            throttle_time_ms,
            creation_responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn request_response_roundtrip_zips_by_index() {
        let req = CreateAclsRequest {
            creations: vec![AclCreation {
                resource_type: ResourceType::Topic,
                resource_name: "t".to_string(),
                resource_pattern_type: PatternType::Literal,
                principal: "User:bob".to_string(),
                host: "*".to_string(),
                operation: AclOperation::Write,
                permission_type: AclPermissionType::Allow,
            }],
        };
        let mut buf = BytesMut::new();
        req.encode(1, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(CreateAclsRequest::decode(1, &mut frozen).unwrap(), req);

        let resp = CreateAclsResponse {
            throttle_time_ms: 0,
            creation_responses: vec![AclCreationResult {
                error_code: 0,
                error_message: None,
            }],
        };
        assert_eq!(resp.creation_responses.len(), req.creations.len());
    }
}
