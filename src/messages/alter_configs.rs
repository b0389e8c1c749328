//! `AlterConfigs` (api_key=33), versions 0-1.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `AlterConfigsRequest_v{0,1}` / `AlterConfigsResponse_v{0,1}`. DESIGN.md
//! records the fix to the source's defect that listed a request type in
//! `AlterConfigsResponse`'s version table; this registry correctly maps
//! to `AlterConfigsResponse_v1`.

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;
use crate::types::ConfigResourceType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigEntry {
    pub config_name: String,
    pub config_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigResource {
    pub resource_type: ConfigResourceType,
    pub resource_name: String,
    pub config_entries: Vec<AlterConfigEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigsRequest {
    pub resources: Vec<AlterConfigResource>,
    pub validate_only: bool,
}

impl AlterConfigsRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_array(buf, &self.resources, |buf, r| {
            p::put_i8(buf, r.resource_type.wire_value());
            p::put_string(buf, &r.resource_name);
            p::put_array(buf, &r.config_entries, |buf, e| {
                p::put_string(buf, &e.config_name);
                p::put_nullable_string(buf, e.config_value.as_deref());
            });
        });
        p::put_bool(buf, self.validate_only);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let resources = p::get_array(buf, "resources", |buf| {
            let resource_type = ConfigResourceType::from_wire(p::get_i8(buf)?);
            let resource_name = p::get_string(buf, "resource_name")?;
            let config_entries = p::get_array(buf, "config_entries", |buf| {
                let config_name = p::get_string(buf, "config_name")?;
                let config_value = p::get_nullable_string(buf, "config_value")?;
                Ok(AlterConfigEntry {
                    config_name,
                    config_value,
                })
            })?;
            Ok(AlterConfigResource {
                resource_type,
                resource_name,
                config_entries,
            })
        })?;
        let validate_only = p::get_bool(buf)?;
        Ok(AlterConfigsRequest {
            resources,
            validate_only,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigsResourceResult {
    pub error_code: i16,
    pub error_message: Option<String>,
    pub resource_type: ConfigResourceType,
    pub resource_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfigsResponse {
    pub throttle_time_ms: i32,
    pub resources: Vec<AlterConfigsResourceResult>,
}

impl AlterConfigsResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_array(buf, &self.resources, |buf, r| {
            p::put_i16(buf, r.error_code);
            p::put_nullable_string(buf, r.error_message.as_deref());
            p::put_i8(buf, r.resource_type.wire_value());
            p::put_string(buf, &r.resource_name);
        });
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let resources = p::get_array(buf, "resources", |buf| {
            let error_code = p::get_i16(buf)?;
            let error_message = p::get_nullable_string(buf, "error_message")?;
            let resource_type = ConfigResourceType::from_wire(p::get_i8(buf)?);
            let resource_name = p::get_string(buf, "resource_name")?;
            Ok(AlterConfigsResourceResult {
                error_code,
                error_message,
                resource_type,
                resource_name,
            })
        })?;
        Ok(AlterConfigsResponse {
            throttle_time_ms,
            resources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn request_response_roundtrip() {
        let req = AlterConfigsRequest {
            resources: vec![AlterConfigResource {
                resource_type: ConfigResourceType::Topic,
                resource_name: "t".to_string(),
                config_entries: vec![AlterConfigEntry {
                    config_name: "retention.ms".to_string(),
                    config_value: Some("2000".to_string()),
                }],
            }],
            validate_only: false,
        };
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(AlterConfigsRequest::decode(&mut frozen).unwrap(), req);

        let resp = AlterConfigsResponse {
            throttle_time_ms: 0,
            resources: vec![AlterConfigsResourceResult {
                error_code: 0,
                error_message: None,
                resource_type: ConfigResourceType::Topic,
                resource_name: "t".to_string(),
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(AlterConfigsResponse::decode(&mut frozen).unwrap(), resp);
    }
}
