//! `DescribeConfigs` (api_key=32), versions 0-2.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `DescribeConfigsRequest_v{0..2}` / `DescribeConfigsResponse_v{0..2}`.
//! `include_synonyms` is rejected at v0 by the façade (spec §4.5, §4.3
//! feature gate).

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;
use crate::types::ConfigResourceType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResourceRequest {
    pub resource_type: ConfigResourceType,
    pub resource_name: String,
    /// `None` means "return all configs" (spec §3 ConfigResource).
    pub config_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsRequest {
    pub resources: Vec<ConfigResourceRequest>,
    /// Present from v1; rejected at v0 by the façade (spec §4.5).
    pub include_synonyms: bool,
}

impl DescribeConfigsRequest {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_array(buf, &self.resources, |buf, r| {
            p::put_i8(buf, r.resource_type.wire_value());
            p::put_string(buf, &r.resource_name);
            match &r.config_names {
                None => p::put_i32(buf, -1),
                Some(names) => p::put_array(buf, names, |buf, n| p::put_string(buf, n)),
            }
        });
        if version >= 1 {
            p::put_bool(buf, self.include_synonyms);
        }
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let resources = p::get_array(buf, "resources", |buf| {
            let resource_type = ConfigResourceType::from_wire(p::get_i8(buf)?);
            let resource_name = p::get_string(buf, "resource_name")?;
            let count = p::get_i32(buf)?;
            let config_names = if count == -1 {
                None
            } else {
                let mut out = Vec::with_capacity(count.max(0) as usize);
                for _ in 0..count.max(0) {
                    out.push(p::get_string(buf, "config_name")?);
                }
                Some(out)
            };
            Ok(ConfigResourceRequest {
                resource_type,
                resource_name,
                config_names,
            })
        })?;
        let include_synonyms = if version >= 1 { p::get_bool(buf)? } else { false };
        Ok(DescribeConfigsRequest {
            resources,
            include_synonyms,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSynonym {
    pub config_name: String,
    pub config_value: Option<String>,
    pub config_source: i8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub config_name: String,
    pub config_value: Option<String>,
    pub read_only: bool,
    /// v0 carries `is_default`; v1+ replaces it with `config_source`.
    /// Both are kept so callers targeting either version get a faithful
    /// value (`is_default` derived as `config_source == DEFAULT_CONFIG`).
    pub is_default: bool,
    pub config_source: i8,
    pub is_sensitive: bool,
    /// Present from v1 when `include_synonyms=true`.
    pub config_synonyms: Vec<ConfigSynonym>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsResource {
    pub error_code: i16,
    pub error_message: Option<String>,
    pub resource_type: ConfigResourceType,
    pub resource_name: String,
    pub config_entries: Vec<ConfigEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsResponse {
    pub throttle_time_ms: i32,
    pub resources: Vec<DescribeConfigsResource>,
}

const CONFIG_SOURCE_DEFAULT: i8 = 5;

impl DescribeConfigsResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_array(buf, &self.resources, |buf, r| {
            p::put_i16(buf, r.error_code);
            p::put_nullable_string(buf, r.error_message.as_deref());
            p::put_i8(buf, r.resource_type.wire_value());
            p::put_string(buf, &r.resource_name);
            p::put_array(buf, &r.config_entries, |buf, e| {
                p::put_string(buf, &e.config_name);
                p::put_nullable_string(buf, e.config_value.as_deref());
                p::put_bool(buf, e.read_only);
                if version >= 1 {
                    p::put_i8(buf, e.config_source);
                } else {
                    p::put_bool(buf, e.is_default);
                }
                p::put_bool(buf, e.is_sensitive);
                if version >= 1 {
                    p::put_array(buf, &e.config_synonyms, |buf, s| {
                        p::put_string(buf, &s.config_name);
                        p::put_nullable_string(buf, s.config_value.as_deref());
                        p::put_i8(buf, s.config_source);
                    });
                }
            });
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let resources = p::get_array(buf, "resources", |buf| {
            let error_code = p::get_i16(buf)?;
            let error_message = p::get_nullable_string(buf, "error_message")?;
            let resource_type = ConfigResourceType::from_wire(p::get_i8(buf)?);
            let resource_name = p::get_string(buf, "resource_name")?;
            let config_entries = p::get_array(buf, "config_entries", |buf| {
                let config_name = p::get_string(buf, "config_name")?;
                let config_value = p::get_nullable_string(buf, "config_value")?;
                let read_only = p::get_bool(buf)?;
                let (is_default, config_source) = if version >= 1 {
                    let source = p::get_i8(buf)?;
                    (source == CONFIG_SOURCE_DEFAULT, source)
                } else {
                    let is_default = p::get_bool(buf)?;
                    (is_default, if is_default { CONFIG_SOURCE_DEFAULT } else { 0 })
                };
                let is_sensitive = p::get_bool(buf)?;
                let config_synonyms = if version >= 1 {
                    p::get_array(buf, "config_synonyms", |buf| {
                        let config_name = p::get_string(buf, "config_name")?;
                        let config_value = p::get_nullable_string(buf, "config_value")?;
                        let config_source = p::get_i8(buf)?;
                        Ok(ConfigSynonym {
                            config_name,
                            config_value,
                            config_source,
                        })
                    })?
                } else {
                    Vec::new()
                };
                Ok(ConfigEntry {
                    config_name,
                    config_value,
                    read_only,
                    is_default,
                    config_source,
                    is_sensitive,
                    config_synonyms,
                })
            })?;
            Ok(DescribeConfigsResource {
                error_code,
                error_message,
                resource_type,
                resource_name,
                config_entries,
            })
        })?;
        Ok(DescribeConfigsResponse {
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
    fn request_roundtrip_v0_drops_include_synonyms() {
        let req = DescribeConfigsRequest {
            resources: vec![ConfigResourceRequest {
                resource_type: ConfigResourceType::Topic,
                resource_name: "t".to_string(),
                config_names: None,
            }],
            include_synonyms: true,
        };
        let mut buf = BytesMut::new();
        req.encode(0, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = DescribeConfigsRequest::decode(0, &mut frozen).unwrap();
        assert!(!decoded.include_synonyms);
    }

    #[test]
    fn response_roundtrip_v1_carries_synonyms() {
        let resp = DescribeConfigsResponse {
            throttle_time_ms: 0,
            resources: vec![DescribeConfigsResource {
                error_code: 0,
                error_message: None,
                resource_type: ConfigResourceType::Topic,
                resource_name: "t".to_string(),
                config_entries: vec![ConfigEntry {
                    config_name: "retention.ms".to_string(),
                    config_value: Some("1000".to_string()),
                    read_only: false,
                    is_default: false,
                    config_source: 1,
                    is_sensitive: false,
                    config_synonyms: vec![ConfigSynonym {
                        config_name: "retention.ms".to_string(),
                        config_value: Some("1000".to_string()),
                        config_source: 1,
                    }],
                }],
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(1, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DescribeConfigsResponse::decode(1, &mut frozen).unwrap(), resp);
    }
}
