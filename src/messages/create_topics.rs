//! `CreateTopics` (api_key=19), versions 0-3.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `CreateTopicsRequest_v{0..3}` / `CreateTopicsResponse_v{0..3}`.

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaAssignment {
    pub partition_id: i32,
    pub replicas: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicRequestSpec {
    pub topic: String,
    pub num_partitions: i32,
    pub replication_factor: i16,
    pub replica_assignment: Vec<ReplicaAssignment>,
    pub configs: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicsRequest {
    pub create_topic_requests: Vec<CreateTopicRequestSpec>,
    pub timeout: i32,
    /// Present from v1; rejected at v0 (spec §4.5 CreateTopics).
    pub validate_only: bool,
}

impl CreateTopicsRequest {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        p::put_array(buf, &self.create_topic_requests, |buf, t| {
            p::put_string(buf, &t.topic);
            p::put_i32(buf, t.num_partitions);
            p::put_i16(buf, t.replication_factor);
            p::put_array(buf, &t.replica_assignment, |buf, ra| {
                p::put_i32(buf, ra.partition_id);
                p::put_array(buf, &ra.replicas, |buf, r| p::put_i32(buf, *r));
            });
            p::put_array(buf, &t.configs, |buf, (k, v)| {
                p::put_string(buf, k);
                p::put_string(buf, v);
            });
        });
        p::put_i32(buf, self.timeout);
        if version >= 1 {
            p::put_bool(buf, self.validate_only);
        }
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let create_topic_requests = p::get_array(buf, "create_topic_requests", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let num_partitions = p::get_i32(buf)?;
            let replication_factor = p::get_i16(buf)?;
            let replica_assignment = p::get_array(buf, "replica_assignment", |buf| {
                let partition_id = p::get_i32(buf)?;
                let replicas = p::get_array(buf, "replicas", |buf| p::get_i32(buf))?;
                Ok(ReplicaAssignment { partition_id, replicas })
            })?;
            let configs = p::get_array(buf, "configs", |buf| {
                let k = p::get_string(buf, "config_key")?;
                let v = p::get_string(buf, "config_value")?;
                Ok((k, v))
            })?;
            Ok(CreateTopicRequestSpec {
                topic,
                num_partitions,
                replication_factor,
                replica_assignment,
                configs,
            })
        })?;
        let timeout = p::get_i32(buf)?;
        let validate_only = if version >= 1 { p::get_bool(buf)? } else { false };
        Ok(CreateTopicsRequest {
            create_topic_requests,
            timeout,
            validate_only,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicError {
    pub topic: String,
    pub error_code: i16,
    /// Present from v1 (absent means empty string on the wire at v0).
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicsResponse {
    /// Present from v2.
    pub throttle_time_ms: i32,
    pub topic_errors: Vec<TopicError>,
}

impl CreateTopicsResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        if version >= 2 {
            p::put_i32(buf, self.throttle_time_ms);
        }
        p::put_array(buf, &self.topic_errors, |buf, e| {
            p::put_string(buf, &e.topic);
            p::put_i16(buf, e.error_code);
            if version >= 1 {
                p::put_string(buf, &e.error_message);
            }
        });
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = if version >= 2 { p::get_i32(buf)? } else { 0 };
        let topic_errors = p::get_array(buf, "topic_errors", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let error_code = p::get_i16(buf)?;
            let error_message = if version >= 1 {
                p::get_string(buf, "error_message")?
            } else {
                String::new()
            };
            Ok(TopicError {
                topic,
                error_code,
                error_message,
            })
        })?;
        Ok(CreateTopicsResponse {
            throttle_time_ms,
            topic_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn sample_request() -> CreateTopicsRequest {
        CreateTopicsRequest {
            create_topic_requests: vec![CreateTopicRequestSpec {
                topic: "t".to_string(),
                num_partitions: 3,
                replication_factor: 2,
                replica_assignment: vec![ReplicaAssignment {
                    partition_id: 0,
                    replicas: vec![1, 2],
                }],
                configs: vec![("retention.ms".to_string(), "1000".to_string())],
            }],
            timeout: 5000,
            validate_only: true,
        }
    }

    #[test]
    fn request_roundtrip_v0_drops_validate_only() {
        let req = sample_request();
        let mut buf = BytesMut::new();
        req.encode(0, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = CreateTopicsRequest::decode(0, &mut frozen).unwrap();
        assert!(!decoded.validate_only);
        assert_eq!(decoded.create_topic_requests, req.create_topic_requests);
    }

    #[test]
    fn request_roundtrip_v3() {
        let req = sample_request();
        let mut buf = BytesMut::new();
        req.encode(3, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = CreateTopicsRequest::decode(3, &mut frozen).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn response_roundtrip_v2_has_throttle_time() {
        let resp = CreateTopicsResponse {
            throttle_time_ms: 42,
            topic_errors: vec![TopicError {
                topic: "t".to_string(),
                error_code: 0,
                error_message: String::new(),
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(2, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = CreateTopicsResponse::decode(2, &mut frozen).unwrap();
        assert_eq!(decoded, resp);
    }
}
