//! `CreatePartitions` (api_key=37), versions 0-1.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `CreatePartitionsRequest_v{0,1}` / `CreatePartitionsResponse_v{0,1}`
//! (v1 only adds the request-level `timeout`/`validate_only` ordering
//! fix the source carries between its two versions; the response is
//! byte-identical across both).

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartitionsTopic {
    pub topic: String,
    pub new_total_replica_count: i32,
    /// Empty means "let the broker compute replica placement" (spec §3
    /// `NewPartitions.newAssignments`).
    pub assignment: Vec<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartitionsRequest {
    pub topics: Vec<CreatePartitionsTopic>,
    pub timeout: i32,
    pub validate_only: bool,
}

impl CreatePartitionsRequest {
    pub fn encode(&self, _version: i16, buf: &mut impl BufMut) {
        p::put_array(buf, &self.topics, |buf, t| {
            p::put_string(buf, &t.topic);
            p::put_i32(buf, t.new_total_replica_count);
            if t.assignment.is_empty() {
                p::put_i32(buf, -1);
            } else {
                p::put_array(buf, &t.assignment, |buf, replicas| {
                    p::put_array(buf, replicas, |buf, r| p::put_i32(buf, *r));
                });
            }
        });
        p::put_i32(buf, self.timeout);
        p::put_bool(buf, self.validate_only);
    }

    pub fn decode(_version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let topics = p::get_array(buf, "topics", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let new_total_replica_count = p::get_i32(buf)?;
            let count = p::get_i32(buf)?;
            let assignment = if count == -1 {
                Vec::new()
            } else {
                let mut out = Vec::with_capacity(count.max(0) as usize);
                for _ in 0..count.max(0) {
                    out.push(p::get_array(buf, "replicas", |buf| p::get_i32(buf))?);
                }
                out
            };
            Ok(CreatePartitionsTopic {
                topic,
                new_total_replica_count,
                assignment,
            })
        })?;
        let timeout = p::get_i32(buf)?;
        let validate_only = p::get_bool(buf)?;
        Ok(CreatePartitionsRequest {
            topics,
            timeout,
            validate_only,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartitionsTopicResult {
    pub topic: String,
    pub error_code: i16,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartitionsResponse {
    pub throttle_time_ms: i32,
    pub results: Vec<CreatePartitionsTopicResult>,
}

impl CreatePartitionsResponse {
    pub fn encode(&self, _version: i16, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_array(buf, &self.results, |buf, r| {
            p::put_string(buf, &r.topic);
            p::put_i16(buf, r.error_code);
            p::put_nullable_string(buf, r.error_message.as_deref());
        });
    }

    pub fn decode(_version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let results = p::get_array(buf, "results", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let error_code = p::get_i16(buf)?;
            let error_message = p::get_nullable_string(buf, "error_message")?;
            Ok(CreatePartitionsTopicResult {
                topic,
                error_code,
                error_message,
            })
        })?;
        Ok(CreatePartitionsResponse {
            throttle_time_ms,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn request_roundtrip_with_explicit_assignment() {
        let req = CreatePartitionsRequest {
            topics: vec![CreatePartitionsTopic {
                topic: "t".to_string(),
                new_total_replica_count: 3,
                assignment: vec![vec![1, 2], vec![2, 3]],
            }],
            timeout: 5000,
            validate_only: false,
        };
        let mut buf = BytesMut::new();
        req.encode(0, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(CreatePartitionsRequest::decode(0, &mut frozen).unwrap(), req);
    }

    #[test]
    fn request_roundtrip_without_assignment() {
        let req = CreatePartitionsRequest {
            topics: vec![CreatePartitionsTopic {
                topic: "t".to_string(),
                new_total_replica_count: 2,
                assignment: Vec::new(),
            }],
            timeout: 5000,
            validate_only: true,
        };
        let mut buf = BytesMut::new();
        req.encode(1, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(CreatePartitionsRequest::decode(1, &mut frozen).unwrap(), req);
    }

    #[test]
    fn response_roundtrip() {
        let resp = CreatePartitionsResponse {
            throttle_time_ms: 0,
            results: vec![CreatePartitionsTopicResult {
                topic: "t".to_string(),
                error_code: 0,
                error_message: None,
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(0, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(CreatePartitionsResponse::decode(0, &mut frozen).unwrap(), resp);
    }
}
