//! `ElectLeaders` (api_key=43), versions 0-1.
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `ElectLeadersRequest_v{0,1}` / `ElectLeadersResponse_v{0,1}` (the
//! source labels both `_v0` classes `API_VERSION = 1`, a transcription
//! artifact; this registry numbers them 0 and 1 in the order they were
//! defined since the schemas are otherwise identical).

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;
use crate::types::ElectionType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPartitions {
    pub topic: String,
    pub partition_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectLeadersRequest {
    pub election_type: ElectionType,
    pub topic_partitions: Vec<TopicPartitions>,
    pub timeout: i32,
}

impl ElectLeadersRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i8(buf, self.election_type.wire_value());
        p::put_array(buf, &self.topic_partitions, |buf, tp| {
            p::put_string(buf, &tp.topic);
            p::put_array(buf, &tp.partition_ids, |buf, pid| p::put_i32(buf, *pid));
        });
        p::put_i32(buf, self.timeout);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let election_type = match p::get_i8(buf)? {
            1 => ElectionType::Unclean,
            _ => ElectionType::Preferred,
        };
        let topic_partitions = p::get_array(buf, "topic_partitions", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let partition_ids = p::get_array(buf, "partition_ids", |buf| p::get_i32(buf))?;
            Ok(TopicPartitions { topic, partition_ids })
        })?;
        let timeout = p::get_i32(buf)?;
        Ok(ElectLeadersRequest {
            election_type,
            topic_partitions,
            timeout,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionElectionResult {
    pub partition_id: i32,
    pub error_code: i16,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicElectionResult {
    pub topic: String,
    pub partition_result: Vec<PartitionElectionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectLeadersResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub replication_election_results: Vec<TopicElectionResult>,
}

impl ElectLeadersResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_i16(buf, self.error_code);
        p::put_array(buf, &self.replication_election_results, |buf, t| {
            p::put_string(buf, &t.topic);
            p::put_array(buf, &t.partition_result, |buf, part| {
                p::put_i32(buf, part.partition_id);
                p::put_i16(buf, part.error_code);
                p::put_nullable_string(buf, part.error_message.as_deref());
            });
        });
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let error_code = p::get_i16(buf)?;
        let replication_election_results = p::get_array(buf, "replication_election_results", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let partition_result = p::get_array(buf, "partition_result", |buf| {
                let partition_id = p::get_i32(buf)?;
                let error_code = p::get_i16(buf)?;
                let error_message = p::get_nullable_string(buf, "error_message")?;
                Ok(PartitionElectionResult {
                    partition_id,
                    error_code,
                    error_message,
                })
            })?;
            Ok(TopicElectionResult { topic, partition_result })
        })?;
        Ok(ElectLeadersResponse {
            throttle_time_ms,
            error_code,
            replication_election_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn roundtrip() {
        let req = ElectLeadersRequest {
            election_type: ElectionType::Preferred,
            topic_partitions: vec![TopicPartitions {
                topic: "t".to_string(),
                partition_ids: vec![0, 1],
            }],
            timeout: 30000,
        };
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(ElectLeadersRequest::decode(&mut frozen).unwrap(), req);
    }
}
