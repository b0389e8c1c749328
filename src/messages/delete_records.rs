//! `DeleteRecords` (api_key=21), only v0 exists in the registry (spec §6).
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `DeleteRecordsRequest_v0` / `DeleteRecordsResponse_v0`.

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOffset {
    pub partition_index: i32,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPartitionOffsets {
    pub name: String,
    pub partitions: Vec<PartitionOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecordsRequest {
    pub topics: Vec<TopicPartitionOffsets>,
    pub timeout_ms: i32,
}

impl DeleteRecordsRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_array(buf, &self.topics, |buf, t| {
            p::put_string(buf, &t.name);
            p::put_array(buf, &t.partitions, |buf, part| {
                p::put_i32(buf, part.partition_index);
                p::put_i64(buf, part.offset);
            });
        });
        p::put_i32(buf, self.timeout_ms);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let topics = p::get_array(buf, "topics", |buf| {
            let name = p::get_string(buf, "name")?;
            let partitions = p::get_array(buf, "partitions", |buf| {
                let partition_index = p::get_i32(buf)?;
                let offset = p::get_i64(buf)?;
                Ok(PartitionOffset { partition_index, offset })
            })?;
            Ok(TopicPartitionOffsets { name, partitions })
        })?;
        let timeout_ms = p::get_i32(buf)?;
        Ok(DeleteRecordsRequest { topics, timeout_ms })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionResult {
    pub partition_index: i32,
    pub low_watermark: i64,
    pub error_code: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPartitionResults {
    pub name: String,
    pub partitions: Vec<PartitionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecordsResponse {
    pub throttle_time_ms: i32,
    pub topics: Vec<TopicPartitionResults>,
}

impl DeleteRecordsResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_array(buf, &self.topics, |buf, t| {
            p::put_string(buf, &t.name);
            p::put_array(buf, &t.partitions, |buf, part| {
                p::put_i32(buf, part.partition_index);
                p::put_i64(buf, part.low_watermark);
                p::put_i16(buf, part.error_code);
            });
        });
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let topics = p::get_array(buf, "topics", |buf| {
            let name = p::get_string(buf, "name")?;
            let partitions = p::get_array(buf, "partitions", |buf| {
                let partition_index = p::get_i32(buf)?;
                let low_watermark = p::get_i64(buf)?;
                let error_code = p::get_i16(buf)?;
                Ok(PartitionResult {
                    partition_index,
                    low_watermark,
                    error_code,
                })
            })?;
            Ok(TopicPartitionResults { name, partitions })
        })?;
        Ok(DeleteRecordsResponse { throttle_time_ms, topics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn request_response_roundtrip() {
        let req = DeleteRecordsRequest {
            topics: vec![TopicPartitionOffsets {
                name: "t".to_string(),
                partitions: vec![PartitionOffset {
                    partition_index: 0,
                    offset: 100,
                }],
            }],
            timeout_ms: 2000,
        };
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DeleteRecordsRequest::decode(&mut frozen).unwrap(), req);

        let resp = DeleteRecordsResponse {
            throttle_time_ms: 0,
            topics: vec![TopicPartitionResults {
                name: "t".to_string(),
                partitions: vec![PartitionResult {
                    partition_index: 1,
                    low_watermark: -1,
                    error_code: 3,
                }],
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DeleteRecordsResponse::decode(&mut frozen).unwrap(), resp);
    }
}
