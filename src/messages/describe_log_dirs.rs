//! `DescribeLogDirs` (api_key=35), v0 only (SPEC_FULL §10.5).
//!
//! Grounded on `original_source/kafka/protocol/admin.py`
//! `DescribeLogDirsRequest_v0` / `DescribeLogDirsResponse_v0`. Each
//! requested topic carries the partition indexes to describe; an empty
//! list means "all partitions of this topic" on the broker side.

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirTopicRequest {
    pub topic: String,
    pub partitions: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribeLogDirsRequest {
    pub topics: Vec<LogDirTopicRequest>,
}

impl DescribeLogDirsRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_array(buf, &self.topics, |buf, t| {
            p::put_string(buf, &t.topic);
            p::put_array(buf, &t.partitions, |buf, idx| p::put_i32(buf, *idx));
        });
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let topics = p::get_array(buf, "topics", |buf| {
            let topic = p::get_string(buf, "topic")?;
            let partitions = p::get_array(buf, "partitions", |buf| p::get_i32(buf))?;
            Ok(LogDirTopicRequest { topic, partitions })
        })?;
        Ok(DescribeLogDirsRequest { topics })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirPartition {
    pub partition_index: i32,
    pub partition_size: i64,
    pub offset_lag: i64,
    pub is_future_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirTopic {
    pub name: String,
    pub partitions: Vec<LogDirPartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirDescription {
    pub error_code: i16,
    pub log_dir: String,
    pub topics: Vec<LogDirTopic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeLogDirsResponse {
    pub throttle_time_ms: i32,
    pub log_dirs: Vec<LogDirDescription>,
}

impl DescribeLogDirsResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_array(buf, &self.log_dirs, |buf, d| {
            p::put_i16(buf, d.error_code);
            p::put_string(buf, &d.log_dir);
            p::put_array(buf, &d.topics, |buf, t| {
                p::put_string(buf, &t.name);
                p::put_array(buf, &t.partitions, |buf, part| {
                    p::put_i32(buf, part.partition_index);
                    p::put_i64(buf, part.partition_size);
                    p::put_i64(buf, part.offset_lag);
                    p::put_bool(buf, part.is_future_key);
                });
            });
        });
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let log_dirs = p::get_array(buf, "log_dirs", |buf| {
            let error_code = p::get_i16(buf)?;
            let log_dir = p::get_string(buf, "log_dir")?;
            let topics = p::get_array(buf, "topics", |buf| {
                let name = p::get_string(buf, "name")?;
                let partitions = p::get_array(buf, "partitions", |buf| {
                    let partition_index = p::get_i32(buf)?;
                    let partition_size = p::get_i64(buf)?;
                    let offset_lag = p::get_i64(buf)?;
                    let is_future_key = p::get_bool(buf)?;
                    Ok(LogDirPartition {
                        partition_index,
                        partition_size,
                        offset_lag,
                        is_future_key,
                    })
                })?;
                Ok(LogDirTopic { name, partitions })
            })?;
            Ok(LogDirDescription {
                error_code,
                log_dir,
                topics,
            })
        })?;
        Ok(DescribeLogDirsResponse {
            throttle_time_ms,
            log_dirs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn request_roundtrip() {
        let req = DescribeLogDirsRequest {
            topics: vec![LogDirTopicRequest {
                topic: "t".to_string(),
                partitions: vec![0, 1],
            }],
        };
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DescribeLogDirsRequest::decode(&mut frozen).unwrap(), req);
    }

    #[test]
    fn response_roundtrip() {
        let resp = DescribeLogDirsResponse {
            throttle_time_ms: 0,
            log_dirs: vec![LogDirDescription {
                error_code: 0,
                log_dir: "/var/kafka".to_string(),
                topics: vec![LogDirTopic {
                    name: "t".to_string(),
                    partitions: vec![LogDirPartition {
                        partition_index: 0,
                        partition_size: 1024,
                        offset_lag: 0,
                        is_future_key: false,
                    }],
                }],
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DescribeLogDirsResponse::decode(&mut frozen).unwrap(), resp);
    }
}
