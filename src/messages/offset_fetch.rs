//! `OffsetFetch` (api_key=9), versions 0-5.
//!
//! Not carried in the filtered `original_source/` pack (it lives in
//! `protocol/commit.py` upstream); field layout follows the standard
//! Kafka wire shape, the same way `find_coordinator` does. `partitions`
//! becomes optional (meaning "all partitions for this group") from v2,
//! matching spec §4.3's `partitions=None` feature gate; `committed_leader_epoch`
//! is added at v5 (spec §3 `OffsetAndMetadata.leaderEpoch`, `-1` below v5).

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchRequestTopic {
    pub name: String,
    pub partition_indexes: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchRequest {
    pub group_id: String,
    /// `None` means "all partitions"; only legal from v2 (spec §4.3).
    pub topics: Option<Vec<OffsetFetchRequestTopic>>,
}

impl OffsetFetchRequest {
    pub fn encode(&self, _version: i16, buf: &mut impl BufMut) {
        p::put_string(buf, &self.group_id);
        match &self.topics {
            None => p::put_i32(buf, -1),
            Some(topics) => p::put_array(buf, topics, |buf, t| {
                p::put_string(buf, &t.name);
                p::put_array(buf, &t.partition_indexes, |buf, idx| p::put_i32(buf, *idx));
            }),
        }
    }

    pub fn decode(_version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let group_id = p::get_string(buf, "group_id")?;
        let count = p::get_i32(buf)?;
        let topics = if count == -1 {
            None
        } else if count <= 0 {
            Some(Vec::new())
        } else {
            let mut out = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let name = p::get_string(buf, "name")?;
                let partition_indexes = p::get_array(buf, "partition_indexes", |buf| p::get_i32(buf))?;
                out.push(OffsetFetchRequestTopic { name, partition_indexes });
            }
            Some(out)
        };
        Ok(OffsetFetchRequest { group_id, topics })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchResponsePartition {
    pub partition_index: i32,
    pub committed_offset: i64,
    /// Present from v5; `-1` on earlier versions (spec §3).
    pub committed_leader_epoch: i32,
    pub metadata: Option<String>,
    pub error_code: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchResponseTopic {
    pub name: String,
    pub partitions: Vec<OffsetFetchResponsePartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetFetchResponse {
    /// Present from v3.
    pub throttle_time_ms: i32,
    pub topics: Vec<OffsetFetchResponseTopic>,
    /// Present from v2; absent (`0`/`NoError`) below that (spec §4.5
    /// "top-level error raises on v>=2 only").
    pub error_code: i16,
}

impl OffsetFetchResponse {
    pub fn encode(&self, version: i16, buf: &mut impl BufMut) {
        if version >= 3 {
            p::put_i32(buf, self.throttle_time_ms);
        }
        p::put_array(buf, &self.topics, |buf, t| {
            p::put_string(buf, &t.name);
            p::put_array(buf, &t.partitions, |buf, part| {
                p::put_i32(buf, part.partition_index);
                p::put_i64(buf, part.committed_offset);
                if version >= 5 {
                    p::put_i32(buf, part.committed_leader_epoch);
                }
                p::put_nullable_string(buf, part.metadata.as_deref());
                p::put_i16(buf, part.error_code);
            });
        });
        if version >= 2 {
            p::put_i16(buf, self.error_code);
        }
    }

    pub fn decode(version: i16, buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = if version >= 3 { p::get_i32(buf)? } else { 0 };
        let topics = p::get_array(buf, "topics", |buf| {
            let name = p::get_string(buf, "name")?;
            let partitions = p::get_array(buf, "partitions", |buf| {
                let partition_index = p::get_i32(buf)?;
                let committed_offset = p::get_i64(buf)?;
                let committed_leader_epoch = if version >= 5 { p::get_i32(buf)? } else { -1 };
                let metadata = p::get_nullable_string(buf, "metadata")?;
                let error_code = p::get_i16(buf)?;
                Ok(OffsetFetchResponsePartition {
                    partition_index,
                    committed_offset,
                    committed_leader_epoch,
                    metadata,
                    error_code,
                })
            })?;
            Ok(OffsetFetchResponseTopic { name, partitions })
        })?;
        let error_code = if version >= 2 { p::get_i16(buf)? } else { 0 };
        Ok(OffsetFetchResponse {
            throttle_time_ms,
            topics,
            error_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn request_nil_topics_roundtrip() {
        let req = OffsetFetchRequest {
            group_id: "g".to_string(),
            topics: None,
        };
        let mut buf = BytesMut::new();
        req.encode(2, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(OffsetFetchRequest::decode(2, &mut frozen).unwrap(), req);
    }

    #[test]
    fn response_roundtrip_v5_has_leader_epoch() {
        let resp = OffsetFetchResponse {
            throttle_time_ms: 0,
            topics: vec![OffsetFetchResponseTopic {
                name: "t".to_string(),
                partitions: vec![OffsetFetchResponsePartition {
                    partition_index: 0,
                    committed_offset: 100,
                    committed_leader_epoch: 7,
                    metadata: None,
                    error_code: 0,
                }],
            }],
            error_code: 0,
        };
        let mut buf = BytesMut::new();
        resp.encode(5, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(OffsetFetchResponse::decode(5, &mut frozen).unwrap(), resp);
    }

    #[test]
    fn response_roundtrip_v1_has_no_top_level_error() {
        let resp = OffsetFetchResponse {
            throttle_time_ms: 0,
            topics: vec![],
            error_code: 0,
        };
        let mut buf = BytesMut::new();
        resp.encode(1, &mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(OffsetFetchResponse::decode(1, &mut frozen).unwrap(), resp);
    }
}
