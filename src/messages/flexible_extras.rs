//! Stub schemas for the three flexible-only admin RPCs registered but not
//! exposed through the façade (SPEC_FULL §10.6, §10.7):
//! `AlterPartitionReassignments` (api_key=45), `ListPartitionReassignments`
//! (api_key=46), `DescribeClientQuotas` (api_key=48). All three are
//! `FLEXIBLE_VERSION = True` from v0 in the upstream protocol, so every
//! string/array here is compact and each struct carries a trailing
//! [`TaggedFields`]. None of these appear in `original_source/admin.py`
//! (added after the version the pack was taken from); the layouts below
//! follow the standard Kafka KIP-455/KIP-546/KIP-348 wire shapes.

use bytes::{Buf, BufMut};

use crate::codec::primitives::{self as p, TaggedFields};
use crate::error::ProtocolDecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignPartition {
    pub partition_index: i32,
    /// `None` cancels a pending reassignment for this partition.
    pub replicas: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignTopic {
    pub name: String,
    pub partitions: Vec<ReassignPartition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterPartitionReassignmentsRequest {
    pub timeout_ms: i32,
    pub topics: Vec<ReassignTopic>,
}

impl AlterPartitionReassignmentsRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.timeout_ms);
        p::put_compact_array(buf, &self.topics, |buf, t| {
            p::put_compact_string(buf, &t.name);
            p::put_compact_array(buf, &t.partitions, |buf, part| {
                p::put_i32(buf, part.partition_index);
                match &part.replicas {
                    None => p::put_unsigned_varint(buf, 0),
                    Some(rs) => p::put_compact_array(buf, rs, |buf, r| p::put_i32(buf, *r)),
                }
                TaggedFields::default().encode(buf);
            });
            TaggedFields::default().encode(buf);
        });
        TaggedFields::default().encode(buf);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let timeout_ms = p::get_i32(buf)?;
        let topics = p::get_compact_array(buf, |buf| {
            let name = p::get_compact_string(buf, "name")?;
            let partitions = p::get_compact_array(buf, |buf| {
                let partition_index = p::get_i32(buf)?;
                let replicas = {
                    let biased = p::get_unsigned_varint(buf)?;
                    if biased == 0 {
                        None
                    } else {
                        let count = (biased - 1) as usize;
                        let mut out = Vec::with_capacity(count);
                        for _ in 0..count {
                            out.push(p::get_i32(buf)?);
                        }
                        Some(out)
                    }
                };
                TaggedFields::decode(buf)?;
                Ok(ReassignPartition {
                    partition_index,
                    replicas,
                })
            })?;
            TaggedFields::decode(buf)?;
            Ok(ReassignTopic { name, partitions })
        })?;
        TaggedFields::decode(buf)?;
        Ok(AlterPartitionReassignmentsRequest { timeout_ms, topics })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignPartitionResult {
    pub partition_index: i32,
    pub error_code: i16,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignTopicResult {
    pub name: String,
    pub partitions: Vec<ReassignPartitionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterPartitionReassignmentsResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub error_message: Option<String>,
    pub responses: Vec<ReassignTopicResult>,
}

impl AlterPartitionReassignmentsResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_i16(buf, self.error_code);
        p::put_compact_nullable_string(buf, self.error_message.as_deref());
        p::put_compact_array(buf, &self.responses, |buf, t| {
            p::put_compact_string(buf, &t.name);
            p::put_compact_array(buf, &t.partitions, |buf, part| {
                p::put_i32(buf, part.partition_index);
                p::put_i16(buf, part.error_code);
                p::put_compact_nullable_string(buf, part.error_message.as_deref());
                TaggedFields::default().encode(buf);
            });
            TaggedFields::default().encode(buf);
        });
        TaggedFields::default().encode(buf);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let error_code = p::get_i16(buf)?;
        let error_message = p::get_compact_nullable_string(buf, "error_message")?;
        let responses = p::get_compact_array(buf, |buf| {
            let name = p::get_compact_string(buf, "name")?;
            let partitions = p::get_compact_array(buf, |buf| {
                let partition_index = p::get_i32(buf)?;
                let error_code = p::get_i16(buf)?;
                let error_message = p::get_compact_nullable_string(buf, "error_message")?;
                TaggedFields::decode(buf)?;
                Ok(ReassignPartitionResult {
                    partition_index,
                    error_code,
                    error_message,
                })
            })?;
            TaggedFields::decode(buf)?;
            Ok(ReassignTopicResult { name, partitions })
        })?;
        TaggedFields::decode(buf)?;
        Ok(AlterPartitionReassignmentsResponse {
            throttle_time_ms,
            error_code,
            error_message,
            responses,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReassignTopic {
    pub name: String,
    pub partition_index_list: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPartitionReassignmentsRequest {
    pub timeout_ms: i32,
    /// `None` requests every partition currently reassigning.
    pub topics: Option<Vec<ListReassignTopic>>,
}

impl ListPartitionReassignmentsRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.timeout_ms);
        match &self.topics {
            None => p::put_unsigned_varint(buf, 0),
            Some(topics) => p::put_compact_array(buf, topics, |buf, t| {
                p::put_compact_string(buf, &t.name);
                p::put_compact_array(buf, &t.partition_index_list, |buf, idx| p::put_i32(buf, *idx));
                TaggedFields::default().encode(buf);
            }),
        }
        TaggedFields::default().encode(buf);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let timeout_ms = p::get_i32(buf)?;
        let biased = p::get_unsigned_varint(buf)?;
        let topics = if biased == 0 {
            None
        } else {
            let count = (biased - 1) as usize;
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                let name = p::get_compact_string(buf, "name")?;
                let partition_index_list = p::get_compact_array(buf, |buf| p::get_i32(buf))?;
                TaggedFields::decode(buf)?;
                out.push(ListReassignTopic {
                    name,
                    partition_index_list,
                });
            }
            Some(out)
        };
        TaggedFields::decode(buf)?;
        Ok(ListPartitionReassignmentsRequest { timeout_ms, topics })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OngoingPartitionReassignment {
    pub partition_index: i32,
    pub replicas: Vec<i32>,
    pub adding_replicas: Vec<i32>,
    pub removing_replicas: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OngoingTopicReassignment {
    pub name: String,
    pub partitions: Vec<OngoingPartitionReassignment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPartitionReassignmentsResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub error_message: Option<String>,
    pub topics: Vec<OngoingTopicReassignment>,
}

impl ListPartitionReassignmentsResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_i16(buf, self.error_code);
        p::put_compact_nullable_string(buf, self.error_message.as_deref());
        p::put_compact_array(buf, &self.topics, |buf, t| {
            p::put_compact_string(buf, &t.name);
            p::put_compact_array(buf, &t.partitions, |buf, part| {
                p::put_i32(buf, part.partition_index);
                p::put_compact_array(buf, &part.replicas, |buf, r| p::put_i32(buf, *r));
                p::put_compact_array(buf, &part.adding_replicas, |buf, r| p::put_i32(buf, *r));
                p::put_compact_array(buf, &part.removing_replicas, |buf, r| p::put_i32(buf, *r));
                TaggedFields::default().encode(buf);
            });
            TaggedFields::default().encode(buf);
        });
        TaggedFields::default().encode(buf);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let error_code = p::get_i16(buf)?;
        let error_message = p::get_compact_nullable_string(buf, "error_message")?;
        let topics = p::get_compact_array(buf, |buf| {
            let name = p::get_compact_string(buf, "name")?;
            let partitions = p::get_compact_array(buf, |buf| {
                let partition_index = p::get_i32(buf)?;
                let replicas = p::get_compact_array(buf, |buf| p::get_i32(buf))?;
                let adding_replicas = p::get_compact_array(buf, |buf| p::get_i32(buf))?;
                let removing_replicas = p::get_compact_array(buf, |buf| p::get_i32(buf))?;
                TaggedFields::decode(buf)?;
                Ok(OngoingPartitionReassignment {
                    partition_index,
                    replicas,
                    adding_replicas,
                    removing_replicas,
                })
            })?;
            TaggedFields::decode(buf)?;
            Ok(OngoingTopicReassignment { name, partitions })
        })?;
        TaggedFields::decode(buf)?;
        Ok(ListPartitionReassignmentsResponse {
            throttle_time_ms,
            error_code,
            error_message,
            topics,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientQuotaComponent {
    pub entity_type: String,
    pub match_type: i8,
    pub match_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeClientQuotasRequest {
    pub components: Vec<ClientQuotaComponent>,
    pub strict: bool,
}

impl DescribeClientQuotasRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_compact_array(buf, &self.components, |buf, c| {
            p::put_compact_string(buf, &c.entity_type);
            p::put_i8(buf, c.match_type);
            p::put_compact_nullable_string(buf, c.match_value.as_deref());
            TaggedFields::default().encode(buf);
        });
        p::put_bool(buf, self.strict);
        TaggedFields::default().encode(buf);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let components = p::get_compact_array(buf, |buf| {
            let entity_type = p::get_compact_string(buf, "entity_type")?;
            let match_type = p::get_i8(buf)?;
            let match_value = p::get_compact_nullable_string(buf, "match")?;
            TaggedFields::decode(buf)?;
            Ok(ClientQuotaComponent {
                entity_type,
                match_type,
                match_value,
            })
        })?;
        let strict = p::get_bool(buf)?;
        TaggedFields::decode(buf)?;
        Ok(DescribeClientQuotasRequest { components, strict })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityData {
    pub entity_type: String,
    pub entity_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueData {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientQuotaEntry {
    pub entity: Vec<EntityData>,
    pub values: Vec<ValueData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeClientQuotasResponse {
    pub throttle_time_ms: i32,
    pub error_code: i16,
    pub error_message: Option<String>,
    pub entries: Vec<ClientQuotaEntry>,
}

impl DescribeClientQuotasResponse {
    pub fn encode(&self, buf: &mut impl BufMut) {
        p::put_i32(buf, self.throttle_time_ms);
        p::put_i16(buf, self.error_code);
        p::put_compact_nullable_string(buf, self.error_message.as_deref());
        p::put_compact_array(buf, &self.entries, |buf, e| {
            p::put_compact_array(buf, &e.entity, |buf, ent| {
                p::put_compact_string(buf, &ent.entity_type);
                p::put_compact_nullable_string(buf, ent.entity_name.as_deref());
                TaggedFields::default().encode(buf);
            });
            p::put_compact_array(buf, &e.values, |buf, v| {
                p::put_compact_string(buf, &v.key);
                p::put_f64(buf, v.value);
                TaggedFields::default().encode(buf);
            });
            TaggedFields::default().encode(buf);
        });
        TaggedFields::default().encode(buf);
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtocolDecodeError> {
        let throttle_time_ms = p::get_i32(buf)?;
        let error_code = p::get_i16(buf)?;
        let error_message = p::get_compact_nullable_string(buf, "error_message")?;
        let entries = p::get_compact_array(buf, |buf| {
            let entity = p::get_compact_array(buf, |buf| {
                let entity_type = p::get_compact_string(buf, "entity_type")?;
                let entity_name = p::get_compact_nullable_string(buf, "entity_name")?;
                TaggedFields::decode(buf)?;
                Ok(EntityData {
                    entity_type,
                    entity_name,
                })
            })?;
            let values = p::get_compact_array(buf, |buf| {
                let key = p::get_compact_string(buf, "key")?;
                let value = p::get_f64(buf)?;
                TaggedFields::decode(buf)?;
                Ok(ValueData { key, value })
            })?;
            TaggedFields::decode(buf)?;
            Ok(ClientQuotaEntry { entity, values })
        })?;
        TaggedFields::decode(buf)?;
        Ok(DescribeClientQuotasResponse {
            throttle_time_ms,
            error_code,
            error_message,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn alter_partition_reassignments_roundtrip() {
        let req = AlterPartitionReassignmentsRequest {
            timeout_ms: 60000,
            topics: vec![ReassignTopic {
                name: "t".to_string(),
                partitions: vec![
                    ReassignPartition {
                        partition_index: 0,
                        replicas: Some(vec![1, 2, 3]),
                    },
                    ReassignPartition {
                        partition_index: 1,
                        replicas: None,
                    },
                ],
            }],
        };
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(AlterPartitionReassignmentsRequest::decode(&mut frozen).unwrap(), req);
    }

    #[test]
    fn list_partition_reassignments_roundtrip_null_topics() {
        let req = ListPartitionReassignmentsRequest {
            timeout_ms: 1000,
            topics: None,
        };
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(ListPartitionReassignmentsRequest::decode(&mut frozen).unwrap(), req);
    }

    #[test]
    fn describe_client_quotas_roundtrip() {
        let req = DescribeClientQuotasRequest {
            components: vec![ClientQuotaComponent {
                entity_type: "user".to_string(),
                match_type: 0,
                match_value: Some("alice".to_string()),
            }],
            strict: true,
        };
        let mut buf = BytesMut::new();
        req.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DescribeClientQuotasRequest::decode(&mut frozen).unwrap(), req);

        let resp = DescribeClientQuotasResponse {
            throttle_time_ms: 0,
            error_code: 0,
            error_message: None,
            entries: vec![ClientQuotaEntry {
                entity: vec![EntityData {
                    entity_type: "user".to_string(),
                    entity_name: Some("alice".to_string()),
                }],
                values: vec![ValueData {
                    key: "producer_byte_rate".to_string(),
                    value: 1024.0,
                }],
            }],
        };
        let mut buf = BytesMut::new();
        resp.encode(&mut buf);
        let mut frozen = buf.freeze();
        assert_eq!(DescribeClientQuotasResponse::decode(&mut frozen).unwrap(), resp);
    }
}
