//! Value types shared across the router, cache, codec and façade (spec §3).
//!
//! These are plain data holders; lifecycles are call-scoped except for
//! [`ControllerRef`] and the coordinator map owned by [`crate::cache`].

use std::collections::HashMap;

/// A broker in the cluster view. Owned by the external broker-client
/// collaborator (§1 C3); the core itself only ever holds `id`s, but the
/// router needs the full record when fanning out per-broker operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: i32,
    pub host: String,
    pub port: i32,
}

/// `{topic, partition}`. Hash/equality by both fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: i32,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        TopicPartition {
            topic: topic.into(),
            partition,
        }
    }
}

impl std::fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.topic, self.partition)
    }
}

/// Singleton inside the controller/coordinator cache (spec §3, §4.2).
///
/// Invariant: `node_id != -1` whenever a `ControllerRef` exists at all;
/// absence (`None` at the call site) means "must refresh before any
/// controller-bound RPC".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerRef {
    pub node_id: i32,
    pub refreshed_at: std::time::Instant,
}

/// `groupId -> nodeId`, populated on successful `FindCoordinator` and
/// evicted on `NotCoordinator` (spec §3, §4.2).
pub type CoordinatorMap = HashMap<String, i32>;

/// `apiKey -> (minVersion, maxVersion)` as reported by a single broker's
/// handshake. Owned by the broker-client collaborator; the negotiator
/// only ever borrows it.
pub type ApiVersionTable = HashMap<i16, (i16, i16)>;

/// ACL operation enum (subset the codec needs — matches the wire's
/// `AclOperation` byte values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AclOperation {
    Unknown = 0,
    Any = 1,
    All = 2,
    Read = 3,
    Write = 4,
    Create = 5,
    Delete = 6,
    Alter = 7,
    Describe = 8,
    ClusterAction = 9,
    DescribeConfigs = 10,
    AlterConfigs = 11,
    IdempotentWrite = 12,
}

impl AclOperation {
    pub fn from_wire(v: i8) -> Self {
        use AclOperation::*;
        match v {
            1 => Any,
            2 => All,
            3 => Read,
            4 => Write,
            5 => Create,
            6 => Delete,
            7 => Alter,
            8 => Describe,
            9 => ClusterAction,
            10 => DescribeConfigs,
            11 => AlterConfigs,
            12 => IdempotentWrite,
            _ => Unknown,
        }
    }

    pub fn wire_value(self) -> i8 {
        self as i8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AclPermissionType {
    Unknown = 0,
    Any = 1,
    Deny = 2,
    Allow = 3,
}

impl AclPermissionType {
    pub fn from_wire(v: i8) -> Self {
        match v {
            1 => AclPermissionType::Any,
            2 => AclPermissionType::Deny,
            3 => AclPermissionType::Allow,
            _ => AclPermissionType::Unknown,
        }
    }

    pub fn wire_value(self) -> i8 {
        self as i8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResourceType {
    Unknown = 0,
    Any = 1,
    Topic = 2,
    Group = 3,
    Cluster = 4,
    TransactionalId = 5,
    DelegationToken = 6,
    Broker = 7,
}

impl ResourceType {
    pub fn from_wire(v: i8) -> Self {
        use ResourceType::*;
        match v {
            1 => Any,
            2 => Topic,
            3 => Group,
            4 => Cluster,
            5 => TransactionalId,
            6 => DelegationToken,
            7 => Broker,
            _ => Unknown,
        }
    }

    pub fn wire_value(self) -> i8 {
        self as i8
    }
}

/// `patternType` on a resource pattern. `Literal` is the implicit value
/// for wire versions that predate this field (spec §4.5 DescribeAcls).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternType {
    Unknown = 0,
    Any = 1,
    Match = 2,
    Literal = 3,
    Prefixed = 4,
}

impl PatternType {
    pub fn from_wire(v: i8) -> Self {
        use PatternType::*;
        match v {
            1 => Any,
            2 => Match,
            3 => Literal,
            4 => Prefixed,
            _ => Unknown,
        }
    }

    pub fn wire_value(self) -> i8 {
        self as i8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePattern {
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub pattern_type: PatternType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acl {
    pub principal: String,
    pub host: String,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
    pub resource_pattern: ResourcePattern,
}

/// Filter counterpart to [`Acl`]/[`ResourcePattern`] for `DescribeAcls`/
/// `DeleteAcls`: every field is independently optional-ish on the wire
/// (empty string / `Any` enum value standing in for "unconstrained").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclFilter {
    pub resource_type: ResourceType,
    pub resource_name: Option<String>,
    pub pattern_type: PatternType,
    pub principal: Option<String>,
    pub host: Option<String>,
    pub operation: AclOperation,
    pub permission_type: AclPermissionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigResourceType {
    Unknown = 0,
    Topic = 2,
    Broker = 4,
    BrokerLogger = 8,
}

impl ConfigResourceType {
    pub fn from_wire(v: i8) -> Self {
        match v {
            2 => ConfigResourceType::Topic,
            4 => ConfigResourceType::Broker,
            8 => ConfigResourceType::BrokerLogger,
            _ => ConfigResourceType::Unknown,
        }
    }

    pub fn wire_value(self) -> i8 {
        self as i8
    }
}

/// `{resourceType, name, configs}`. `configs = None` means "fetch all"
/// on `DescribeConfigs`; an empty map means "zero keys" (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResource {
    pub resource_type: ConfigResourceType,
    pub name: String,
    pub configs: Option<HashMap<String, Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub name: String,
    pub num_partitions: i32,
    pub replication_factor: i16,
    pub replica_assignments: HashMap<i32, Vec<i32>>,
    pub topic_configs: HashMap<String, String>,
}

impl NewTopic {
    pub fn new(name: impl Into<String>, num_partitions: i32, replication_factor: i16) -> Self {
        NewTopic {
            name: name.into(),
            num_partitions,
            replication_factor,
            replica_assignments: HashMap::new(),
            topic_configs: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartitions {
    pub total_count: i32,
    pub new_assignments: Vec<Vec<i32>>,
}

/// `{offset, metadata, leaderEpoch}`. `leader_epoch == -1` on protocol
/// versions <= 4, which carry no epoch field at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetAndMetadata {
    pub offset: i64,
    pub metadata: String,
    pub leader_epoch: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectionType {
    Preferred = 0,
    Unclean = 1,
}

impl ElectionType {
    pub fn wire_value(self) -> i8 {
        self as i8
    }
}
