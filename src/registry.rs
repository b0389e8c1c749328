//! Request registry (spec §2 C2, §9 "version registry as a static table").
//!
//! Rather than a class hierarchy carrying one type per `(apiKey, version)`
//! pair, this is a single `match` keyed on `(ApiKey, version)` returning a
//! [`RequestDescriptor`]. A `match` over a small dense integer compiles to
//! a jump table, so this is no less efficient than the teacher/pack's
//! approach and keeps version negotiation a single lookup (spec §9).

use crate::codec::ErrorLayout;

/// Wire API keys this crate's registry and codec know about (spec §6).
/// Includes keys the façade (C8) never calls directly — e.g. the group
/// membership RPCs — because the codec/registry are complete
/// independently of which operations the façade exposes (SPEC_FULL §10.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ApiKey {
    Metadata = 3,
    OffsetFetch = 9,
    FindCoordinator = 10,
    JoinGroup = 11,
    Heartbeat = 12,
    LeaveGroup = 13,
    SyncGroup = 14,
    DescribeGroups = 15,
    ListGroups = 16,
    CreateTopics = 19,
    DeleteTopics = 20,
    DeleteRecords = 21,
    DescribeAcls = 29,
    CreateAcls = 30,
    DeleteAcls = 31,
    DescribeConfigs = 32,
    AlterConfigs = 33,
    DescribeLogDirs = 35,
    SaslAuthenticate = 36,
    CreatePartitions = 37,
    DeleteGroups = 42,
    ElectLeaders = 43,
    AlterPartitionReassignments = 45,
    ListPartitionReassignments = 46,
    DescribeClientQuotas = 48,
}

impl ApiKey {
    pub fn wire_value(self) -> i16 {
        self as i16
    }
}

/// Descriptor for one `(apiKey, version)` pair (spec §3 Request/Response
/// Descriptor). `schema`/`response_schema` are omitted here in favor of
/// the concrete typed structs in `crate::messages` that actually carry
/// the encode/decode logic (see SPEC_FULL §11 C1); this descriptor still
/// records the facts the router and negotiator need without re-deriving
/// them from a message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub api_key: ApiKey,
    pub min_version: i16,
    pub max_version: i16,
    /// First version at which this request uses compact containers +
    /// tagged fields (`FLEXIBLE_VERSION` in the glossary). `None` means
    /// no version of this request is flexible.
    pub flexible_since: Option<i16>,
    pub error_layout: ErrorLayout,
}

macro_rules! descriptor {
    ($key:expr, $min:expr, $max:expr, $flex:expr, $layout:expr) => {
        RequestDescriptor {
            api_key: $key,
            min_version: $min,
            max_version: $max,
            flexible_since: $flex,
            error_layout: $layout,
        }
    };
}

/// Returns the descriptor for an API key, or `None` if the key is not in
/// the registry at all.
pub fn descriptor(key: ApiKey) -> RequestDescriptor {
    use ApiKey::*;
    use ErrorLayout::*;
    match key {
        Metadata => descriptor!(Metadata, 0, 8, Some(9), TopLevelOnly),
        OffsetFetch => descriptor!(OffsetFetch, 0, 5, None, TopicPartition),
        FindCoordinator => descriptor!(FindCoordinator, 0, 3, Some(3), TopLevelOnly),
        JoinGroup => descriptor!(JoinGroup, 0, 7, Some(6), TopLevelOnly),
        Heartbeat => descriptor!(Heartbeat, 0, 4, Some(4), TopLevelOnly),
        LeaveGroup => descriptor!(LeaveGroup, 0, 4, Some(4), TopLevelOnly),
        SyncGroup => descriptor!(SyncGroup, 0, 5, Some(4), TopLevelOnly),
        DescribeGroups => descriptor!(DescribeGroups, 0, 3, None, PerGroup),
        ListGroups => descriptor!(ListGroups, 0, 2, None, TopLevelOnly),
        CreateTopics => descriptor!(CreateTopics, 0, 3, None, TopicLevel),
        DeleteTopics => descriptor!(DeleteTopics, 0, 3, None, TopicLevel),
        DeleteRecords => descriptor!(DeleteRecords, 0, 0, None, TopicPartition),
        DescribeAcls => descriptor!(DescribeAcls, 0, 2, Some(2), TopLevelOnly),
        CreateAcls => descriptor!(CreateAcls, 0, 1, None, TopLevelOnly),
        DeleteAcls => descriptor!(DeleteAcls, 0, 1, None, FilterMatchingAcls),
        DescribeConfigs => descriptor!(DescribeConfigs, 0, 2, None, TopicLevel),
        AlterConfigs => descriptor!(AlterConfigs, 0, 1, None, TopicLevel),
        DescribeLogDirs => descriptor!(DescribeLogDirs, 0, 0, None, TopLevelOnly),
        SaslAuthenticate => descriptor!(SaslAuthenticate, 0, 1, None, TopLevelOnly),
        CreatePartitions => descriptor!(CreatePartitions, 0, 1, None, TopicLevel),
        DeleteGroups => descriptor!(DeleteGroups, 0, 1, None, PerGroup),
        ElectLeaders => descriptor!(ElectLeaders, 0, 1, None, TopicPartition),
        AlterPartitionReassignments => descriptor!(AlterPartitionReassignments, 0, 0, Some(0), TopicPartition),
        ListPartitionReassignments => descriptor!(ListPartitionReassignments, 0, 0, Some(0), TopicPartition),
        DescribeClientQuotas => descriptor!(DescribeClientQuotas, 0, 0, None, TopLevelOnly),
    }
}

/// `highest_supported(apiKey)` — the registry's ceiling. The negotiator
/// combines this with the broker's `ApiVersionTable` (spec §4.3).
pub fn highest_supported(key: ApiKey) -> i16 {
    descriptor(key).max_version
}

pub fn is_flexible(key: ApiKey, version: i16) -> bool {
    matches!(descriptor(key).flexible_since, Some(since) if version >= since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_descriptor_has_nonempty_version_range() {
        for key in [
            ApiKey::Metadata,
            ApiKey::OffsetFetch,
            ApiKey::FindCoordinator,
            ApiKey::JoinGroup,
            ApiKey::Heartbeat,
            ApiKey::LeaveGroup,
            ApiKey::SyncGroup,
            ApiKey::DescribeGroups,
            ApiKey::ListGroups,
            ApiKey::CreateTopics,
            ApiKey::DeleteTopics,
            ApiKey::DeleteRecords,
            ApiKey::DescribeAcls,
            ApiKey::CreateAcls,
            ApiKey::DeleteAcls,
            ApiKey::DescribeConfigs,
            ApiKey::AlterConfigs,
            ApiKey::DescribeLogDirs,
            ApiKey::SaslAuthenticate,
            ApiKey::CreatePartitions,
            ApiKey::DeleteGroups,
            ApiKey::ElectLeaders,
            ApiKey::AlterPartitionReassignments,
            ApiKey::ListPartitionReassignments,
            ApiKey::DescribeClientQuotas,
        ] {
            let d = descriptor(key);
            assert!(d.min_version <= d.max_version);
        }
    }

    #[test]
    fn flexible_reassignment_keys_are_flexible_from_v0() {
        assert!(is_flexible(ApiKey::AlterPartitionReassignments, 0));
        assert!(is_flexible(ApiKey::ListPartitionReassignments, 0));
        assert!(!is_flexible(ApiKey::DeleteRecords, 0));
    }
}
