//! Response error-layout tagging (spec §9).
//!
//! Replaces the source's duck-typed `getattr(response, 'topic_errors',
//! getattr(response, 'topic_error_codes', None))` probing with an
//! explicit per-descriptor flag: the router and façade consult
//! `ErrorLayout` to know which nested shape a response's error codes
//! live in, rather than attribute-probing the decoded struct.

/// Which nested error-array layout a response descriptor uses, replacing
/// the source's duck-typed `getattr(response, 'topic_errors', ...)`
/// probing (spec §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLayout {
    /// A flat `topic -> error_code` list (e.g. `CreateTopicsResponse`).
    TopicLevel,
    /// Errors nested under `(topic, partition)` (e.g. `DeleteRecordsResponse`).
    TopicPartition,
    /// `DeleteAclsResponse`'s `filter_responses[i].matching_acls[j].error_code`.
    FilterMatchingAcls,
    /// `DeleteGroupsResponse`'s flat per-group error list.
    PerGroup,
    /// A single top-level error code with no nested structure.
    TopLevelOnly,
}
