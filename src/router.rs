//! Destination routing policy (spec §4.2 C5).
//!
//! `Destination` names *where* an operation's request(s) go; the grouping
//! helpers below implement the per-operation bucketing spec.md describes
//! in prose (leader-then-topic for `DeleteRecords`, broker-vs-rest for
//! `DescribeConfigs`). The façade (`client.rs`) owns resolving a
//! `Destination` down to a concrete node id via the controller/coordinator
//! cache or the broker client's cluster view — this module only encodes
//! the policy table, it never talks to a broker.

use std::collections::HashMap;

use crate::types::{ConfigResource, ConfigResourceType, TopicPartition};

/// Every admin operation the façade exposes, used purely as a key into
/// [`destination`]. Kept separate from `registry::ApiKey` because one
/// operation can span several API keys (e.g. `ListConsumerGroupOffsets`
/// is `FindCoordinator` + `OffsetFetch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminOperation {
    CreateTopics,
    DeleteTopics,
    CreatePartitions,
    ElectLeaders,
    FindCoordinator,
    DescribeGroups,
    ListConsumerGroupOffsets,
    DeleteGroups,
    ListGroups,
    DescribeConfigsBroker,
    DescribeConfigsOther,
    AlterConfigs,
    Metadata,
    DescribeAcls,
    CreateAcls,
    DeleteAcls,
    DescribeLogDirs,
    DeleteRecords,
}

/// Where an operation's request(s) are sent (spec §4.2 table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The cached controller id (refreshed via C6 as needed).
    Controller,
    /// Any connected broker with the fewest in-flight requests.
    LeastLoadedBroker,
    /// The coordinator of a specific consumer group (looked up via C6).
    CoordinatorOfGroup,
    /// Fan-out across all brokers, or a caller-supplied subset.
    AllBrokers,
    /// The exact node id named by the operation's input (e.g. a BROKER
    /// `ConfigResource`'s name parsed as a node id).
    ExplicitBroker,
    /// The leader of each requested partition (grouped by leader).
    PartitionLeader,
}

/// Static destination policy, spec §4.2's table verbatim — including the
/// `AlterConfigs` defect (should be per-broker for BROKER resources, but
/// isn't) which spec §4.5 explicitly says to preserve rather than silently
/// fix.
pub fn destination(op: AdminOperation) -> Destination {
    use AdminOperation::*;
    use Destination::*;
    match op {
        CreateTopics | DeleteTopics | CreatePartitions | ElectLeaders => Controller,
        FindCoordinator => LeastLoadedBroker,
        DescribeGroups | ListConsumerGroupOffsets | DeleteGroups => CoordinatorOfGroup,
        ListGroups => AllBrokers,
        DescribeConfigsBroker => ExplicitBroker,
        DescribeConfigsOther | AlterConfigs | Metadata | DescribeAcls | CreateAcls | DeleteAcls | DescribeLogDirs => {
            LeastLoadedBroker
        }
        DeleteRecords => PartitionLeader,
    }
}

/// Splits `DescribeConfigs` inputs by `resource_type == BROKER` (spec
/// §4.5): broker resources go one-per-request to the named broker, the
/// rest may share a single request to a least-loaded broker.
pub fn split_describe_configs(resources: Vec<ConfigResource>) -> (Vec<ConfigResource>, Vec<ConfigResource>) {
    resources
        .into_iter()
        .partition(|r| r.resource_type == ConfigResourceType::Broker)
}

/// Parses a BROKER `ConfigResource`'s name as a node id (spec §4.5: "name
/// must parse as an integer").
pub fn broker_resource_node_id(resource: &ConfigResource) -> Result<i32, std::num::ParseIntError> {
    resource.name.parse()
}

/// Buckets `(topic, partition)` pairs by their leader, per spec §4.2's
/// partition-leader lookup: "bucket by leader" for `DeleteRecords`.
/// `leader_of` must resolve every requested partition; absent entries are
/// returned separately so the caller can raise `UnknownTopicOrPartition`
/// naming all of them (spec §4.2).
pub fn group_by_leader(
    partitions: &[TopicPartition],
    leader_of: impl Fn(&TopicPartition) -> Option<i32>,
) -> (HashMap<i32, Vec<TopicPartition>>, Vec<TopicPartition>) {
    let mut by_leader: HashMap<i32, Vec<TopicPartition>> = HashMap::new();
    let mut missing = Vec::new();
    for tp in partitions {
        match leader_of(tp) {
            Some(leader) => by_leader.entry(leader).or_default().push(tp.clone()),
            None => missing.push(tp.clone()),
        }
    }
    (by_leader, missing)
}

/// Further buckets one leader's partitions by topic (spec §4.2: "per
/// leader bucket by topic"), since `DeleteRecords`'s wire shape nests
/// partitions under topics.
pub fn group_by_topic(partitions: &[TopicPartition]) -> HashMap<String, Vec<i32>> {
    let mut by_topic: HashMap<String, Vec<i32>> = HashMap::new();
    for tp in partitions {
        by_topic.entry(tp.topic.clone()).or_default().push(tp.partition);
    }
    by_topic
}

/// Groups group ids by their resolved coordinator, for `DeleteGroups`'s
/// "group ids by coordinator and fan-out one DeleteGroups per coordinator"
/// (spec §4.5).
pub fn group_by_coordinator(group_ids: &[String], coordinator_of: impl Fn(&str) -> i32) -> HashMap<i32, Vec<String>> {
    let mut by_coordinator: HashMap<i32, Vec<String>> = HashMap::new();
    for id in group_ids {
        by_coordinator.entry(coordinator_of(id)).or_default().push(id.clone());
    }
    by_coordinator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_bound_operations() {
        for op in [
            AdminOperation::CreateTopics,
            AdminOperation::DeleteTopics,
            AdminOperation::CreatePartitions,
            AdminOperation::ElectLeaders,
        ] {
            assert_eq!(destination(op), Destination::Controller);
        }
    }

    #[test]
    fn alter_configs_defect_preserved() {
        assert_eq!(destination(AdminOperation::AlterConfigs), Destination::LeastLoadedBroker);
    }

    #[test]
    fn group_by_leader_reports_missing_partitions() {
        let partitions = vec![
            TopicPartition { topic: "t".into(), partition: 0 },
            TopicPartition { topic: "t".into(), partition: 1 },
        ];
        let (by_leader, missing) = group_by_leader(&partitions, |tp| if tp.partition == 0 { Some(5) } else { None });
        assert_eq!(by_leader.get(&5).unwrap().len(), 1);
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn split_describe_configs_partitions_broker_resources() {
        let resources = vec![
            ConfigResource {
                resource_type: ConfigResourceType::Broker,
                name: "1".into(),
                configs: None,
            },
            ConfigResource {
                resource_type: ConfigResourceType::Topic,
                name: "t".into(),
                configs: None,
            },
        ];
        let (brokers, others) = split_describe_configs(resources);
        assert_eq!(brokers.len(), 1);
        assert_eq!(others.len(), 1);
        assert_eq!(broker_resource_node_id(&brokers[0]).unwrap(), 1);
    }
}
