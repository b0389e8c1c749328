//! Operation façade (spec §4.5 C8): one method per admin operation.
//!
//! `AdminClient<B>` is generic over the [`BrokerClient`] collaborator so
//! embedders plug in their own transport. Every method follows the same
//! shape spec §4.5 describes: validate, negotiate a version, build the
//! request, pick a destination, dispatch (single send or fan-out),
//! inspect the response for broker-reported errors, and return either a
//! typed result or the raw decoded response struct.
//!
//! Façade methods take `&mut self` rather than `&self` — the controller
//! id and coordinator map (spec §5: "mutated only by the calling thread
//! ... do not add internal locking") are private fields behind `&mut`, so
//! a caller sharing one `AdminClient` across threads gets a compile error
//! rather than silent data races. Concurrent use from multiple tasks
//! needs one `AdminClient` per task, or external serialisation — exactly
//! what spec §5 asks callers to do, just enforced by the type system
//! instead of documented as a convention.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use bytes::{Buf, BytesMut};
use tracing::{debug, instrument, warn};

use crate::broker::BrokerClient;
use crate::cache::{ControllerCache, CoordinatorCache};
use crate::codec::header::{self, RequestHeader, ResponseHeader};
use crate::codec::primitives::TaggedFields;
use crate::config::AdminClientConfig;
use crate::error::{AdminError, BrokerErrorCode, ProtocolDecodeError};
use crate::executor::{self, Submission};
use crate::messages::alter_configs::{AlterConfigEntry, AlterConfigResource, AlterConfigsRequest, AlterConfigsResourceResult, AlterConfigsResponse};
use crate::messages::create_acls::{AclCreation, CreateAclsRequest, CreateAclsResponse};
use crate::messages::create_partitions::{CreatePartitionsRequest, CreatePartitionsResponse, CreatePartitionsTopic};
use crate::messages::create_topics::{CreateTopicRequestSpec, CreateTopicsRequest, CreateTopicsResponse, ReplicaAssignment};
use crate::messages::delete_acls::{AclFilterWire, DeleteAclsRequest, DeleteAclsResponse, MatchingAcl};
use crate::messages::delete_groups::{DeleteGroupsRequest, DeleteGroupsResponse};
use crate::messages::delete_records::{DeleteRecordsRequest, DeleteRecordsResponse, PartitionOffset, TopicPartitionOffsets};
use crate::messages::delete_topics::{DeleteTopicsRequest, DeleteTopicsResponse};
use crate::messages::describe_acls::{DescribeAclsRequest, DescribeAclsResponse};
use crate::messages::describe_configs::{ConfigResourceRequest, DescribeConfigsRequest, DescribeConfigsResource, DescribeConfigsResponse};
use crate::messages::describe_groups::{DescribeGroupsRequest, DescribeGroupsResponse};
use crate::messages::describe_log_dirs::{DescribeLogDirsRequest, DescribeLogDirsResponse, LogDirDescription, LogDirTopicRequest};
use crate::messages::elect_leaders::{ElectLeadersRequest, ElectLeadersResponse, TopicPartitions};
use crate::messages::find_coordinator::{CoordinatorKeyType, FindCoordinatorRequest, FindCoordinatorResponse};
use crate::messages::group_wire::{ConsumerProtocolMemberAssignmentV0, ConsumerProtocolMemberMetadataV0};
use crate::messages::list_groups::{GroupOverview, ListGroupsRequest, ListGroupsResponse};
use crate::messages::metadata::{MetadataRequest, MetadataResponse, MetadataTopic};
use crate::messages::offset_fetch::{OffsetFetchRequest, OffsetFetchRequestTopic, OffsetFetchResponse};
use crate::negotiator;
use crate::registry::{self, ApiKey};
use crate::router::{self, AdminOperation};
use crate::types::{Acl, AclFilter, ConfigResource, ConfigResourceType, ElectionType, NewPartitions, NewTopic, OffsetAndMetadata, TopicPartition};

/// `{succeeded, failed}` outcome of [`AdminClient::create_acls`] (spec §4.5
/// CreateAcls).
#[derive(Debug)]
pub struct CreateAclsOutcome {
    pub succeeded: Vec<Acl>,
    pub failed: Vec<(Acl, BrokerErrorCode)>,
}

/// One filter's matched ACLs plus its own filter-level error (spec §4.5
/// DeleteAcls).
#[derive(Debug)]
pub struct DeleteAclsFilterOutcome {
    pub filter: AclFilter,
    pub matched: Vec<(Acl, BrokerErrorCode)>,
    pub filter_error: BrokerErrorCode,
}

/// A consumer group member, with its protocol-specific payloads decoded
/// when the group uses the standard consumer protocol (spec §4.5
/// DescribeConsumerGroups).
#[derive(Debug)]
pub struct ConsumerGroupMember {
    pub member_id: String,
    pub client_id: String,
    pub client_host: String,
    pub metadata: Option<ConsumerProtocolMemberMetadataV0>,
    pub assignment: Option<ConsumerProtocolMemberAssignmentV0>,
}

#[derive(Debug)]
pub struct ConsumerGroupDescription {
    pub group_id: String,
    pub state: String,
    pub protocol_type: String,
    pub protocol: String,
    pub members: Vec<ConsumerGroupMember>,
    pub authorized_operations: Vec<crate::types::AclOperation>,
}

/// Cluster-level view returned by [`AdminClient::describe_cluster`].
#[derive(Debug)]
pub struct ClusterDescription {
    pub cluster_id: Option<String>,
    pub controller_id: i32,
    pub brokers: Vec<crate::messages::metadata::MetadataBroker>,
}

/// One admin operation's view onto a Kafka-compatible broker cluster
/// (spec §4.5 C8). `B` is the embedder-supplied broker-client transport.
pub struct AdminClient<B: BrokerClient> {
    broker: B,
    config: AdminClientConfig,
    controller_cache: ControllerCache,
    coordinator_cache: CoordinatorCache,
    next_correlation_id: i32,
    closed: bool,
}

impl<B: BrokerClient> AdminClient<B> {
    pub fn new(broker: B, config: AdminClientConfig) -> Self {
        AdminClient {
            broker,
            config,
            controller_cache: ControllerCache::new(),
            coordinator_cache: CoordinatorCache::new(),
            next_correlation_id: 0,
            closed: false,
        }
    }

    fn check_open(&self) -> Result<(), AdminError> {
        if self.closed {
            Err(AdminError::Closed)
        } else {
            Ok(())
        }
    }

    fn next_correlation_id(&mut self) -> i32 {
        let id = self.next_correlation_id;
        self.next_correlation_id = self.next_correlation_id.wrapping_add(1);
        id
    }

    /// `v = min(clientMaxForKey, brokerMaxForKey)` (spec §4.3 C4).
    fn negotiated_version(&self, api_key: ApiKey) -> i16 {
        negotiator::negotiate(&|key, max| self.broker.api_version(key, max), api_key)
    }

    fn least_loaded_node(&self) -> Result<i32, AdminError> {
        self.broker.least_loaded_node().ok_or_else(|| AdminError::Connection {
            node_id: -1,
            source: anyhow::anyhow!("no broker currently connected"),
        })
    }

    fn default_timeout(&self) -> i32 {
        self.config.request_timeout_ms as i32
    }

    fn build_request(&mut self, api_key: ApiKey, version: i16, encode_body: impl FnOnce(&mut BytesMut)) -> (i32, bytes::Bytes) {
        let correlation_id = self.next_correlation_id();
        let flexible = registry::is_flexible(api_key, version);
        let mut buf = BytesMut::new();
        let header = RequestHeader {
            api_key: api_key.wire_value(),
            api_version: version,
            correlation_id,
            client_id: self.config.client_id.clone(),
            tagged_fields: if flexible { Some(TaggedFields::default()) } else { None },
        };
        header.encode(&mut buf);
        encode_body(&mut buf);
        (correlation_id, buf.freeze())
    }

    /// Single send/await round trip, returning the body with the response
    /// header already stripped off (spec §4.1 framing, §7 correlation check).
    async fn send_request(
        &mut self,
        node_id: i32,
        api_key: ApiKey,
        version: i16,
        encode_body: impl FnOnce(&mut BytesMut),
    ) -> Result<bytes::Bytes, AdminError> {
        let (correlation_id, request) = self.build_request(api_key, version, encode_body);
        self.broker
            .await_ready(node_id)
            .await
            .map_err(|source| AdminError::Connection { node_id, source })?;
        let mut response = self
            .broker
            .send(node_id, request)
            .await
            .map_err(|source| AdminError::Connection { node_id, source })?;
        let flexible = registry::is_flexible(api_key, version);
        let resp_header = ResponseHeader::decode(&mut response, flexible)?;
        if resp_header.correlation_id != correlation_id {
            return Err(ProtocolDecodeError::CorrelationMismatch {
                expected: correlation_id,
                got: resp_header.correlation_id,
            }
            .into());
        }
        Ok(response)
    }

    /// Fans `items` out concurrently, one request each, and returns their
    /// response bodies in input order regardless of reply order (spec
    /// §4.4 C7). `node_of` resolves each item's destination; `encode`
    /// writes that item's request body.
    async fn fan_out_versioned<T>(
        &mut self,
        api_key: ApiKey,
        version: i16,
        items: Vec<T>,
        node_of: impl Fn(&T) -> i32,
        encode: impl Fn(&T, &mut BytesMut),
    ) -> Result<Vec<bytes::Bytes>, AdminError> {
        let flexible = registry::is_flexible(api_key, version);
        let mut expected_correlation_ids = Vec::with_capacity(items.len());
        let mut submissions = Vec::with_capacity(items.len());
        for item in &items {
            let node_id = node_of(item);
            let (correlation_id, request) = self.build_request(api_key, version, |buf| encode(item, buf));
            expected_correlation_ids.push(correlation_id);
            submissions.push(Submission { node_id, request });
        }
        let responses = executor::fan_out(&self.broker, submissions).await?;
        responses
            .into_iter()
            .zip(expected_correlation_ids)
            .map(|(mut body, expected)| {
                let resp_header = ResponseHeader::decode(&mut body, flexible)?;
                if resp_header.correlation_id != expected {
                    return Err(ProtocolDecodeError::CorrelationMismatch {
                        expected,
                        got: resp_header.correlation_id,
                    }
                    .into());
                }
                Ok(body)
            })
            .collect()
    }

    // ---- controller/coordinator resolution (spec §4.2) -----------------

    async fn ensure_controller(&mut self) -> Result<i32, AdminError> {
        if let Some(controller) = self.controller_cache.get() {
            return Ok(controller.node_id);
        }
        self.refresh_controller().await
    }

    /// Re-runs `Metadata` against a least-loaded broker until the
    /// controller is known, per spec §4.2. Uses a single monotonic
    /// deadline computed once at entry rather than resetting it on every
    /// retry path (Open Question #4, recorded in DESIGN.md) — the
    /// source's bug was resetting the deadline inconsistently depending
    /// on which error path was hit.
    #[instrument(skip(self))]
    async fn refresh_controller(&mut self) -> Result<i32, AdminError> {
        let deadline = Instant::now() + Duration::from_secs(30);
        let version = self.negotiated_version(ApiKey::Metadata);
        negotiator::require_feature("controller discovery", "controller_id", 1, version).map_err(|_| {
            AdminError::UnrecognizedBrokerVersion {
                reason: "Metadata v0 has no controller_id field".to_string(),
            }
        })?;

        loop {
            if Instant::now() >= deadline {
                return Err(AdminError::ControllerRefreshTimedOut);
            }
            let response = self.metadata(None, false, false, false).await?;
            if response.controller_id == -1 {
                debug!("no controller elected yet, retrying after backoff");
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
            if let Some((major, minor, _patch)) = self.broker.check_version(response.controller_id) {
                if (major, minor) < (0, 10) {
                    return Err(AdminError::UnrecognizedBrokerVersion {
                        reason: format!(
                            "controller {} reports version {major}.{minor}, need >= 0.10",
                            response.controller_id
                        ),
                    });
                }
            }
            self.controller_cache.set(response.controller_id);
            return Ok(response.controller_id);
        }
    }

    /// Shared retry envelope for controller-bound operations: up to one
    /// transparent retry after `NotController`, then the error propagates
    /// (spec §4.2, §4.5 state machine: `tries` starts at 2).
    async fn controller_bound_call<Resp>(
        &mut self,
        api_key: ApiKey,
        version: i16,
        encode: impl Fn(&mut BytesMut),
        decode: impl Fn(&mut bytes::Bytes) -> Result<Resp, ProtocolDecodeError>,
        has_not_controller: impl Fn(&Resp) -> bool,
    ) -> Result<Resp, AdminError> {
        let mut tries = 2;
        loop {
            let node = self.ensure_controller().await?;
            let mut body = self.send_request(node, api_key, version, |buf| encode(buf)).await?;
            let response = decode(&mut body)?;
            header::check_trailing(&body, registry::is_flexible(api_key, version))?;
            if has_not_controller(&response) {
                warn!(node, "NotController reported, invalidating controller cache");
                self.controller_cache.invalidate();
                tries -= 1;
                if tries == 0 {
                    return Err(AdminError::broker_reported(
                        "controllerBoundCall",
                        BrokerErrorCode::NotController,
                        "NotController persisted after one refresh+retry",
                    ));
                }
                continue;
            }
            return Ok(response);
        }
    }

    async fn find_coordinator(&mut self, group_id: &str) -> Result<i32, AdminError> {
        Ok(*self.find_coordinators(vec![group_id.to_string()]).await?.get(group_id).expect("resolved above"))
    }

    /// Resolves coordinators for every group in `group_ids` not already
    /// cached, one `FindCoordinator` per miss in parallel (spec §4.2).
    /// The returned map's values are correctly aligned to their keys
    /// regardless of the order brokers reply in — [`fan_out_versioned`]
    /// zips each response back to the request it answers before this
    /// method ever inspects it.
    pub async fn find_coordinators(&mut self, group_ids: Vec<String>) -> Result<HashMap<String, i32>, AdminError> {
        self.check_open()?;
        let missing: Vec<String> = self.coordinator_cache.missing(&group_ids).into_iter().map(str::to_string).collect();
        if !missing.is_empty() {
            let version = self.negotiated_version(ApiKey::FindCoordinator);
            let node = self.least_loaded_node()?;
            let responses = self
                .fan_out_versioned(ApiKey::FindCoordinator, version, missing.clone(), |_| node, |group_id, buf| {
                    let request = FindCoordinatorRequest {
                        key: group_id.clone(),
                        key_type: CoordinatorKeyType::Group,
                    };
                    request.encode(version, buf);
                })
                .await?;
            for (group_id, mut body) in missing.into_iter().zip(responses) {
                let response = FindCoordinatorResponse::decode(version, &mut body)?;
                header::check_trailing(&body, registry::is_flexible(ApiKey::FindCoordinator, version))?;
                let code = BrokerErrorCode::from_wire(response.error_code);
                if !code.is_no_error() {
                    return Err(AdminError::broker_reported(
                        "findCoordinator",
                        code,
                        response.error_message.unwrap_or(group_id),
                    ));
                }
                self.coordinator_cache.set(group_id, response.node_id);
            }
        }
        Ok(group_ids
            .iter()
            .map(|id| (id.clone(), self.coordinator_cache.get(id).expect("resolved above")))
            .collect())
    }

    // ---- Metadata-backed operations -------------------------------------

    async fn metadata(
        &mut self,
        topics: Option<Vec<String>>,
        allow_auto_topic_creation: bool,
        include_cluster_authorized_operations: bool,
        include_topic_authorized_operations: bool,
    ) -> Result<MetadataResponse, AdminError> {
        let version = self.negotiated_version(ApiKey::Metadata);
        if allow_auto_topic_creation {
            negotiator::require_feature("metadata", "auto_topic_creation", 4, version)?;
        }
        if include_cluster_authorized_operations || include_topic_authorized_operations {
            negotiator::require_feature("metadata", "include_authorized_operations", 8, version)?;
        }
        let node = self.least_loaded_node()?;
        let request = MetadataRequest {
            topics,
            allow_auto_topic_creation,
            include_cluster_authorized_operations,
            include_topic_authorized_operations,
        };
        let mut body = self.send_request(node, ApiKey::Metadata, version, |buf| request.encode(version, buf)).await?;
        let response = MetadataResponse::decode(version, &mut body)?;
        header::check_trailing(&body, registry::is_flexible(ApiKey::Metadata, version))?;
        Ok(response)
    }

    /// All topic names known to the cluster (spec §8 S2).
    pub async fn list_topics(&mut self) -> Result<Vec<String>, AdminError> {
        self.check_open()?;
        let response = self.metadata(None, false, false, false).await?;
        Ok(response.topics.into_iter().map(|t| t.name).collect())
    }

    pub async fn describe_topics(&mut self, names: Option<Vec<String>>) -> Result<Vec<MetadataTopic>, AdminError> {
        self.check_open()?;
        let response = self.metadata(names, false, false, false).await?;
        Ok(response.topics)
    }

    pub async fn describe_cluster(&mut self) -> Result<ClusterDescription, AdminError> {
        self.check_open()?;
        let response = self.metadata(Some(Vec::new()), false, true, false).await?;
        Ok(ClusterDescription {
            cluster_id: response.cluster_id,
            controller_id: response.controller_id,
            brokers: response.brokers,
        })
    }

    async fn all_known_partitions(&mut self) -> Result<HashMap<String, Vec<i32>>, AdminError> {
        let response = self.metadata(None, false, false, false).await?;
        Ok(response
            .topics
            .into_iter()
            .map(|t| (t.name, t.partitions.into_iter().map(|p| p.partition_index).collect()))
            .collect())
    }

    async fn leaders_for(&mut self, topics: &[String]) -> Result<HashMap<TopicPartition, i32>, AdminError> {
        let response = self.metadata(Some(topics.to_vec()), false, false, false).await?;
        let mut leaders = HashMap::new();
        for topic in response.topics {
            for partition in topic.partitions {
                leaders.insert(TopicPartition::new(topic.name.clone(), partition.partition_index), partition.leader_id);
            }
        }
        Ok(leaders)
    }

    // ---- Controller-bound operations (spec §4.2 table) ------------------

    /// Builds and sends a `CreateTopics` request (spec §4.5 CreateTopics).
    /// At v0, `validate_only=true` is rejected outright.
    pub async fn create_topics(
        &mut self,
        topics: Vec<NewTopic>,
        timeout_ms: Option<i32>,
        validate_only: bool,
    ) -> Result<CreateTopicsResponse, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::CreateTopics);
        if validate_only {
            negotiator::require_feature("createTopics", "validate_only", 1, version)?;
        }
        let create_topic_requests = topics
            .into_iter()
            .map(|t| CreateTopicRequestSpec {
                topic: t.name,
                num_partitions: t.num_partitions,
                replication_factor: t.replication_factor,
                replica_assignment: t
                    .replica_assignments
                    .into_iter()
                    .map(|(partition_id, replicas)| ReplicaAssignment { partition_id, replicas })
                    .collect(),
                configs: t.topic_configs.into_iter().collect(),
            })
            .collect();
        let request = CreateTopicsRequest {
            create_topic_requests,
            timeout: timeout_ms.unwrap_or_else(|| self.default_timeout()),
            validate_only,
        };
        let response = self
            .controller_bound_call(
                ApiKey::CreateTopics,
                version,
                |buf| request.encode(version, buf),
                |buf| CreateTopicsResponse::decode(version, buf),
                |resp: &CreateTopicsResponse| {
                    resp.topic_errors
                        .iter()
                        .any(|e| BrokerErrorCode::from_wire(e.error_code) == BrokerErrorCode::NotController)
                },
            )
            .await?;
        if let Some(err) = response
            .topic_errors
            .iter()
            .find(|e| !BrokerErrorCode::from_wire(e.error_code).is_no_error())
        {
            return Err(AdminError::broker_reported(
                "createTopics",
                BrokerErrorCode::from_wire(err.error_code),
                format!("{}: {}", err.topic, err.error_message),
            ));
        }
        Ok(response)
    }

    pub async fn delete_topics(&mut self, topics: Vec<String>, timeout_ms: Option<i32>) -> Result<DeleteTopicsResponse, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::DeleteTopics);
        let request = DeleteTopicsRequest {
            topics,
            timeout: timeout_ms.unwrap_or_else(|| self.default_timeout()),
        };
        let response = self
            .controller_bound_call(
                ApiKey::DeleteTopics,
                version,
                |buf| request.encode(version, buf),
                |buf| DeleteTopicsResponse::decode(version, buf),
                |resp: &DeleteTopicsResponse| {
                    resp.topic_error_codes
                        .iter()
                        .any(|e| BrokerErrorCode::from_wire(e.error_code) == BrokerErrorCode::NotController)
                },
            )
            .await?;
        if let Some(err) = response
            .topic_error_codes
            .iter()
            .find(|e| !BrokerErrorCode::from_wire(e.error_code).is_no_error())
        {
            return Err(AdminError::broker_reported(
                "deleteTopics",
                BrokerErrorCode::from_wire(err.error_code),
                err.topic.clone(),
            ));
        }
        Ok(response)
    }

    pub async fn create_partitions(
        &mut self,
        partitions: HashMap<String, NewPartitions>,
        timeout_ms: Option<i32>,
        validate_only: bool,
    ) -> Result<CreatePartitionsResponse, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::CreatePartitions);
        let topics = partitions
            .into_iter()
            .map(|(topic, new_partitions)| CreatePartitionsTopic {
                topic,
                new_total_replica_count: new_partitions.total_count,
                assignment: new_partitions.new_assignments,
            })
            .collect();
        let request = CreatePartitionsRequest {
            topics,
            timeout: timeout_ms.unwrap_or_else(|| self.default_timeout()),
            validate_only,
        };
        let response = self
            .controller_bound_call(
                ApiKey::CreatePartitions,
                version,
                |buf| request.encode(version, buf),
                |buf| CreatePartitionsResponse::decode(version, buf),
                |resp: &CreatePartitionsResponse| {
                    resp.results
                        .iter()
                        .any(|r| BrokerErrorCode::from_wire(r.error_code) == BrokerErrorCode::NotController)
                },
            )
            .await?;
        if let Some(err) = response
            .results
            .iter()
            .find(|r| !BrokerErrorCode::from_wire(r.error_code).is_no_error())
        {
            return Err(AdminError::broker_reported(
                "createPartitions",
                BrokerErrorCode::from_wire(err.error_code),
                err.topic.clone(),
            ));
        }
        Ok(response)
    }

    /// `topic_partitions=None` means "all known partitions" derived from
    /// the cluster view (spec §4.5 PerformLeaderElection). `ElectionNotNeeded`
    /// is treated as success.
    pub async fn perform_leader_election(
        &mut self,
        election_type: ElectionType,
        topic_partitions: Option<HashMap<String, Vec<i32>>>,
        timeout_ms: Option<i32>,
    ) -> Result<ElectLeadersResponse, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::ElectLeaders);
        let topic_partitions = match topic_partitions {
            Some(tp) => tp,
            None => self.all_known_partitions().await?,
        };
        let topic_partitions_wire: Vec<TopicPartitions> = topic_partitions
            .into_iter()
            .map(|(topic, partition_ids)| TopicPartitions { topic, partition_ids })
            .collect();
        let request = ElectLeadersRequest {
            election_type,
            topic_partitions: topic_partitions_wire,
            timeout: timeout_ms.unwrap_or_else(|| self.default_timeout()),
        };
        let response = self
            .controller_bound_call(
                ApiKey::ElectLeaders,
                version,
                |buf| request.encode(buf),
                |buf| ElectLeadersResponse::decode(buf),
                |resp: &ElectLeadersResponse| {
                    BrokerErrorCode::from_wire(resp.error_code) == BrokerErrorCode::NotController
                        || resp.replication_election_results.iter().any(|t| {
                            t.partition_result
                                .iter()
                                .any(|p| BrokerErrorCode::from_wire(p.error_code) == BrokerErrorCode::NotController)
                        })
                },
            )
            .await?;
        let top = BrokerErrorCode::from_wire(response.error_code);
        if !top.is_no_error() {
            return Err(AdminError::broker_reported("performLeaderElection", top, "top-level election error"));
        }
        for topic_result in &response.replication_election_results {
            for partition_result in &topic_result.partition_result {
                let code = BrokerErrorCode::from_wire(partition_result.error_code);
                if !code.is_no_error() && code != BrokerErrorCode::ElectionNotNeeded {
                    return Err(AdminError::broker_reported(
                        "performLeaderElection",
                        code,
                        format!("{}:{}", topic_result.topic, partition_result.partition_id),
                    ));
                }
            }
        }
        Ok(response)
    }

    // ---- Coordinator-bound operations ------------------------------------

    pub async fn describe_consumer_groups(
        &mut self,
        group_ids: Vec<String>,
        include_authorized_operations: bool,
        coordinator_override: Option<i32>,
    ) -> Result<Vec<ConsumerGroupDescription>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::DescribeGroups);
        if include_authorized_operations {
            negotiator::require_feature("describeConsumerGroups", "include_authorized_operations", 3, version)?;
        }
        let coordinators: HashMap<String, i32> = match coordinator_override {
            Some(node) => group_ids.iter().map(|g| (g.clone(), node)).collect(),
            None => self.find_coordinators(group_ids.clone()).await?,
        };

        let responses = self
            .fan_out_versioned(ApiKey::DescribeGroups, version, group_ids.clone(), |group_id| coordinators[group_id], |group_id, buf| {
                let request = DescribeGroupsRequest {
                    groups: vec![group_id.clone()],
                    include_authorized_operations,
                };
                request.encode(version, buf);
            })
            .await?;

        let mut out = Vec::with_capacity(group_ids.len());
        for (group_id, mut body) in group_ids.into_iter().zip(responses) {
            let response = DescribeGroupsResponse::decode(version, &mut body)?;
            header::check_trailing(&body, registry::is_flexible(ApiKey::DescribeGroups, version))?;
            let group = response
                .groups
                .into_iter()
                .next()
                .ok_or_else(|| AdminError::broker_reported("describeConsumerGroups", BrokerErrorCode::Other(-1), group_id.clone()))?;
            let code = BrokerErrorCode::from_wire(group.error_code);
            if !code.is_no_error() {
                return Err(AdminError::broker_reported("describeConsumerGroups", code, group_id));
            }
            let standard_protocol = group.protocol_type == "consumer" || group.protocol_type.is_empty();
            let mut members = Vec::with_capacity(group.members.len());
            for m in group.members {
                let (metadata, assignment) = if standard_protocol {
                    let metadata = if !m.member_metadata.is_empty() {
                        let mut buf = bytes::Bytes::from(m.member_metadata);
                        Some(ConsumerProtocolMemberMetadataV0::decode(&mut buf)?)
                    } else {
                        None
                    };
                    let assignment = if !m.member_assignment.is_empty() {
                        let mut buf = bytes::Bytes::from(m.member_assignment);
                        Some(ConsumerProtocolMemberAssignmentV0::decode(&mut buf)?)
                    } else {
                        None
                    };
                    (metadata, assignment)
                } else {
                    (None, None)
                };
                members.push(ConsumerGroupMember {
                    member_id: m.member_id,
                    client_id: m.client_id,
                    client_host: m.client_host,
                    metadata,
                    assignment,
                });
            }
            out.push(ConsumerGroupDescription {
                group_id,
                state: group.state,
                protocol_type: group.protocol_type,
                protocol: group.protocol,
                members,
                authorized_operations: group.authorized_operations,
            });
        }
        Ok(out)
    }

    /// Fans `ListGroups` out to every connected broker (or a caller
    /// subset) and unions the results, since a group can briefly be
    /// reported by two brokers during a coordinator handoff (spec §4.5
    /// ListConsumerGroups).
    pub async fn list_consumer_groups(&mut self, brokers: Option<Vec<i32>>) -> Result<Vec<GroupOverview>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::ListGroups);
        let nodes = match brokers {
            Some(b) => b,
            None => self.broker.brokers().iter().map(|n| n.id).collect(),
        };
        let responses = self
            .fan_out_versioned(ApiKey::ListGroups, version, nodes, |node_id| *node_id, |_node_id, buf| {
                ListGroupsRequest.encode(buf);
            })
            .await?;
        let mut seen = HashSet::new();
        let mut groups = Vec::new();
        for mut body in responses {
            let response = ListGroupsResponse::decode(version, &mut body)?;
            header::check_trailing(&body, registry::is_flexible(ApiKey::ListGroups, version))?;
            let code = BrokerErrorCode::from_wire(response.error_code);
            if !code.is_no_error() {
                return Err(AdminError::broker_reported("listConsumerGroups", code, "listGroups failed"));
            }
            for group in response.groups {
                if seen.insert(group.group.clone()) {
                    groups.push(group);
                }
            }
        }
        Ok(groups)
    }

    pub async fn list_consumer_group_offsets(
        &mut self,
        group_id: String,
        partitions: Option<Vec<TopicPartition>>,
        coordinator_override: Option<i32>,
    ) -> Result<HashMap<TopicPartition, OffsetAndMetadata>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::OffsetFetch);
        if partitions.is_none() {
            negotiator::require_feature("listConsumerGroupOffsets", "partitions=None", 2, version)?;
        }
        let node = match coordinator_override {
            Some(n) => n,
            None => self.find_coordinator(&group_id).await?,
        };
        let topics = partitions.as_ref().map(|parts| {
            let mut by_topic = router::group_by_topic(parts);
            by_topic
                .drain()
                .map(|(name, partition_indexes)| OffsetFetchRequestTopic { name, partition_indexes })
                .collect::<Vec<_>>()
        });
        let request = OffsetFetchRequest {
            group_id: group_id.clone(),
            topics,
        };
        let mut body = self
            .send_request(node, ApiKey::OffsetFetch, version, |buf| request.encode(version, buf))
            .await?;
        let response = OffsetFetchResponse::decode(version, &mut body)?;
        header::check_trailing(&body, registry::is_flexible(ApiKey::OffsetFetch, version))?;
        if version >= 2 {
            let top = BrokerErrorCode::from_wire(response.error_code);
            if !top.is_no_error() {
                return Err(AdminError::broker_reported("listConsumerGroupOffsets", top, group_id));
            }
        }
        let mut out = HashMap::new();
        for topic in response.topics {
            for p in topic.partitions {
                let code = BrokerErrorCode::from_wire(p.error_code);
                if !code.is_no_error() {
                    return Err(AdminError::broker_reported(
                        "listConsumerGroupOffsets",
                        code,
                        format!("{}:{}", topic.name, p.partition_index),
                    ));
                }
                out.insert(
                    TopicPartition::new(topic.name.clone(), p.partition_index),
                    OffsetAndMetadata {
                        offset: p.committed_offset,
                        metadata: p.metadata.unwrap_or_default(),
                        leader_epoch: p.committed_leader_epoch,
                    },
                );
            }
        }
        Ok(out)
    }

    /// Groups ids by coordinator and fans out one `DeleteGroups` per
    /// coordinator with that coordinator's subset (spec §4.5
    /// DeleteConsumerGroups); always returns the full `(groupId, error)`
    /// list rather than failing fast, since partial failure here is
    /// expected and every caller needs per-group attribution.
    pub async fn delete_consumer_groups(&mut self, group_ids: Vec<String>) -> Result<Vec<(String, BrokerErrorCode)>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::DeleteGroups);
        let coordinators = self.find_coordinators(group_ids.clone()).await?;
        let by_coordinator = router::group_by_coordinator(&group_ids, |g| coordinators[g]);
        let items: Vec<(i32, Vec<String>)> = by_coordinator.into_iter().collect();
        let responses = self
            .fan_out_versioned(ApiKey::DeleteGroups, version, items, |(node_id, _groups)| *node_id, |(_node_id, groups), buf| {
                let request = DeleteGroupsRequest { groups_names: groups.clone() };
                request.encode(buf);
            })
            .await?;
        let mut out = Vec::new();
        for mut body in responses {
            let response = DeleteGroupsResponse::decode(&mut body)?;
            header::check_trailing(&body, registry::is_flexible(ApiKey::DeleteGroups, version))?;
            for result in response.results {
                out.push((result.group_id, BrokerErrorCode::from_wire(result.error_code)));
            }
        }
        Ok(out)
    }

    /// Resolves leaders via a live `Metadata` call, buckets requested
    /// offsets by leader then by topic, and fans out one `DeleteRecords`
    /// per leader (spec §4.2, §4.5, §8 properties 4/6).
    pub async fn delete_records(
        &mut self,
        offsets: HashMap<TopicPartition, i64>,
        timeout_ms: Option<i32>,
    ) -> Result<HashMap<TopicPartition, i64>, AdminError> {
        self.check_open()?;
        let partitions: Vec<TopicPartition> = offsets.keys().cloned().collect();
        let mut topics: Vec<String> = partitions.iter().map(|tp| tp.topic.clone()).collect();
        topics.sort();
        topics.dedup();
        let leaders = self.leaders_for(&topics).await?;
        let (by_leader, missing) = router::group_by_leader(&partitions, |tp| leaders.get(tp).copied());
        if !missing.is_empty() {
            return Err(AdminError::UnknownTopicOrPartition(missing));
        }

        let timeout = timeout_ms.unwrap_or_else(|| self.default_timeout());
        let items: Vec<(i32, Vec<TopicPartition>)> = by_leader.into_iter().collect();
        let version = self.negotiated_version(ApiKey::DeleteRecords);
        let responses = self
            .fan_out_versioned(ApiKey::DeleteRecords, version, items, |(node_id, _parts)| *node_id, |(_node_id, parts), buf| {
                let by_topic = router::group_by_topic(parts);
                let topics_wire = by_topic
                    .into_iter()
                    .map(|(name, partition_indexes)| TopicPartitionOffsets {
                        partitions: partition_indexes
                            .into_iter()
                            .map(|idx| PartitionOffset {
                                partition_index: idx,
                                offset: offsets[&TopicPartition::new(name.clone(), idx)],
                            })
                            .collect(),
                        name,
                    })
                    .collect();
                let request = DeleteRecordsRequest { topics: topics_wire, timeout_ms: timeout };
                request.encode(buf);
            })
            .await?;

        let mut results = HashMap::new();
        let mut failures: Vec<(TopicPartition, BrokerErrorCode)> = Vec::new();
        for mut body in responses {
            let response = DeleteRecordsResponse::decode(&mut body)?;
            header::check_trailing(&body, registry::is_flexible(ApiKey::DeleteRecords, version))?;
            for topic in response.topics {
                for partition in topic.partitions {
                    let tp = TopicPartition::new(topic.name.clone(), partition.partition_index);
                    let code = BrokerErrorCode::from_wire(partition.error_code);
                    if code.is_no_error() {
                        results.insert(tp, partition.low_watermark);
                    } else {
                        failures.push((tp, code));
                    }
                }
            }
        }
        match failures.len() {
            0 => Ok(results),
            1 => {
                let (tp, code) = failures.into_iter().next().unwrap();
                Err(AdminError::broker_reported("deleteRecords", code, tp.to_string()))
            }
            _ => {
                let summary = failures
                    .iter()
                    .map(|(tp, code)| format!("{tp}:{code}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(AdminError::AggregateDeleteRecords(summary))
            }
        }
    }

    // ---- Broker-bound operations ----------------------------------------

    pub async fn describe_configs(
        &mut self,
        resources: Vec<ConfigResource>,
        include_synonyms: bool,
    ) -> Result<Vec<DescribeConfigsResource>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::DescribeConfigs);
        if include_synonyms {
            negotiator::require_feature("describeConfigs", "include_synonyms", 1, version)?;
        }
        let (broker_resources, other_resources) = router::split_describe_configs(resources);

        let mut node_requests: Vec<(i32, Vec<ConfigResourceRequest>)> = Vec::new();
        for resource in broker_resources {
            let node_id = router::broker_resource_node_id(&resource)
                .map_err(|_| AdminError::Configuration(format!("broker resource name '{}' is not a valid node id", resource.name)))?;
            node_requests.push((node_id, vec![config_resource_to_wire(resource)]));
        }
        if !other_resources.is_empty() {
            let node_id = self.least_loaded_node()?;
            node_requests.push((node_id, other_resources.into_iter().map(config_resource_to_wire).collect()));
        }

        let responses = self
            .fan_out_versioned(ApiKey::DescribeConfigs, version, node_requests, |(node_id, _resources)| *node_id, |(_node_id, resources), buf| {
                let request = DescribeConfigsRequest {
                    resources: resources.clone(),
                    include_synonyms,
                };
                request.encode(version, buf);
            })
            .await?;

        let mut out = Vec::new();
        for mut body in responses {
            let response = DescribeConfigsResponse::decode(version, &mut body)?;
            header::check_trailing(&body, registry::is_flexible(ApiKey::DescribeConfigs, version))?;
            for resource in response.resources {
                let code = BrokerErrorCode::from_wire(resource.error_code);
                if !code.is_no_error() {
                    return Err(AdminError::broker_reported(
                        "describeConfigs",
                        code,
                        resource.error_message.clone().unwrap_or_default(),
                    ));
                }
                out.push(resource);
            }
        }
        Ok(out)
    }

    /// Single request to a least-loaded broker. Known defect preserved
    /// rather than silently fixed: BROKER resources should be routed to
    /// their owning broker (spec §4.5, §9 Open Question 1).
    pub async fn alter_configs(
        &mut self,
        resources: Vec<ConfigResource>,
        validate_only: bool,
    ) -> Result<Vec<AlterConfigsResourceResult>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::AlterConfigs);
        let node = self.least_loaded_node()?;
        let mut wire_resources = Vec::with_capacity(resources.len());
        for resource in resources {
            let configs = resource
                .configs
                .ok_or_else(|| AdminError::Configuration(format!("alterConfigs requires explicit configs for resource '{}'", resource.name)))?;
            let config_entries = configs
                .into_iter()
                .map(|(config_name, config_value)| AlterConfigEntry { config_name, config_value })
                .collect();
            wire_resources.push(AlterConfigResource {
                resource_type: resource.resource_type,
                resource_name: resource.name,
                config_entries,
            });
        }
        let request = AlterConfigsRequest {
            resources: wire_resources,
            validate_only,
        };
        let mut body = self.send_request(node, ApiKey::AlterConfigs, version, |buf| request.encode(buf)).await?;
        let response = AlterConfigsResponse::decode(&mut body)?;
        header::check_trailing(&body, registry::is_flexible(ApiKey::AlterConfigs, version))?;
        for resource in &response.resources {
            let code = BrokerErrorCode::from_wire(resource.error_code);
            if !code.is_no_error() {
                return Err(AdminError::broker_reported(
                    "alterConfigs",
                    code,
                    resource.error_message.clone().unwrap_or_default(),
                ));
            }
        }
        Ok(response.resources)
    }

    pub async fn describe_acls(&mut self, filter: AclFilter) -> Result<Vec<Acl>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::DescribeAcls);
        let required = if matches!(filter.pattern_type, crate::types::PatternType::Literal | crate::types::PatternType::Unknown) {
            0
        } else {
            1
        };
        negotiator::require_feature("describeAcls", "resourcePatternTypeFilter", required, version)?;
        let node = self.least_loaded_node()?;
        let request = DescribeAclsRequest {
            resource_type: filter.resource_type,
            resource_name: filter.resource_name,
            resource_pattern_type_filter: filter.pattern_type,
            principal: filter.principal,
            host: filter.host,
            operation: filter.operation,
            permission_type: filter.permission_type,
        };
        let mut body = self
            .send_request(node, ApiKey::DescribeAcls, version, |buf| request.encode(version, buf))
            .await?;
        let response = DescribeAclsResponse::decode(version, &mut body)?;
        header::check_trailing(&body, registry::is_flexible(ApiKey::DescribeAcls, version))?;
        let top = BrokerErrorCode::from_wire(response.error_code);
        if !top.is_no_error() {
            return Err(AdminError::broker_reported("describeAcls", top, response.error_message.unwrap_or_default()));
        }
        let mut acls = Vec::new();
        for resource in response.resources {
            let resource_pattern = crate::types::ResourcePattern {
                resource_type: resource.resource_type,
                resource_name: resource.resource_name,
                pattern_type: resource.resource_pattern_type,
            };
            for description in resource.acls {
                acls.push(Acl {
                    principal: description.principal,
                    host: description.host,
                    operation: description.operation,
                    permission_type: description.permission_type,
                    resource_pattern: resource_pattern.clone(),
                });
            }
        }
        Ok(acls)
    }

    pub async fn create_acls(&mut self, acls: Vec<Acl>) -> Result<CreateAclsOutcome, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::CreateAcls);
        let node = self.least_loaded_node()?;
        let creations = acls
            .iter()
            .map(|a| AclCreation {
                resource_type: a.resource_pattern.resource_type,
                resource_name: a.resource_pattern.resource_name.clone(),
                resource_pattern_type: a.resource_pattern.pattern_type,
                principal: a.principal.clone(),
                host: a.host.clone(),
                operation: a.operation,
                permission_type: a.permission_type,
            })
            .collect();
        let request = CreateAclsRequest { creations };
        let mut body = self.send_request(node, ApiKey::CreateAcls, version, |buf| request.encode(version, buf)).await?;
        let response = CreateAclsResponse::decode(&mut body)?;
        header::check_trailing(&body, registry::is_flexible(ApiKey::CreateAcls, version))?;
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (acl, result) in acls.into_iter().zip(response.creation_responses) {
            let code = BrokerErrorCode::from_wire(result.error_code);
            if code.is_no_error() {
                succeeded.push(acl);
            } else {
                failed.push((acl, code));
            }
        }
        Ok(CreateAclsOutcome { succeeded, failed })
    }

    pub async fn delete_acls(&mut self, filters: Vec<AclFilter>) -> Result<Vec<DeleteAclsFilterOutcome>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::DeleteAcls);
        let node = self.least_loaded_node()?;
        let wire_filters = filters
            .iter()
            .map(|f| AclFilterWire {
                resource_type: f.resource_type,
                resource_name: f.resource_name.clone(),
                resource_pattern_type_filter: f.pattern_type,
                principal: f.principal.clone(),
                host: f.host.clone(),
                operation: f.operation,
                permission_type: f.permission_type,
            })
            .collect();
        let request = DeleteAclsRequest { filters: wire_filters };
        let mut body = self.send_request(node, ApiKey::DeleteAcls, version, |buf| request.encode(version, buf)).await?;
        let response = DeleteAclsResponse::decode(version, &mut body)?;
        header::check_trailing(&body, registry::is_flexible(ApiKey::DeleteAcls, version))?;
        let mut outcomes = Vec::with_capacity(filters.len());
        for (filter, filter_result) in filters.into_iter().zip(response.filter_responses) {
            let matched = filter_result
                .matching_acls
                .into_iter()
                .map(|m: MatchingAcl| {
                    let code = BrokerErrorCode::from_wire(m.error_code);
                    let acl = Acl {
                        principal: m.principal,
                        host: m.host,
                        operation: m.operation,
                        permission_type: m.permission_type,
                        resource_pattern: crate::types::ResourcePattern {
                            resource_type: m.resource_type,
                            resource_name: m.resource_name,
                            pattern_type: m.resource_pattern_type,
                        },
                    };
                    (acl, code)
                })
                .collect();
            outcomes.push(DeleteAclsFilterOutcome {
                filter,
                matched,
                filter_error: BrokerErrorCode::from_wire(filter_result.error_code),
            });
        }
        Ok(outcomes)
    }

    pub async fn describe_log_dirs(
        &mut self,
        topics: Option<HashMap<String, Vec<i32>>>,
    ) -> Result<Vec<LogDirDescription>, AdminError> {
        self.check_open()?;
        let version = self.negotiated_version(ApiKey::DescribeLogDirs);
        let node = self.least_loaded_node()?;
        let topics_wire = topics
            .unwrap_or_default()
            .into_iter()
            .map(|(topic, partitions)| LogDirTopicRequest { topic, partitions })
            .collect();
        let request = DescribeLogDirsRequest { topics: topics_wire };
        let mut body = self.send_request(node, ApiKey::DescribeLogDirs, version, |buf| request.encode(buf)).await?;
        let response = DescribeLogDirsResponse::decode(&mut body)?;
        header::check_trailing(&body, registry::is_flexible(ApiKey::DescribeLogDirs, version))?;
        Ok(response.log_dirs)
    }

    /// Idempotent close (spec §5): marks the instance closed so
    /// subsequent calls fail fast with [`AdminError::Closed`]. The broker
    /// client's own shutdown is the embedder's responsibility — this
    /// crate never owns the socket it runs over.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

fn config_resource_to_wire(resource: ConfigResource) -> ConfigResourceRequest {
    ConfigResourceRequest {
        resource_type: resource.resource_type,
        resource_name: resource.name,
        config_names: resource.configs.map(|c| c.keys().cloned().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::PartitionInfo;
    use crate::messages::create_topics::TopicError;
    use crate::messages::delete_records::{PartitionResult, TopicPartitionResults};
    use crate::messages::describe_groups::GroupDescription;
    use crate::messages::metadata::{MetadataBroker, MetadataPartition};
    use crate::types::Node;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Hand-rolled in-process broker for façade scenario tests (spec §8).
    /// Scripted per-api-key response sequences let each test drive a
    /// specific sequence of broker replies without a real socket.
    struct MockBroker {
        metadata_responses: Mutex<Vec<MetadataResponse>>,
        create_topics_responses: Mutex<Vec<CreateTopicsResponse>>,
        find_coordinator_by_group: Mutex<HashMap<String, FindCoordinatorResponse>>,
        describe_groups_by_group: Mutex<HashMap<String, DescribeGroupsResponse>>,
        delete_records_by_node: Mutex<HashMap<i32, DeleteRecordsResponse>>,
        delete_records_seen: Mutex<Vec<(i32, DeleteRecordsRequest)>>,
        describe_configs_by_node: Mutex<HashMap<i32, DescribeConfigsResponse>>,
        describe_configs_seen: Mutex<Vec<(i32, DescribeConfigsRequest)>>,
        elect_leaders_response: Mutex<Option<ElectLeadersResponse>>,
        elect_leaders_seen: Mutex<Option<ElectLeadersRequest>>,
        least_loaded: i32,
        brokers: Vec<Node>,
    }

    impl MockBroker {
        fn new(least_loaded: i32) -> Self {
            MockBroker {
                metadata_responses: Mutex::new(Vec::new()),
                create_topics_responses: Mutex::new(Vec::new()),
                find_coordinator_by_group: Mutex::new(HashMap::new()),
                describe_groups_by_group: Mutex::new(HashMap::new()),
                delete_records_by_node: Mutex::new(HashMap::new()),
                delete_records_seen: Mutex::new(Vec::new()),
                describe_configs_by_node: Mutex::new(HashMap::new()),
                describe_configs_seen: Mutex::new(Vec::new()),
                elect_leaders_response: Mutex::new(None),
                elect_leaders_seen: Mutex::new(None),
                least_loaded,
                brokers: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl BrokerClient for MockBroker {
        async fn await_ready(&self, _node_id: i32) -> anyhow::Result<()> {
            Ok(())
        }

        async fn send(&self, node_id: i32, request: bytes::Bytes) -> anyhow::Result<bytes::Bytes> {
            let mut body = request;
            let (peeked_key, peeked_version) = {
                let mut peek = body.clone();
                (peek.get_i16(), peek.get_i16())
            };
            // Only FindCoordinator's negotiated max (v3) is flexible among
            // the api_keys this mock answers; the rest top out below their
            // flexible_since (registry.rs descriptor table).
            let flexible = peeked_key == 10 && peeked_version >= 3;
            let header = RequestHeader::decode(&mut body, flexible)?;
            let api_key = header.api_key;
            let api_version = header.api_version;
            let correlation_id = header.correlation_id;

            let mut out = BytesMut::new();
            let resp_header = ResponseHeader {
                correlation_id,
                tagged_fields: if flexible { Some(TaggedFields::default()) } else { None },
            };
            resp_header.encode(&mut out);

            match api_key {
                3 => {
                    let response = self.metadata_responses.lock().unwrap().remove(0);
                    response.encode(8, &mut out);
                }
                19 => {
                    let response = self.create_topics_responses.lock().unwrap().remove(0);
                    response.encode(3, &mut out);
                }
                10 => {
                    let request = FindCoordinatorRequest::decode(api_version, &mut body)?;
                    let response = self
                        .find_coordinator_by_group
                        .lock()
                        .unwrap()
                        .remove(&request.key)
                        .ok_or_else(|| anyhow::anyhow!("unscripted FindCoordinator for group {}", request.key))?;
                    response.encode(api_version, &mut out);
                }
                15 => {
                    let request = DescribeGroupsRequest::decode(api_version, &mut body)?;
                    let group_id = request.groups.first().cloned().unwrap_or_default();
                    let response = self
                        .describe_groups_by_group
                        .lock()
                        .unwrap()
                        .remove(&group_id)
                        .ok_or_else(|| anyhow::anyhow!("unscripted DescribeGroups for group {group_id}"))?;
                    response.encode(api_version, &mut out);
                }
                21 => {
                    let request = DeleteRecordsRequest::decode(&mut body)?;
                    self.delete_records_seen.lock().unwrap().push((node_id, request));
                    let response = self
                        .delete_records_by_node
                        .lock()
                        .unwrap()
                        .remove(&node_id)
                        .ok_or_else(|| anyhow::anyhow!("unscripted DeleteRecords for node {node_id}"))?;
                    response.encode(&mut out);
                }
                32 => {
                    let request = DescribeConfigsRequest::decode(api_version, &mut body)?;
                    self.describe_configs_seen.lock().unwrap().push((node_id, request));
                    let response = self
                        .describe_configs_by_node
                        .lock()
                        .unwrap()
                        .remove(&node_id)
                        .ok_or_else(|| anyhow::anyhow!("unscripted DescribeConfigs for node {node_id}"))?;
                    response.encode(api_version, &mut out);
                }
                43 => {
                    let request = ElectLeadersRequest::decode(&mut body)?;
                    *self.elect_leaders_seen.lock().unwrap() = Some(request);
                    let response = self
                        .elect_leaders_response
                        .lock()
                        .unwrap()
                        .clone()
                        .ok_or_else(|| anyhow::anyhow!("unscripted ElectLeaders response"))?;
                    response.encode(&mut out);
                }
                other => anyhow::bail!("unscripted api_key {other}"),
            }
            Ok(out.freeze())
        }

        fn least_loaded_node(&self) -> Option<i32> {
            Some(self.least_loaded)
        }

        fn api_version(&self, _api_key: i16, max_version: i16) -> i16 {
            max_version
        }

        fn check_version(&self, _node_id: i32) -> Option<(u32, u32, u32)> {
            Some((2, 8, 0))
        }

        fn brokers(&self) -> Vec<Node> {
            self.brokers.clone()
        }

        fn partitions_for_topic(&self, _topic: &str) -> Vec<PartitionInfo> {
            Vec::new()
        }
    }

    fn metadata_response(controller_id: i32) -> MetadataResponse {
        MetadataResponse {
            throttle_time_ms: 0,
            brokers: vec![MetadataBroker {
                node_id: 7,
                host: "broker7".to_string(),
                port: 9092,
            }],
            cluster_id: Some("test-cluster".to_string()),
            controller_id,
            topics: Vec::new(),
            cluster_authorized_operations: Vec::new(),
        }
    }

    /// S1: first CreateTopics reports NotController on topic "t"; a
    /// Metadata call discovers controller 7; the resent CreateTopics
    /// succeeds. Expect 2 CreateTopics sends, 1 Metadata send.
    #[tokio::test]
    async fn s1_controller_refresh_then_retry_succeeds() {
        let broker = MockBroker::new(0);
        broker.metadata_responses.lock().unwrap().push(metadata_response(7));
        broker.create_topics_responses.lock().unwrap().push(CreateTopicsResponse {
            throttle_time_ms: 0,
            topic_errors: vec![TopicError {
                topic: "t".to_string(),
                error_code: BrokerErrorCode::NotController.wire_code(),
                error_message: "not controller".to_string(),
            }],
        });
        broker.create_topics_responses.lock().unwrap().push(CreateTopicsResponse {
            throttle_time_ms: 0,
            topic_errors: vec![TopicError {
                topic: "t".to_string(),
                error_code: 0,
                error_message: String::new(),
            }],
        });

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        let response = client
            .create_topics(vec![NewTopic::new("t", 1, 1)], None, false)
            .await
            .unwrap();
        assert_eq!(response.topic_errors[0].error_code, 0);
    }

    #[tokio::test]
    async fn s1_second_not_controller_propagates() {
        let broker = MockBroker::new(0);
        broker.metadata_responses.lock().unwrap().push(metadata_response(7));
        broker.metadata_responses.lock().unwrap().push(metadata_response(7));
        for _ in 0..2 {
            broker.create_topics_responses.lock().unwrap().push(CreateTopicsResponse {
                throttle_time_ms: 0,
                topic_errors: vec![TopicError {
                    topic: "t".to_string(),
                    error_code: BrokerErrorCode::NotController.wire_code(),
                    error_message: "not controller".to_string(),
                }],
            });
        }

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        let err = client.create_topics(vec![NewTopic::new("t", 1, 1)], None, false).await.unwrap_err();
        assert!(matches!(err, AdminError::BrokerReported { .. }));
    }

    #[tokio::test]
    async fn list_topics_returns_topic_names_including_internal() {
        let broker = MockBroker::new(0);
        let mut response = metadata_response(7);
        response.topics = vec![
            topic("a"),
            topic("b"),
            topic("__consumer_offsets"),
        ];
        broker.metadata_responses.lock().unwrap().push(response);

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        let topics = client.list_topics().await.unwrap();
        assert_eq!(topics, vec!["a".to_string(), "b".to_string(), "__consumer_offsets".to_string()]);
    }

    fn topic(name: &str) -> MetadataTopic {
        MetadataTopic {
            error_code: 0,
            name: name.to_string(),
            is_internal: name.starts_with("__"),
            partitions: vec![MetadataPartition {
                error_code: 0,
                partition_index: 0,
                leader_id: 1,
                replica_nodes: vec![1],
                isr_nodes: vec![1],
            }],
            authorized_operations: Vec::new(),
        }
    }

    /// S3: two groups with distinct coordinators. Expect one
    /// `FindCoordinator` per group, one `DescribeGroups` to each of nodes
    /// 1 and 2, and a results list aligned to `["g1","g2"]`.
    #[tokio::test]
    async fn s3_describe_consumer_groups_resolves_distinct_coordinators_and_aligns_results() {
        let broker = MockBroker::new(0);
        broker.find_coordinator_by_group.lock().unwrap().insert(
            "g1".to_string(),
            FindCoordinatorResponse {
                throttle_time_ms: 0,
                error_code: 0,
                error_message: None,
                node_id: 1,
                host: "b1".to_string(),
                port: 9092,
            },
        );
        broker.find_coordinator_by_group.lock().unwrap().insert(
            "g2".to_string(),
            FindCoordinatorResponse {
                throttle_time_ms: 0,
                error_code: 0,
                error_message: None,
                node_id: 2,
                host: "b2".to_string(),
                port: 9093,
            },
        );
        for (group, state) in [("g1", "Stable"), ("g2", "CompletingRebalance")] {
            broker.describe_groups_by_group.lock().unwrap().insert(
                group.to_string(),
                DescribeGroupsResponse {
                    throttle_time_ms: 0,
                    groups: vec![GroupDescription {
                        error_code: 0,
                        group: group.to_string(),
                        state: state.to_string(),
                        protocol_type: "consumer".to_string(),
                        protocol: "range".to_string(),
                        members: Vec::new(),
                        authorized_operations: Vec::new(),
                    }],
                },
            );
        }

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        let result = client
            .describe_consumer_groups(vec!["g1".to_string(), "g2".to_string()], false, None)
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].group_id, "g1");
        assert_eq!(result[0].state, "Stable");
        assert_eq!(result[1].group_id, "g2");
        assert_eq!(result[1].state, "CompletingRebalance");
    }

    fn metadata_leader_response(topic: &str, partitions: Vec<(i32, i32)>) -> MetadataResponse {
        let mut response = metadata_response(7);
        response.topics = vec![MetadataTopic {
            error_code: 0,
            name: topic.to_string(),
            is_internal: false,
            partitions: partitions
                .into_iter()
                .map(|(index, leader)| MetadataPartition {
                    error_code: 0,
                    partition_index: index,
                    leader_id: leader,
                    replica_nodes: vec![leader],
                    isr_nodes: vec![leader],
                })
                .collect(),
            authorized_operations: Vec::new(),
        }];
        response
    }

    /// S4 (routing half, spec §8 property 4): two partitions owned by
    /// distinct leaders must become exactly two `DeleteRecords` requests,
    /// each carrying only that leader's partition.
    #[tokio::test]
    async fn s4_delete_records_routes_by_leader_preserving_per_leader_grouping() {
        let broker = MockBroker::new(0);
        broker.metadata_responses.lock().unwrap().push(metadata_leader_response("t", vec![(0, 1), (1, 2)]));
        broker.delete_records_by_node.lock().unwrap().insert(
            1,
            DeleteRecordsResponse {
                throttle_time_ms: 0,
                topics: vec![TopicPartitionResults {
                    name: "t".to_string(),
                    partitions: vec![PartitionResult { partition_index: 0, low_watermark: 100, error_code: 0 }],
                }],
            },
        );
        broker.delete_records_by_node.lock().unwrap().insert(
            2,
            DeleteRecordsResponse {
                throttle_time_ms: 0,
                topics: vec![TopicPartitionResults {
                    name: "t".to_string(),
                    partitions: vec![PartitionResult { partition_index: 1, low_watermark: 200, error_code: 0 }],
                }],
            },
        );

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        let mut offsets = HashMap::new();
        offsets.insert(TopicPartition::new("t".to_string(), 0), 100);
        offsets.insert(TopicPartition::new("t".to_string(), 1), 200);
        let result = client.delete_records(offsets, None).await.unwrap();
        assert_eq!(result[&TopicPartition::new("t".to_string(), 0)], 100);
        assert_eq!(result[&TopicPartition::new("t".to_string(), 1)], 200);

        let seen = client.broker.delete_records_seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for (node_id, request) in seen.iter() {
            assert_eq!(request.topics.len(), 1);
            let indexes: Vec<i32> = request.topics[0].partitions.iter().map(|p| p.partition_index).collect();
            match node_id {
                1 => assert_eq!(indexes, vec![0]),
                2 => assert_eq!(indexes, vec![1]),
                other => panic!("unexpected leader node {other}"),
            }
        }
    }

    /// S4 (error-attribution half): one of two partitions fails, so
    /// `delete_records` raises that partition's typed error rather than
    /// an aggregate.
    #[tokio::test]
    async fn s4_delete_records_single_failure_raises_typed_error_not_aggregate() {
        let broker = MockBroker::new(0);
        broker.metadata_responses.lock().unwrap().push(metadata_leader_response("t", vec![(0, 1), (1, 2)]));
        broker.delete_records_by_node.lock().unwrap().insert(
            1,
            DeleteRecordsResponse {
                throttle_time_ms: 0,
                topics: vec![TopicPartitionResults {
                    name: "t".to_string(),
                    partitions: vec![PartitionResult { partition_index: 0, low_watermark: 100, error_code: 0 }],
                }],
            },
        );
        broker.delete_records_by_node.lock().unwrap().insert(
            2,
            DeleteRecordsResponse {
                throttle_time_ms: 0,
                topics: vec![TopicPartitionResults {
                    name: "t".to_string(),
                    partitions: vec![PartitionResult { partition_index: 1, low_watermark: 0, error_code: 3 }],
                }],
            },
        );

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        let mut offsets = HashMap::new();
        offsets.insert(TopicPartition::new("t".to_string(), 0), 100);
        offsets.insert(TopicPartition::new("t".to_string(), 1), 200);
        let err = client.delete_records(offsets, None).await.unwrap_err();
        assert!(matches!(err, AdminError::BrokerReported { .. }));
    }

    /// S8 property 6: two partitions fail with distinct codes, so the
    /// aggregate error must name both `(topic:partition, errorName)` pairs.
    #[tokio::test]
    async fn delete_records_two_failures_raise_aggregate_naming_both() {
        let broker = MockBroker::new(0);
        broker.metadata_responses.lock().unwrap().push(metadata_leader_response("t", vec![(0, 1), (1, 2)]));
        broker.delete_records_by_node.lock().unwrap().insert(
            1,
            DeleteRecordsResponse {
                throttle_time_ms: 0,
                topics: vec![TopicPartitionResults {
                    name: "t".to_string(),
                    partitions: vec![PartitionResult { partition_index: 0, low_watermark: 0, error_code: 3 }],
                }],
            },
        );
        broker.delete_records_by_node.lock().unwrap().insert(
            2,
            DeleteRecordsResponse {
                throttle_time_ms: 0,
                topics: vec![TopicPartitionResults {
                    name: "t".to_string(),
                    partitions: vec![PartitionResult { partition_index: 1, low_watermark: 0, error_code: 6 }],
                }],
            },
        );

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        let mut offsets = HashMap::new();
        offsets.insert(TopicPartition::new("t".to_string(), 0), 100);
        offsets.insert(TopicPartition::new("t".to_string(), 1), 200);
        let err = client.delete_records(offsets, None).await.unwrap_err();
        match err {
            AdminError::AggregateDeleteRecords(summary) => {
                assert!(summary.contains("t:0"));
                assert!(summary.contains("t:1"));
            }
            other => panic!("expected aggregate error, got {other:?}"),
        }
    }

    /// S5: a `BROKER` resource and a `TOPIC` resource in one call must
    /// become two requests — one addressed to the broker's own node id,
    /// one to the least-loaded node.
    #[tokio::test]
    async fn s5_describe_configs_splits_broker_resource_to_its_own_node() {
        let broker = MockBroker::new(9);
        broker.describe_configs_by_node.lock().unwrap().insert(
            1,
            DescribeConfigsResponse {
                throttle_time_ms: 0,
                resources: vec![DescribeConfigsResource {
                    error_code: 0,
                    error_message: None,
                    resource_type: ConfigResourceType::Broker,
                    resource_name: "1".to_string(),
                    config_entries: Vec::new(),
                }],
            },
        );
        broker.describe_configs_by_node.lock().unwrap().insert(
            9,
            DescribeConfigsResponse {
                throttle_time_ms: 0,
                resources: vec![DescribeConfigsResource {
                    error_code: 0,
                    error_message: None,
                    resource_type: ConfigResourceType::Topic,
                    resource_name: "t".to_string(),
                    config_entries: Vec::new(),
                }],
            },
        );

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        let resources = vec![
            ConfigResource { resource_type: ConfigResourceType::Broker, name: "1".to_string(), configs: None },
            ConfigResource { resource_type: ConfigResourceType::Topic, name: "t".to_string(), configs: None },
        ];
        let result = client.describe_configs(resources, false).await.unwrap();
        assert_eq!(result.len(), 2);

        let seen = client.broker.describe_configs_seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for (node_id, request) in seen.iter() {
            assert_eq!(request.resources.len(), 1);
            match node_id {
                1 => assert_eq!(request.resources[0].resource_type, ConfigResourceType::Broker),
                9 => assert_eq!(request.resources[0].resource_type, ConfigResourceType::Topic),
                other => panic!("unexpected node {other}"),
            }
        }
    }

    /// S6: `topicPartitions=nil` must be filled in from the cluster view
    /// before the request is built.
    #[tokio::test]
    async fn s6_perform_leader_election_defaults_to_all_known_partitions() {
        let broker = MockBroker::new(0);
        let response = metadata_leader_response("t", vec![(0, 1), (1, 2)]);
        broker.metadata_responses.lock().unwrap().push(response.clone());
        broker.metadata_responses.lock().unwrap().push(response);
        *broker.elect_leaders_response.lock().unwrap() = Some(ElectLeadersResponse {
            throttle_time_ms: 0,
            error_code: 0,
            replication_election_results: Vec::new(),
        });

        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        client.perform_leader_election(ElectionType::Preferred, None, None).await.unwrap();

        let seen = client.broker.elect_leaders_seen.lock().unwrap();
        let request = seen.as_ref().expect("ElectLeaders request recorded");
        assert_eq!(request.topic_partitions.len(), 1);
        assert_eq!(request.topic_partitions[0].topic, "t");
        let mut ids = request.topic_partitions[0].partition_ids.clone();
        ids.sort();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn closed_client_rejects_further_calls() {
        let broker = MockBroker::new(0);
        let config = AdminClientConfig::builder(vec!["localhost:9092".to_string()]).build();
        let mut client = AdminClient::new(broker, config);
        client.close();
        assert!(matches!(client.check_open(), Err(AdminError::Closed)));
    }
}
