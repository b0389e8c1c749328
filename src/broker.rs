//! Broker-client collaborator contract (spec §1 C3).
//!
//! Everything in this module is a *contract*, not an implementation: the
//! transport that owns TCP sockets, TLS, SASL, reconnection backoff,
//! request pipelining and bootstrap discovery is explicitly out of scope
//! (spec §1). The façade (`crate::client::AdminClient`) is generic over
//! this trait so embedders can plug in whatever transport they already
//! run — this is the seam `tychedelia-akademie`'s `kafka::client` module
//! would have occupied had this crate kept its transport in-tree.
//!
//! `await_ready`/`send` return `anyhow::Error` on failure (matching the
//! teacher's internal use of `anyhow` for transport-level failures); the
//! façade wraps every such failure in [`crate::error::AdminError::Connection`]
//! scoped to the one request that failed, per spec §7.
//!
//! Spec §5 describes a `poll(future)` step distinct from `send`, modelling
//! the Python reference's explicit event-loop pump. Rust's `async`/`.await`
//! folds that pump into the runtime the embedder already drives, so this
//! trait has no separate `poll` method — awaiting the futures `send`
//! returns *is* the polling step.

use async_trait::async_trait;
use bytes::Bytes;

use crate::types::Node;

/// A partition's leader, as known to the broker client's cluster view
/// (`cluster.partitionsForTopic(t)` in spec §1). The router prefers a
/// live `Metadata` RPC for leader lookups (spec §4.2) since that is the
/// policy spec.md actually specifies for `DeleteRecords`, but the method
/// is still part of the external contract so embedders get a complete
/// trait to implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionInfo {
    pub partition: i32,
    pub leader: i32,
}

/// External collaborator contract (spec §1). The core never owns a
/// socket; every method here is answered by the embedder's transport.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// Blocks until `node_id` is connected and has completed its
    /// handshake (including populating its `ApiVersionTable`, spec §3).
    async fn await_ready(&self, node_id: i32) -> anyhow::Result<()>;

    /// Sends one fully-framed request (header + body, no length prefix —
    /// framing is the transport's concern) to `node_id` and returns the
    /// fully-framed response (header + body).
    async fn send(&self, node_id: i32, request: Bytes) -> anyhow::Result<Bytes>;

    /// The broker-client heuristic's pick of the connected broker with
    /// fewest in-flight requests (glossary: "Least-loaded node"). `None`
    /// means no broker is currently connected.
    fn least_loaded_node(&self) -> Option<i32>;

    /// `min(clientMaxForKey, brokerMaxForKey)` for `node_id`'s already-awaited
    /// `ApiVersionTable`. `max_version` is this crate's registry ceiling
    /// for `api_key` (`registry::highest_supported`); the broker-client
    /// collaborator does the actual min-selection against its own
    /// handshake data (spec §1, §4.3).
    fn api_version(&self, api_key: i16, max_version: i16) -> i16;

    /// `(major, minor, patch)` of the broker's Kafka version, used by
    /// controller refresh to verify the elected controller speaks a new
    /// enough protocol (spec §4.2: "verify ... version >= (0,10,0)").
    fn check_version(&self, node_id: i32) -> Option<(u32, u32, u32)>;

    /// All brokers currently known to the cluster view (spec §3 Node).
    fn brokers(&self) -> Vec<Node>;

    /// Partition leadership for `topic`, per the broker client's cached
    /// cluster view. See the struct-level note on why the router does
    /// not call this for `DeleteRecords`.
    fn partitions_for_topic(&self, topic: &str) -> Vec<PartitionInfo>;
}
