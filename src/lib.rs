//! Kafka-compatible broker administrative client core (SPEC_FULL §1-§9).
//!
//! This crate is the core of an admin client: wire codec, version
//! negotiation, broker-routing policy, controller/coordinator caching, a
//! concurrent fan-out executor, and the [`client::AdminClient`] façade that
//! ties them together. It does not own a socket — [`broker::BrokerClient`]
//! is the seam a transport implementation plugs into (spec §1 Non-goals).

pub mod broker;
pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod messages;
pub mod negotiator;
pub mod registry;
pub mod router;
pub mod types;

pub use broker::BrokerClient;
pub use client::AdminClient;
pub use config::AdminClientConfig;
pub use error::AdminError;
pub use registry::ApiKey;
