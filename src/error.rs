//! Error types distinguished by the admin client core (spec §7).

use std::fmt;

use thiserror::Error;

use crate::types::TopicPartition;

/// Kafka broker-reported error codes relevant to the admin surface.
///
/// Only the subset of codes the core's routing/retry logic inspects by name
/// gets a dedicated variant; everything else round-trips through `Other`
/// so a future broker error code never becomes a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BrokerErrorCode {
    NoError,
    OffsetOutOfRange,
    CorruptMessage,
    UnknownTopicOrPartition,
    LeaderNotAvailable,
    NotLeaderForPartition,
    RequestTimedOut,
    BrokerNotAvailable,
    ReplicaNotAvailable,
    MessageTooLarge,
    StaleControllerEpoch,
    NetworkException,
    CoordinatorLoadInProgress,
    CoordinatorNotAvailable,
    NotCoordinator,
    InvalidTopicException,
    GroupAuthorizationFailed,
    ClusterAuthorizationFailed,
    TopicAuthorizationFailed,
    InvalidRequest,
    UnsupportedVersion,
    TopicAlreadyExists,
    InvalidPartitions,
    InvalidReplicationFactor,
    InvalidReplicaAssignment,
    InvalidConfig,
    NotController,
    SecurityDisabled,
    ElectionNotNeeded,
    InvalidGroupId,
    UnknownMemberId,
    IllegalGeneration,
    Other(i16),
}

impl BrokerErrorCode {
    pub fn from_wire(code: i16) -> Self {
        use BrokerErrorCode::*;
        match code {
            0 => NoError,
            1 => OffsetOutOfRange,
            2 => CorruptMessage,
            3 => UnknownTopicOrPartition,
            5 => LeaderNotAvailable,
            6 => NotLeaderForPartition,
            7 => RequestTimedOut,
            8 => BrokerNotAvailable,
            9 => ReplicaNotAvailable,
            10 => MessageTooLarge,
            11 => StaleControllerEpoch,
            13 => NetworkException,
            14 => CoordinatorLoadInProgress,
            15 => CoordinatorNotAvailable,
            16 => NotCoordinator,
            17 => InvalidTopicException,
            24 => InvalidGroupId,
            25 => UnknownMemberId,
            22 => IllegalGeneration,
            29 => TopicAuthorizationFailed,
            30 => GroupAuthorizationFailed,
            31 => ClusterAuthorizationFailed,
            36 => TopicAlreadyExists,
            37 => InvalidPartitions,
            38 => InvalidReplicationFactor,
            39 => InvalidReplicaAssignment,
            40 => InvalidConfig,
            41 => NotController,
            42 => InvalidRequest,
            35 => UnsupportedVersion,
            54 => SecurityDisabled,
            83 => ElectionNotNeeded,
            code => Other(code),
        }
    }

    pub fn is_no_error(&self) -> bool {
        matches!(self, BrokerErrorCode::NoError)
    }

    pub fn wire_code(&self) -> i16 {
        use BrokerErrorCode::*;
        match self {
            NoError => 0,
            OffsetOutOfRange => 1,
            CorruptMessage => 2,
            UnknownTopicOrPartition => 3,
            LeaderNotAvailable => 5,
            NotLeaderForPartition => 6,
            RequestTimedOut => 7,
            BrokerNotAvailable => 8,
            ReplicaNotAvailable => 9,
            MessageTooLarge => 10,
            StaleControllerEpoch => 11,
            NetworkException => 13,
            CoordinatorLoadInProgress => 14,
            CoordinatorNotAvailable => 15,
            NotCoordinator => 16,
            InvalidTopicException => 17,
            IllegalGeneration => 22,
            TopicAuthorizationFailed => 29,
            GroupAuthorizationFailed => 30,
            ClusterAuthorizationFailed => 31,
            InvalidGroupId => 24,
            UnknownMemberId => 25,
            TopicAlreadyExists => 36,
            InvalidPartitions => 37,
            InvalidReplicationFactor => 38,
            InvalidReplicaAssignment => 39,
            InvalidConfig => 40,
            NotController => 41,
            InvalidRequest => 42,
            UnsupportedVersion => 35,
            SecurityDisabled => 54,
            ElectionNotNeeded => 83,
            Other(code) => *code,
        }
    }
}

impl fmt::Display for BrokerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Failure to decode or encode the wire protocol (spec §4.1, §7).
#[derive(Debug, Error)]
pub enum ProtocolDecodeError {
    #[error("buffer underrun: need {needed} bytes, have {available}")]
    BufferUnderrun { needed: usize, available: usize },
    #[error("invalid string encoding in field {field}")]
    InvalidUtf8 { field: &'static str },
    #[error("negative length {length} for non-nullable field {field}")]
    NegativeLength { field: &'static str, length: i64 },
    #[error("trailing {count} bytes after decoding a non-flexible response")]
    TrailingBytes { count: usize },
    #[error("unsupported (api_key={api_key}, version={version}) for decode")]
    UnsupportedVersion { api_key: i16, version: i16 },
    #[error("varint did not terminate within {max_bytes} bytes")]
    VarintTooLong { max_bytes: usize },
    #[error("response correlation id {got} does not match request {expected}")]
    CorrelationMismatch { expected: i32, got: i32 },
}

/// Top-level error type surfaced by the façade (spec §7).
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(
        "feature '{feature}' requires {op} >= v{required_version}, negotiated broker version is v{negotiated_version}"
    )]
    IncompatibleBrokerVersion {
        op: &'static str,
        feature: &'static str,
        required_version: i16,
        negotiated_version: i16,
    },

    #[error("broker version too old to discover the controller: {reason}")]
    UnrecognizedBrokerVersion { reason: String },

    #[error("connection error talking to node {node_id}: {source}")]
    Connection {
        node_id: i32,
        #[source]
        source: anyhow::Error,
    },

    #[error("protocol decode error: {0}")]
    Decode(#[from] ProtocolDecodeError),

    #[error("request '{request}' failed with broker error {code}: {context}")]
    BrokerReported {
        request: &'static str,
        code: BrokerErrorCode,
        context: String,
    },

    #[error("the following partitions are not known: {0:?}")]
    UnknownTopicOrPartition(Vec<TopicPartition>),

    #[error("the following errors occurred deleting records: {0}")]
    AggregateDeleteRecords(String),

    #[error("controller could not be refreshed within the deadline")]
    ControllerRefreshTimedOut,

    #[error("client is closed")]
    Closed,

    #[error("illegal argument: {0}")]
    IllegalArgument(String),
}

impl AdminError {
    pub fn broker_reported(request: &'static str, code: BrokerErrorCode, context: impl Into<String>) -> Self {
        AdminError::BrokerReported {
            request,
            code,
            context: context.into(),
        }
    }
}

/// Errors raised building an [`crate::config::AdminClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unrecognized configuration keys: {0:?}")]
    UnrecognizedKeys(Vec<String>),
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, AdminError>;
