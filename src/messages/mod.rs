//! Versioned request/response message bodies (spec §4.1, §6).
//!
//! Each module holds one logical operation. Rather than a concrete Rust
//! type per `(apiKey, version)` pair (which is how the source is
//! organised), each struct here carries the union of fields across all
//! registered versions and gates the version-specific ones at
//! encode/decode time — the same pattern `rskafka`'s message modules use
//! (`write_versioned`/`read_versioned` branching internally on the
//! negotiated version rather than exploding into N near-duplicate types).
//! Field order within a version always matches `original_source/kafka`'s
//! `protocol/admin.py` / `protocol/group.py`.

pub mod alter_configs;
pub mod create_acls;
pub mod create_partitions;
pub mod create_topics;
pub mod delete_acls;
pub mod delete_groups;
pub mod delete_records;
pub mod delete_topics;
pub mod describe_acls;
pub mod describe_configs;
pub mod describe_groups;
pub mod describe_log_dirs;
pub mod elect_leaders;
pub mod find_coordinator;
pub mod flexible_extras;
pub mod group_wire;
pub mod list_groups;
pub mod metadata;
pub mod offset_fetch;
