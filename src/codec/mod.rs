//! Wire codec (spec §4.1, C1): primitives, header framing, and the
//! `ErrorLayout` response-shape tag.

pub mod header;
pub mod primitives;
pub mod schema;

pub use schema::ErrorLayout;
