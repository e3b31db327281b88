#![warn(clippy::unwrap_used)]

pub mod snapshot;

pub use snapshot::{QueryKey, QueryKind, SnapshotCache};
