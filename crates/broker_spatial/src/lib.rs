//! # broker_spatial
//!
//! The arc-chunk index: a polar spatial index over the horizontal plane
//! that narrows the candidate set before tier classification. It is the
//! leaf component of the publication pipeline — the Tier Manager is its
//! only caller.

pub mod index;

pub use index::{ArcChunkIndex, Bucket, DEFAULT_ARC_DEGREES};
