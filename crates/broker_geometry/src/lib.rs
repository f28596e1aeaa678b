//! # broker_geometry
//!
//! Wire-facing spatial types for the world-state broker. Re-exports [`glam`]
//! for the underlying vector math and defines the named, serde-friendly
//! value types that travel over the network: [`Vector3`] and [`Orientation`].
//!
//! Unlike a rendering engine's `Transform3D`, these types carry `f64`
//! components (the source simulation's precision) and serialize with named
//! fields so any MessagePack or JSON decoder can read them without knowing
//! Rust struct layout.

pub mod orientation;
pub mod vector;

pub use glam::DVec3;
pub use orientation::Orientation;
pub use vector::Vector3;
