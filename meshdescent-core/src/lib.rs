//! Core data structures for meshdescent
//!
//! This crate provides the mesh type the optimizer works on, the tagged
//! scene/mesh variant produced by loaders, and the shared error type.

pub mod point;
pub mod mesh;
pub mod source;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use source::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
