//! # meshdescent
//!
//! Gradient-descent optimization of triangle meshes, followed by cleanup
//! and normal repair.
//!
//! This is the umbrella crate re-exporting the workspace crates. Use the
//! individual crates for finer control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Mesh type, loaded sources and the shared error type
//! - **Optimize**: Objective, gradient, descent loop and the full pipeline
//! - **I/O**: OBJ and PLY reading and writing
//! - **Repair**: Unreferenced vertex and degenerate face removal, winding fixes
//!
//! ## Quick Start
//!
//! ```rust
//! use meshdescent::prelude::*;
//!
//! let mesh = TriangleMesh::from_vertices_and_faces(
//!     vec![
//!         Point3f::new(0.0, 0.0, 0.0),
//!         Point3f::new(1.0, 0.0, 0.0),
//!         Point3f::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! );
//!
//! let optimized = run(mesh, 0.01, 100).unwrap();
//! assert_eq!(optimized.vertex_count(), 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables io and repair
//! - `io`: File format support
//! - `repair`: Mesh repair passes

// Re-export core functionality
pub use meshdescent_core::*;

pub use meshdescent_optimize as optimize;

#[cfg(feature = "io")]
pub use meshdescent_io as io;

#[cfg(feature = "repair")]
pub use meshdescent_repair as repair;

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshdescent_core::*;
    pub use meshdescent_optimize::*;

    #[cfg(feature = "io")]
    pub use meshdescent_io::{load, read_mesh, write_mesh, MeshFormat};

    #[cfg(feature = "repair")]
    pub use meshdescent_repair::{repair_mesh, RepairOptions, RepairSummary};
}
