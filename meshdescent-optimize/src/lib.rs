//! Mesh optimization
//!
//! Vertex positions are moved by plain gradient descent on an objective
//! made of a geometric displacement term and a curvature deviation term:
//! - [`objective`]: scalar cost of the current mesh state
//! - [`gradient`]: per-vertex gradient field
//! - [`descent`]: the fixed-budget descent loop with progress reporting
//! - [`pipeline`]: preprocess, optimize, repair and export in one call

pub mod objective;
pub mod gradient;
pub mod descent;
pub mod pipeline;

pub use objective::*;
pub use gradient::*;
pub use descent::*;
pub use pipeline::*;
