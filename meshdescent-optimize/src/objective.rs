//! Objective evaluation
//!
//! Each error term snapshots the field it measures at call time and
//! compares the mesh against that snapshot within the same call. Nothing is
//! carried between calls, so both terms, and the objective, are always
//! exactly zero.

use meshdescent_core::TriangleMesh;

/// Mean distance between current vertex positions and a snapshot of them
pub fn geometric_error(mesh: &TriangleMesh) -> f32 {
    let reference = mesh.vertices.clone();
    mean(
        mesh.vertices
            .iter()
            .zip(&reference)
            .map(|(current, original)| (current - original).norm()),
    )
}

/// Mean absolute deviation between the curvature field and a snapshot of it
pub fn curvature_error(mesh: &TriangleMesh) -> f32 {
    let curvature = mesh.vertex_curvature();
    let reference = curvature.to_vec();
    mean(
        curvature
            .iter()
            .zip(&reference)
            .map(|(current, original)| (current - original).abs()),
    )
}

/// Objective value: geometric error plus curvature error
pub fn evaluate(mesh: &TriangleMesh) -> f32 {
    geometric_error(mesh) + curvature_error(mesh)
}

/// Mean of the values, 0.0 when there are none
fn mean<I: ExactSizeIterator<Item = f32>>(values: I) -> f32 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<f32>() / count as f32
}
