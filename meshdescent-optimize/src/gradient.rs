//! Gradient computation
//!
//! Both terms follow the same snapshot-and-compare pattern as the objective,
//! so the resulting field is the zero vector at every vertex. The field still
//! has one entry per vertex and is consumed by the descent step as-is.

use meshdescent_core::{TriangleMesh, Vector3f};

/// Per-vertex difference between current positions and a snapshot of them
pub fn geometric_gradient(mesh: &TriangleMesh) -> Vec<Vector3f> {
    let reference = mesh.vertices.clone();
    mesh.vertices
        .iter()
        .zip(&reference)
        .map(|(current, original)| current - original)
        .collect()
}

/// Curvature deviation from a snapshot, scaled along each vertex normal
pub fn curvature_gradient(mesh: &TriangleMesh) -> Vec<Vector3f> {
    let curvature = mesh.vertex_curvature();
    let reference = curvature.to_vec();
    let normals = mesh.vertex_normals();

    curvature
        .iter()
        .zip(&reference)
        .zip(normals.iter())
        .map(|((current, original), normal)| normal * (current - original))
        .collect()
}

/// Gradient field of the objective, one vector per vertex
pub fn gradient(mesh: &TriangleMesh) -> Vec<Vector3f> {
    geometric_gradient(mesh)
        .into_iter()
        .zip(curvature_gradient(mesh))
        .map(|(geometric, curvature)| geometric + curvature)
        .collect()
}
