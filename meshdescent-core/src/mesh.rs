//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A triangle mesh with vertices, faces and optional per-vertex fields.
///
/// `normals` and `curvature` are derived fields. They are cached once
/// computed and read back through [`TriangleMesh::vertex_normals`] and
/// [`TriangleMesh::vertex_curvature`], which derive them on demand when the
/// cache is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
    pub face_normals: Option<Vec<Vector3f>>,
    pub curvature: Option<Vec<f32>>,
    pub colors: Option<Vec<[u8; 3]>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::default()
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Unnormalized face normal, its length is twice the triangle area
    pub fn face_cross(&self, face: &[usize; 3]) -> Vector3f {
        let v0 = self.vertices[face[0]];
        let v1 = self.vertices[face[1]];
        let v2 = self.vertices[face[2]];
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Triangle area of a face
    pub fn face_area(&self, face: &[usize; 3]) -> f32 {
        0.5 * self.face_cross(face).norm()
    }

    /// Calculate unit face normals. Zero-area faces get a zero normal.
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                self.face_cross(face)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3f::zeros)
            })
            .collect()
    }

    /// Calculate unit vertex normals as the area-weighted average of the
    /// adjacent face normals. Vertices without a non-degenerate adjacent face
    /// get a zero normal.
    pub fn calculate_vertex_normals(&self) -> Vec<Vector3f> {
        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];

        for face in &self.faces {
            // Length is 2 * area, which gives the area weighting for free
            let weighted = self.face_cross(face);
            for &index in face {
                normals[index] += weighted;
            }
        }

        for normal in &mut normals {
            *normal = normal
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3f::zeros);
        }

        normals
    }

    /// Compute and cache vertex and face normals
    pub fn compute_normals(&mut self) {
        self.normals = Some(self.calculate_vertex_normals());
        self.face_normals = Some(self.calculate_face_normals());
    }

    /// Compute and cache the curvature proxy: the length of each vertex normal
    pub fn compute_curvature(&mut self) {
        let curvature = curvature_from_normals(&self.vertex_normals());
        self.curvature = Some(curvature);
    }

    /// Per-vertex normals, cached or derived from the faces
    pub fn vertex_normals(&self) -> Cow<'_, [Vector3f]> {
        match &self.normals {
            Some(normals) if normals.len() == self.vertices.len() => Cow::Borrowed(normals),
            _ => Cow::Owned(self.calculate_vertex_normals()),
        }
    }

    /// Per-vertex curvature proxy, cached or derived from the vertex normals
    pub fn vertex_curvature(&self) -> Cow<'_, [f32]> {
        match &self.curvature {
            Some(curvature) if curvature.len() == self.vertices.len() => Cow::Borrowed(curvature),
            _ => Cow::Owned(curvature_from_normals(&self.vertex_normals())),
        }
    }

    /// Vertex positions as a flat `[x0, y0, z0, x1, ...]` slice
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Mutable view of the vertex positions as a flat slice
    pub fn positions_flat_mut(&mut self) -> &mut [f32] {
        bytemuck::cast_slice_mut(&mut self.vertices)
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Set the per-vertex curvature field
    pub fn set_curvature(&mut self, curvature: Vec<f32>) {
        if curvature.len() == self.vertices.len() {
            self.curvature = Some(curvature);
        }
    }

    /// Set vertex colors
    pub fn set_colors(&mut self, colors: Vec<[u8; 3]>) {
        if colors.len() == self.vertices.len() {
            self.colors = Some(colors);
        }
    }

    /// Drop cached normals and curvature after a topology change
    pub fn invalidate_derived(&mut self) {
        self.normals = None;
        self.face_normals = None;
        self.curvature = None;
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.colors = None;
        self.invalidate_derived();
    }
}

fn curvature_from_normals(normals: &[Vector3f]) -> Vec<f32> {
    normals.iter().map(|n| n.norm()).collect()
}
