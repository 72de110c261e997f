//! Loaded geometry before it is resolved to a single mesh

use crate::error::{Error, Result};
use crate::mesh::TriangleMesh;

/// What a loader hands back: either a named collection of meshes or a
/// single mesh.
#[derive(Debug, Clone)]
pub enum MeshSource {
    /// Ordered `name -> mesh` collection, in file order
    Scene(Vec<(String, TriangleMesh)>),
    Single(TriangleMesh),
}

impl MeshSource {
    /// Number of geometries held
    pub fn geometry_count(&self) -> usize {
        match self {
            MeshSource::Scene(geometries) => geometries.len(),
            MeshSource::Single(_) => 1,
        }
    }

    /// Resolve to one concrete mesh. A scene yields its first geometry.
    pub fn into_mesh(self) -> Result<TriangleMesh> {
        match self {
            MeshSource::Single(mesh) => Ok(mesh),
            MeshSource::Scene(geometries) => geometries
                .into_iter()
                .next()
                .map(|(_, mesh)| mesh)
                .ok_or_else(|| Error::EmptyGeometry("scene contains no geometry".to_string())),
        }
    }
}

impl From<TriangleMesh> for MeshSource {
    fn from(mesh: TriangleMesh) -> Self {
        MeshSource::Single(mesh)
    }
}
