//! Mesh loading and export
//!
//! Readers return a [`MeshSource`], which keeps multi-object files as a
//! scene until the caller decides how to resolve it. Writers take a single
//! [`TriangleMesh`]. The free functions pick a format from the file
//! extension.

pub mod ply;
pub mod obj;

use meshdescent_core::{Error, MeshSource, Result, TriangleMesh};
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_source<P: AsRef<Path>>(path: P) -> Result<MeshSource>;

    /// Read and resolve to a single mesh
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        Self::read_source(path)?.into_mesh()
    }
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

/// Supported on-disk mesh formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Ply,
}

impl MeshFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());
        match extension.as_deref() {
            Some("obj") => Ok(MeshFormat::Obj),
            Some("ply") => Ok(MeshFormat::Ply),
            _ => Err(Error::UnsupportedFormat(format!(
                "Unsupported mesh format: {:?}",
                path.extension()
            ))),
        }
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Obj => "obj",
            MeshFormat::Ply => "ply",
        }
    }
}

/// Auto-detect format and load the file without resolving scenes
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshSource> {
    let path = path.as_ref();
    let source = match MeshFormat::from_path(path)? {
        MeshFormat::Obj => crate::obj::ObjReader::read_source(path)?,
        MeshFormat::Ply => crate::ply::PlyReader::read_source(path)?,
    };
    tracing::debug!(
        path = %path.display(),
        geometries = source.geometry_count(),
        "Loaded mesh file"
    );
    Ok(source)
}

/// Auto-detect format and read a single mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    load(path)?.into_mesh()
}

/// Auto-detect format and write a mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match MeshFormat::from_path(path)? {
        MeshFormat::Obj => crate::obj::ObjWriter::write_mesh(mesh, path)?,
        MeshFormat::Ply => crate::ply::PlyWriter::write_mesh(mesh, path)?,
    }
    tracing::debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Exported mesh"
    );
    Ok(())
}

/// Split a polygon into a triangle fan around its first vertex
pub(crate) fn triangulate_fan(indices: &[usize]) -> impl Iterator<Item = [usize; 3]> + '_ {
    (1..indices.len().saturating_sub(1)).map(move |i| [indices[0], indices[i], indices[i + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshdescent_core::Point3f;
    use std::fs;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("meshdescent_io_{}_{}", std::process::id(), name))
    }

    fn make_cube() -> TriangleMesh {
        let vertices = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
            Point3f::new(1.0, 0.0, 1.0),
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(0.0, 1.0, 1.0),
        ];
        let faces = vec![
            [0, 2, 1], [0, 3, 2],
            [4, 5, 6], [4, 6, 7],
            [0, 1, 5], [0, 5, 4],
            [1, 2, 6], [1, 6, 5],
            [2, 3, 7], [2, 7, 6],
            [3, 0, 4], [3, 4, 7],
        ];
        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(MeshFormat::from_path("a/b/mesh.obj").unwrap(), MeshFormat::Obj);
        assert_eq!(MeshFormat::from_path("MESH.PLY").unwrap(), MeshFormat::Ply);
        assert!(MeshFormat::from_path("mesh.stl").is_err());
        assert!(MeshFormat::from_path("mesh").is_err());
        assert_eq!(MeshFormat::Ply.extension(), "ply");
    }

    #[test]
    fn test_triangulate_fan() {
        let tris: Vec<_> = triangulate_fan(&[0, 1, 2, 3]).collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(triangulate_fan(&[0, 1]).count(), 0);
    }

    #[test]
    fn test_auto_detect_roundtrip() {
        let mesh = make_cube();
        for name in ["auto_cube.obj", "auto_cube.ply"] {
            let path = scratch_path(name);
            write_mesh(&mesh, &path).unwrap();
            let loaded = read_mesh(&path).unwrap();

            assert_eq!(loaded.vertex_count(), 8);
            assert_eq!(loaded.face_count(), 12);
            for (a, b) in mesh.vertices.iter().zip(&loaded.vertices) {
                assert_relative_eq!(a, b, epsilon = 1e-6);
            }
            let _ = fs::remove_file(&path);
        }
    }

    #[test]
    fn test_unsupported_format() {
        assert!(matches!(read_mesh("test.stl"), Err(Error::UnsupportedFormat(_))));
        let mesh = make_cube();
        assert!(matches!(
            write_mesh(&mesh, scratch_path("cube.stl")),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = load(scratch_path("does_not_exist.obj"));
        assert!(matches!(result, Err(Error::Load { .. })));
    }

    #[test]
    fn test_unwritable_path_is_export_error() {
        let path = scratch_path("no_such_dir").join("out.obj");
        let result = write_mesh(&make_cube(), &path);
        assert!(matches!(result, Err(Error::Export { .. })));
    }
}
