//! OBJ format support
//!
//! Parsing goes through the `obj` crate. A file with one object becomes a
//! [`MeshSource::Single`] that keeps the file's full vertex list; a file with
//! several objects becomes a [`MeshSource::Scene`] where every object owns
//! only the vertices it references.

use crate::{triangulate_fan, MeshReader, MeshWriter};
use ::obj::{Obj, ObjData, Object};
use meshdescent_core::{Error, MeshSource, Point3f, Result, TriangleMesh};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct ObjReader;
pub struct ObjWriter;

impl MeshReader for ObjReader {
    fn read_source<P: AsRef<Path>>(path: P) -> Result<MeshSource> {
        let path = path.as_ref();
        let obj = Obj::load(path).map_err(|e| Error::load(path, e))?;
        obj_data_to_source(&obj.data).map_err(|e| Error::load(path, e))
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::export(path, e))?;
        let mut writer = BufWriter::new(file);
        write_obj(mesh, &mut writer).map_err(|e| Error::export(path, e))
    }
}

/// Convert parsed OBJ data into a scene or a single mesh
pub fn obj_data_to_source(data: &ObjData) -> Result<MeshSource> {
    let positions: Vec<Point3f> = data
        .position
        .iter()
        .map(|p| Point3f::new(p[0], p[1], p[2]))
        .collect();

    match data.objects.as_slice() {
        [] => Ok(MeshSource::Single(TriangleMesh::from_vertices_and_faces(
            positions,
            Vec::new(),
        ))),
        [object] => {
            let faces = object_faces(object, positions.len())?;
            Ok(MeshSource::Single(TriangleMesh::from_vertices_and_faces(
                positions, faces,
            )))
        }
        objects => {
            let mut geometries = Vec::with_capacity(objects.len());
            for object in objects {
                let faces = object_faces(object, positions.len())?;
                geometries.push((object.name.clone(), compact(&positions, &faces)));
            }
            Ok(MeshSource::Scene(geometries))
        }
    }
}

/// Triangulated faces of every group in an object, in global indices
fn object_faces(object: &Object, vertex_count: usize) -> Result<Vec<[usize; 3]>> {
    let mut faces = Vec::new();
    for group in &object.groups {
        for poly in &group.polys {
            let indices: Vec<usize> = poly.0.iter().map(|tuple| tuple.0).collect();
            if let Some(&bad) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(Error::InvalidData(format!(
                    "Face in object '{}' references vertex {} but only {} exist",
                    object.name, bad, vertex_count
                )));
            }
            faces.extend(triangulate_fan(&indices));
        }
    }
    Ok(faces)
}

/// Build a mesh holding only the referenced vertices, in first-use order
fn compact(positions: &[Point3f], faces: &[[usize; 3]]) -> TriangleMesh {
    let mut remap: HashMap<usize, usize> = HashMap::new();
    let mut mesh = TriangleMesh::new();

    for face in faces {
        let mut local = [0usize; 3];
        for (slot, &global) in local.iter_mut().zip(face) {
            *slot = *remap
                .entry(global)
                .or_insert_with(|| mesh.add_vertex(positions[global]));
        }
        mesh.add_face(local);
    }

    mesh
}

fn write_obj<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "# meshdescent")?;
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    let normals = mesh
        .normals
        .as_ref()
        .filter(|n| n.len() == mesh.vertices.len());

    if let Some(normals) = normals {
        for n in normals {
            writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for f in &mesh.faces {
            writeln!(
                writer,
                "f {0}//{0} {1}//{1} {2}//{2}",
                f[0] + 1,
                f[1] + 1,
                f[2] + 1
            )?;
        }
    } else {
        for f in &mesh.faces {
            writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
        }
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshdescent_core::Vector3f;
    use std::fs;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("meshdescent_obj_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_obj_mesh_roundtrip() {
        let path = scratch_path("triangle.obj");
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.5, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );

        ObjWriter::write_mesh(&mesh, &path).unwrap();
        let loaded = ObjReader::read_mesh(&path).unwrap();

        assert_eq!(loaded.vertex_count(), 3);
        assert_eq!(loaded.faces, vec![[0, 1, 2]]);
        assert_eq!(loaded.vertices, mesh.vertices);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_obj_roundtrip_with_normals() {
        let path = scratch_path("normals.obj");
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.1, 0.2, 0.3),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.5, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        mesh.set_normals(vec![Vector3f::new(0.0, 0.0, 1.0); 3]);

        ObjWriter::write_mesh(&mesh, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("f 1//1 2//2 3//3"));

        let loaded = ObjReader::read_mesh(&path).unwrap();
        assert_eq!(loaded.vertices, mesh.vertices);
        assert_eq!(loaded.faces, mesh.faces);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_quads_are_triangulated() {
        let path = scratch_path("quad.obj");
        fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mesh = ObjReader::read_mesh(&path).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_multiple_objects_form_a_scene() {
        let path = scratch_path("scene.obj");
        fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 5 5 5\nv 6 5 5\nv 5 6 5\n\
             o first\nf 1 2 3\no second\nf 4 5 6\n",
        )
        .unwrap();

        let source = ObjReader::read_source(&path).unwrap();
        match &source {
            MeshSource::Scene(geometries) => {
                assert_eq!(geometries.len(), 2);
                assert_eq!(geometries[0].0, "first");
                assert_eq!(geometries[1].0, "second");
                assert_eq!(geometries[1].1.vertex_count(), 3);
                assert_eq!(geometries[1].1.faces, vec![[0, 1, 2]]);
                assert_eq!(geometries[1].1.vertices[0], Point3f::new(5.0, 5.0, 5.0));
            }
            MeshSource::Single(_) => panic!("expected a scene"),
        }

        let first = source.into_mesh().unwrap();
        assert_eq!(first.vertices[1], Point3f::new(1.0, 0.0, 0.0));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_single_object_keeps_unreferenced_vertices() {
        let path = scratch_path("loose.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 9 9 9\nf 1 2 3\n").unwrap();

        let mesh = ObjReader::read_mesh(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_out_of_range_face_is_load_error() {
        let path = scratch_path("bad_index.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").unwrap();

        let result = ObjReader::read_source(&path);
        assert!(matches!(result, Err(Error::Load { .. })));
        assert!(matches!(crate::load(&path), Err(Error::Load { .. })));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_obj_is_load_error() {
        let path = scratch_path("broken.obj");
        fs::write(&path, "v 0 0 zero\nf 1 2 3\n").unwrap();

        let result = ObjReader::read_source(&path);
        assert!(matches!(result, Err(Error::Load { .. })));

        let _ = fs::remove_file(&path);
    }
}
