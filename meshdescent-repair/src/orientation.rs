//! Face winding repair and normal recomputation

use meshdescent_core::TriangleMesh;
use std::collections::{HashMap, VecDeque};

/// Make face winding consistent, orient closed components outward and
/// recompute vertex and face normals.
///
/// Winding is propagated across edges shared by exactly two faces. A
/// component is reoriented by signed volume only when it is closed.
/// Returns the number of faces whose winding was flipped.
pub fn fix_normals(mesh: &mut TriangleMesh) -> usize {
    let flips = winding_flips(mesh);

    let mut flipped = 0usize;
    for (face, &flip) in mesh.faces.iter_mut().zip(&flips) {
        if flip {
            face.swap(1, 2);
            flipped += 1;
        }
    }

    mesh.compute_normals();
    if mesh.curvature.is_some() {
        mesh.compute_curvature();
    }

    if flipped > 0 {
        tracing::debug!("Flipped winding of {} faces", flipped);
    }
    flipped
}

/// Per-face flag telling whether the face must be reversed
fn winding_flips(mesh: &TriangleMesh) -> Vec<bool> {
    let face_count = mesh.faces.len();

    // Undirected edge -> (face, traversed low-to-high)
    let mut edge_faces: HashMap<(usize, usize), Vec<(usize, bool)>> =
        HashMap::with_capacity(face_count * 3);
    for (fi, face) in mesh.faces.iter().enumerate() {
        for j in 0..3 {
            let (a, b) = (face[j], face[(j + 1) % 3]);
            if a == b {
                continue;
            }
            edge_faces
                .entry((a.min(b), a.max(b)))
                .or_default()
                .push((fi, a < b));
        }
    }

    // (neighbor, same traversal direction)
    let mut adjacency: Vec<Vec<(usize, bool)>> = vec![Vec::new(); face_count];
    for faces in edge_faces.values() {
        if let [(f, f_dir), (g, g_dir)] = faces.as_slice() {
            let same = f_dir == g_dir;
            adjacency[*f].push((*g, same));
            adjacency[*g].push((*f, same));
        }
    }

    let mut flips = vec![false; face_count];
    let mut component = vec![usize::MAX; face_count];
    let mut components: Vec<Vec<usize>> = Vec::new();

    for start in 0..face_count {
        if component[start] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut members = vec![start];
        component[start] = id;

        let mut queue = VecDeque::from([start]);
        while let Some(f) = queue.pop_front() {
            for &(g, same) in &adjacency[f] {
                if component[g] != usize::MAX {
                    continue;
                }
                // Neighbors must walk the shared edge in opposite directions
                flips[g] = flips[f] ^ same;
                component[g] = id;
                members.push(g);
                queue.push_back(g);
            }
        }
        components.push(members);
    }

    let mut closed = vec![true; components.len()];
    for faces in edge_faces.values() {
        if faces.len() != 2 {
            for &(f, _) in faces {
                closed[component[f]] = false;
            }
        }
    }

    for (id, members) in components.iter().enumerate() {
        if closed[id] && signed_volume(mesh, members, &flips) < 0.0 {
            for &f in members {
                flips[f] = !flips[f];
            }
        }
    }

    flips
}

/// Six times the signed volume enclosed by `faces`, with pending flips applied
fn signed_volume(mesh: &TriangleMesh, faces: &[usize], flips: &[bool]) -> f32 {
    faces
        .iter()
        .map(|&f| {
            let [a, mut b, mut c] = mesh.faces[f];
            if flips[f] {
                std::mem::swap(&mut b, &mut c);
            }
            let (v0, v1, v2) = (mesh.vertices[a], mesh.vertices[b], mesh.vertices[c]);
            v0.coords.dot(&v1.coords.cross(&v2.coords))
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshdescent_core::{Point3f, Vector3f};

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

    fn assert_outward(mesh: &TriangleMesh) {
        let center = Point3f::new(0.5, 0.5, 0.5);
        let normals = mesh.normals.as_ref().expect("normals computed");
        for (v, n) in mesh.vertices.iter().zip(normals) {
            assert!((v - center).dot(n) > 0.0, "normal {:?} at {:?} points inward", n, v);
        }
    }

    #[test]
    fn test_consistent_cube_is_untouched() {
        let mut mesh = make_cube();
        let original = mesh.faces.clone();
        assert_eq!(fix_normals(&mut mesh), 0);
        assert_eq!(mesh.faces, original);
        assert_outward(&mesh);
    }

    #[test]
    fn test_inverted_cube_is_turned_outward() {
        let mut mesh = make_cube();
        for face in &mut mesh.faces {
            face.swap(1, 2);
        }
        assert_eq!(fix_normals(&mut mesh), 12);
        assert_outward(&mesh);
    }

    #[test]
    fn test_single_flipped_face() {
        let mut mesh = make_cube();
        mesh.faces[5].swap(1, 2);
        assert_eq!(fix_normals(&mut mesh), 1);
        assert_eq!(mesh.faces, make_cube().faces);
        assert_outward(&mesh);
    }

    #[test]
    fn test_open_surface_follows_first_face() {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 3, 2]],
        );
        assert_eq!(fix_normals(&mut mesh), 1);
        assert_eq!(mesh.faces[1], [0, 2, 3]);
        for n in mesh.normals.as_ref().unwrap() {
            assert_relative_eq!(*n, Vector3f::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_curvature_refreshed_with_normals() {
        let mut mesh = make_cube();
        mesh.set_curvature(vec![0.0; 8]);
        fix_normals(&mut mesh);
        for &c in mesh.curvature.as_ref().unwrap() {
            assert_relative_eq!(c, 1.0, epsilon = 1e-6);
        }
        assert_eq!(mesh.face_normals.as_ref().unwrap().len(), 12);
    }

    #[test]
    fn test_empty_mesh() {
        let mut mesh = TriangleMesh::new();
        assert_eq!(fix_normals(&mut mesh), 0);
    }
}
