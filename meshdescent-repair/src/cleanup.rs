//! Removal of unreferenced, non-finite and duplicate vertices and of
//! degenerate faces

use meshdescent_core::TriangleMesh;
use std::collections::HashMap;

/// Remove vertices not used by any face and compact the vertex array.
///
/// Per-vertex attributes (normals, curvature, colors) are compacted along
/// with the positions and faces are remapped. Returns the number of vertices
/// removed.
pub fn remove_unreferenced_vertices(mesh: &mut TriangleMesh) -> usize {
    let mut referenced = vec![false; mesh.vertices.len()];
    for face in &mesh.faces {
        for &index in face {
            referenced[index] = true;
        }
    }

    let removed = retain_vertices(mesh, &referenced);
    if removed > 0 {
        tracing::debug!("Removed {} unreferenced vertices", removed);
    }
    removed
}

/// Remove vertices with a NaN or infinite coordinate, along with every face
/// that uses one. Returns the number of vertices removed.
pub fn remove_non_finite_vertices(mesh: &mut TriangleMesh) -> usize {
    let finite: Vec<bool> = mesh
        .vertices
        .iter()
        .map(|v| v.coords.iter().all(|c| c.is_finite()))
        .collect();
    if finite.iter().all(|&f| f) {
        return 0;
    }

    let face_count = mesh.faces.len();
    mesh.faces.retain(|face| face.iter().all(|&i| finite[i]));
    if mesh.faces.len() != face_count {
        mesh.face_normals = None;
    }

    let removed = retain_vertices(mesh, &finite);
    tracing::debug!(
        "Removed {} non-finite vertices and {} faces using them",
        removed,
        face_count - mesh.faces.len()
    );
    removed
}

/// Merge vertices with bit-identical positions into their first occurrence.
///
/// Faces are redirected to the kept vertex and the kept vertex's attributes
/// win. Faces that collapse onto a repeated index are left for
/// [`remove_degenerate_faces`]. Returns the number of vertices merged away.
pub fn merge_duplicate_vertices(mesh: &mut TriangleMesh) -> usize {
    let mut first: HashMap<[u32; 3], usize> = HashMap::with_capacity(mesh.vertices.len());
    let mut target: Vec<usize> = Vec::with_capacity(mesh.vertices.len());
    for (index, v) in mesh.vertices.iter().enumerate() {
        // +0.0 and -0.0 are the same position
        let key = [v.x, v.y, v.z].map(|c| (c + 0.0).to_bits());
        target.push(*first.entry(key).or_insert(index));
    }

    let keep: Vec<bool> = target.iter().enumerate().map(|(i, &t)| i == t).collect();
    if keep.iter().all(|&k| k) {
        return 0;
    }

    for face in &mut mesh.faces {
        for index in face.iter_mut() {
            *index = target[*index];
        }
    }

    let merged = retain_vertices(mesh, &keep);
    tracing::debug!("Merged {} duplicate vertices", merged);
    merged
}

/// Keep the vertices flagged in `keep`, compacting per-vertex attributes and
/// remapping faces. Faces must only reference kept vertices.
fn retain_vertices(mesh: &mut TriangleMesh, keep: &[bool]) -> usize {
    let original_count = mesh.vertices.len();
    if keep.iter().all(|&k| k) {
        return 0;
    }

    let mut remap = vec![usize::MAX; original_count];
    let mut next = 0usize;
    for (old, &kept) in keep.iter().enumerate() {
        if kept {
            remap[old] = next;
            next += 1;
        }
    }

    mesh.vertices = retain_flagged(&mesh.vertices, keep);
    if let Some(normals) = mesh.normals.as_mut() {
        if normals.len() == original_count {
            *normals = retain_flagged(normals, keep);
        } else {
            mesh.normals = None;
        }
    }
    if let Some(curvature) = mesh.curvature.as_mut() {
        if curvature.len() == original_count {
            *curvature = retain_flagged(curvature, keep);
        } else {
            mesh.curvature = None;
        }
    }
    if let Some(colors) = mesh.colors.as_mut() {
        if colors.len() == original_count {
            *colors = retain_flagged(colors, keep);
        } else {
            mesh.colors = None;
        }
    }

    for face in &mut mesh.faces {
        for index in face.iter_mut() {
            *index = remap[*index];
        }
    }

    original_count - mesh.vertices.len()
}

fn retain_flagged<T: Clone>(values: &[T], keep: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(keep)
        .filter(|(_, kept)| **kept)
        .map(|(value, _)| value.clone())
        .collect()
}

/// Whether a face repeats a vertex or has area at or below `area_threshold`
pub fn is_degenerate(mesh: &TriangleMesh, face: &[usize; 3], area_threshold: f32) -> bool {
    let [a, b, c] = *face;
    a == b || b == c || a == c || mesh.face_area(face) <= area_threshold
}

/// Remove faces whose vertices coincide or are collinear.
///
/// Returns the number of faces removed.
pub fn remove_degenerate_faces(mesh: &mut TriangleMesh, area_threshold: f32) -> usize {
    let original_count = mesh.faces.len();

    let keep: Vec<bool> = {
        let mesh: &TriangleMesh = mesh;
        mesh.faces
            .iter()
            .map(|face| !is_degenerate(mesh, face, area_threshold))
            .collect()
    };

    let mut flags = keep.iter();
    mesh.faces.retain(|_| *flags.next().unwrap_or(&true));

    let removed = original_count - mesh.faces.len();
    if removed > 0 {
        // Per-face cache no longer lines up
        mesh.face_normals = None;
        tracing::debug!(
            "Removed {} degenerate faces (area <= {:e})",
            removed,
            area_threshold
        );
    }
    removed
}
