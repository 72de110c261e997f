//! Mesh repair
//!
//! Post-processing applied after optimization:
//! - Unreferenced vertex removal
//! - Degenerate face removal
//! - Normal fixing (consistent winding, outward orientation, fresh normals)

pub mod cleanup;
pub mod orientation;

pub use cleanup::*;
pub use orientation::*;

use meshdescent_core::TriangleMesh;

/// Area at or below which a face counts as degenerate
pub const DEFAULT_AREA_THRESHOLD: f32 = 1e-10;

/// Which repair steps to run
#[derive(Debug, Clone)]
pub struct RepairOptions {
    pub remove_unreferenced: bool,
    pub remove_degenerate: bool,
    /// Faces with area at or below this are dropped
    pub area_threshold: f32,
    pub fix_normals: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            remove_unreferenced: true,
            remove_degenerate: true,
            area_threshold: DEFAULT_AREA_THRESHOLD,
            fix_normals: true,
        }
    }
}

impl RepairOptions {
    /// Skip every step
    pub fn none() -> Self {
        Self {
            remove_unreferenced: false,
            remove_degenerate: false,
            area_threshold: 0.0,
            fix_normals: false,
        }
    }
}

/// What a repair pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairSummary {
    pub unreferenced_removed: usize,
    pub degenerate_removed: usize,
    pub faces_flipped: usize,
}

impl RepairSummary {
    pub fn had_changes(&self) -> bool {
        self.unreferenced_removed > 0 || self.degenerate_removed > 0 || self.faces_flipped > 0
    }
}

/// Run the enabled repair steps in order: unreferenced vertices, degenerate
/// faces, normals.
pub fn repair_mesh(mesh: &mut TriangleMesh, options: &RepairOptions) -> RepairSummary {
    let mut summary = RepairSummary::default();

    if options.remove_unreferenced {
        summary.unreferenced_removed = remove_unreferenced_vertices(mesh);
    }
    if options.remove_degenerate {
        summary.degenerate_removed = remove_degenerate_faces(mesh, options.area_threshold);
    }
    if options.fix_normals {
        summary.faces_flipped = fix_normals(mesh);
    }

    tracing::debug!(
        unreferenced = summary.unreferenced_removed,
        degenerate = summary.degenerate_removed,
        flipped = summary.faces_flipped,
        "Repair pass complete"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshdescent_core::Point3f;

    fn make_dirty_mesh() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::new(2.0, 0.0, 0.0),
                Point3f::new(7.0, 7.0, 7.0),
            ],
            // Second face is collinear, vertex 4 is unused
            vec![[0, 1, 2], [0, 1, 3]],
        )
    }

    #[test]
    fn test_default_options() {
        let options = RepairOptions::default();
        assert!(options.remove_unreferenced);
        assert!(options.remove_degenerate);
        assert!(options.fix_normals);
        assert!(options.area_threshold > 0.0);
    }

    #[test]
    fn test_repair_mesh_runs_all_steps() {
        let mut mesh = make_dirty_mesh();
        let summary = repair_mesh(&mut mesh, &RepairOptions::default());

        assert_eq!(summary.unreferenced_removed, 1);
        assert_eq!(summary.degenerate_removed, 1);
        assert!(summary.had_changes());
        assert_eq!(mesh.face_count(), 1);
        // Removing the degenerate face leaves vertex 3 unreferenced; the
        // unreferenced pass has already run so it stays.
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.normals.is_some());
    }

    #[test]
    fn test_repair_mesh_with_nothing_enabled() {
        let mut mesh = make_dirty_mesh();
        let summary = repair_mesh(&mut mesh, &RepairOptions::none());
        assert!(!summary.had_changes());
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.face_count(), 2);
    }
}
