//! Load, preprocess, optimize, repair and export
//!
//! Stages hand the mesh along by `&mut` and fail fast: the first error from
//! any stage is returned unchanged and nothing is retried.

use crate::descent::{DescentConfig, DescentSummary, GradientDescent, LogProgress, ProgressSink};
use meshdescent_core::{Error, MeshSource, Result, TriangleMesh};
use meshdescent_repair::{
    merge_duplicate_vertices, remove_non_finite_vertices, repair_mesh, RepairOptions,
    RepairSummary,
};
use std::path::Path;
use std::time::Instant;

/// Configuration for the optimization pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub descent: DescentConfig,
    pub repair: RepairOptions,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub input_vertices: usize,
    pub input_faces: usize,
    pub output_vertices: usize,
    pub output_faces: usize,
    pub descent: DescentSummary,
    pub repair: RepairSummary,
    /// Wall time in seconds
    pub processing_time: f32,
}

/// Resolve the loaded geometry to one mesh, drop non-finite vertices, weld
/// duplicated positions and attach normals and the curvature field (the
/// length of each vertex normal).
pub fn preprocess(source: MeshSource) -> Result<TriangleMesh> {
    let mut mesh = source.into_mesh()?;
    let non_finite = remove_non_finite_vertices(&mut mesh);
    if non_finite > 0 {
        tracing::warn!("Dropped {} vertices with non-finite coordinates", non_finite);
    }
    merge_duplicate_vertices(&mut mesh);

    if mesh.vertices.is_empty() {
        return Err(Error::EmptyGeometry("mesh has no vertices".to_string()));
    }

    mesh.compute_normals();
    mesh.compute_curvature();

    tracing::debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Preprocessed mesh"
    );
    Ok(mesh)
}

/// Strip unreferenced vertices, strip degenerate faces, fix normals
pub fn postprocess(mesh: &mut TriangleMesh, options: &RepairOptions) -> RepairSummary {
    repair_mesh(mesh, options)
}

/// Run the full in-memory pipeline with the default repair steps
pub fn run(
    source: impl Into<MeshSource>,
    learning_rate: f32,
    num_iterations: i64,
) -> Result<TriangleMesh> {
    let pipeline = OptimizationPipeline::new(PipelineConfig {
        descent: DescentConfig::new(learning_rate, num_iterations),
        repair: RepairOptions::default(),
    });
    pipeline
        .process(source.into(), &mut LogProgress)
        .map(|(mesh, _)| mesh)
}

/// The preprocess / optimize / postprocess pipeline
#[derive(Debug, Clone, Default)]
pub struct OptimizationPipeline {
    config: PipelineConfig,
}

impl OptimizationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Optimize a loaded source in memory
    pub fn process(
        &self,
        source: MeshSource,
        sink: &mut dyn ProgressSink,
    ) -> Result<(TriangleMesh, PipelineReport)> {
        let start = Instant::now();
        // Reject bad settings before touching any geometry
        let descent = GradientDescent::new(self.config.descent)?;

        let mut mesh = preprocess(source)?;
        let input_vertices = mesh.vertex_count();
        let input_faces = mesh.face_count();

        tracing::info!(
            learning_rate = descent.learning_rate(),
            iterations = descent.num_iterations(),
            "Starting gradient descent"
        );
        let descent_summary = descent.run_with_progress(&mut mesh, sink);

        let repair = postprocess(&mut mesh, &self.config.repair);

        let report = PipelineReport {
            input_vertices,
            input_faces,
            output_vertices: mesh.vertex_count(),
            output_faces: mesh.face_count(),
            descent: descent_summary,
            repair,
            processing_time: start.elapsed().as_secs_f32(),
        };
        tracing::info!(
            vertices = report.output_vertices,
            faces = report.output_faces,
            "Optimization complete"
        );
        Ok((mesh, report))
    }

    /// Load `input`, optimize it and export the result to `output`.
    ///
    /// An export failure is reported after optimization has finished; the
    /// run as a whole counts as failed.
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<PipelineReport> {
        let (input, output) = (input.as_ref(), output.as_ref());
        // Fail before loading when the output format is unknown
        meshdescent_io::MeshFormat::from_path(output)?;

        let source = meshdescent_io::load(input)?;
        let (mesh, report) = self.process(source, &mut LogProgress)?;

        meshdescent_io::write_mesh(&mesh, output)?;
        tracing::info!(path = %output.display(), "Wrote optimized mesh");
        Ok(report)
    }
}
