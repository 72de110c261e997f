//! Gradient descent over vertex positions

use crate::{gradient, objective};
use meshdescent_core::{Error, Result, TriangleMesh, Vector3f};
use std::fmt;

/// Default step size
pub const DEFAULT_LEARNING_RATE: f32 = 0.01;
/// Default iteration budget
pub const DEFAULT_NUM_ITERATIONS: i64 = 100;
/// The objective is evaluated and reported every this many iterations
pub const REPORT_INTERVAL: usize = 10;

/// Step size and iteration budget for the descent loop.
///
/// `num_iterations` is signed so that out-of-range requests coming from
/// callers (such as a negative count on the command line) reach
/// [`DescentConfig::validate`] and are rejected there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentConfig {
    pub learning_rate: f32,
    pub num_iterations: i64,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            num_iterations: DEFAULT_NUM_ITERATIONS,
        }
    }
}

impl DescentConfig {
    pub fn new(learning_rate: f32, num_iterations: i64) -> Self {
        Self {
            learning_rate,
            num_iterations,
        }
    }

    /// Check the configuration and return the iteration count
    pub fn validate(&self) -> Result<usize> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if self.num_iterations <= 0 {
            return Err(Error::InvalidConfiguration(format!(
                "num_iterations must be positive, got {}",
                self.num_iterations
            )));
        }
        usize::try_from(self.num_iterations).map_err(|_| {
            Error::InvalidConfiguration(format!(
                "num_iterations {} does not fit this platform",
                self.num_iterations
            ))
        })
    }
}

/// One progress line of the descent loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    pub iteration: usize,
    pub objective: f32,
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iteration {}, Objective: {:?}", self.iteration, self.objective)
    }
}

/// Receiver for progress reports
pub trait ProgressSink {
    fn report(&mut self, report: ProgressReport);
}

/// Emits each report as an `info` log line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, report: ProgressReport) {
        tracing::info!("{}", report);
    }
}

impl<F: FnMut(ProgressReport)> ProgressSink for F {
    fn report(&mut self, report: ProgressReport) {
        self(report)
    }
}

/// What a descent run did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DescentSummary {
    pub iterations: usize,
    pub reports: usize,
    /// Objective at the last report
    pub final_objective: f32,
}

/// Fixed-budget gradient descent on vertex positions
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f32,
    num_iterations: usize,
}

impl GradientDescent {
    /// Create a descent loop, rejecting an invalid configuration
    pub fn new(config: DescentConfig) -> Result<Self> {
        let num_iterations = config.validate()?;
        Ok(Self {
            learning_rate: config.learning_rate,
            num_iterations,
        })
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Run every iteration, logging progress
    pub fn run(&self, mesh: &mut TriangleMesh) -> DescentSummary {
        self.run_with_progress(mesh, &mut LogProgress)
    }

    /// Run every iteration, sending progress to `sink`
    pub fn run_with_progress(
        &self,
        mesh: &mut TriangleMesh,
        sink: &mut dyn ProgressSink,
    ) -> DescentSummary {
        let mut summary = DescentSummary::default();

        for iteration in 0..self.num_iterations {
            self.step(mesh);

            if iteration % REPORT_INTERVAL == 0 {
                let objective = objective::evaluate(mesh);
                sink.report(ProgressReport {
                    iteration,
                    objective,
                });
                summary.reports += 1;
                summary.final_objective = objective;
            }
            summary.iterations += 1;
        }

        tracing::debug!(
            iterations = summary.iterations,
            reports = summary.reports,
            "Gradient descent finished"
        );
        summary
    }

    /// One iteration: compute the gradient field and step against it
    pub fn step(&self, mesh: &mut TriangleMesh) {
        let field = gradient::gradient(mesh);
        apply_step(mesh, &field, self.learning_rate);
    }
}

/// `position -= learning_rate * gradient` over the whole vertex array
pub fn apply_step(mesh: &mut TriangleMesh, field: &[Vector3f], learning_rate: f32) {
    debug_assert_eq!(field.len(), mesh.vertex_count());

    let field: &[f32] = bytemuck::cast_slice(field);
    for (coordinate, g) in mesh.positions_flat_mut().iter_mut().zip(field) {
        *coordinate -= learning_rate * g;
    }
}

/// Descend `mesh` in place for `num_iterations` steps and hand it back.
///
/// Configuration is validated before the mesh is touched.
pub fn optimize(
    mesh: &mut TriangleMesh,
    learning_rate: f32,
    num_iterations: i64,
) -> Result<&mut TriangleMesh> {
    let descent = GradientDescent::new(DescentConfig::new(learning_rate, num_iterations))?;
    descent.run(mesh);
    Ok(mesh)
}
