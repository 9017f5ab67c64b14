use std::time::{Duration, Instant};

use serde::Serialize;
use tplg_store::CompilerSession;
use tracing::{debug, info};

use crate::error::{BuildError, BuildResult};
use crate::pass::{BuildPass, PassReport};
use crate::passes::{
    ControlPass, DataPass, LinkPass, ManifestDataPass, PcmPass, RoutePass, WidgetPass,
};

// ---------------------------------------------------------------------------
// BuildReport
// ---------------------------------------------------------------------------

/// Outcome of a complete build.
#[derive(Clone, Debug, Serialize)]
pub struct BuildReport {
    /// Per-pass results in execution order.
    pub passes: Vec<PassReport>,
    /// Total wall-clock time for all passes.
    pub elapsed: Duration,
}

impl BuildReport {
    /// Total references resolved across all passes.
    pub fn resolved(&self) -> usize {
        self.passes.iter().map(|p| p.resolved).sum()
    }
}

// ---------------------------------------------------------------------------
// LinkEngine
// ---------------------------------------------------------------------------

/// Runs the build passes over a session.
///
/// The pass order is fixed: private data, manifest data, controls, widgets,
/// PCMs, links, routes. Controls must be complete before widgets copy them,
/// and the order cannot be changed from outside.
pub struct LinkEngine {
    passes: Vec<Box<dyn BuildPass>>,
}

impl Default for LinkEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkEngine {
    pub fn new() -> Self {
        Self {
            passes: vec![
                Box::new(DataPass),
                Box::new(ManifestDataPass),
                Box::new(ControlPass),
                Box::new(WidgetPass),
                Box::new(PcmPass),
                Box::new(LinkPass),
                Box::new(RoutePass),
            ],
        }
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass. The first failure aborts the build.
    ///
    /// A session can be built once; merges are not reversible, so a failed
    /// session cannot be retried either.
    pub fn run(&self, session: &mut CompilerSession) -> BuildResult<BuildReport> {
        if session.is_built() {
            return Err(BuildError::AlreadyBuilt);
        }
        session.mark_built();
        session.manifest_id();

        let start = Instant::now();
        let mut passes = Vec::with_capacity(self.passes.len());
        for pass in &self.passes {
            let pass_start = Instant::now();
            let stats = pass.run(session)?;
            let report = PassReport {
                name: pass.name(),
                elements: stats.elements,
                resolved: stats.resolved,
                elapsed: pass_start.elapsed(),
            };
            debug!(
                pass = report.name,
                elements = report.elements,
                resolved = report.resolved,
                "build pass complete"
            );
            passes.push(report);
        }

        let report = BuildReport {
            passes,
            elapsed: start.elapsed(),
        };
        info!(resolved = report.resolved(), elapsed = ?report.elapsed, "build complete");
        Ok(report)
    }
}

/// Build `session` with the standard pass pipeline.
pub fn build(session: &mut CompilerSession) -> BuildResult<BuildReport> {
    LinkEngine::new().run(session)
}
