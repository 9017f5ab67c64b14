use std::time::Duration;

use serde::Serialize;
use tplg_store::CompilerSession;

use crate::error::BuildResult;

/// What a pass did, as reported by the pass itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Elements visited.
    pub elements: usize,
    /// References newly resolved.
    pub resolved: usize,
}

/// Recorded result of one completed pass.
#[derive(Clone, Debug, Serialize)]
pub struct PassReport {
    pub name: &'static str,
    pub elements: usize,
    pub resolved: usize,
    pub elapsed: Duration,
}

/// One step of the build. Passes run in a fixed order and each may rely on
/// everything earlier passes merged.
pub trait BuildPass {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Resolve and merge this pass's references.
    fn run(&self, session: &mut CompilerSession) -> BuildResult<PassStats>;
}
