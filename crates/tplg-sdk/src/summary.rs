use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tplg_build::{BuildReport, PassReport};
use tplg_pack::TopologyWriter;

/// What a compilation produced, for display or JSON output.
#[derive(Clone, Debug, Serialize)]
pub struct CompileSummary {
    pub output: Option<PathBuf>,
    pub blocks: usize,
    pub bytes: usize,
    /// Emitted blocks per category.
    pub categories: BTreeMap<String, usize>,
    pub references_resolved: usize,
    pub passes: Vec<PassReport>,
}

impl CompileSummary {
    pub(crate) fn new(
        writer: &TopologyWriter,
        report: &BuildReport,
        output: Option<PathBuf>,
    ) -> Self {
        let mut categories = BTreeMap::new();
        for block in writer.blocks() {
            *categories.entry(block.category.to_string()).or_insert(0) += 1;
        }
        Self {
            output,
            blocks: writer.len(),
            bytes: writer.byte_len(),
            categories,
            references_resolved: report.resolved(),
            passes: report.passes.clone(),
        }
    }
}
