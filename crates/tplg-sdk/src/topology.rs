use std::path::Path;

use tplg_build::{BuildReport, LinkEngine};
use tplg_ingest::{IngestStats, ObjectTemplate};
use tplg_pack::{OutputSink, TopologyWriter};
use tplg_store::{CompilerSession, ElementId, SessionConfig};
use tracing::info;

use crate::error::{SdkError, SdkResult};
use crate::summary::CompileSummary;

/// One topology being assembled and compiled.
///
/// Elements are added from config trees, files or templates; [`build`]
/// resolves and merges them once, and [`compile`] or [`compile_to_path`]
/// produce the binary.
///
/// [`build`]: Topology::build
/// [`compile`]: Topology::compile
/// [`compile_to_path`]: Topology::compile_to_path
#[derive(Debug)]
pub struct Topology {
    session: CompilerSession,
    report: Option<BuildReport>,
}

impl Topology {
    pub fn new() -> SdkResult<Self> {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> SdkResult<Self> {
        Ok(Self {
            session: CompilerSession::new(config)?,
            report: None,
        })
    }

    pub fn session(&self) -> &CompilerSession {
        &self.session
    }

    /// The build report, once built.
    pub fn report(&self) -> Option<&BuildReport> {
        self.report.as_ref()
    }

    // ---- Input ----

    pub fn load_str(&mut self, source: &str) -> SdkResult<IngestStats> {
        Ok(tplg_ingest::load_str(&mut self.session, source)?)
    }

    pub fn load_file(&mut self, path: &Path) -> SdkResult<IngestStats> {
        Ok(tplg_ingest::load_file(&mut self.session, path)?)
    }

    pub fn add_object(&mut self, template: ObjectTemplate) -> SdkResult<ElementId> {
        Ok(tplg_ingest::add_object(&mut self.session, template)?)
    }

    /// Append raw bytes to the manifest's private data.
    pub fn set_manifest_data(&mut self, data: &[u8]) -> SdkResult<()> {
        if self.session.is_built() {
            return Err(SdkError::AlreadyBuilt);
        }
        let id = self.session.manifest_id();
        self.session.store.get_mut(id)?.append(data)?;
        // append keeps the whole payload within u32.
        self.session.manifest_mut()?.priv_size += data.len() as u32;
        Ok(())
    }

    /// Version written into blocks of elements that carry none.
    pub fn set_version(&mut self, version: u32) -> SdkResult<()> {
        if self.session.is_built() {
            return Err(SdkError::AlreadyBuilt);
        }
        self.session.set_version(version);
        Ok(())
    }

    // ---- Output ----

    /// Run the build passes. Later calls return the first report.
    pub fn build(&mut self) -> SdkResult<&BuildReport> {
        let report = match self.report.take() {
            Some(report) => report,
            None => LinkEngine::new().run(&mut self.session)?,
        };
        Ok(self.report.insert(report))
    }

    /// Build if needed and return the encoded topology.
    pub fn compile(&mut self) -> SdkResult<Vec<u8>> {
        self.build()?;
        let writer = TopologyWriter::from_session(&self.session)?;
        Ok(writer.finish_to_bytes())
    }

    /// Build if needed and write the topology to `path`.
    ///
    /// The output sink is opened before building, so an unwritable
    /// destination fails early; the destination itself is only replaced
    /// once everything has succeeded.
    pub fn compile_to_path(&mut self, path: &Path) -> SdkResult<CompileSummary> {
        let sink = OutputSink::create(path)?;
        let report = self.build()?.clone();
        let writer = TopologyWriter::from_session(&self.session)?;
        let written = writer.write_to(sink)?;
        let summary = CompileSummary::new(&writer, &report, Some(written));
        info!(blocks = summary.blocks, bytes = summary.bytes, "compiled topology");
        Ok(summary)
    }

    /// Build if needed and describe the output without writing it.
    pub fn check(&mut self) -> SdkResult<CompileSummary> {
        let report = self.build()?.clone();
        let writer = TopologyWriter::from_session(&self.session)?;
        Ok(CompileSummary::new(&writer, &report, None))
    }
}
