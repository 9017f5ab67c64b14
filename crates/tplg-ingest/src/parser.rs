//! Top-level section dispatch.

use tplg_store::CompilerSession;
use tplg_types::Category;
use tracing::{info, warn};

use crate::error::{IngestError, IngestResult};
use crate::node::ConfigNode;
use crate::{ctl, dapm, data, pcm, value};

type SectionFn<N> = fn(&mut CompilerSession, &N) -> IngestResult<()>;

/// Counts reported after a tree has been ingested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub sections: usize,
    pub elements: usize,
    pub skipped: usize,
}

fn each<N: ConfigNode>(
    session: &mut CompilerSession,
    section: &N,
    parse: SectionFn<N>,
) -> IngestResult<()> {
    for node in value::children(section)? {
        parse(session, node)?;
    }
    Ok(())
}

fn links<N: ConfigNode>(
    session: &mut CompilerSession,
    section: &N,
    category: Category,
) -> IngestResult<()> {
    for node in value::children(section)? {
        pcm::parse_link(session, category, node)?;
    }
    Ok(())
}

/// Ingest every recognized section under `root`, in document order.
pub fn parse_tree<N: ConfigNode>(
    session: &mut CompilerSession,
    root: &N,
) -> IngestResult<IngestStats> {
    if session.is_built() {
        return Err(IngestError::AlreadyBuilt);
    }
    let before = total(session);
    let mut stats = IngestStats::default();

    for section in value::children(root)? {
        let id = section.id();
        match id {
            "SectionTLV" => each(session, section, ctl::parse_tlv)?,
            "SectionControlMixer" => each(session, section, ctl::parse_mixer)?,
            "SectionControlEnum" => each(session, section, ctl::parse_enum)?,
            "SectionControlBytes" => each(session, section, ctl::parse_bytes)?,
            "SectionWidget" => each(session, section, dapm::parse_widget)?,
            "SectionGraph" => each(session, section, dapm::parse_graph)?,
            "SectionPCMCapabilities" => each(session, section, pcm::parse_stream_caps)?,
            "SectionPCMConfig" => each(session, section, pcm::parse_stream_config)?,
            "SectionPCM" => each(session, section, pcm::parse_pcm)?,
            "SectionBEDAI" => each(session, section, pcm::parse_be_dai)?,
            "SectionComponent" => each(session, section, pcm::parse_component)?,
            "SectionHWConfig" => each(session, section, pcm::parse_hw_config)?,
            "SectionBE" => links(session, section, Category::BackendLink)?,
            "SectionCC" => links(session, section, Category::CodecLink)?,
            "SectionText" => each(session, section, data::parse_text)?,
            "SectionData" => each(session, section, data::parse_data)?,
            "SectionVendorTokens" => each(session, section, data::parse_tokens)?,
            "SectionVendorTuples" => each(session, section, data::parse_tuples)?,
            "SectionManifest" => each(session, section, data::parse_manifest)?,
            "SectionInclude" => {
                warn!("include sections are not supported, skipping");
                stats.skipped += 1;
                continue;
            }
            other => {
                if session.config().strict {
                    return Err(IngestError::UnknownSection(other.to_string()));
                }
                warn!(section = other, "skipping unknown section");
                stats.skipped += 1;
                continue;
            }
        }
        stats.sections += 1;
    }

    stats.elements = total(session) - before;
    info!(
        sections = stats.sections,
        elements = stats.elements,
        skipped = stats.skipped,
        "ingested config tree"
    );
    Ok(stats)
}

fn total(session: &CompilerSession) -> usize {
    session.store.total()
}
