//! The seven build passes, in the order the engine runs them.

use tplg_store::{CompilerSession, ElementStore};
use tplg_types::wire::wire_len;
use tplg_types::{Category, Payload};

use crate::error::{BuildError, BuildResult};
use crate::merge::merge;
use crate::pass::{BuildPass, PassStats};
use crate::validate::validate_routes;

/// Categories whose headers take a private-data tail.
const DATA_OWNERS: [Category; 8] = [
    Category::Mixer,
    Category::Enum,
    Category::Bytes,
    Category::Widget,
    Category::Pcm,
    Category::BeDai,
    Category::BackendLink,
    Category::CodecLink,
];

fn is_data(category: Category) -> bool {
    category == Category::PrivateData
}

fn everything(_: Category) -> bool {
    true
}

/// Resolve the `wanted` references of every element in `category`.
fn resolve_each(
    store: &mut ElementStore,
    category: Category,
    wanted: fn(Category) -> bool,
    stats: &mut PassStats,
) -> BuildResult<usize> {
    let ids = store.ids(category);
    for id in &ids {
        stats.resolved += store.resolve_all(*id, wanted, merge)?;
    }
    stats.elements += ids.len();
    Ok(ids.len())
}

// ---------------------------------------------------------------------------
// 1. Private data
// ---------------------------------------------------------------------------

/// Builds private-data blobs from vendor tuples, then appends private data
/// to every element that references it.
pub struct DataPass;

impl BuildPass for DataPass {
    fn name(&self) -> &'static str {
        "data"
    }

    fn run(&self, session: &mut CompilerSession) -> BuildResult<PassStats> {
        let store = &mut session.store;
        let mut stats = PassStats::default();
        resolve_each(
            store,
            Category::VendorTuple,
            |c| c == Category::VendorToken,
            &mut stats,
        )?;
        resolve_each(
            store,
            Category::PrivateData,
            |c| c == Category::VendorTuple,
            &mut stats,
        )?;
        for category in DATA_OWNERS {
            resolve_each(store, category, is_data, &mut stats)?;
        }
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// 2. Manifest private data
// ---------------------------------------------------------------------------

pub struct ManifestDataPass;

impl BuildPass for ManifestDataPass {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn run(&self, session: &mut CompilerSession) -> BuildResult<PassStats> {
        let mut stats = PassStats::default();
        if let Some(id) = session.existing_manifest() {
            stats.resolved += session.store.resolve_all(id, is_data, merge)?;
            stats.elements = 1;
        }
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// 3. Controls
// ---------------------------------------------------------------------------

/// TLVs into mixers and byte controls, text lists into enums.
pub struct ControlPass;

impl ControlPass {
    /// A byte control takes its buffer from a single private-data section.
    fn check_single_data(store: &ElementStore) -> BuildResult<()> {
        for elem in store.iter(Category::Bytes) {
            let data_refs = elem.references.iter().filter(|r| is_data(r.category)).count();
            if data_refs > 1 {
                return Err(BuildError::Capacity {
                    element: elem.name.clone(),
                    category: elem.category,
                    what: "private data references",
                    max: 1,
                });
            }
        }
        Ok(())
    }
}

impl BuildPass for ControlPass {
    fn name(&self) -> &'static str {
        "controls"
    }

    fn run(&self, session: &mut CompilerSession) -> BuildResult<PassStats> {
        Self::check_single_data(&session.store)?;
        let mut stats = PassStats::default();
        let mut controls = 0;
        for category in [Category::Mixer, Category::Enum, Category::Bytes] {
            controls += resolve_each(&mut session.store, category, everything, &mut stats)?;
        }
        session.manifest_mut()?.control_elems += wire_len(controls);
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// 4. Widgets
// ---------------------------------------------------------------------------

/// Embeds mixer and enum controls into the widgets that list them.
pub struct WidgetPass;

fn kcontrol_count(store: &ElementStore, id: tplg_store::ElementId) -> BuildResult<u32> {
    match &store.get(id)?.payload {
        Payload::Widget(widget) => Ok(widget.num_kcontrols),
        _ => Ok(0),
    }
}

impl BuildPass for WidgetPass {
    fn name(&self) -> &'static str {
        "widgets"
    }

    fn run(&self, session: &mut CompilerSession) -> BuildResult<PassStats> {
        let store = &mut session.store;
        let mut stats = PassStats::default();
        let mut embedded = 0;
        let ids = store.ids(Category::Widget);
        for id in &ids {
            let before = kcontrol_count(store, *id)?;
            stats.resolved += store.resolve_all(*id, everything, merge)?;
            embedded += kcontrol_count(store, *id)? - before;
        }
        stats.elements = ids.len();

        let manifest = session.manifest_mut()?;
        manifest.widget_elems += wire_len(ids.len());
        manifest.kcontrol_elems += embedded;
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// 5. PCMs and back-end DAIs
// ---------------------------------------------------------------------------

/// Stream capabilities and stream configurations into PCMs and DAIs.
pub struct PcmPass;

impl BuildPass for PcmPass {
    fn name(&self) -> &'static str {
        "pcm"
    }

    fn run(&self, session: &mut CompilerSession) -> BuildResult<PassStats> {
        let mut stats = PassStats::default();
        let pcms = resolve_each(&mut session.store, Category::Pcm, everything, &mut stats)?;
        let dais = resolve_each(&mut session.store, Category::BeDai, everything, &mut stats)?;
        let manifest = session.manifest_mut()?;
        manifest.pcm_elems += wire_len(pcms);
        manifest.dai_elems += wire_len(dais);
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// 6. Links
// ---------------------------------------------------------------------------

/// Components, hardware configurations and stream configurations into
/// back-end links, then codec-codec links.
pub struct LinkPass;

impl BuildPass for LinkPass {
    fn name(&self) -> &'static str {
        "links"
    }

    fn run(&self, session: &mut CompilerSession) -> BuildResult<PassStats> {
        let mut stats = PassStats::default();
        let mut links = 0;
        for category in [Category::BackendLink, Category::CodecLink] {
            links += resolve_each(&mut session.store, category, everything, &mut stats)?;
        }
        session.manifest_mut()?.dai_link_elems += wire_len(links);
        Ok(stats)
    }
}

// ---------------------------------------------------------------------------
// 7. Routes
// ---------------------------------------------------------------------------

/// Checks that every route connects existing widgets.
pub struct RoutePass;

impl BuildPass for RoutePass {
    fn name(&self) -> &'static str {
        "routes"
    }

    fn run(&self, session: &mut CompilerSession) -> BuildResult<PassStats> {
        let routes = validate_routes(&session.store)?;
        session.manifest_mut()?.graph_elems += wire_len(routes);
        Ok(PassStats {
            elements: routes,
            resolved: 0,
        })
    }
}
