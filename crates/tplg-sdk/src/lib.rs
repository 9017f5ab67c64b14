//! High-level API for compiling audio topologies.
//!
//! [`Topology`] wraps one compiler session: load sections from TOML or add
//! objects from templates, then compile to bytes or to a file.
//!
//! ```rust
//! use tplg_sdk::Topology;
//!
//! let mut topology = Topology::new().unwrap();
//! topology
//!     .load_str(
//!         r#"
//!         [SectionWidget.Speaker]
//!         type = "output"
//!         "#,
//!     )
//!     .unwrap();
//! let bytes = topology.compile().unwrap();
//! assert!(!bytes.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod summary;
pub mod topology;

pub use config::{load_config, parse_config};
pub use error::{SdkError, SdkResult};
pub use summary::CompileSummary;
pub use topology::Topology;

// Re-export key types
pub use tplg_build::{BuildReport, PassReport};
pub use tplg_ingest::{
    ConfigNode, ConfigTree, GraphTemplate, IngestStats, MixerTemplate, ObjectTemplate,
    WidgetTemplate,
};
pub use tplg_pack::{split_blocks, BlockHeader, RawBlock};
pub use tplg_store::SessionConfig;
pub use tplg_types::Category;

#[cfg(test)]
mod tests {
    use super::*;
    use tplg_ingest::{ControlTemplate, DbScaleTemplate, RouteTemplate, WidgetControl};
    use tplg_types::limits::tag;
    use tplg_types::{Manifest, MixerControl, Widget, WireFormat};

    /// (control, widget, kcontrol) counters of an encoded manifest.
    fn decode_manifest(payload: &[u8]) -> (u32, u32, u32) {
        let word = |i: usize| {
            u32::from_le_bytes(payload[4 + 4 * i..8 + 4 * i].try_into().unwrap())
        };
        (word(0), word(1), word(6))
    }

    // 1. Widget with an embedded mixer and TLV, built from templates
    #[test]
    fn test_embedded_mixer_end_to_end() {
        let mut topology = Topology::new().unwrap();
        topology
            .add_object(ObjectTemplate::Widget(WidgetTemplate {
                name: "W2".into(),
                kind: "output".into(),
                ..WidgetTemplate::default()
            }))
            .unwrap();
        topology
            .add_object(ObjectTemplate::Widget(WidgetTemplate {
                name: "W1".into(),
                kind: "pga".into(),
                controls: vec![WidgetControl::Mixer(MixerTemplate {
                    control: ControlTemplate {
                        name: "M1".into(),
                        tlv: Some(DbScaleTemplate {
                            min: -9000,
                            step: 300,
                            mute: 1,
                        }),
                        ..ControlTemplate::default()
                    },
                    max: 31,
                    ..MixerTemplate::default()
                })],
                ..WidgetTemplate::default()
            }))
            .unwrap();
        topology
            .add_object(ObjectTemplate::Graph(GraphTemplate {
                name: "main".into(),
                routes: vec![RouteTemplate {
                    source: "W1".into(),
                    control: "M1".into(),
                    sink: "W2".into(),
                }],
                ..GraphTemplate::default()
            }))
            .unwrap();

        let bytes = topology.compile().unwrap();
        let blocks = split_blocks(&bytes).unwrap();
        let types: Vec<_> = blocks.iter().map(|b| b.header.block_type).collect();
        assert_eq!(
            types,
            [tag::MANIFEST, tag::DAPM_WIDGET, tag::DAPM_WIDGET, tag::DAPM_GRAPH]
        );

        let (_, widgets, kcontrols) = decode_manifest(&blocks[0].payload);
        assert_eq!(blocks[0].payload.len(), Manifest::WIRE_SIZE);
        assert_eq!(widgets, 2);
        assert_eq!(kcontrols, 1);

        // W2 first, as created; it has no controls.
        assert_eq!(blocks[1].payload.len(), Widget::WIRE_SIZE);
        assert_eq!(&blocks[1].payload[8..10], b"W2");

        // W1 carries M1's full payload, TLV included.
        let w1 = &blocks[2].payload;
        assert_eq!(&w1[8..10], b"W1");
        assert_eq!(w1.len(), Widget::WIRE_SIZE + MixerControl::WIRE_SIZE);
        let m1 = &w1[Widget::WIRE_SIZE..];
        let tlv_words = &m1[MixerControl::TLV_OFFSET + 12..MixerControl::TLV_OFFSET + 24];
        let scale: Vec<i32> = tlv_words
            .chunks(4)
            .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(scale, [-9000, 300, 1]);
    }

    // 2. Same topology from TOML sections
    #[test]
    fn test_text_end_to_end() {
        let mut topology = Topology::new().unwrap();
        topology
            .load_str(
                r#"
                [SectionWidget.W2]
                type = "output"

                [SectionTLV.T1]
                scale = { min = -9000, step = 300, mute = 1 }

                [SectionControlMixer.M1]
                max = 31
                tlv = "T1"

                [SectionWidget.W1]
                type = "pga"
                mixer = "M1"

                [SectionGraph.main]
                lines = ["W1, M1, W2"]
                "#,
            )
            .unwrap();
        let summary = topology.check().unwrap();
        assert_eq!(summary.blocks, 4);
        assert_eq!(summary.categories.get("widget"), Some(&2));
        assert!(!summary.categories.contains_key("mixer"));
        assert!(!summary.categories.contains_key("tlv"));
        assert_eq!(summary.references_resolved, 2);
    }

    // 3. A failed compile leaves the destination alone
    #[test]
    fn test_failed_compile_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("topology.bin");
        std::fs::write(&dest, b"previous").unwrap();

        let mut topology = Topology::new().unwrap();
        topology
            .load_str("[SectionWidget.W]\ntype = \"pga\"\nmixer = \"Missing\"\n")
            .unwrap();
        let err = topology.compile_to_path(&dest).unwrap_err();
        assert!(matches!(err, SdkError::Build(_)));

        assert_eq!(std::fs::read(&dest).unwrap(), b"previous");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    // 4. A successful compile writes exactly the compiled bytes
    #[test]
    fn test_compile_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let mut topology = Topology::new().unwrap();
        topology.load_str("[SectionWidget.W]\ntype = \"dac\"\n").unwrap();
        let summary = topology.compile_to_path(&dest).unwrap();
        assert_eq!(summary.output.as_deref(), Some(dest.as_path()));
        assert_eq!(std::fs::metadata(&dest).unwrap().len() as usize, summary.bytes);
        // Compiling again reuses the finished build.
        assert_eq!(topology.compile().unwrap(), std::fs::read(&dest).unwrap());
    }

    // 5. Manifest data and version reach the output
    #[test]
    fn test_manifest_data_and_version() {
        let mut topology = Topology::new().unwrap();
        topology.set_version(7).unwrap();
        topology.set_manifest_data(&[0xAA; 8]).unwrap();
        let bytes = topology.compile().unwrap();
        let blocks = split_blocks(&bytes).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header.version, 7);
        assert_eq!(blocks[0].payload.len(), Manifest::WIRE_SIZE + 8);
        assert!(blocks[0].payload.ends_with(&[0xAA; 8]));

        assert!(matches!(topology.set_version(8), Err(SdkError::AlreadyBuilt)));
        assert!(matches!(
            topology.load_str("[SectionWidget.X]\n"),
            Err(SdkError::Ingest(_))
        ));
    }

    // 6. Config knobs flow into the session
    #[test]
    fn test_config_from_toml() {
        let config = parse_config("version = 2\nstrict = true\n").unwrap();
        let mut topology = Topology::with_config(config).unwrap();
        assert_eq!(topology.session().version(), 2);
        assert!(topology.load_str("[SectionNope.x]\n").is_err());
    }

    // 7. A rejected object leaves nothing behind in the output
    #[test]
    fn test_rejected_widget_adds_no_blocks() {
        let mut topology = Topology::new().unwrap();
        topology
            .add_object(ObjectTemplate::Widget(WidgetTemplate {
                name: "W".into(),
                ..WidgetTemplate::default()
            }))
            .unwrap();
        let err = topology
            .add_object(ObjectTemplate::Widget(WidgetTemplate {
                name: "W".into(),
                controls: vec![WidgetControl::Mixer(MixerTemplate {
                    control: ControlTemplate {
                        name: "Orphan".into(),
                        ..ControlTemplate::default()
                    },
                    ..MixerTemplate::default()
                })],
                ..WidgetTemplate::default()
            }))
            .unwrap_err();
        assert!(matches!(err, SdkError::Ingest(_)));

        let bytes = topology.compile().unwrap();
        let types: Vec<_> = split_blocks(&bytes)
            .unwrap()
            .iter()
            .map(|b| b.header.block_type)
            .collect();
        assert_eq!(types, [tag::MANIFEST, tag::DAPM_WIDGET]);
    }

    // 8. Per-object version and vendor type reach the block header
    #[test]
    fn test_object_header_fields() {
        let mut topology = Topology::new().unwrap();
        topology
            .load_str(
                r#"
                [SectionWidget.Speaker]
                type = "output"
                version = 4
                vendor_type = 0x21
                "#,
            )
            .unwrap();
        let bytes = topology.compile().unwrap();
        let blocks = split_blocks(&bytes).unwrap();
        assert_eq!(blocks[1].header.version, 4);
        assert_eq!(blocks[1].header.vendor_type, 0x21);
    }
}
