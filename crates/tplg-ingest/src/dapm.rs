//! `SectionWidget` and `SectionGraph`.

use tplg_store::CompilerSession;
use tplg_types::{Category, Payload, RouteLine, Widget, WidgetType};

use crate::draft::{commit_all, Draft};
use crate::error::IngestResult;
use crate::node::ConfigNode;
use crate::value;

pub(crate) fn parse_widget<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::Widget, node.id());
    let mut widget = Widget::new(node.id());

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "type" => {
                widget.kind =
                    WidgetType::from_name(&value::string(child)?).map_err(|e| draft.type_error(e))?
            }
            "stream_name" => widget.stream_name = value::string(child)?,
            "reg" => widget.reg = value::signed(child)?,
            "no_pm" => {
                if value::boolean(child)? {
                    widget.reg = -1;
                }
            }
            "shift" => widget.shift = value::unsigned(child)?,
            "mask" => widget.mask = value::unsigned(child)?,
            "invert" => widget.invert = u32::from(value::boolean(child)?),
            "ignore_suspend" => widget.ignore_suspend = u32::from(value::boolean(child)?),
            "subseq" => widget.subseq = value::unsigned(child)?,
            "event_type" => widget.event_type = value::short(child)?,
            "event_flags" => widget.event_flags = value::short(child)?,
            "mixer" => {
                for name in value::string_list(child)? {
                    draft.reference(Category::Mixer, name);
                }
            }
            "enum" => {
                for name in value::string_list(child)? {
                    draft.reference(Category::Enum, name);
                }
            }
            "data" => {
                for name in value::string_list(child)? {
                    draft.reference(Category::PrivateData, name);
                }
            }
            _ => draft.header_key(session, child)?,
        }
    }

    draft.payload = Payload::Widget(widget);
    draft.commit(session)?;
    Ok(())
}

/// One route element per entry of `lines`, all named after the graph.
///
/// Every line is parsed before any route is stored, so a malformed line
/// leaves the session unchanged.
pub(crate) fn parse_graph<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut lines = Vec::new();
    let mut section = Draft::new(Category::Route, node.id());

    for child in value::children(node)? {
        match child.id() {
            "index" => section.index = value::unsigned(child)?,
            "lines" => lines.extend(value::string_list(child)?),
            _ => section.header_key(session, child)?,
        }
    }

    let drafts = lines
        .iter()
        .map(|line| -> IngestResult<Draft> {
            let mut draft = Draft::new(Category::Route, node.id());
            draft.index = section.index;
            draft.vendor_version = section.vendor_version;
            draft.vendor_type = section.vendor_type;
            let route = RouteLine::parse(line).map_err(|e| draft.type_error(e))?;
            draft.payload = Payload::Route(route);
            Ok(draft)
        })
        .collect::<IngestResult<Vec<_>>>()?;
    commit_all(session, drafts)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::node::ConfigTree;
    use tplg_store::SessionConfig;

    fn session() -> CompilerSession {
        CompilerSession::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn widget_fields() {
        let mut s = session();
        let node = ConfigTree::compound(
            "PGA1",
            vec![
                ConfigTree::scalar("type", "pga"),
                ConfigTree::scalar("stream_name", "Playback"),
                ConfigTree::scalar("no_pm", "true"),
                ConfigTree::integer("subseq", 4),
                ConfigTree::compound("mixer", vec![ConfigTree::scalar("0", "Gain")]),
                ConfigTree::scalar("enum", "Mode"),
            ],
        );
        parse_widget(&mut s, &node).unwrap();

        let elem = s.store.iter(Category::Widget).next().unwrap();
        let refs: Vec<_> = elem.references.iter().map(|r| r.category).collect();
        assert_eq!(refs, [Category::Mixer, Category::Enum]);
        match &elem.payload {
            Payload::Widget(w) => {
                assert_eq!(w.kind, WidgetType::Pga);
                assert_eq!(w.stream_name, "Playback");
                assert_eq!(w.reg, -1);
                assert_eq!(w.subseq, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_widget_type() {
        let mut s = session();
        let node = ConfigTree::compound("X", vec![ConfigTree::scalar("type", "teapot")]);
        assert!(matches!(
            parse_widget(&mut s, &node),
            Err(IngestError::Element { .. })
        ));
    }

    #[test]
    fn graph_lines_become_routes() {
        let mut s = session();
        let node = ConfigTree::compound(
            "main",
            vec![ConfigTree::compound(
                "lines",
                vec![
                    ConfigTree::scalar("0", "W1, M1, W2"),
                    ConfigTree::scalar("1", "W2, , Speaker"),
                ],
            )],
        );
        parse_graph(&mut s, &node).unwrap();

        let routes: Vec<_> = s
            .store
            .iter(Category::Route)
            .map(|e| match &e.payload {
                Payload::Route(r) => r.clone(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].source, "W1");
        assert_eq!(routes[0].control, "M1");
        assert_eq!(routes[0].sink, "W2");
        assert_eq!(routes[1].control, "");
    }

    #[test]
    fn malformed_line_is_rejected() {
        let mut s = session();
        let node = ConfigTree::compound("g", vec![ConfigTree::scalar("lines", "only, two")]);
        assert!(parse_graph(&mut s, &node).is_err());
    }

    #[test]
    fn bad_later_line_stores_no_routes() {
        let mut s = session();
        let node = ConfigTree::compound(
            "main",
            vec![ConfigTree::compound(
                "lines",
                vec![
                    ConfigTree::scalar("0", "W1, M1, W2"),
                    ConfigTree::scalar("1", "W2, Speaker"),
                ],
            )],
        );
        assert!(parse_graph(&mut s, &node).is_err());
        assert_eq!(s.store.len(Category::Route), 0);
    }

    #[test]
    fn graph_header_keys_apply_to_every_route() {
        let mut s = session();
        let node = ConfigTree::compound(
            "main",
            vec![
                ConfigTree::integer("version", 2),
                ConfigTree::compound(
                    "lines",
                    vec![
                        ConfigTree::scalar("0", "A, , B"),
                        ConfigTree::scalar("1", "B, , C"),
                    ],
                ),
            ],
        );
        parse_graph(&mut s, &node).unwrap();
        assert!(s.store.iter(Category::Route).all(|e| e.vendor_version == 2));
    }
}
