//! An element under construction, committed to the store in one step.

use tplg_store::{CompilerSession, ElementId};
use tplg_types::{Category, Payload, TypeError};
use tracing::{debug, warn};

use crate::error::{IngestError, IngestResult};
use crate::node::ConfigNode;
use crate::value;

/// Header, references and inline private bytes of an element that has not
/// yet been added to the store.
#[derive(Debug)]
pub(crate) struct Draft {
    pub category: Category,
    pub name: String,
    pub index: u32,
    pub vendor_version: u32,
    pub vendor_type: u32,
    pub payload: Payload,
    pub refs: Vec<(Category, String)>,
    pub private: Vec<u8>,
}

impl Draft {
    pub fn new(category: Category, name: &str) -> Self {
        Self {
            category,
            name: name.to_string(),
            index: 0,
            vendor_version: 0,
            vendor_type: 0,
            payload: Payload::for_category(category, name),
            refs: Vec::new(),
            private: Vec::new(),
        }
    }

    pub fn reference(&mut self, category: Category, target: impl Into<String>) {
        self.refs.push((category, target.into()));
    }

    /// Wrap a wire-type rejection with this element's identity.
    pub fn type_error(&self, source: TypeError) -> IngestError {
        IngestError::Element {
            category: self.category,
            name: self.name.clone(),
            source,
        }
    }

    /// Report a key the section does not know. Strict sessions fail.
    pub fn unknown_key(&self, session: &CompilerSession, key: &str) -> IngestResult<()> {
        if session.config().strict {
            return Err(IngestError::UnknownKey {
                section: self.category,
                name: self.name.clone(),
                key: key.to_string(),
            });
        }
        warn!(category = %self.category, name = %self.name, key, "skipping unknown key");
        Ok(())
    }

    /// Handle a key shared by every emitted section (`version`,
    /// `vendor_type`), reporting anything else as unknown.
    pub fn header_key<N: ConfigNode>(
        &mut self,
        session: &CompilerSession,
        node: &N,
    ) -> IngestResult<()> {
        match node.id() {
            "version" => self.vendor_version = value::unsigned(node)?,
            "vendor_type" => self.vendor_type = value::unsigned(node)?,
            other => self.unknown_key(session, other)?,
        }
        Ok(())
    }

    fn private_size(&self) -> IngestResult<u32> {
        u32::try_from(self.private.len()).map_err(|_| {
            self.type_error(TypeError::Capacity {
                what: "inline private data",
                max: u32::MAX as usize,
            })
        })
    }

    /// Everything that can reject this draft, checked without touching the
    /// store.
    ///
    /// Names are unique per category, except for routes, which share the
    /// name of the graph section they came from.
    pub fn check(&self, session: &CompilerSession) -> IngestResult<()> {
        if self.category != Category::Route
            && session.store.lookup(self.category, &self.name).is_some()
        {
            return Err(IngestError::Duplicate {
                category: self.category,
                name: self.name.clone(),
            });
        }
        self.private_size()?;
        Ok(())
    }

    /// Add the element to the session's store.
    pub fn commit(self, session: &mut CompilerSession) -> IngestResult<ElementId> {
        self.check(session)?;
        let priv_size = self.private_size()?;
        let Draft {
            category,
            name,
            index,
            vendor_version,
            vendor_type,
            mut payload,
            refs,
            private,
        } = self;

        if !private.is_empty() {
            if let Some(size) = payload.priv_size_mut() {
                *size = priv_size;
            }
        }

        let id = session.store.create(category, &name);
        let elem = session.store.get_mut(id)?;
        elem.index = index;
        elem.vendor_version = vendor_version;
        elem.vendor_type = vendor_type;
        elem.payload = payload;
        if !private.is_empty() {
            elem.append(&private)?;
        }
        for (target_category, target) in &refs {
            session.store.add_reference(id, *target_category, target)?;
        }
        debug!(%category, %name, refs = refs.len(), "ingested element");
        Ok(id)
    }
}

/// Commit a group of drafts together: either every draft is accepted or
/// the store is left as it was.
pub(crate) fn commit_all(
    session: &mut CompilerSession,
    drafts: Vec<Draft>,
) -> IngestResult<Vec<ElementId>> {
    for (i, draft) in drafts.iter().enumerate() {
        draft.check(session)?;
        let repeated = draft.category != Category::Route
            && drafts[..i]
                .iter()
                .any(|d| d.category == draft.category && d.name == draft.name);
        if repeated {
            return Err(IngestError::Duplicate {
                category: draft.category,
                name: draft.name.clone(),
            });
        }
    }
    drafts.into_iter().map(|d| d.commit(session)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tplg_store::SessionConfig;

    fn session() -> CompilerSession {
        CompilerSession::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn commit_sets_header_refs_and_tail() {
        let mut s = session();
        let mut draft = Draft::new(Category::Widget, "W1");
        draft.index = 3;
        draft.reference(Category::Mixer, "M1");
        draft.private = vec![1, 2, 3, 4];
        let id = draft.commit(&mut s).unwrap();

        let elem = s.store.get(id).unwrap();
        assert_eq!(elem.index, 3);
        assert_eq!(elem.tail(), &[1, 2, 3, 4]);
        assert_eq!(elem.references.len(), 1);
        match &elem.payload {
            Payload::Widget(w) => assert_eq!(w.priv_size, 4),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut s = session();
        Draft::new(Category::Mixer, "M1").commit(&mut s).unwrap();
        let err = Draft::new(Category::Mixer, "M1").commit(&mut s).unwrap_err();
        assert!(matches!(err, IngestError::Duplicate { .. }));
        // Same name, other category is fine.
        Draft::new(Category::Enum, "M1").commit(&mut s).unwrap();
    }

    #[test]
    fn routes_may_share_a_name() {
        let mut s = session();
        Draft::new(Category::Route, "graph").commit(&mut s).unwrap();
        Draft::new(Category::Route, "graph").commit(&mut s).unwrap();
        assert_eq!(s.store.len(Category::Route), 2);
    }

    #[test]
    fn strict_sessions_reject_unknown_keys() {
        let strict = CompilerSession::new(SessionConfig {
            strict: true,
            ..SessionConfig::default()
        })
        .unwrap();
        let draft = Draft::new(Category::Pcm, "p");
        assert!(draft.unknown_key(&strict, "bogus").is_err());
        assert!(draft.unknown_key(&session(), "bogus").is_ok());
    }

    #[test]
    fn rejected_group_leaves_store_untouched() {
        let mut s = session();
        Draft::new(Category::Widget, "W").commit(&mut s).unwrap();

        let drafts = vec![
            Draft::new(Category::Mixer, "Orphan"),
            Draft::new(Category::Widget, "W"),
        ];
        let err = commit_all(&mut s, drafts).unwrap_err();
        assert!(matches!(err, IngestError::Duplicate { category: Category::Widget, .. }));
        assert_eq!(s.store.len(Category::Mixer), 0);
        assert_eq!(s.store.len(Category::Widget), 1);
    }

    #[test]
    fn names_repeated_within_a_group_are_rejected() {
        let mut s = session();
        let drafts = vec![
            Draft::new(Category::Mixer, "Gain"),
            Draft::new(Category::Mixer, "Gain"),
        ];
        assert!(commit_all(&mut s, drafts).is_err());
        assert_eq!(s.store.len(Category::Mixer), 0);

        let routes = vec![
            Draft::new(Category::Route, "graph"),
            Draft::new(Category::Route, "graph"),
        ];
        assert_eq!(commit_all(&mut s, routes).unwrap().len(), 2);
    }

    #[test]
    fn header_keys_reach_the_element() {
        use crate::node::ConfigTree;

        let mut s = session();
        let mut draft = Draft::new(Category::Pcm, "p");
        draft
            .header_key(&s, &ConfigTree::integer("version", 5))
            .unwrap();
        draft
            .header_key(&s, &ConfigTree::scalar("vendor_type", "0x10"))
            .unwrap();
        let id = draft.commit(&mut s).unwrap();

        let elem = s.store.get(id).unwrap();
        assert_eq!(elem.vendor_version, 5);
        assert_eq!(elem.vendor_type, 0x10);
    }
}
