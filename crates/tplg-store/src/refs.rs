//! The reference ledger: by-name dependencies between elements and their
//! resolution.

use tplg_types::Category;
use tracing::debug;

use crate::element::{Element, ElementId, Reference};
use crate::error::{StoreError, StoreResult};
use crate::store::ElementStore;

impl ElementStore {
    /// Record that `owner` depends on the `category` element named `target`.
    pub fn add_reference(
        &mut self,
        owner: ElementId,
        category: Category,
        target: &str,
    ) -> StoreResult<()> {
        let elem = self.get_mut(owner)?;
        elem.references.push(Reference {
            target: target.to_string(),
            category,
            resolved: false,
        });
        debug!(owner = %elem.name, %category, target, "added reference");
        Ok(())
    }

    /// Resolve the pending references of `owner` whose category passes
    /// `wanted`, in declaration order.
    ///
    /// Each target is looked up by `(category, name)` and handed to `merge`
    /// together with the owner. A reference is marked resolved only after
    /// `merge` succeeds, and resolved references are never revisited, so
    /// calling this repeatedly is harmless. Returns how many references
    /// were newly resolved.
    pub fn resolve_all<E, F>(
        &mut self,
        owner: ElementId,
        wanted: impl Fn(Category) -> bool,
        mut merge: F,
    ) -> Result<usize, E>
    where
        E: From<StoreError>,
        F: FnMut(&mut Element, &mut Element) -> Result<(), E>,
    {
        let owner_elem = self.get(owner)?;
        let owner_name = owner_elem.name.clone();
        let pending: Vec<(usize, Category, String)> = owner_elem
            .references
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.resolved && wanted(r.category))
            .map(|(slot, r)| (slot, r.category, r.target.clone()))
            .collect();

        let mut resolved = 0;
        for (slot, category, target_name) in pending {
            let target = self.lookup(category, &target_name).ok_or_else(|| {
                StoreError::UnresolvedReference {
                    owner: owner_name.clone(),
                    owner_category: owner.category,
                    target: target_name.clone(),
                    target_category: category,
                }
            })?;

            let (owner_elem, target_elem) = self.pair_mut(owner, target)?;
            merge(owner_elem, target_elem)?;
            owner_elem.references[slot].resolved = true;
            resolved += 1;
            debug!(owner = %owner_name, %category, target = %target_name, "resolved reference");
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append_tail(owner: &mut Element, target: &mut Element) -> StoreResult<()> {
        owner.append(target.tail())?;
        Ok(())
    }

    fn any(_: Category) -> bool {
        true
    }

    #[test]
    fn resolves_and_marks_references() {
        let mut store = ElementStore::new();
        let w = store.create(Category::Widget, "W");
        let d = store.create(Category::PrivateData, "D");
        store.get_mut(d).unwrap().append(&[9, 9]).unwrap();
        store.add_reference(w, Category::PrivateData, "D").unwrap();

        let n = store.resolve_all(w, any, append_tail).unwrap();
        assert_eq!(n, 1);
        let widget = store.get(w).unwrap();
        assert!(widget.references[0].resolved);
        assert_eq!(widget.tail(), &[9, 9]);
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut store = ElementStore::new();
        let w = store.create(Category::Widget, "W");
        let d = store.create(Category::PrivateData, "D");
        store.get_mut(d).unwrap().append(&[1, 2, 3, 4]).unwrap();
        store.add_reference(w, Category::PrivateData, "D").unwrap();

        store.resolve_all(w, any, append_tail).unwrap();
        let size = store.get(w).unwrap().payload_size();
        let n = store.resolve_all(w, any, append_tail).unwrap();
        assert_eq!(n, 0);
        assert_eq!(store.get(w).unwrap().payload_size(), size);
    }

    #[test]
    fn missing_target_names_owner_and_target() {
        let mut store = ElementStore::new();
        let w = store.create(Category::Widget, "Speaker");
        store.add_reference(w, Category::Mixer, "Ghost").unwrap();

        let err = store.resolve_all(w, any, append_tail).unwrap_err();
        assert_eq!(
            err,
            StoreError::UnresolvedReference {
                owner: "Speaker".into(),
                owner_category: Category::Widget,
                target: "Ghost".into(),
                target_category: Category::Mixer,
            }
        );
        assert!(!store.get(w).unwrap().references[0].resolved);
    }

    #[test]
    fn filter_leaves_other_references_pending() {
        let mut store = ElementStore::new();
        let w = store.create(Category::Widget, "W");
        store.create(Category::PrivateData, "D");
        store.add_reference(w, Category::PrivateData, "D").unwrap();
        store.add_reference(w, Category::Mixer, "M").unwrap();

        let n = store
            .resolve_all(w, |c| c == Category::PrivateData, append_tail)
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(store.get(w).unwrap().pending_references().count(), 1);
    }

    #[test]
    fn failed_merge_leaves_reference_unresolved() {
        let mut store = ElementStore::new();
        let w = store.create(Category::Widget, "W");
        store.create(Category::PrivateData, "D");
        store.add_reference(w, Category::PrivateData, "D").unwrap();

        let result: StoreResult<usize> = store.resolve_all(w, any, |_, target| {
            Err(StoreError::SelfReference {
                name: target.name.clone(),
                category: target.category,
            })
        });
        assert!(result.is_err());
        assert!(!store.get(w).unwrap().references[0].resolved);
    }
}
