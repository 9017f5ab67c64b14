use tplg_types::Category;
use tracing::debug;

use crate::element::{Element, ElementId};
use crate::error::{StoreError, StoreResult};

/// Arena of elements, one insertion-ordered list per category.
///
/// The store enforces no uniqueness: two elements may share a
/// `(category, name)` key, in which case [`ElementStore::lookup`] returns the
/// one inserted first.
#[derive(Debug)]
pub struct ElementStore {
    lists: Vec<Vec<Element>>,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStore {
    pub fn new() -> Self {
        Self {
            lists: (0..Category::COUNT).map(|_| Vec::new()).collect(),
        }
    }

    // ------ Mutation ------

    /// Append a new zeroed element to the end of its category list.
    pub fn create(&mut self, category: Category, name: &str) -> ElementId {
        let list = &mut self.lists[category.slot()];
        let id = ElementId {
            category,
            index: list.len(),
        };
        list.push(Element::new(category, name));
        debug!(%category, name, index = id.index, "created element");
        id
    }

    pub fn get_mut(&mut self, id: ElementId) -> StoreResult<&mut Element> {
        self.lists[id.category.slot()]
            .get_mut(id.index)
            .ok_or(StoreError::UnknownElement(id))
    }

    /// Borrow two distinct elements mutably at once.
    pub fn pair_mut(
        &mut self,
        a: ElementId,
        b: ElementId,
    ) -> StoreResult<(&mut Element, &mut Element)> {
        self.get(a)?;
        self.get(b)?;
        if a == b {
            let elem = self.get(a)?;
            return Err(StoreError::SelfReference {
                name: elem.name.clone(),
                category: elem.category,
            });
        }

        let (sa, sb) = (a.category.slot(), b.category.slot());
        if sa == sb {
            let list = &mut self.lists[sa];
            if a.index < b.index {
                let (lo, hi) = list.split_at_mut(b.index);
                Ok((&mut lo[a.index], &mut hi[0]))
            } else {
                let (lo, hi) = list.split_at_mut(a.index);
                Ok((&mut hi[0], &mut lo[b.index]))
            }
        } else if sa < sb {
            let (lo, hi) = self.lists.split_at_mut(sb);
            Ok((&mut lo[sa][a.index], &mut hi[0][b.index]))
        } else {
            let (lo, hi) = self.lists.split_at_mut(sa);
            Ok((&mut hi[0][a.index], &mut lo[sb][b.index]))
        }
    }

    // ------ Queries ------

    /// First element of `category` whose name is exactly `name`.
    pub fn lookup(&self, category: Category, name: &str) -> Option<ElementId> {
        self.lists[category.slot()]
            .iter()
            .position(|e| e.name == name)
            .map(|index| ElementId { category, index })
    }

    pub fn get(&self, id: ElementId) -> StoreResult<&Element> {
        self.lists[id.category.slot()]
            .get(id.index)
            .ok_or(StoreError::UnknownElement(id))
    }

    /// Ids of every element in `category`, in insertion order.
    pub fn ids(&self, category: Category) -> Vec<ElementId> {
        (0..self.len(category))
            .map(|index| ElementId { category, index })
            .collect()
    }

    pub fn iter(&self, category: Category) -> impl Iterator<Item = &Element> {
        self.lists[category.slot()].iter()
    }

    pub fn len(&self, category: Category) -> usize {
        self.lists[category.slot()].len()
    }

    /// Total number of elements across all categories.
    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_appends_in_order() {
        let mut store = ElementStore::new();
        let a = store.create(Category::Widget, "A");
        let b = store.create(Category::Widget, "B");
        assert_eq!(a.index, 0);
        assert_eq!(b.index, 1);
        let names: Vec<&str> = store.iter(Category::Widget).map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(store.total(), 2);
    }

    #[test]
    fn lookup_returns_first_inserted_duplicate() {
        let mut store = ElementStore::new();
        let first = store.create(Category::Mixer, "Volume");
        store.get_mut(first).unwrap().index = 1;
        let second = store.create(Category::Mixer, "Volume");
        store.get_mut(second).unwrap().index = 2;

        let found = store.lookup(Category::Mixer, "Volume").unwrap();
        assert_eq!(found, first);
        assert_eq!(store.get(found).unwrap().index, 1);
    }

    #[test]
    fn lookup_matches_category_and_name_exactly() {
        let mut store = ElementStore::new();
        store.create(Category::Mixer, "Volume");
        assert!(store.lookup(Category::Enum, "Volume").is_none());
        assert!(store.lookup(Category::Mixer, "volume").is_none());
        assert!(store.lookup(Category::Mixer, "Volume ").is_none());
    }

    #[test]
    fn pair_mut_across_categories() {
        let mut store = ElementStore::new();
        let w = store.create(Category::Widget, "W");
        let m = store.create(Category::Mixer, "M");
        let (widget, mixer) = store.pair_mut(w, m).unwrap();
        widget.consumed = true;
        mixer.consumed = true;
        let (mixer, widget) = store.pair_mut(m, w).unwrap();
        assert_eq!(mixer.name, "M");
        assert_eq!(widget.name, "W");
    }

    #[test]
    fn pair_mut_within_category() {
        let mut store = ElementStore::new();
        let a = store.create(Category::Widget, "A");
        let b = store.create(Category::Widget, "B");
        let (x, y) = store.pair_mut(b, a).unwrap();
        assert_eq!(x.name, "B");
        assert_eq!(y.name, "A");
    }

    #[test]
    fn pair_mut_rejects_same_element() {
        let mut store = ElementStore::new();
        let a = store.create(Category::Widget, "A");
        assert!(matches!(
            store.pair_mut(a, a),
            Err(StoreError::SelfReference { .. })
        ));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let store = ElementStore::new();
        let id = ElementId {
            category: Category::Pcm,
            index: 0,
        };
        assert_eq!(store.get(id).unwrap_err(), StoreError::UnknownElement(id));
    }
}
