//! Compare-selection and pin membership.
//!
//! Both sets share one contract: toggle membership, query membership. They are
//! plain values owned by whichever view uses them.

use serde::{Deserialize, Serialize};

use crate::schemas::computing::CpuId;

/// What a toggle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Toggled {
    Added,
    Removed,
}

/// A set of item identities that remembers insertion order.
///
/// Equality is membership equality; insertion order does not take part in it.
/// Serialized as a plain list; duplicates in a stored list are dropped on load.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(from = "Vec<CpuId>", into = "Vec<CpuId>")]
pub struct IdSet {
    ids: Vec<CpuId>,
}

impl PartialEq for IdSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|id| other.contains(id))
    }
}

impl Eq for IdSet {}

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|member| member == id)
    }

    /// Returns the set with `id`'s membership flipped, leaving `self` untouched.
    pub fn toggle(&self, id: &str) -> (Self, Toggled) {
        let mut next = self.clone();
        let toggled = next.toggle_in_place(id);
        (next, toggled)
    }

    pub(crate) fn toggle_in_place(&mut self, id: &str) -> Toggled {
        match self.ids.iter().position(|member| member == id) {
            Some(index) => {
                self.ids.remove(index);
                Toggled::Removed
            }
            None => {
                self.ids.push(id.to_string());
                Toggled::Added
            }
        }
    }

    /// Members in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<CpuId>> FromIterator<S> for IdSet {
    /// Duplicates after the first occurrence are ignored.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            let id = id.into();
            if !set.contains(&id) {
                set.ids.push(id);
            }
        }
        set
    }
}

impl From<Vec<CpuId>> for IdSet {
    fn from(ids: Vec<CpuId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<IdSet> for Vec<CpuId> {
    fn from(set: IdSet) -> Self {
        set.ids
    }
}

pub fn toggle(set: &IdSet, id: &str) -> IdSet {
    set.toggle(id).0
}

pub fn contains(set: &IdSet, id: &str) -> bool {
    set.contains(id)
}

/// The two independent sets a browsing session carries around.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Selections {
    pub compared: IdSet,
    pub pinned: IdSet,
}

impl Selections {
    pub fn toggle_compared(&mut self, id: &str) -> Toggled {
        self.compared.toggle_in_place(id)
    }

    pub fn toggle_pinned(&mut self, id: &str) -> Toggled {
        self.pinned.toggle_in_place(id)
    }

    pub fn is_compared(&self, id: &str) -> bool {
        self.compared.contains(id)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{contains, toggle, IdSet, Selections, Toggled};

    #[test]
    fn test_toggle_adds_then_removes() {
        let empty = IdSet::new();
        let (one, toggled) = empty.toggle("5600x");
        assert_eq!(toggled, Toggled::Added);
        assert!(contains(&one, "5600x"));
        assert!(!contains(&empty, "5600x"));

        let (back, toggled) = one.toggle("5600x");
        assert_eq!(toggled, Toggled::Removed);
        assert!(back.is_empty());
    }

    #[test]
    fn test_toggle_involution() {
        let set: IdSet = vec!["a", "b", "c"].into_iter().collect();
        for id in &["a", "b", "c", "d"] {
            assert_eq!(toggle(&toggle(&set, id), id), set);
        }
    }

    #[test]
    fn test_retoggled_member_moves_to_the_back() {
        let set: IdSet = vec!["a", "b"].into_iter().collect();
        let again = toggle(&toggle(&set, "a"), "a");
        assert_eq!(again.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_insertion_order() {
        let set = toggle(&toggle(&toggle(&IdSet::new(), "c"), "a"), "b");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_from_iter_dedupes() {
        let set: IdSet = vec!["a", "b", "a"].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_stored_duplicates_collapse() {
        let stored: IdSet = serde_json::from_str(r#"["a", "a", "b"]"#).unwrap();
        let plain: IdSet = vec!["a", "b"].into_iter().collect();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored, plain);
        assert_eq!(plain, stored);

        let (next, toggled) = stored.toggle("a");
        assert_eq!(toggled, Toggled::Removed);
        assert!(!next.contains("a"));
        assert_eq!(serde_json::to_string(&next).unwrap(), r#"["b"]"#);
    }

    #[test]
    fn test_sets_are_independent() {
        let mut selections = Selections::default();
        assert_eq!(selections.toggle_pinned("x"), Toggled::Added);
        assert!(selections.is_pinned("x"));
        assert!(!selections.is_compared("x"));

        assert_eq!(selections.toggle_compared("x"), Toggled::Added);
        assert_eq!(selections.toggle_pinned("x"), Toggled::Removed);
        assert!(selections.is_compared("x"));
        assert!(!selections.is_pinned("x"));
    }
}
