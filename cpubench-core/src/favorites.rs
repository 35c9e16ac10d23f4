use anyhow::Context;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::selection::{IdSet, Toggled};

/// The key favorites are stored under.
pub const FAVORITES_KEY: &str = "favorites";

/// Favorited CPU ids, persisted to a small JSON key-value file.
///
/// The file is read once on [`FavoritesStore::load`] and rewritten on every
/// toggle. Keys other than [`FAVORITES_KEY`] are left as they were.
pub struct FavoritesStore {
    path: PathBuf,
    document: Map<String, Value>,
    ids: IdSet,
}

impl FavoritesStore {
    /// A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let document: Map<String, Value> = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("parsing favorites file {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading favorites file {}", path.display()))
            }
        };
        let ids: IdSet = match document.get(FAVORITES_KEY) {
            Some(value) => serde_json::from_value(value.clone())
                .with_context(|| format!("`{}` is not a list of ids", FAVORITES_KEY))?,
            None => IdSet::new(),
        };
        debug!(path = %path.display(), count = ids.len(), "loaded favorites");
        Ok(Self {
            path,
            document,
            ids,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ids(&self) -> &IdSet {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip `id`'s membership and write the store back out.
    /// If the write fails, the in-memory set is left unchanged.
    pub fn toggle(&mut self, id: &str) -> anyhow::Result<Toggled> {
        let (next, toggled) = self.ids.toggle(id);
        let mut document = self.document.clone();
        document.insert(FAVORITES_KEY.to_string(), serde_json::to_value(&next)?);
        let text = serde_json::to_string_pretty(&document)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing favorites file {}", self.path.display()))?;

        self.document = document;
        self.ids = next;
        Ok(toggled)
    }
}

#[cfg(test)]
mod tests {
    use super::FavoritesStore;
    use crate::selection::Toggled;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::load(dir.path().join("favorites.json")).unwrap();
        assert!(store.ids().is_empty());
    }

    #[test]
    fn test_toggle_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");

        let mut store = FavoritesStore::load(&path).unwrap();
        assert_eq!(store.toggle("a").unwrap(), Toggled::Added);
        assert_eq!(store.toggle("b").unwrap(), Toggled::Added);
        assert_eq!(store.toggle("a").unwrap(), Toggled::Removed);

        let reloaded = FavoritesStore::load(&path).unwrap();
        assert!(reloaded.contains("b"));
        assert!(!reloaded.contains("a"));
    }

    #[test]
    fn test_other_keys_survive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, r#"{ "theme": "dark", "favorites": ["x"] }"#).unwrap();

        let mut store = FavoritesStore::load(&path).unwrap();
        assert!(store.contains("x"));
        store.toggle("y").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["favorites"], serde_json::json!(["x", "y"]));
    }

    #[test]
    fn test_duplicate_ids_in_file_collapse() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, r#"{ "favorites": ["x", "x"] }"#).unwrap();

        let mut store = FavoritesStore::load(&path).unwrap();
        assert_eq!(store.ids().len(), 1);
        assert_eq!(store.toggle("x").unwrap(), Toggled::Removed);
        assert!(!FavoritesStore::load(&path).unwrap().contains("x"));
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FavoritesStore::load(&path).is_err());
    }
}
