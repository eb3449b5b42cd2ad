//! Path-based access to a map document loaded from JSON.
//!
//! A document is an arbitrary JSON tree. `main` holds the region settings and
//! `markers` holds named categories, each mapping location names to their
//! attributes. Everything else is carried along untouched.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{MainSection, Place};

pub const MAIN_KEY: &str = "main";
pub const MARKERS_KEY: &str = "markers";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Key {key:?} not found (path {path})")]
    MissingKey { key: String, path: KeyPath },
    #[error("Value at {0} is not an object")]
    NotAnObject(KeyPath),
    #[error("Cannot assign to an empty key path")]
    EmptyPath,
    #[error("No filename is given, so cannot save the document")]
    NoFilename,
    #[error("Failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unexpected shape at {path}")]
    Shape {
        path: KeyPath,
        #[source]
        source: serde_json::Error,
    },
}

/// A sequence of object keys leading from the document root
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn split_last(&self) -> Option<(KeyPath, &str)> {
        let (last, parent) = self.0.split_last()?;
        Some((KeyPath(parent.to_vec()), last.as_str()))
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(" > "))
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        KeyPath(vec![key.to_string()])
    }
}

impl From<String> for KeyPath {
    fn from(key: String) -> Self {
        KeyPath(vec![key])
    }
}

impl From<&[&str]> for KeyPath {
    fn from(keys: &[&str]) -> Self {
        KeyPath(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(keys: [&str; N]) -> Self {
        KeyPath(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(keys: Vec<String>) -> Self {
        KeyPath(keys)
    }
}

/// A loaded map document, remembering the file it came from
#[derive(Debug, Clone)]
pub struct MapItems {
    root: Value,
    path: Option<PathBuf>,
}

impl Default for MapItems {
    fn default() -> Self {
        Self::new()
    }
}

impl MapItems {
    pub fn new() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    pub fn from_value(root: Value) -> Self {
        Self { root, path: None }
    }

    /// Load a document, remembering `path` as the default save target
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let root = serde_json::from_str(&contents).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            root,
            path: Some(path.to_path_buf()),
        })
    }

    /// Save the document with sorted keys and four-space indentation.
    ///
    /// Writes to `path` if given, otherwise to the file the document was
    /// loaded from.
    pub fn to_json(&self, path: Option<&Path>) -> Result<(), DocumentError> {
        let path = path
            .or(self.path.as_deref())
            .ok_or(DocumentError::NoFilename)?;

        let write_err = |source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        // serde_json maps are BTreeMaps, so keys come out sorted
        self.root
            .serialize(&mut ser)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        buf.push(b'\n');

        let mut file = fs::File::create(path).map_err(write_err)?;
        file.write_all(&buf).map_err(write_err)?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Walk `keys` from the root. An empty path yields the root itself.
    pub fn get(&self, keys: impl Into<KeyPath>) -> Result<&Value, DocumentError> {
        let keys = keys.into();
        let mut current = &self.root;
        for (depth, key) in keys.keys().iter().enumerate() {
            let object = current
                .as_object()
                .ok_or_else(|| DocumentError::NotAnObject(KeyPath(keys.0[..depth].to_vec())))?;
            current = object.get(key).ok_or_else(|| DocumentError::MissingKey {
                key: key.clone(),
                path: keys.clone(),
            })?;
        }
        Ok(current)
    }

    pub fn get_mut(&mut self, keys: impl Into<KeyPath>) -> Result<&mut Value, DocumentError> {
        let keys = keys.into();
        let mut current = &mut self.root;
        for (depth, key) in keys.keys().iter().enumerate() {
            let object = current
                .as_object_mut()
                .ok_or_else(|| DocumentError::NotAnObject(KeyPath(keys.0[..depth].to_vec())))?;
            current = object
                .get_mut(key)
                .ok_or_else(|| DocumentError::MissingKey {
                    key: key.clone(),
                    path: keys.clone(),
                })?;
        }
        Ok(current)
    }

    /// Assign `value` to the last key of `keys`; every parent must exist.
    pub fn set(&mut self, keys: impl Into<KeyPath>, value: Value) -> Result<(), DocumentError> {
        let keys = keys.into();
        let (parent, key) = keys.split_last().ok_or(DocumentError::EmptyPath)?;
        let object = self
            .get_mut(parent.clone())?
            .as_object_mut()
            .ok_or(DocumentError::NotAnObject(parent))?;
        object.insert(key.to_string(), value);
        Ok(())
    }

    pub fn contains(&self, keys: impl Into<KeyPath>) -> bool {
        self.get(keys).is_ok()
    }

    /// Typed view of the `main` section; a missing section yields defaults
    pub fn main_section(&self) -> Result<MainSection, DocumentError> {
        match self.get(MAIN_KEY) {
            Ok(value) => serde_json::from_value(value.clone()).map_err(|source| {
                DocumentError::Shape {
                    path: MAIN_KEY.into(),
                    source,
                }
            }),
            Err(DocumentError::MissingKey { .. }) => Ok(MainSection::default()),
            Err(e) => Err(e),
        }
    }

    /// Marker category names, in document key order
    pub fn categories(&self) -> Result<Vec<String>, DocumentError> {
        let markers = self.get(MARKERS_KEY)?;
        let object = markers
            .as_object()
            .ok_or_else(|| DocumentError::NotAnObject(MARKERS_KEY.into()))?;
        Ok(object.keys().cloned().collect())
    }

    /// Location names of one category
    pub fn locations(&self, category: &str) -> Result<Vec<String>, DocumentError> {
        let path = KeyPath::from([MARKERS_KEY, category]);
        let object = self
            .get(path.clone())?
            .as_object()
            .ok_or(DocumentError::NotAnObject(path))?;
        Ok(object.keys().cloned().collect())
    }

    /// Typed places of one category
    pub fn places(&self, category: &str) -> Result<Vec<(String, Place)>, DocumentError> {
        self.locations(category)?
            .into_iter()
            .map(|name| {
                let path = KeyPath::from([MARKERS_KEY, category, name.as_str()]);
                let value = self.get(path.clone())?;
                let place = serde_json::from_value(value.clone())
                    .map_err(|source| DocumentError::Shape { path, source })?;
                Ok((name, place))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> MapItems {
        MapItems::from_value(json!({
            "main": {"coordinates": [64.9, -18.6], "country": "iceland"},
            "markers": {
                "landmarks": {
                    "Gullfoss": {"info": "Waterfall", "coordinates": [64.32, -20.12]},
                    "Geysir": {"info": "Hot spring"}
                },
                "hotels": {}
            }
        }))
    }

    #[test]
    fn test_get_single_key_and_path() {
        let items = sample();
        assert_eq!(items.get("main").unwrap()["country"], "iceland");
        assert_eq!(
            items.get(["markers", "landmarks", "Geysir", "info"]).unwrap(),
            "Hot spring"
        );
        assert_eq!(items.get(KeyPath::default()).unwrap(), items.root());
    }

    #[test]
    fn test_get_missing_key() {
        let items = sample();
        let err = items.get(["markers", "food"]).unwrap_err();
        assert!(matches!(err, DocumentError::MissingKey { ref key, .. } if key == "food"));
        assert!(!items.contains(["markers", "food"]));
    }

    #[test]
    fn test_get_through_non_object() {
        let items = sample();
        let err = items.get(["main", "country", "name"]).unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject(_)));
    }

    #[test]
    fn test_set_nested() {
        let mut items = sample();
        items
            .set(["markers", "landmarks", "Geysir", "coordinates"], json!([64.31, -20.3]))
            .unwrap();
        assert_eq!(
            items.get(["markers", "landmarks", "Geysir", "coordinates"]).unwrap(),
            &json!([64.31, -20.3])
        );

        items.set("extra", json!(true)).unwrap();
        assert_eq!(items.get("extra").unwrap(), &json!(true));
    }

    #[test]
    fn test_set_requires_parent() {
        let mut items = sample();
        assert!(items.set(["nope", "x"], json!(1)).is_err());
        assert!(matches!(
            items.set(KeyPath::default(), json!(1)),
            Err(DocumentError::EmptyPath)
        ));
    }

    #[test]
    fn test_typed_views() {
        let items = sample();
        assert_eq!(items.categories().unwrap(), vec!["hotels", "landmarks"]);
        let places = items.places("landmarks").unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].0, "Geysir");
        assert!(places[0].1.coordinates.is_none());
        assert!(places[1].1.coordinates.is_some());
        assert_eq!(items.main_section().unwrap().country.as_deref(), Some("iceland"));
    }

    #[test]
    fn test_missing_main_section_defaults() {
        let items = MapItems::from_value(json!({"markers": {}}));
        let main = items.main_section().unwrap();
        assert!(main.country.is_none());
    }

    #[test]
    fn test_save_without_filename() {
        let items = sample();
        assert!(matches!(items.to_json(None), Err(DocumentError::NoFilename)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iceland.json");
        sample().to_json(Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n    \"main\""));
        assert!(text.ends_with("}\n"));

        let mut reloaded = MapItems::from_json(&path).unwrap();
        assert_eq!(reloaded.path(), Some(path.as_path()));
        reloaded.set(["main", "zoom"], json!(6)).unwrap();
        reloaded.to_json(None).unwrap();

        let again = MapItems::from_json(&path).unwrap();
        assert_eq!(again.get(["main", "zoom"]).unwrap(), &json!(6));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            MapItems::from_json(&path),
            Err(DocumentError::Parse { .. })
        ));
    }
}
