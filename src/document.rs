//! Loaded JSON documents

use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use jsonselect_matcher::{select, select_first};
use jsonselect_parser::{parse_selector, Selector};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::selection::Selection;

/// A decoded JSON document that selectors run against
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wrap an already decoded value
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Decode a document from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::from_value(serde_json::from_str(text)?))
    }

    /// Decode a document from a reader, such as stdin
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::from_value(serde_json::from_reader(reader)?))
    }

    /// Read and decode the JSON file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        log::debug!("loaded {} ({} bytes)", path.display(), text.len());
        Self::from_json(&text)
    }

    /// The document root
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Give back the decoded value
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Every node matched by `selector`, in document order
    pub fn find(&self, selector: &str) -> Result<Selection<'_>> {
        let selector = parse_selector(selector)?;
        Ok(self.find_with(&selector))
    }

    /// Every node matched by an already parsed selector
    pub fn find_with(&self, selector: &Selector) -> Selection<'_> {
        Selection::new(select(selector, &self.root))
    }

    /// The first node matched by `selector`
    pub fn first(&self, selector: &str) -> Result<Option<&Value>> {
        let selector = parse_selector(selector)?;
        Ok(select_first(&selector, &self.root))
    }
}

impl Default for Document {
    /// An empty object
    fn default() -> Self {
        Self::from_value(Value::Object(serde_json::Map::new()))
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::from_value(root)
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}
