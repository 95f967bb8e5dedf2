//! Result sets of a selector run

use std::collections::HashSet;
use std::fmt;
use std::iter::Copied;
use std::ops::Index;
use std::slice;

use jsonselect_matcher::select;
use jsonselect_parser::{parse_selector, JsonType, Selector};
use serde_json::Value;

use crate::error::Result;

/// Nodes matched by a selector, in document order.
///
/// The nodes are borrowed from the document they were selected from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection<'a> {
    items: Vec<&'a Value>,
}

/// Textual summary of a selection, see [`Selection::text`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    /// Nothing was selected
    Empty,
    /// Every node reads the same
    Single(String),
    /// Distinct readings in first-seen order
    Many(Vec<String>),
}

impl<'a> Selection<'a> {
    /// Wrap matched nodes
    pub fn new(items: Vec<&'a Value>) -> Self {
        Self { items }
    }

    /// Number of matched nodes
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The node at `index`
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.items.get(index).copied()
    }

    /// The first node in document order
    pub fn first(&self) -> Option<&'a Value> {
        self.get(0)
    }

    /// Iterate over the nodes in document order
    pub fn iter(&self) -> Copied<slice::Iter<'_, &'a Value>> {
        self.items.iter().copied()
    }

    /// The nodes as a slice
    pub fn as_slice(&self) -> &[&'a Value] {
        &self.items
    }

    /// Owned copies of the nodes
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    /// The single selected node, when exactly one array or object matched
    pub fn collapsed(&self) -> Option<&'a Value> {
        match self.items.as_slice() {
            [node] if node.is_array() || node.is_object() => Some(node),
            _ => None,
        }
    }

    /// Run `selector` against every node of this selection as its own root
    /// and concatenate the results
    pub fn find(&self, selector: &str) -> Result<Selection<'a>> {
        let selector = parse_selector(selector)?;
        Ok(self.find_with(&selector))
    }

    /// [`Selection::find`] with an already parsed selector
    pub fn find_with(&self, selector: &Selector) -> Selection<'a> {
        self.iter().flat_map(|node| select(selector, node)).collect()
    }

    /// Collapse the selection into display strings.
    ///
    /// Strings read as themselves, other scalars as their JSON text, arrays
    /// and objects as their type name. Repeated readings are dropped.
    pub fn text(&self) -> Text {
        let mut seen = HashSet::new();
        let mut texts: Vec<String> = self
            .iter()
            .map(display_text)
            .filter(|text| seen.insert(text.clone()))
            .collect();
        match texts.len() {
            0 => Text::Empty,
            1 => Text::Single(texts.remove(0)),
            _ => Text::Many(texts),
        }
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => JsonType::of(value).name().to_string(),
    }
}

impl Index<usize> for Selection<'_> {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.items[index]
    }
}

impl<'a> IntoIterator for Selection<'a> {
    type Item = &'a Value;
    type IntoIter = std::vec::IntoIter<&'a Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s Selection<'a> {
    type Item = &'a Value;
    type IntoIter = Copied<slice::Iter<'s, &'a Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> FromIterator<&'a Value> for Selection<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Text::Empty => Ok(()),
            Text::Single(text) => f.write_str(text),
            Text::Many(texts) => f.write_str(&texts.join("\n")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_value(json!({
            "people": [
                {"name": "ann", "age": 31, "tags": ["a"]},
                {"name": "bob", "age": 31, "tags": []},
                {"name": "cy", "age": 25}
            ]
        }))
    }

    #[test]
    fn test_access() {
        let doc = doc();
        let names = doc.find(".name").unwrap();
        assert_eq!(names.len(), 3);
        assert!(!names.is_empty());
        assert_eq!(names[1], json!("bob"));
        assert_eq!(names.get(2), Some(&json!("cy")));
        assert_eq!(names.get(3), None);
        assert_eq!(names.first(), Some(&json!("ann")));
        assert_eq!(
            names.iter().filter_map(Value::as_str).collect::<Vec<_>>(),
            vec!["ann", "bob", "cy"]
        );
        let mut count = 0;
        for _ in &names {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_chained_find() {
        let doc = doc();
        let people = doc.find(".people > object").unwrap();
        assert_eq!(people.len(), 3);
        let ages = people.find(".age").unwrap();
        assert_eq!(ages.to_values(), vec![json!(31), json!(31), json!(25)]);
    }

    #[test]
    fn test_chained_find_treats_each_node_as_root() {
        let doc = doc();
        let people = doc.find(".people").unwrap();
        let first = people.find(":root > :first-child .name").unwrap();
        assert_eq!(first.to_values(), vec![json!("ann")]);
    }

    #[test]
    fn test_collapsed() {
        let doc = doc();
        assert_eq!(
            doc.find(".people").unwrap().collapsed(),
            Some(&doc.root()["people"])
        );
        assert_eq!(doc.find(".name:val(\"ann\")").unwrap().collapsed(), None);
        assert_eq!(doc.find(".tags").unwrap().collapsed(), None);
    }

    #[test]
    fn test_text() {
        let doc = doc();
        assert_eq!(doc.find(".missing").unwrap().text(), Text::Empty);
        assert_eq!(
            doc.find(".age").unwrap().text(),
            Text::Many(vec!["31".into(), "25".into()])
        );
        assert_eq!(
            doc.find(".tags").unwrap().text(),
            Text::Single("array".into())
        );
        assert_eq!(
            doc.find(".name:first-child, .name").unwrap().text().to_string(),
            "ann\nbob\ncy"
        );
        assert_eq!(doc.find("string:val(\"bob\")").unwrap().text().to_string(), "bob");
    }

    #[test]
    fn test_into_iterator() {
        let doc = doc();
        let ages: Vec<&Value> = doc.find("number").unwrap().into_iter().collect();
        assert_eq!(ages.len(), 3);
    }
}
