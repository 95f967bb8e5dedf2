//! Per-node matching context
//!
//! Each recursion frame of the matcher builds one [`MatchContext`] for the
//! child it is about to visit and passes it by value.

/// Where a node sits inside its parent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchContext<'a> {
    /// Key under which the node is stored, for object members
    pub key: Option<&'a str>,
    /// 1-based index, for array elements
    pub position: Option<usize>,
    /// Length of the enclosing array, for array elements
    pub siblings: Option<usize>,
}

impl<'a> MatchContext<'a> {
    /// Context of a traversal root: no key, no position
    pub fn root() -> Self {
        Self::default()
    }

    /// Context of the element at `index` in an array of `len` elements
    pub fn element(index: usize, len: usize) -> Self {
        Self {
            key: None,
            position: Some(index + 1),
            siblings: Some(len),
        }
    }

    /// Context of the object member stored under `key`
    pub fn member(key: &'a str) -> Self {
        Self {
            key: Some(key),
            position: None,
            siblings: None,
        }
    }

    /// Whether this is the root of the current traversal
    pub fn is_root(&self) -> bool {
        self.key.is_none() && self.position.is_none()
    }

    /// 1-based position counted from the last element
    pub fn position_from_end(&self) -> Option<usize> {
        match (self.position, self.siblings) {
            (Some(position), Some(siblings)) => Some(siblings + 1 - position),
            _ => None,
        }
    }
}
