//! Tree matching and result collection
//!
//! The collector walks the document once, depth first. At every node it holds
//! the set of group suffixes still waiting to be matched below the current
//! path. Testing a suffix against a node decides whether the node is a full
//! match and which suffixes its children inherit.

use jsonselect_parser::{Fragment, JsonType, PseudoClass, Segment, Selector, Union};
use serde_json::Value;

use crate::context::MatchContext;
use crate::eval::Evaluator;

/// Run `selector` against `root` and return every match in document order
pub fn select<'v>(selector: &Selector, root: &'v Value) -> Vec<&'v Value> {
    Collector::new().collect(&selector.union, root)
}

/// Run `selector` against `root` and return the first match in document order
pub fn select_first<'v>(selector: &Selector, root: &'v Value) -> Option<&'v Value> {
    Collector::first_only().collect(&selector.union, root).into_iter().next()
}

/// Depth-first collector of the nodes a union matches
#[derive(Debug, Default)]
pub struct Collector {
    first_only: bool,
    nodes_visited: usize,
    evaluator: Evaluator,
}

impl Collector {
    /// Collector returning every match
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector stopping the traversal at the first match
    pub fn first_only() -> Self {
        Self {
            first_only: true,
            ..Self::default()
        }
    }

    /// Nodes visited so far, `:has` sub-traversals included
    pub fn nodes_visited(&self) -> usize {
        self.nodes_visited
    }

    /// Expression nodes evaluated so far
    pub fn expressions_evaluated(&self) -> usize {
        self.evaluator.evaluated()
    }

    /// Collect the nodes of `root` matched by `union`.
    ///
    /// A node is recorded before its descendants and at most once, however
    /// many groups match it.
    pub fn collect<'v>(&mut self, union: &Union, root: &'v Value) -> Vec<&'v Value> {
        let active: Vec<&[Segment]> = union.0.iter().map(|group| group.0.as_slice()).collect();
        let mut found = Vec::new();
        self.visit(&active, root, MatchContext::root(), &mut found);
        found
    }

    /// Returns true once a first-only traversal has its match
    fn visit<'s, 'v>(
        &mut self,
        active: &[&'s [Segment]],
        node: &'v Value,
        ctx: MatchContext<'v>,
        found: &mut Vec<&'v Value>,
    ) -> bool {
        self.nodes_visited += 1;

        let mut matched = false;
        let mut inherited: Vec<&'s [Segment]> = Vec::new();
        for &sequence in active {
            matched |= self.step(sequence, node, ctx, &mut inherited);
        }

        if matched {
            found.push(node);
            if self.first_only {
                return true;
            }
        }
        if inherited.is_empty() {
            return false;
        }

        match node {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let ctx = MatchContext::element(index, items.len());
                    if self.visit(&inherited, item, ctx, found) {
                        return true;
                    }
                }
            }
            Value::Object(members) => {
                for (key, value) in members {
                    if self.visit(&inherited, value, MatchContext::member(key), found) {
                        return true;
                    }
                }
            }
            _ => {}
        }
        false
    }

    /// Test the leading fragment of `sequence` against `node`.
    ///
    /// Pushes the suffixes the children must match onto `inherited` and
    /// returns whether `node` completes the sequence.
    fn step<'s>(
        &mut self,
        sequence: &'s [Segment],
        node: &Value,
        ctx: MatchContext<'_>,
        inherited: &mut Vec<&'s [Segment]>,
    ) -> bool {
        let (child_only, fragment, rest) = match sequence {
            [Segment::Child, Segment::Fragment(fragment), rest @ ..] => (true, fragment, rest),
            [Segment::Fragment(fragment), rest @ ..] => (false, fragment, rest),
            _ => return false,
        };

        // a descendant step keeps looking further down
        if !child_only && !fragment.is_root() {
            push_unique(inherited, sequence);
        }

        if !self.fragment_matches(fragment, node, ctx) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        push_unique(inherited, rest);
        false
    }

    fn fragment_matches(&mut self, fragment: &Fragment, node: &Value, ctx: MatchContext<'_>) -> bool {
        if fragment.ty.is_some_and(|ty| ty != JsonType::of(node)) {
            return false;
        }
        if let Some(id) = &fragment.id {
            if ctx.key != Some(id.as_str()) {
                return false;
            }
        }
        if let Some(pseudo) = fragment.pseudo {
            if !pseudo_matches(pseudo, ctx) {
                return false;
            }
        }
        for union in &fragment.has {
            if !self.contains_match(union, node) {
                return false;
            }
        }
        if let Some(expr) = &fragment.expr {
            if !self.evaluator.matches(expr, node) {
                return false;
            }
        }
        log::trace!("matched {} at {:?}", fragment, ctx);
        true
    }

    /// Whether `union` matches anything in a traversal rooted at `node`
    fn contains_match(&mut self, union: &Union, node: &Value) -> bool {
        let first_only = std::mem::replace(&mut self.first_only, true);
        let found = self.collect(union, node);
        self.first_only = first_only;
        !found.is_empty()
    }
}

fn pseudo_matches(pseudo: PseudoClass, ctx: MatchContext<'_>) -> bool {
    let position = match pseudo {
        PseudoClass::Root => return ctx.is_root(),
        PseudoClass::OnlyChild => return ctx.siblings == Some(1),
        PseudoClass::NthChild(nth) => ctx.position.map(|p| (nth, p)),
        PseudoClass::NthLastChild(nth) => ctx.position_from_end().map(|p| (nth, p)),
    };
    position.is_some_and(|(nth, num)| i64::try_from(num).is_ok_and(|num| nth.matches(num)))
}

fn push_unique<'s>(sequences: &mut Vec<&'s [Segment]>, sequence: &'s [Segment]) {
    if !sequences.iter().any(|s| std::ptr::eq(*s, sequence)) {
        sequences.push(sequence);
    }
}
