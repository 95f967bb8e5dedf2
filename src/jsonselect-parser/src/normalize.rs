//! Rewrites that run between parsing and matching
//!
//! The matcher only understands descendant and child steps, so the sibling
//! combinator is desugared into containment:
//!
//! - `A ~ B` becomes `:has(:root > A) > B`
//! - `Z A ~ B` becomes `Z :has(:root > A) > B, Z:has(:root > A) > B`
//! - `Z > A ~ B` becomes `Z:has(:root > A) > B`

use crate::ast::{Fragment, Group, Segment, Union};

/// Remove every sibling marker from `union`.
///
/// Groups without a sibling marker are returned untouched; rewritten groups
/// take the place of the group they came from.
pub fn normalize(union: Union) -> Union {
    if !union.uses_sibling() {
        return union;
    }
    let normalized = Union(union.0.into_iter().flat_map(normalize_group).collect());
    log::debug!("normalized sibling selector to: {}", normalized);
    normalized
}

/// Pin each group of a `:has` argument to the node under test.
///
/// `.foo` becomes `:root > .foo`; groups already starting at `:root` keep
/// their shape.
pub fn anchor(union: Union) -> Union {
    Union(
        union
            .0
            .into_iter()
            .map(|group| {
                if group.starts_at_root() {
                    group
                } else {
                    let mut segments = vec![Segment::Fragment(Fragment::root()), Segment::Child];
                    segments.extend(group.0);
                    Group(segments)
                }
            })
            .collect(),
    )
}

fn normalize_group(group: Group) -> Vec<Group> {
    let segments = &group.0;
    let Some(i) = segments.iter().position(|s| matches!(s, Segment::Sibling)) else {
        return vec![group];
    };

    // groups alternate fragments and single markers, so a sibling marker
    // always follows a fragment
    let has = Union(vec![Group(vec![
        Segment::Fragment(Fragment::root()),
        Segment::Child,
        segments[i - 1].clone(),
    ])]);
    let after_child = i >= 2 && matches!(segments[i - 2], Segment::Child);
    let tail = &segments[i + 1..];
    let mut rewritten = Vec::with_capacity(2);

    if !after_child {
        let mut out = segments[..i - 1].to_vec();
        out.push(Segment::Fragment(Fragment {
            has: vec![has.clone()],
            ..Fragment::default()
        }));
        out.push(Segment::Child);
        out.extend_from_slice(tail);
        rewritten.push(Group(out));
    }

    if i > 1 {
        let at = if after_child { i - 3 } else { i - 2 };
        if let Segment::Fragment(prefix) = &segments[at] {
            let mut augmented = prefix.clone();
            augmented.has.push(has);
            let mut out = segments[..at].to_vec();
            out.push(Segment::Fragment(augmented));
            out.push(Segment::Child);
            out.extend_from_slice(tail);
            rewritten.push(Group(out));
        }
    }

    rewritten.into_iter().flat_map(normalize_group).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_union;

    fn normalized(source: &str) -> String {
        normalize(parse_union(source).unwrap()).to_string()
    }

    #[test]
    fn test_plain_sibling() {
        assert_eq!(normalized(".a ~ .b"), ":has(:root > .a) > .b");
    }

    #[test]
    fn test_sibling_after_descendant() {
        assert_eq!(
            normalized("object .a ~ .b"),
            "object :has(:root > .a) > .b, object:has(:root > .a) > .b"
        );
    }

    #[test]
    fn test_sibling_after_child() {
        assert_eq!(
            normalized("object > .a ~ .b"),
            "object:has(:root > .a) > .b"
        );
    }

    #[test]
    fn test_chains_leave_no_marker() {
        let union = normalize(parse_union(".a ~ .b ~ .c").unwrap());
        assert!(!union.uses_sibling());
        assert_eq!(
            union.to_string(),
            ":has(:root > .a):has(:root > .b) > .c"
        );
    }

    #[test]
    fn test_other_groups_untouched() {
        assert_eq!(
            normalized(".x, .a ~ .b, .y"),
            ".x, :has(:root > .a) > .b, .y"
        );
    }

    #[test]
    fn test_anchor() {
        let union = anchor(parse_union(".foo, :root .bar").unwrap());
        assert_eq!(union.to_string(), ":root > .foo, :root .bar");
    }
}
