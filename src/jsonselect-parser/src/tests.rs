//! Tests for the selector parser
//!
//! These cover every grammar rule of the selector language together with the
//! error each rule raises when violated.

use super::*;
use pretty_assertions::assert_eq;

fn parse_success(input: &str) -> Selector {
    let parser = SelectorParser::new();
    parser
        .parse(input)
        .unwrap_or_else(|e| panic!("Failed to parse: {}: {}", input, e))
}

fn parse_failure(input: &str) -> ParseError {
    let parser = SelectorParser::new();
    match parser.parse(input) {
        Ok(selector) => panic!(
            "Expected parse failure for: {}, but got: {:?}",
            input, selector
        ),
        Err(e) => e,
    }
}

fn single_fragment(input: &str) -> Fragment {
    let selector = parse_success(input);
    assert_eq!(selector.union.0.len(), 1, "{}", input);
    match selector.union.0[0].0.as_slice() {
        [Segment::Fragment(fragment)] => fragment.clone(),
        other => panic!("expected one fragment for {}, got {:?}", input, other),
    }
}

fn id(name: &str) -> Segment {
    Segment::Fragment(Fragment {
        id: Some(name.to_string()),
        ..Fragment::default()
    })
}

#[test]
fn test_type_and_id() {
    let fragment = single_fragment("string.name");
    assert_eq!(fragment.ty, Some(JsonType::String));
    assert_eq!(fragment.id.as_deref(), Some("name"));
}

#[test]
fn test_universal_is_not_materialized() {
    assert_eq!(single_fragment("*"), Fragment::default());
    assert_eq!(single_fragment("*.a"), single_fragment(".a"));
}

#[test]
fn test_bare_word_is_an_identifier() {
    assert_eq!(parse_success("name"), parse_success(".name"));
    assert_eq!(
        parse_success(r#"."quoted key""#).union.0[0].0,
        vec![id("quoted key")]
    );
}

#[test]
fn test_combinators() {
    let selector = parse_success(".a > .b .c");
    assert_eq!(
        selector.union.0[0].0,
        vec![id("a"), Segment::Child, id("b"), id("c")]
    );
}

#[test]
fn test_child_combinator_without_spaces() {
    assert_eq!(parse_success(".a>.b"), parse_success(".a > .b"));
}

#[test]
fn test_selector_list() {
    let selector = parse_success(".a, number ,.b");
    assert_eq!(selector.union.0.len(), 3);
    assert_eq!(selector.union.0[0].0, vec![id("a")]);
    assert_eq!(selector.union.0[2].0, vec![id("b")]);
}

#[test]
fn test_surrounding_whitespace() {
    assert_eq!(parse_success("  .a  "), parse_success(".a"));
}

#[test]
fn test_first_and_last_child_desugar() {
    assert_eq!(
        parse_success(":first-child"),
        parse_success(":nth-child(1)")
    );
    assert_eq!(
        parse_success(":last-child"),
        parse_success(":nth-last-child(1)")
    );
}

#[test]
fn test_nth_child_formulas() {
    let fragment = single_fragment("number:nth-child(2n+1)");
    assert_eq!(
        fragment.pseudo,
        Some(PseudoClass::NthChild(Nth { a: 2, b: 1 }))
    );
    let fragment = single_fragment(":nth-last-child(odd)");
    assert_eq!(
        fragment.pseudo,
        Some(PseudoClass::NthLastChild(Nth { a: 2, b: 1 }))
    );
}

#[test]
fn test_root_and_only_child() {
    assert_eq!(single_fragment(":root").pseudo, Some(PseudoClass::Root));
    assert_eq!(
        single_fragment(":only-child").pseudo,
        Some(PseudoClass::OnlyChild)
    );
}

#[test]
fn test_val_and_contains_are_expressions() {
    assert_eq!(
        parse_success(r#":val("a")"#),
        parse_success(r#":expr(x = "a")"#)
    );
    assert_eq!(
        parse_success(r#":contains( "a" )"#),
        parse_success(r#":expr(x *= "a")"#)
    );
}

#[test]
fn test_expr_pseudo() {
    let fragment = single_fragment(":expr(x * 2 > 10)");
    assert_eq!(
        fragment.expr,
        Some(Expr::binary(
            BinaryOperator::Gt,
            Expr::binary(
                BinaryOperator::Mul,
                Expr::Placeholder,
                Expr::Literal(Literal::Number(2.0))
            ),
            Expr::Literal(Literal::Number(10.0))
        ))
    );
}

#[test]
fn test_expr_strings_keep_spaces_and_dots() {
    let fragment = single_fragment(r#":expr(x = "a .b c")"#);
    assert_eq!(
        fragment.expr,
        Some(Expr::binary(
            BinaryOperator::Eq,
            Expr::Placeholder,
            Expr::Literal(Literal::String("a .b c".into()))
        ))
    );
}

#[test]
fn test_has_is_anchored_at_the_node() {
    let fragment = single_fragment("object:has(.foo)");
    assert_eq!(fragment.has.len(), 1);
    assert_eq!(fragment.has[0].to_string(), ":root > .foo");

    let fragment = single_fragment(":has(:root > .foo)");
    assert_eq!(fragment.has[0].to_string(), ":root > .foo");
}

#[test]
fn test_has_may_repeat() {
    let fragment = single_fragment(":has(.a):has(.b, .c)");
    assert_eq!(fragment.has.len(), 2);
    assert_eq!(fragment.has[1].0.len(), 2);
}

#[test]
fn test_nested_has() {
    let fragment = single_fragment(":has(.a:has(.b))");
    let inner = match fragment.has[0].0[0].0.as_slice() {
        [_, Segment::Child, Segment::Fragment(inner)] => inner.clone(),
        other => panic!("unexpected segments: {:?}", other),
    };
    assert_eq!(inner.has[0].to_string(), ":root > .b");
}

#[test]
fn test_sibling_is_normalized() {
    let selector = parse_success(".a ~ .b");
    assert!(!selector.union.uses_sibling());
    assert_eq!(selector.to_string(), ":has(:root > .a) > .b");
}

#[test]
fn test_sibling_inside_has_is_normalized() {
    let fragment = single_fragment(":has(.a ~ .b)");
    assert!(!fragment.has[0].uses_sibling());
    assert_eq!(
        fragment.has[0].to_string(),
        ":root:has(:root > .a) > .b"
    );
}

#[test]
fn test_display_reparses_to_same_tree() {
    for source in [
        ".a > string:nth-child(2n-1)",
        r#"."key with space" :has(.b, .c ~ .d)"#,
        r#"number:expr((x + 1) * 2 >= -3 && x != null)"#,
        ":root > *:only-child, boolean",
        r#".a\.b:contains("q")"#,
    ] {
        let selector = parse_success(source);
        let reparsed = parse_success(&selector.to_string());
        assert_eq!(selector, reparsed, "{}", source);
    }
}

#[test]
fn test_error_kinds() {
    let cases = [
        ("#a", ErrorKind::UnrecognizedChar),
        (r#"."abc"#, ErrorKind::UnclosedString),
        (r#"."\x""#, ErrorKind::InvalidString),
        (". a", ErrorKind::StringRequiredAfterDot),
        ("", ErrorKind::SelectorExpected),
        (".a >", ErrorKind::SelectorExpected),
        (".a, ", ErrorKind::SelectorExpected),
        (r#""a""#, ErrorKind::SelectorExpected),
        (":expr(x =)", ErrorKind::ExpressionExpected),
        (":expr(x 1)", ErrorKind::BinaryOperatorExpected),
        (":has .a", ErrorKind::OpeningParenExpected),
        (":val \"a\"", ErrorKind::OpeningParenExpected),
        (":expr x", ErrorKind::OpeningParenExpected),
        (":expr((x = 1)", ErrorKind::ClosingParenExpected),
        (r#":val("a""#, ErrorKind::ClosingParenExpected),
        (":has(.a", ErrorKind::MissingClosingParen),
        (".a)", ErrorKind::UnexpectedClosingParen),
        (".a.b", ErrorKind::MultipleIds),
        (":root:first-child", ErrorKind::MultiplePseudoClasses),
        (":only-child:nth-child(2)", ErrorKind::MultiplePseudoClasses),
        (":expr(x = 1):val(\"a\")", ErrorKind::MultipleExpressions),
        (":contains(\"a\"):expr(true)", ErrorKind::MultipleExpressions),
        (":nth-child(xyz)", ErrorKind::MalformedPseudoFunction),
        (":nth-child", ErrorKind::MalformedPseudoFunction),
        (":first", ErrorKind::UnrecognizedPseudoClass),
        (":val(a)", ErrorKind::StringExpected),
        (":contains()", ErrorKind::StringExpected),
    ];
    for (source, kind) in cases {
        assert_eq!(parse_failure(source).kind, kind, "{}", source);
    }
}

#[test]
fn test_error_context() {
    let err = parse_failure(".a > .b:bogus");
    assert_eq!(err.position, 7);
    assert_eq!(err.context, ":bogus");
    assert_eq!(err.to_string(), "unrecognized pseudo class in ':bogus'");
}

#[test]
fn test_selector_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Selector>();
}

#[test]
fn test_ast_serializes() {
    let selector = parse_success("number.a");
    let json = serde_json::to_value(&selector).unwrap();
    assert_eq!(json["union"][0][0]["Fragment"]["ty"], "number");
    assert_eq!(json["union"][0][0]["Fragment"]["id"], "a");
}
