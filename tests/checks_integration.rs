//! End-to-end tests for the analysis pipeline: token lists in, sorted
//! diagnostics out of the runner.

mod common;

use common::lex;
use tokencheck::{catalog, CheckConfig, CheckId, Runner, TokenList, CHECKS};

fn empty(file: &str) -> TokenList {
    lex(file, "")
}

fn run_all(raw: &TokenList, simplified: &TokenList) -> Vec<CheckId> {
    Runner::new(CheckConfig::all())
        .run(raw, simplified)
        .diagnostics
        .iter()
        .map(|d| d.id)
        .collect()
}

#[test]
fn finds_raw_tier_patterns() {
    let raw = lex(
        "unit.c",
        "void f ( ) {\n\
         p = ( char * ) q ;\n\
         if ( p ) { delete p ; }\n\
         sprintf ( buf , \"%s\" , buf ) ;\n\
         n = strtol ( s , 0 , 1 ) ;\n\
         }",
    );
    let ids = run_all(&raw, &empty("unit.c"));
    assert!(ids.contains(&CheckId::CStyleCast));
    assert!(ids.contains(&CheckId::RedundantDeleteNullCheck));
    assert!(ids.contains(&CheckId::SprintfOverlappingData));
    assert!(ids.contains(&CheckId::DangerousStrtolBase));
}

#[test]
fn finds_simplified_tier_patterns() {
    let simplified = lex(
        "unit.c",
        "void f ( ) {\n\
         if ( 0 ) { foo ( ) ; }\n\
         x = 10 / 0 ;\n\
         p = 0 ;\n\
         * p = 1 ;\n\
         }",
    );
    let ids = run_all(&empty("unit.c"), &simplified);
    assert!(ids.contains(&CheckId::ConditionAlwaysFalse));
    assert!(ids.contains(&CheckId::ZeroDivision));
    assert!(ids.contains(&CheckId::NullPointerDeref));
}

#[test]
fn zero_division_property() {
    // `10 / (5 - 5)` reaches the simplified tier folded to `10 / 0`.
    let simplified = lex("unit.c", "x = 10 / 0 ;");
    let ids = run_all(&empty("unit.c"), &simplified);
    assert_eq!(ids, vec![CheckId::ZeroDivision]);

    let fine = lex("unit.c", "x = 10 / 2 ;");
    assert!(run_all(&empty("unit.c"), &fine).is_empty());
}

#[test]
fn scope_narrowing_property() {
    let narrow = lex(
        "unit.c",
        "void f ( ) { int x ; if ( c ) { x = 1 ; g ( x ) ; } }",
    );
    let ids = run_all(&empty("unit.c"), &narrow);
    assert_eq!(
        ids.iter().filter(|&&id| id == CheckId::VariableScope).count(),
        1
    );

    let spanning = lex(
        "unit.c",
        "void f ( ) { int x ; x = 1 ; if ( c ) { g ( x ) ; } }",
    );
    assert!(!run_all(&empty("unit.c"), &spanning).contains(&CheckId::VariableScope));
}

#[test]
fn unused_member_suppressed_by_single_reference() {
    let unused = lex("unit.c", "struct S { int m ; } ;");
    let ids = run_all(&empty("unit.c"), &unused);
    assert_eq!(
        ids.iter()
            .filter(|&&id| id == CheckId::UnusedStructMember)
            .count(),
        1
    );

    let used = lex("unit.c", "struct S { int m ; } ; void f ( S * s ) { g ( s -> m ) ; }");
    assert!(!run_all(&empty("unit.c"), &used).contains(&CheckId::UnusedStructMember));
}

#[test]
fn pass_by_value_property() {
    let readonly = lex("unit.c", "void f ( LargeStruct s ) { g ( s . field ) ; }");
    assert!(run_all(&empty("unit.c"), &readonly).contains(&CheckId::PassedByValue));

    let written = lex("unit.c", "void f ( LargeStruct s ) { s . field = 1 ; }");
    assert!(!run_all(&empty("unit.c"), &written).contains(&CheckId::PassedByValue));
}

#[test]
fn null_pointer_property() {
    let bad = lex("unit.c", "void f ( ) { p = 0 ; g ( ) ; * p = 1 ; }");
    assert!(run_all(&empty("unit.c"), &bad).contains(&CheckId::NullPointerDeref));

    let reseated = lex("unit.c", "void f ( ) { p = 0 ; p = & x ; * p = 1 ; }");
    assert!(!run_all(&empty("unit.c"), &reseated).contains(&CheckId::NullPointerDeref));
}

#[test]
fn cast_property() {
    let c_style = lex("unit.c", "a = ( int ) x ;");
    assert!(run_all(&c_style, &empty("unit.c")).contains(&CheckId::CStyleCast));

    let modern = lex("unit.c", "a = static_cast < int > ( x ) ; b = int ( x ) ;");
    assert!(!run_all(&modern, &empty("unit.c")).contains(&CheckId::CStyleCast));
}

#[test]
fn detectors_are_idempotent_and_isolated() {
    let raw = lex("unit.c", "void f ( ) { a = ( int ) x ; 1 ; }");
    let simplified = lex("unit.c", "void f ( ) { x = 1 / 0 ; }");

    let runner = Runner::new(CheckConfig::all());
    let first = runner.run(&raw, &simplified);
    let second = runner.run(&raw, &simplified);
    assert_eq!(
        tokencheck::report::render_text(&first.diagnostics),
        tokencheck::report::render_text(&second.diagnostics)
    );

    // Disabling one detector never changes another detector's findings.
    let without_cast = Runner::new(CheckConfig {
        style_checks: true,
        disabled: vec!["c_style_cast".to_string()],
    })
    .run(&raw, &simplified);
    let kept: Vec<_> = first
        .diagnostics
        .iter()
        .filter(|d| d.id != CheckId::CStyleCast)
        .map(|d| d.message.clone())
        .collect();
    let got: Vec<_> = without_cast
        .diagnostics
        .iter()
        .map(|d| d.message.clone())
        .collect();
    assert_eq!(kept, got);
}

#[test]
fn diagnostics_come_out_sorted_by_location() {
    let simplified = lex(
        "unit.c",
        "void f ( ) {\nx = 1 / 0 ;\nif ( 0 ) ;\ny = 2 % 0 ;\n}",
    );
    let result = Runner::new(CheckConfig::all()).run(&empty("unit.c"), &simplified);
    let lines: Vec<u32> = result
        .diagnostics
        .iter()
        .map(|d| d.location.as_ref().expect("runner findings have locations").line)
        .collect();
    let mut sorted = lines.clone();
    sorted.sort_unstable();
    assert_eq!(lines, sorted);
}

#[test]
fn catalog_covers_every_registered_id() {
    let entries = catalog();
    assert_eq!(entries.len(), CheckId::ALL.len());
    assert!(entries.iter().all(|d| d.location.is_none()));
    assert!(!CHECKS.is_empty());
}
