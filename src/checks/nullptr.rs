//! Null-pointer dereference heuristic (simplified tier, always on).
//!
//! Flow-insensitive: a name assigned or compared to the literal `0`
//! opens a "null region"; dereferencing the name inside the region fires
//! unless a reassignment (or `&name`, which may reseat it elsewhere)
//! closed the region first. Assignment regions extend to the end of the
//! assignment's scope, comparison regions cover the guarded block.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::diagnostics::{CheckId, Diagnostic};
use crate::pattern::Pattern;
use crate::scopes::{is_unary_context, ScopeTree};
use crate::tokens::TokenList;

static ASSIGN_NULL: Lazy<Pattern> = Lazy::new(|| Pattern::parse("%var% = 0 ;").unwrap());
static CMP_NULL: Lazy<Pattern> = Lazy::new(|| Pattern::parse("if ( %var% == 0 )").unwrap());
static CMP_NULL_REV: Lazy<Pattern> = Lazy::new(|| Pattern::parse("if ( 0 == %var% )").unwrap());
static NOT_VAR: Lazy<Pattern> = Lazy::new(|| Pattern::parse("if ( ! %var% )").unwrap());

pub fn check(list: &TokenList, out: &mut Vec<Diagnostic>) {
    let scopes = ScopeTree::build(list);
    let mut reported: HashSet<usize> = HashSet::new();

    for i in list.indices() {
        if let Some(m) = ASSIGN_NULL.match_at(list, i) {
            // Not a comparison fragment and not a member write.
            if matches!(list.text(i.wrapping_sub(1)), "." | "->" | "==" | "!=") {
                continue;
            }
            let name = list.text(m.token(0).unwrap_or(i)).to_string();
            let scope_end = scopes.get(scopes.innermost_at(i)).end;
            scan_region(list, &name, m.end, scope_end, &mut reported, out);
        }

        for pat in [&*CMP_NULL, &*CMP_NULL_REV, &*NOT_VAR] {
            if let Some(m) = pat.match_at(list, i) {
                let name = list.text(m.token(0).unwrap_or(i)).to_string();
                // Guarded span: the brace block, or one statement.
                let (start, end) = if list.text(m.end) == "{" {
                    match list.link(m.end) {
                        Some(close) => (m.end + 1, close),
                        None => continue,
                    }
                } else {
                    let mut stop = m.end;
                    while stop < list.len() && list.text(stop) != ";" {
                        stop += 1;
                    }
                    (m.end, stop)
                };
                scan_region(list, &name, start, end, &mut reported, out);
            }
        }
    }
}

/// Look for a dereference of `name` in `start..end`, stopping early at
/// anything that could make the pointer non-null again.
fn scan_region(
    list: &TokenList,
    name: &str,
    start: usize,
    end: usize,
    reported: &mut HashSet<usize>,
    out: &mut Vec<Diagnostic>,
) {
    let mut t = start;
    while t < end {
        if !list.is_name(t) || list.text(t) != name {
            t += 1;
            continue;
        }
        if matches!(list.text(t.wrapping_sub(1)), "." | "->") {
            t += 1;
            continue;
        }
        let next = list.text(t + 1);
        let deref = next == "->"
            || next == "["
            || (t > 0 && list.text(t - 1) == "*" && is_unary_context(list, t - 1));
        if deref {
            if reported.insert(t) {
                let message = CheckId::NullPointerDeref
                    .template()
                    .replacen("{}", name, 1);
                out.push(Diagnostic::at(CheckId::NullPointerDeref, list, t, message));
            }
            t += 1;
            continue;
        }
        // A reassignment, or handing out the address, may make the
        // pointer valid again.
        if matches!(
            next,
            "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^="
        ) {
            return;
        }
        if t > 0 && list.text(t - 1) == "&" && is_unary_context(list, t - 1) {
            return;
        }
        t += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::lex;

    fn run(code: &str) -> Vec<Diagnostic> {
        let list = lex("t.c", code);
        let mut out = Vec::new();
        check(&list, &mut out);
        out
    }

    #[test]
    fn flags_deref_after_null_assignment() {
        let out = run("void f ( ) { p = 0 ; x = * p ; }");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, CheckId::NullPointerDeref);
        assert_eq!(run("void f ( ) { p = 0 ; p -> m ( ) ; }").len(), 1);
        assert_eq!(run("void f ( ) { p = 0 ; x = p [ 2 ] ; }").len(), 1);
        // Writing through the pointer is a dereference, not a reset.
        assert_eq!(run("void f ( ) { p = 0 ; * p = 1 ; }").len(), 1);
    }

    #[test]
    fn reassignment_closes_the_region() {
        assert!(run("void f ( ) { p = 0 ; p = & x ; y = * p ; }").is_empty());
        assert!(run("void f ( ) { p = 0 ; g ( & p ) ; y = * p ; }").is_empty());
    }

    #[test]
    fn region_ends_with_scope() {
        assert!(run("void f ( ) { { p = 0 ; } y = * p ; }").is_empty());
    }

    #[test]
    fn flags_deref_inside_null_guard() {
        assert_eq!(run("void f ( ) { if ( p == 0 ) { p -> m ( ) ; } }").len(), 1);
        assert_eq!(run("void f ( ) { if ( 0 == p ) { x = * p ; } }").len(), 1);
        assert_eq!(run("void f ( ) { if ( ! p ) { x = p [ 0 ] ; } }").len(), 1);
    }

    #[test]
    fn guard_with_reset_is_fine() {
        assert!(run("void f ( ) { if ( p == 0 ) { p = & x ; * p = 1 ; } }").is_empty());
        assert!(run("void f ( ) { if ( p == 0 ) { return ; } * p = 1 ; }").is_empty());
    }

    #[test]
    fn overlapping_regions_report_once() {
        let out = run("void f ( ) { p = 0 ; if ( p == 0 ) { x = * p ; } }");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn plain_reads_are_fine() {
        assert!(run("void f ( ) { p = 0 ; g ( p ) ; }").is_empty());
        assert!(run("void f ( ) { p = 0 ; if ( p ) { } }").is_empty());
    }
}
