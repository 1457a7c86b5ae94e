//! Unused struct members (simplified tier).
//!
//! For each struct/class definition, every data member is looked up as
//! `.name` or `->name` across the whole translation unit; a member that
//! is never accessed that way is reported. Direct unqualified use inside
//! the type's own member functions is not resolved; that is the
//! flow-free trade-off of a token-level scan.

use crate::diagnostics::{CheckId, Diagnostic};
use crate::tokens::TokenList;

pub fn check(list: &TokenList, out: &mut Vec<Diagnostic>) {
    for i in list.indices() {
        if !matches!(list.text(i), "struct" | "class")
            || !list.is_name(i + 1)
            || list.text(i + 2) != "{"
        {
            continue;
        }
        let close = match list.link(i + 2) {
            Some(c) => c,
            None => continue,
        };
        let struct_name = list.text(i + 1);
        for member in member_names(list, i + 2, close) {
            if !member_is_used(list, member) {
                let message = CheckId::UnusedStructMember
                    .template()
                    .replacen("{}", struct_name, 1)
                    .replacen("{}", list.text(member), 1);
                out.push(Diagnostic::at(CheckId::UnusedStructMember, list, member, message));
            }
        }
    }
}

/// Name tokens of data members declared directly in the body. Statements
/// containing a `(` (member functions) and nested braces are skipped.
fn member_names(list: &TokenList, open: usize, close: usize) -> Vec<usize> {
    let mut members = Vec::new();
    let mut t = open + 1;
    let mut stmt_start = t;
    let mut stmt_has_paren = false;
    while t < close {
        match list.text(t) {
            "{" | "[" | "(" => {
                if list.text(t) == "(" {
                    stmt_has_paren = true;
                }
                match list.link(t) {
                    Some(end) => t = end + 1,
                    None => t += 1,
                }
                continue;
            }
            ";" => {
                if !stmt_has_paren {
                    if let Some(name) = declared_name(list, stmt_start, t) {
                        members.push(name);
                    }
                }
                stmt_start = t + 1;
                stmt_has_paren = false;
            }
            ":" => {
                // Access specifier or bitfield; either way the simple
                // declarator shape below no longer applies.
                stmt_start = t + 1;
            }
            _ => {}
        }
        t += 1;
    }
    members
}

/// The declared name in `start..semi`: the identifier directly before the
/// `;` or before the array brackets, with at least one type token ahead
/// of it.
fn declared_name(list: &TokenList, start: usize, semi: usize) -> Option<usize> {
    let mut k = semi.checked_sub(1)?;
    if list.text(k) == "]" {
        k = list.link(k)?.checked_sub(1)?;
    }
    if k <= start || !list.is_name(k) {
        return None;
    }
    Some(k)
}

fn member_is_used(list: &TokenList, member: usize) -> bool {
    let name = list.text(member);
    list.indices().any(|t| {
        t != member && matches!(list.text(t.wrapping_sub(1)), "." | "->") && list.text(t) == name
    })
}
