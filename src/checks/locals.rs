//! Local-variable checks built on the usage index (simplified tier).
//!
//! `check_variable_scope` finds declarations whose every use sits in a
//! strictly tighter block. `check_passed_by_value` finds class-type
//! parameters taken by value although the body never writes to them or
//! takes their address.

use crate::diagnostics::{CheckId, Diagnostic};
use crate::scopes::{is_primitive_type, is_unary_context, UsageIndex};
use crate::tokens::TokenList;

use super::comma_split;

pub fn check_variable_scope(list: &TokenList, out: &mut Vec<Diagnostic>) {
    let index = UsageIndex::build(list);
    for var in &index.variables {
        if var.occurrences.is_empty()
            || var.is_static
            || var.in_for_header
            || index.scopes.get(var.scope).is_record
        {
            continue;
        }
        let mut innermost = index.scopes.innermost_at(var.occurrences[0].token);
        for occ in &var.occurrences[1..] {
            let occ_scope = index.scopes.innermost_at(occ.token);
            innermost = index.scopes.common_ancestor(innermost, occ_scope);
        }
        if index.scopes.is_strictly_inside(innermost, var.scope) {
            let message = CheckId::VariableScope
                .template()
                .replacen("{}", &var.name, 1);
            out.push(Diagnostic::at(
                CheckId::VariableScope,
                list,
                var.decl_token,
                message,
            ));
        }
    }
}

pub fn check_passed_by_value(list: &TokenList, out: &mut Vec<Diagnostic>) {
    for i in list.indices() {
        // Function definition: `name ( ... ) {`.
        if !list.is_name(i) || list.text(i + 1) != "(" {
            continue;
        }
        let close = match list.link(i + 1) {
            Some(c) => c,
            None => continue,
        };
        let body_open = if list.text(close + 1) == "{" {
            close + 1
        } else if list.text(close + 1) == "const" && list.text(close + 2) == "{" {
            close + 2
        } else {
            continue;
        };
        let body_close = match list.link(body_open) {
            Some(c) => c,
            None => continue,
        };
        for (start, end) in comma_split(list, i + 1) {
            if let Some(name_tok) = heavy_value_param(list, start, end) {
                if !written_in_body(list, name_tok, body_open, body_close) {
                    let message = CheckId::PassedByValue
                        .template()
                        .replacen("{}", list.text(name_tok), 1);
                    out.push(Diagnostic::at(CheckId::PassedByValue, list, name_tok, message));
                }
            }
        }
    }
}

/// A parameter passed by value with a non-primitive, non-pointer type;
/// returns its name token.
fn heavy_value_param(list: &TokenList, start: usize, end: usize) -> Option<usize> {
    if end <= start || !list.is_name(end) {
        return None;
    }
    let mut saw_class_type = false;
    for t in start..end {
        let text = list.text(t);
        if matches!(text, "*" | "&") {
            return None;
        }
        if is_primitive_type(text) {
            return None;
        }
        if list.is_name(t) || matches!(text, "struct" | "class") {
            saw_class_type = true;
        }
    }
    if saw_class_type {
        Some(end)
    } else {
        None
    }
}

fn written_in_body(list: &TokenList, name_tok: usize, open: usize, close: usize) -> bool {
    let name = list.text(name_tok);
    for t in open + 1..close {
        if !list.is_name(t) || list.text(t) != name {
            continue;
        }
        if matches!(list.text(t.wrapping_sub(1)), "." | "->") {
            continue;
        }
        if t > 0 && list.text(t - 1) == "&" && is_unary_context(list, t - 1) {
            return true;
        }
        if matches!(list.text(t.wrapping_sub(1)), "++" | "--") {
            return true;
        }
        // Follow a member chain: writing `s.a.b` writes `s`.
        let mut end = t;
        while matches!(list.text(end + 1), "." | "->") && list.is_name(end + 2) {
            end += 2;
        }
        if matches!(
            list.text(end + 1),
            "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "++" | "--"
        ) {
            return true;
        }
    }
    false
}
