//! Returning the address of stack data (raw tier, always on).
//!
//! Inside a function body, `return &local;` for any non-static local and
//! `return arr;` for a non-static local array both hand the caller a
//! pointer into a dead frame.

use once_cell::sync::Lazy;

use crate::diagnostics::{CheckId, Diagnostic};
use crate::pattern::Pattern;
use crate::scopes::UsageIndex;
use crate::tokens::TokenList;

static RETURN_ADDR: Lazy<Pattern> = Lazy::new(|| Pattern::parse("return & %var%").unwrap());
static RETURN_VAR: Lazy<Pattern> = Lazy::new(|| Pattern::parse("return %var% ;").unwrap());

pub fn check(list: &TokenList, out: &mut Vec<Diagnostic>) {
    let index = UsageIndex::build(list);
    for t in list.indices() {
        if list.text(t) != "return" {
            continue;
        }
        let function = match enclosing_function_scope(list, &index, t) {
            Some(s) => s,
            None => continue,
        };
        let is_local = |name_tok: usize, arrays_only: bool| {
            let name = list.text(name_tok);
            index.variables.iter().any(|v| {
                v.name == name
                    && !v.is_static
                    && (!arrays_only || v.is_array)
                    && (v.scope == function || index.scopes.is_strictly_inside(v.scope, function))
                    && index.scopes.contains(function, v.decl_token)
            })
        };
        if let Some(m) = RETURN_ADDR.match_at(list, t) {
            let name_tok = m.token(0).unwrap_or(t);
            // `&arr[i]` is just as dead as `&x`.
            if matches!(list.text(m.end), ";" | "[") && is_local(name_tok, false) {
                let message = CheckId::ReturnLocalAddress
                    .template()
                    .replacen("{}", list.text(name_tok), 1);
                out.push(Diagnostic::at(CheckId::ReturnLocalAddress, list, t, message));
                continue;
            }
        }
        if let Some(m) = RETURN_VAR.match_at(list, t) {
            let name_tok = m.token(0).unwrap_or(t);
            if is_local(name_tok, true) {
                let message = CheckId::ReturnLocalAddress
                    .template()
                    .replacen("{}", list.text(name_tok), 1);
                out.push(Diagnostic::at(CheckId::ReturnLocalAddress, list, t, message));
            }
        }
    }
}

/// Walk outward from the scope containing `token` to the scope that looks
/// like a function body: its `{` directly follows a `)` and its parent is
/// the translation unit or a record body.
fn enclosing_function_scope(list: &TokenList, index: &UsageIndex, token: usize) -> Option<usize> {
    let mut id = index.scopes.innermost_at(token);
    loop {
        let scope = index.scopes.get(id);
        let parent = scope.parent?;
        let parent_is_outer = parent == 0 || index.scopes.get(parent).is_record;
        if parent_is_outer {
            if scope.start > 0 && list.text(scope.start - 1) == ")" {
                return Some(id);
            }
            return None;
        }
        id = parent;
    }
}
