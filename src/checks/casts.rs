//! Old-style cast detection (raw tier).
//!
//! Flags `(T)x` and `(T*)p`. Builtin types are flagged in both forms;
//! class types only in pointer form, since `(name)` followed by an
//! operand cannot otherwise be told apart from a parenthesized
//! expression without type resolution. `static_cast<T>(x)` and the
//! function-call form `T(x)` never look like this pattern.

use crate::diagnostics::{CheckId, Diagnostic};
use crate::scopes::is_primitive_type;
use crate::tokens::{TokenKind, TokenList};

pub fn check(list: &TokenList, out: &mut Vec<Diagnostic>) {
    for i in list.indices() {
        if list.text(i) != "(" {
            continue;
        }
        let close = match list.link(i) {
            Some(c) if c > i + 1 => c,
            _ => continue,
        };
        // A paren right after a name, `)` or `]` is a call or declarator;
        // after sizeof it is not a cast either.
        if i > 0 {
            if list.is_name(i - 1) {
                continue;
            }
            if matches!(list.text(i - 1), ")" | "]" | "sizeof") {
                continue;
            }
        }
        let (ty, pointer) = match parse_type_span(list, i + 1, close) {
            Some(parsed) => parsed,
            None => continue,
        };
        // Named types are only trusted in pointer form.
        if !pointer && !is_primitive_type(&ty[..ty.find(' ').unwrap_or(ty.len())]) {
            continue;
        }
        // The cast must be applied to a plain operand, not `(...)`.
        let operand_ok = match list.kind(close + 1) {
            Some(TokenKind::Identifier)
            | Some(TokenKind::Number)
            | Some(TokenKind::StringLit)
            | Some(TokenKind::CharLit) => true,
            Some(TokenKind::Operator) => matches!(list.text(close + 1), "&" | "*"),
            _ => false,
        };
        if operand_ok {
            let message = CheckId::CStyleCast
                .template()
                .replacen("{}", &ty, 1);
            out.push(Diagnostic::at(CheckId::CStyleCast, list, i, message));
        }
    }
}

/// Parse `start..end` as exactly one type: optional `const`, then either a
/// builtin-keyword run or a (possibly qualified) name, then `*`s. Returns
/// the rendered type text and whether it is a pointer type.
fn parse_type_span(list: &TokenList, start: usize, end: usize) -> Option<(String, bool)> {
    let mut i = start;
    if list.text(i) == "const" {
        i += 1;
    }
    if is_primitive_type(list.text(i)) {
        i += 1;
        while is_primitive_type(list.text(i)) {
            i += 1;
        }
    } else if list.is_name(i) {
        i += 1;
        while list.text(i) == "::" && list.is_name(i + 1) {
            i += 2;
        }
    } else {
        return None;
    }
    let mut pointer = false;
    while list.text(i) == "*" && i < end {
        pointer = true;
        i += 1;
    }
    if i != end {
        return None;
    }
    let ty = (start..end)
        .map(|t| list.text(t))
        .collect::<Vec<_>>()
        .join(" ");
    Some((ty, pointer))
}
