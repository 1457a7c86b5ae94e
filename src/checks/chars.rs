//! Misuse of plain `char` variables (raw tier).
//!
//! On platforms where `char` is signed, using one as an array index or a
//! bitwise operand sign-extends values above 0x7f. `unsigned char` is
//! safe and is not tracked.

use crate::diagnostics::{CheckId, Diagnostic};
use crate::scopes::{is_unary_context, ScopeTree};
use crate::tokens::TokenList;

/// A scalar variable declared plain or `signed char`, valid from its
/// declaration to the end of the declaring scope. Shared with the
/// string-plus-char detector.
pub(crate) struct CharScalar {
    pub(crate) name: String,
    first: usize,
    last: usize,
}

impl CharScalar {
    /// True when the name at `token` refers to this variable.
    pub(crate) fn covers(&self, token: usize) -> bool {
        token >= self.first && token <= self.last
    }
}

pub(crate) fn char_scalars(list: &TokenList) -> Vec<CharScalar> {
    let scopes = ScopeTree::build(list);
    let mut found = Vec::new();
    let mut parens: Vec<usize> = Vec::new();
    for i in list.indices() {
        match list.text(i) {
            "(" => parens.push(i),
            ")" => {
                parens.pop();
            }
            _ => {}
        }
        if list.text(i) != "char" || !list.is_name(i + 1) {
            continue;
        }
        if i > 0 && list.text(i - 1) == "unsigned" {
            continue;
        }
        // Scalars only: `char buf [ ... ]` and `char * p` do not apply.
        if !matches!(list.text(i + 2), ";" | "=" | "," | ")") {
            continue;
        }
        let (first, last) = if let Some(&open) = parens.first() {
            // A parameter is visible in the body after the list; a
            // bodyless prototype declares nothing worth tracking.
            match list.link(open) {
                Some(close) if list.text(close + 1) == "{" => match list.link(close + 1) {
                    Some(end) => (close + 1, end),
                    None => continue,
                },
                _ => continue,
            }
        } else {
            (i + 1, scopes.get(scopes.innermost_at(i + 1)).end)
        };
        found.push(CharScalar {
            name: list.text(i + 1).to_string(),
            first,
            last,
        });
    }
    found
}

pub fn check(list: &TokenList, out: &mut Vec<Diagnostic>) {
    let chars = char_scalars(list);
    if chars.is_empty() {
        return;
    }
    for t in list.indices() {
        if !list.is_name(t) {
            continue;
        }
        if !chars.iter().any(|c| c.covers(t) && c.name == list.text(t)) {
            continue;
        }
        if matches!(list.text(t.wrapping_sub(1)), "." | "->") {
            continue;
        }
        // Full array subscript: `buf [ c ]` with a named array.
        if t >= 2
            && list.text(t - 1) == "["
            && list.text(t + 1) == "]"
            && list.is_name(t - 2)
        {
            let message = CheckId::CharArrayIndex
                .template()
                .replacen("{}", list.text(t), 1);
            out.push(Diagnostic::at(CheckId::CharArrayIndex, list, t, message));
            continue;
        }
        // Operand of a binary `&`, `|` or `^`.
        let bit_left = t > 0
            && matches!(list.text(t - 1), "&" | "|" | "^")
            && !is_unary_context(list, t - 1);
        let bit_right = matches!(list.text(t + 1), "&" | "|" | "^")
            && (list.is_name(t + 2) || list.is_number(t + 2));
        if bit_left || bit_right {
            let message = CheckId::CharBitOp
                .template()
                .replacen("{}", list.text(t), 1);
            out.push(Diagnostic::at(CheckId::CharBitOp, list, t, message));
        }
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
    fn flags_char_as_array_index() {
        let out = run("char c ; c = x ; v = buf [ c ] ;");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, CheckId::CharArrayIndex);
        assert!(out[0].message.contains("'c'"));
    }

    #[test]
    fn flags_char_in_bit_operations() {
        let out = run("char c ; r = i | c ; r = c & 0x80 ;");
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|d| d.id == CheckId::CharBitOp));
    }

    #[test]
    fn unsigned_char_is_safe() {
        assert!(run("unsigned char c ; v = buf [ c ] ; r = c & 3 ;").is_empty());
    }

    #[test]
    fn char_arrays_and_pointers_are_not_scalars() {
        assert!(run("char buf [ 4 ] ; v = big [ buf ] ;").is_empty());
        assert!(run("char * p ; r = n & m ;").is_empty());
    }

    #[test]
    fn address_of_char_is_not_a_bit_op() {
        assert!(run("char c ; f ( & c ) ;").is_empty());
    }

    #[test]
    fn tracking_stops_at_the_declaring_scope() {
        // A same-named variable in another function is a different one.
        let out = run("void f ( ) { char c ; g ( c ) ; } void h ( int c ) { v = buf [ c ] ; }");
        assert!(out.is_empty());
    }

    #[test]
    fn parameter_chars_are_tracked_in_the_body() {
        let out = run("void f ( char c ) { v = buf [ c ] ; }");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, CheckId::CharArrayIndex);
        assert!(run("void f ( char c ) ;").is_empty());
    }
}
