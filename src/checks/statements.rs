//! Statement-level oddities (raw tier).
//!
//! `check_no_effect` flags statements whose entire body is a lone
//! constant or variable; `check_str_plus_char` flags `"literal" + c`,
//! which shifts the pointer instead of appending.

use crate::diagnostics::{CheckId, Diagnostic};
use crate::scopes::record_header_before;
use crate::tokens::{TokenKind, TokenList};

use super::chars::char_scalars;

pub fn check_no_effect(list: &TokenList, out: &mut Vec<Diagnostic>) {
    let mut paren_depth = 0usize;
    for t in list.indices() {
        match list.text(t) {
            "(" => {
                paren_depth += 1;
                continue;
            }
            ")" => {
                paren_depth = paren_depth.saturating_sub(1);
                continue;
            }
            _ => {}
        }
        if paren_depth > 0 {
            continue;
        }
        let at_statement_start = t == 0 || matches!(list.text(t - 1), ";" | "{" | "}");
        if !at_statement_start || list.text(t + 1) != ";" {
            continue;
        }
        // `struct S { ... } s ;` declares `s`; the brace belongs to the
        // type, not to a preceding statement.
        if t > 0 && list.text(t - 1) == "}" {
            if let Some(open) = list.link(t - 1) {
                if record_header_before(list, open) {
                    continue;
                }
            }
        }
        let operand = match list.kind(t) {
            Some(TokenKind::Number) => "numeric constant",
            Some(TokenKind::StringLit) => "string constant",
            Some(TokenKind::CharLit) => "character constant",
            Some(TokenKind::Identifier) => "variable",
            _ => continue,
        };
        let message = CheckId::NoEffectStatement
            .template()
            .replacen("{}", operand, 1);
        out.push(Diagnostic::at(CheckId::NoEffectStatement, list, t, message));
    }
}

pub fn check_str_plus_char(list: &TokenList, out: &mut Vec<Diagnostic>) {
    let chars = char_scalars(list);
    for t in list.indices() {
        if list.kind(t) != Some(TokenKind::StringLit) || list.text(t + 1) != "+" {
            continue;
        }
        let operand = t + 2;
        let is_char_operand = match list.kind(operand) {
            Some(TokenKind::CharLit) => true,
            Some(TokenKind::Identifier) => chars
                .iter()
                .any(|c| c.covers(operand) && c.name == list.text(operand)),
            _ => false,
        };
        if is_char_operand {
            let message = CheckId::StrPlusChar
                .template()
                .replacen("{}", list.text(operand), 1);
            out.push(Diagnostic::at(CheckId::StrPlusChar, list, t + 1, message));
        }
    }
}
