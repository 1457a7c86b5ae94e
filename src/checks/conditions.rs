//! Degenerate `if` statements (simplified tier).
//!
//! Runs after constant folding, so a condition that reduced to a single
//! literal is always-true or always-false, and `if (...);` has no action
//! no matter what the condition computes.

use crate::diagnostics::{CheckId, Diagnostic};
use crate::tokens::TokenList;

pub fn check(list: &TokenList, out: &mut Vec<Diagnostic>) {
    for i in list.indices() {
        if list.text(i) != "if" || list.text(i + 1) != "(" {
            continue;
        }
        let close = match list.link(i + 1) {
            Some(c) if c > i + 2 => c,
            _ => continue,
        };
        if list.text(close + 1) == ";" {
            let message = CheckId::IfNoAction.template().to_string();
            out.push(Diagnostic::at(CheckId::IfNoAction, list, i, message));
        }
        // Single-literal condition, left over from folding.
        if close == i + 3 && list.is_number(i + 2) {
            let id = if is_zero(list.text(i + 2)) {
                CheckId::ConditionAlwaysFalse
            } else {
                CheckId::ConditionAlwaysTrue
            };
            out.push(Diagnostic::at(id, list, i, id.template().to_string()));
        }
    }
}

fn is_zero(text: &str) -> bool {
    text.parse::<f64>().map(|v| v == 0.0).unwrap_or(false)
}
