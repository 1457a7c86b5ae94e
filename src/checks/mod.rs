//! The detector set.
//!
//! Each detector is a free function `fn(&TokenList, &mut Vec<Diagnostic>)`:
//! one forward scan, no shared state, no error channel (a non-match just
//! advances the cursor). Detectors are registered in the [`CHECKS`] table
//! and dispatched by the [`Runner`]; the table records which token-list
//! variant each one needs and whether it is gated by the coding-style
//! toggle.

mod casts;
mod chars;
mod conditions;
mod division;
mod functions;
mod locals;
mod nullptr;
mod redundant;
mod runner;
mod stack;
mod statements;
mod structs;

pub use runner::{AnalysisResult, Runner};

use crate::diagnostics::Diagnostic;
use crate::tokens::TokenList;

/// Which tokenizer output a detector consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// The token list before simplification, with original syntax intact.
    Raw,
    /// The token list after constant folding and canonicalization.
    Simplified,
}

/// One registered detector.
pub struct CheckEntry {
    pub name: &'static str,
    pub tier: Tier,
    /// Gated by `CheckConfig::style_checks`; correctness detectors are not.
    pub style_gated: bool,
    pub run: fn(&TokenList, &mut Vec<Diagnostic>),
}

/// The fixed detector table, iterated by the runner. Order here is the
/// invocation order; output order is stabilized by location afterwards.
pub const CHECKS: &[CheckEntry] = &[
    CheckEntry {
        name: "old_style_casts",
        tier: Tier::Raw,
        style_gated: true,
        run: casts::check,
    },
    CheckEntry {
        name: "redundant_code",
        tier: Tier::Raw,
        style_gated: true,
        run: redundant::check,
    },
    CheckEntry {
        name: "dangerous_functions",
        tier: Tier::Raw,
        style_gated: false,
        run: functions::check,
    },
    CheckEntry {
        name: "char_misuse",
        tier: Tier::Raw,
        style_gated: true,
        run: chars::check,
    },
    CheckEntry {
        name: "no_effect_statements",
        tier: Tier::Raw,
        style_gated: true,
        run: statements::check_no_effect,
    },
    CheckEntry {
        name: "str_plus_char",
        tier: Tier::Raw,
        style_gated: false,
        run: statements::check_str_plus_char,
    },
    CheckEntry {
        name: "return_local_address",
        tier: Tier::Raw,
        style_gated: false,
        run: stack::check,
    },
    CheckEntry {
        name: "conditions",
        tier: Tier::Simplified,
        style_gated: true,
        run: conditions::check,
    },
    CheckEntry {
        name: "unsigned_division",
        tier: Tier::Simplified,
        style_gated: true,
        run: division::check_unsigned,
    },
    CheckEntry {
        name: "zero_division",
        tier: Tier::Simplified,
        style_gated: false,
        run: division::check_zero,
    },
    CheckEntry {
        name: "null_pointer",
        tier: Tier::Simplified,
        style_gated: false,
        run: nullptr::check,
    },
    CheckEntry {
        name: "variable_scope",
        tier: Tier::Simplified,
        style_gated: true,
        run: locals::check_variable_scope,
    },
    CheckEntry {
        name: "passed_by_value",
        tier: Tier::Simplified,
        style_gated: true,
        run: locals::check_passed_by_value,
    },
    CheckEntry {
        name: "struct_members",
        tier: Tier::Simplified,
        style_gated: true,
        run: structs::check,
    },
];

/// Split the argument tokens of a linked `(` into per-argument spans,
/// honoring nested brackets. Returns inclusive spans; empty on `()` or an
/// unlinked paren.
pub(crate) fn comma_split(list: &TokenList, open: usize) -> Vec<(usize, usize)> {
    let close = match list.link(open) {
        Some(c) if c > open + 1 => c,
        _ => return Vec::new(),
    };
    let mut spans = Vec::new();
    let mut start = open + 1;
    let mut i = open + 1;
    while i < close {
        match list.text(i) {
            "," => {
                if i > start {
                    spans.push((start, i - 1));
                }
                start = i + 1;
                i += 1;
            }
            "(" | "[" | "{" => match list.link(i) {
                Some(end) => i = end + 1,
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    if close > start {
        spans.push((start, close - 1));
    }
    spans
}
