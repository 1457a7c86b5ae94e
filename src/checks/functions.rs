//! Misuse of standard functions (raw tier, always on).
//!
//! Two patterns: `strtol`/`strtoul` called with an invalid radix, and
//! `sprintf`/`snprintf` where the destination buffer reappears among the
//! source arguments (undefined behavior). Both work by comparing argument
//! token text; no type information is needed.

use once_cell::sync::Lazy;

use crate::diagnostics::{CheckId, Diagnostic};
use crate::pattern::Pattern;
use crate::tokens::TokenList;

use super::comma_split;

static STRTOL: Lazy<Pattern> = Lazy::new(|| Pattern::parse("strtol|strtoul (").unwrap());
static SPRINTF: Lazy<Pattern> = Lazy::new(|| Pattern::parse("sprintf|snprintf (").unwrap());

pub fn check(list: &TokenList, out: &mut Vec<Diagnostic>) {
    for i in list.indices() {
        // Skip member calls like `obj.strtol(...)`.
        if i > 0 && matches!(list.text(i - 1), "." | "->" | "::") {
            continue;
        }
        if STRTOL.match_at(list, i).is_some() {
            check_strtol(list, i, out);
        }
        if SPRINTF.match_at(list, i).is_some() {
            check_sprintf(list, i, out);
        }
    }
}

fn check_strtol(list: &TokenList, name: usize, out: &mut Vec<Diagnostic>) {
    let args = comma_split(list, name + 1);
    if args.len() != 3 {
        return;
    }
    let (start, end) = args[2];
    if start != end || !list.is_number(start) {
        return;
    }
    let base: u32 = match list.text(start).parse() {
        Ok(b) => b,
        Err(_) => return,
    };
    // Base 0 means "auto-detect" and is legal; 1 and anything above 36
    // are not.
    if base == 1 || base > 36 {
        let message = CheckId::DangerousStrtolBase
            .template()
            .replacen("{}", list.text(name), 1)
            .replacen("{}", list.text(start), 1);
        out.push(Diagnostic::at(CheckId::DangerousStrtolBase, list, name, message));
    }
}

fn check_sprintf(list: &TokenList, name: usize, out: &mut Vec<Diagnostic>) {
    let args = comma_split(list, name + 1);
    // Destination is the first argument; sources start after the format
    // string (argument 2 for sprintf, 3 for snprintf).
    let sources_from = if list.text(name) == "sprintf" { 2 } else { 3 };
    let dest = match args.first() {
        Some(&(start, end)) if start == end && list.is_name(start) => start,
        _ => return,
    };
    let dest_text = list.text(dest);
    for &(start, end) in args.iter().skip(sources_from) {
        let overlaps = (start..=end).any(|t| {
            list.text(t) == dest_text && !matches!(list.text(t.wrapping_sub(1)), "." | "->")
        });
        if overlaps {
            let message = CheckId::SprintfOverlappingData
                .template()
                .replacen("{}", dest_text, 1)
                .replacen("{}", list.text(name), 1);
            out.push(Diagnostic::at(
                CheckId::SprintfOverlappingData,
                list,
                name,
                message,
            ));
            return;
        }
    }
}
