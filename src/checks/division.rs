//! Division pitfalls (simplified tier).
//!
//! Zero division looks for `/` or `%` whose right operand folded to a
//! literal zero. Unsigned division relies on declarations seen in the
//! same unit: mixing an unsigned variable with a negated literal is a
//! definite bug (the negative value wraps), mixing it with a variable of
//! signed type is reported as suspected.

use std::collections::HashSet;

use crate::diagnostics::{CheckId, Diagnostic};
use crate::scopes::{is_unary_context, UsageIndex};
use crate::tokens::TokenList;

pub fn check_zero(list: &TokenList, out: &mut Vec<Diagnostic>) {
    for t in list.indices() {
        if !matches!(list.text(t), "/" | "%") {
            continue;
        }
        if !list.is_number(t + 1) {
            continue;
        }
        let value: Option<f64> = list.text(t + 1).parse().ok();
        if value == Some(0.0) {
            let message = CheckId::ZeroDivision.template().to_string();
            out.push(Diagnostic::at(CheckId::ZeroDivision, list, t, message));
        }
    }
}

pub fn check_unsigned(list: &TokenList, out: &mut Vec<Diagnostic>) {
    let mut unsigned_vars: HashSet<String> = HashSet::new();
    let mut signed_vars: HashSet<String> = HashSet::new();
    let index = UsageIndex::build(list);
    for v in &index.variables {
        if v.is_pointer || v.is_array {
            continue;
        }
        match v.type_name.as_str() {
            "unsigned" => {
                unsigned_vars.insert(v.name.clone());
            }
            "int" | "long" | "short" | "signed" => {
                signed_vars.insert(v.name.clone());
            }
            _ => {}
        }
    }
    if unsigned_vars.is_empty() {
        return;
    }

    for t in list.indices() {
        if list.text(t) != "/" {
            continue;
        }
        let left_var = t.checked_sub(1).filter(|&l| list.is_name(l));
        let right_var = Some(t + 1).filter(|&r| list.is_name(r));
        let left_unsigned = left_var.map_or(false, |l| unsigned_vars.contains(list.text(l)));
        let right_unsigned = right_var.map_or(false, |r| unsigned_vars.contains(list.text(r)));

        // unsigned / -N and -N / unsigned are definitely wrong.
        if left_unsigned && list.text(t + 1) == "-" && list.is_number(t + 2) {
            let name = list.text(t - 1);
            let message = CheckId::UnsignedDivision.template().replacen("{}", name, 1);
            out.push(Diagnostic::at(CheckId::UnsignedDivision, list, t, message));
            continue;
        }
        if right_unsigned
            && t >= 2
            && list.is_number(t - 1)
            && list.text(t - 2) == "-"
            && is_unary_context(list, t - 2)
        {
            let name = list.text(t + 1);
            let message = CheckId::UnsignedDivision.template().replacen("{}", name, 1);
            out.push(Diagnostic::at(CheckId::UnsignedDivision, list, t, message));
            continue;
        }

        // unsigned mixed with a known-signed variable is only suspected.
        let suspected = if left_unsigned {
            right_var.filter(|&r| signed_vars.contains(list.text(r))).map(|r| (t - 1, r))
        } else if right_unsigned {
            left_var.filter(|&l| signed_vars.contains(list.text(l))).map(|l| (t + 1, l))
        } else {
            None
        };
        if let Some((unsigned_tok, signed_tok)) = suspected {
            let message = CheckId::UnsignedDivisionSuspected
                .template()
                .replacen("{}", list.text(unsigned_tok), 1)
                .replacen("{}", list.text(signed_tok), 1);
            out.push(Diagnostic::at(
                CheckId::UnsignedDivisionSuspected,
                list,
                t,
                message,
            ));
        }
    }
}
