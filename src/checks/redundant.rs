//! Redundant null-safety guards (raw tier).
//!
//! `delete` (and `delete[]`) of a null pointer is defined to do nothing,
//! and the STL `remove`/`erase` idiom guarded by a `find` is equally
//! null-safe, so the guard itself is redundant code.

use once_cell::sync::Lazy;

use crate::diagnostics::{CheckId, Diagnostic};
use crate::pattern::Pattern;
use crate::tokens::TokenList;

static GUARD: Lazy<Pattern> = Lazy::new(|| Pattern::parse("if ( %var% )").unwrap());
static DELETE: Lazy<Pattern> = Lazy::new(|| Pattern::parse("delete [? ]? %var% ;").unwrap());
static RESET: Lazy<Pattern> = Lazy::new(|| Pattern::parse("%var% = 0 ;").unwrap());
static FIND_GUARD: Lazy<Pattern> = Lazy::new(|| {
    Pattern::parse("if ( %var% . find ( %any% ) != %var% . end ( ) )").unwrap()
});
static REMOVE: Lazy<Pattern> =
    Lazy::new(|| Pattern::parse("%var% . remove|erase ( %any% ) ;").unwrap());

pub fn check(list: &TokenList, out: &mut Vec<Diagnostic>) {
    for i in list.indices() {
        check_delete_guard(list, i, out);
        check_remove_guard(list, i, out);
    }
}

/// `if (p) delete p;` with optional braces and an optional `p = 0;`.
fn check_delete_guard(list: &TokenList, i: usize, out: &mut Vec<Diagnostic>) {
    let guard = match GUARD.match_at(list, i) {
        Some(m) => m,
        None => return,
    };
    let name = list.text(guard.token(0).unwrap_or(0));
    let mut cursor = guard.end;
    let braced = list.text(cursor) == "{";
    if braced {
        cursor += 1;
    }
    let del = match DELETE.match_at(list, cursor) {
        Some(m) => m,
        None => return,
    };
    if list.text(del.token(0).unwrap_or(0)) != name {
        return;
    }
    cursor = del.end;
    if let Some(reset) = RESET.match_at(list, cursor) {
        if list.text(reset.token(0).unwrap_or(0)) == name {
            cursor = reset.end;
        }
    }
    if braced && list.text(cursor) != "}" {
        return;
    }
    let message = CheckId::RedundantDeleteNullCheck.template().to_string();
    out.push(Diagnostic::at(
        CheckId::RedundantDeleteNullCheck,
        list,
        i,
        message,
    ));
}

/// `if (c.find(x) != c.end()) c.remove(x);` with optional braces.
fn check_remove_guard(list: &TokenList, i: usize, out: &mut Vec<Diagnostic>) {
    let guard = match FIND_GUARD.match_at(list, i) {
        Some(m) => m,
        None => return,
    };
    let container = list.text(guard.token(0).unwrap_or(0));
    let key = list.text(guard.token(1).unwrap_or(0));
    if list.text(guard.token(2).unwrap_or(0)) != container {
        return;
    }
    let mut cursor = guard.end;
    let braced = list.text(cursor) == "{";
    if braced {
        cursor += 1;
    }
    let remove = match REMOVE.match_at(list, cursor) {
        Some(m) => m,
        None => return,
    };
    if list.text(remove.token(0).unwrap_or(0)) != container
        || list.text(remove.token(1).unwrap_or(0)) != key
    {
        return;
    }
    if braced && list.text(remove.end) != "}" {
        return;
    }
    let message = CheckId::RedundantRemoveNullCheck.template().to_string();
    out.push(Diagnostic::at(
        CheckId::RedundantRemoveNullCheck,
        list,
        i,
        message,
    ));
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
    fn flags_guarded_delete() {
        assert_eq!(run("if ( p ) delete p ;").len(), 1);
        assert_eq!(run("if ( p ) { delete p ; }").len(), 1);
        assert_eq!(run("if ( p ) { delete [ ] p ; }").len(), 1);
        assert_eq!(run("if ( p ) { delete p ; p = 0 ; }").len(), 1);
    }

    #[test]
    fn ignores_guards_with_other_work() {
        assert!(run("if ( p ) { log ( p ) ; delete p ; }").is_empty());
        assert!(run("if ( p ) { delete p ; q = 0 ; }").is_empty());
        assert!(run("if ( q ) delete p ;").is_empty());
    }

    #[test]
    fn flags_find_guarded_remove() {
        let out = run("if ( s . find ( x ) != s . end ( ) ) { s . erase ( x ) ; }");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, CheckId::RedundantRemoveNullCheck);
        assert_eq!(
            run("if ( s . find ( x ) != s . end ( ) ) s . remove ( x ) ;").len(),
            1
        );
    }

    #[test]
    fn ignores_mismatched_container_or_key() {
        assert!(run("if ( s . find ( x ) != s . end ( ) ) { t . erase ( x ) ; }").is_empty());
        assert!(run("if ( s . find ( x ) != s . end ( ) ) { s . erase ( y ) ; }").is_empty());
    }
}
