//! Token-sequence pattern matching.
//!
//! Every detector is built on this primitive: a [`Pattern`] is compiled
//! from a compact text grammar and matched against a [`TokenList`] at a
//! cursor position. Matching is linear, greedy, and non-backtracking;
//! failure has no side effects and is the normal "nothing here" outcome.
//!
//! Grammar (atoms separated by whitespace):
//!
//! - `delete`     literal token text
//! - `a|b|c`      any one of the listed literals
//! - `%var%`      any identifier (never a keyword)
//! - `%num%`      any number literal
//! - `%str%`      any string literal
//! - `%chr%`      any character literal
//! - `%any%`      any single token
//! - `%bal%`      a balanced bracket span, consumed open-to-linked-close
//! - `atom?`      the atom is optional (consumed only if it matches)
//!
//! Each wildcard atom binds a slot in the resulting [`PatternMatch`], in
//! order of appearance.

use thiserror::Error;

use crate::tokens::{TokenKind, TokenList};

/// A malformed pattern specification.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unknown wildcard {0:?}")]
    UnknownWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    Lit(String),
    AnyOf(Vec<String>),
    Ident,
    Num,
    Str,
    Chr,
    Any,
    Balanced,
}

impl Atom {
    fn is_wildcard(&self) -> bool {
        !matches!(self, Atom::Lit(_) | Atom::AnyOf(_))
    }
}

#[derive(Debug, Clone)]
struct Step {
    atom: Atom,
    optional: bool,
}

/// A compiled token-sequence pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    steps: Vec<Step>,
}

/// Tokens bound by a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Cursor just past the last matched token.
    pub end: usize,
    /// One `(start, end)` inclusive token span per wildcard slot, in
    /// pattern order. Single-token wildcards have `start == end`;
    /// optional wildcards that did not consume bind `None`.
    slots: Vec<Option<(usize, usize)>>,
}

impl PatternMatch {
    /// Token index bound to wildcard slot `n`.
    pub fn token(&self, n: usize) -> Option<usize> {
        self.slots.get(n).copied().flatten().map(|(s, _)| s)
    }

    /// Inclusive token span bound to wildcard slot `n`.
    pub fn span(&self, n: usize) -> Option<(usize, usize)> {
        self.slots.get(n).copied().flatten()
    }
}

impl Pattern {
    /// Compile a pattern specification.
    pub fn parse(spec: &str) -> Result<Self, PatternError> {
        let mut steps = Vec::new();
        for word in spec.split_whitespace() {
            let (word, optional) = match word.strip_suffix('?') {
                Some(w) => (w, true),
                None => (word, false),
            };
            let atom = if word.starts_with('%') && word.ends_with('%') && word.len() > 2 {
                match word {
                    "%var%" => Atom::Ident,
                    "%num%" => Atom::Num,
                    "%str%" => Atom::Str,
                    "%chr%" => Atom::Chr,
                    "%any%" => Atom::Any,
                    "%bal%" => Atom::Balanced,
                    other => return Err(PatternError::UnknownWildcard(other.to_string())),
                }
            } else if word.contains('|') {
                Atom::AnyOf(word.split('|').map(str::to_string).collect())
            } else {
                Atom::Lit(word.to_string())
            };
            steps.push(Step { atom, optional });
        }
        if steps.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Pattern { steps })
    }

    /// Attempt to match at `start`. Returns the bound slots and the end
    /// cursor on success, `None` on any mismatch.
    pub fn match_at(&self, list: &TokenList, start: usize) -> Option<PatternMatch> {
        let mut cursor = start;
        let mut slots = Vec::new();
        for step in &self.steps {
            match self.match_step(list, cursor, &step.atom) {
                Some(next) => {
                    if step.atom.is_wildcard() {
                        slots.push(Some((cursor, next - 1)));
                    }
                    cursor = next;
                }
                None => {
                    if !step.optional {
                        return None;
                    }
                    if step.atom.is_wildcard() {
                        slots.push(None);
                    }
                }
            }
        }
        Some(PatternMatch { end: cursor, slots })
    }

    /// Scan forward from `start`, returning the first position that
    /// matches along with its bindings.
    pub fn find_from(&self, list: &TokenList, start: usize) -> Option<(usize, PatternMatch)> {
        (start..list.len()).find_map(|i| self.match_at(list, i).map(|m| (i, m)))
    }

    fn match_step(&self, list: &TokenList, cursor: usize, atom: &Atom) -> Option<usize> {
        let kind = list.kind(cursor)?;
        let ok = match atom {
            Atom::Lit(text) => list.text(cursor) == text,
            Atom::AnyOf(texts) => texts.iter().any(|t| list.text(cursor) == t),
            Atom::Ident => kind == TokenKind::Identifier,
            Atom::Num => kind == TokenKind::Number,
            Atom::Str => kind == TokenKind::StringLit,
            Atom::Chr => kind == TokenKind::CharLit,
            Atom::Any => true,
            Atom::Balanced => {
                // Consume an open bracket through its linked close. An
                // unlinked bracket never matches, so a wildcard cannot
                // silently cross into a different nesting level.
                return match (kind, list.link(cursor)) {
                    (TokenKind::OpenBracket, Some(close)) if close > cursor => Some(close + 1),
                    _ => None,
                };
            }
        };
        if ok {
            Some(cursor + 1)
        } else {
            None
        }
    }
}
