//! Tokencheck - token-level static analysis for C/C++.
//!
//! Tokencheck scans the normalized token stream of one translation unit
//! for bug-prone patterns: unsafe casts, redundant null guards, misuse of
//! standard functions, unsigned-division pitfalls, over-broad variable
//! scope, heavy pass-by-value parameters, unused struct members, char
//! sign-extension traps, no-op statements, dangling returns, null-pointer
//! dereferences, and zero division. Every detector is a flow-insensitive
//! heuristic over tokens; no AST is ever built.
//!
//! # Architecture
//!
//! - `tokens`: the token arena fed by the external tokenizer
//! - `pattern`: the token-sequence matcher every detector is built on
//! - `scopes`: scope tree and variable-usage index
//! - `checks`: the detector set and the runner that dispatches it
//! - `diagnostics`: identifiers, severities, messages, and the catalog
//! - `config`: toggles selecting which detectors run
//! - `report`: text and JSON rendering of results
//!
//! The tokenizer produces two immutable variants of each unit - raw and
//! simplified (constants folded) - and each detector is registered with
//! the variant it requires.
//!
//! # Adding a Detector
//!
//! Write a free function over `(&TokenList, &mut Vec<Diagnostic>)` in
//! `src/checks/`, give it a `CheckId` with a severity and message
//! template, and add a row to the `CHECKS` table.

pub mod checks;
pub mod config;
pub mod diagnostics;
pub mod pattern;
pub mod report;
pub mod scopes;
pub mod tokens;

#[cfg(test)]
pub(crate) mod testutil;

pub use checks::{AnalysisResult, CheckEntry, Runner, Tier, CHECKS};
pub use config::CheckConfig;
pub use diagnostics::{catalog, CheckId, Diagnostic, DiagnosticSink, Location, Severity};
pub use pattern::{Pattern, PatternError, PatternMatch};
pub use scopes::{ScopeTree, UsageIndex, UsageKind, VariableUsage};
pub use tokens::{Token, TokenKind, TokenList};
