//! Check runner: dispatches the detector table over both token-list
//! variants, isolates detector failures, and hands stably ordered
//! diagnostics to the sink.

use std::panic::{self, AssertUnwindSafe};

use crate::config::CheckConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::tokens::TokenList;

use super::{CheckEntry, Tier, CHECKS};

/// Outcome of one analysis run over one translation unit.
#[derive(Debug, Default)]
pub struct AnalysisResult {
    /// All findings, sorted by (file, line).
    pub diagnostics: Vec<Diagnostic>,
    /// Number of detectors that ran to completion.
    pub checks_run: usize,
    /// Names of detectors that failed internally. A failure never aborts
    /// the run; it only costs that detector's findings.
    pub failed_checks: Vec<&'static str>,
}

impl AnalysisResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Executes the registered detectors against a translation unit.
pub struct Runner {
    config: CheckConfig,
}

impl Runner {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    /// Run every enabled detector over the variant it requires. Detectors
    /// only read the lists, so their relative order cannot change each
    /// other's output; the combined findings are sorted by location for
    /// reproducibility.
    pub fn run(&self, raw: &TokenList, simplified: &TokenList) -> AnalysisResult {
        let mut result = AnalysisResult::default();
        for entry in CHECKS {
            if entry.style_gated && !self.config.style_checks {
                continue;
            }
            let list = match entry.tier {
                Tier::Raw => raw,
                Tier::Simplified => simplified,
            };
            match self.run_one(entry, list) {
                Some(found) => {
                    result.checks_run += 1;
                    result
                        .diagnostics
                        .extend(found.into_iter().filter(|d| self.config.is_enabled(d.id)));
                }
                None => result.failed_checks.push(entry.name),
            }
        }
        result.diagnostics.sort_by(|a, b| {
            let key = |d: &Diagnostic| {
                d.location
                    .as_ref()
                    .map(|l| (l.file.clone(), l.line))
            };
            key(a).cmp(&key(b))
        });
        result
    }

    /// Run the detectors and forward every finding to `sink` in order.
    pub fn run_into(
        &self,
        raw: &TokenList,
        simplified: &TokenList,
        sink: &mut dyn DiagnosticSink,
    ) -> AnalysisResult {
        let result = self.run(raw, simplified);
        for d in &result.diagnostics {
            sink.report(d.clone());
        }
        result
    }

    fn run_one(&self, entry: &CheckEntry, list: &TokenList) -> Option<Vec<Diagnostic>> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            let mut found = Vec::new();
            (entry.run)(list, &mut found);
            found
        }))
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CheckId;
    use crate::testutil::lex;

    fn lists() -> (TokenList, TokenList) {
        let raw = lex(
            "t.c",
            "void f ( ) { p = ( char * ) q ; x = 10 / 0 ; }",
        );
        let simplified = lex(
            "t.c",
            "void f ( ) { p = q ; x = 10 / 0 ; }",
        );
        (raw, simplified)
    }

    #[test]
    fn correctness_checks_run_without_style_toggle() {
        let (raw, simplified) = lists();
        let result = Runner::new(CheckConfig::default()).run(&raw, &simplified);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].id, CheckId::ZeroDivision);
        assert!(result.has_errors());
        assert!(result.failed_checks.is_empty());
    }

    #[test]
    fn style_toggle_adds_style_findings() {
        let (raw, simplified) = lists();
        let result = Runner::new(CheckConfig::all()).run(&raw, &simplified);
        let ids: Vec<CheckId> = result.diagnostics.iter().map(|d| d.id).collect();
        assert!(ids.contains(&CheckId::CStyleCast));
        assert!(ids.contains(&CheckId::ZeroDivision));
    }

    #[test]
    fn disabled_checks_are_filtered() {
        let (raw, simplified) = lists();
        let config = CheckConfig {
            style_checks: true,
            disabled: vec!["zero_division".to_string()],
        };
        let result = Runner::new(config).run(&raw, &simplified);
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.id != CheckId::ZeroDivision));
    }

    #[test]
    fn diagnostics_are_sorted_by_line() {
        let raw = lex("t.c", "void f ( ) { }");
        let simplified = lex(
            "t.c",
            "void f ( ) {\nx = 1 / 0 ;\nif ( q == 0 ) { * q = 1 ; }\ny = 2 / 0 ;\n}",
        );
        let result = Runner::new(CheckConfig::default()).run(&raw, &simplified);
        let lines: Vec<u32> = result
            .diagnostics
            .iter()
            .map(|d| d.location.as_ref().unwrap().line)
            .collect();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        assert_eq!(lines, sorted);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn runs_are_idempotent() {
        let (raw, simplified) = lists();
        let runner = Runner::new(CheckConfig::all());
        let a = runner.run(&raw, &simplified);
        let b = runner.run(&raw, &simplified);
        let render = |r: &AnalysisResult| crate::report::render_text(&r.diagnostics);
        assert_eq!(render(&a), render(&b));
    }

    #[test]
    fn sink_receives_everything_in_order() {
        let (raw, simplified) = lists();
        let mut collected: Vec<Diagnostic> = Vec::new();
        let result = Runner::new(CheckConfig::default()).run_into(&raw, &simplified, &mut collected);
        assert_eq!(collected.len(), result.diagnostics.len());
    }
}
