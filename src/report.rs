//! Rendering of analysis results.
//!
//! Two formats: a plain text listing (one finding per line, gcc-style
//! prefix) and JSON for tooling. The engine itself never prints; callers
//! feed the rendered string to whatever sink they own.

use crate::diagnostics::Diagnostic;

/// Render findings as text, one per line:
/// `file:line: severity: message [id]`.
pub fn render_text(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        match &d.location {
            Some(loc) => out.push_str(&format!(
                "{}:{}: {}: {} [{}]\n",
                loc.file, loc.line, d.severity, d.message, d.id
            )),
            None => out.push_str(&format!("{}: {} [{}]\n", d.severity, d.message, d.id)),
        }
    }
    out
}

/// Render findings as a JSON array.
pub fn render_json(diagnostics: &[Diagnostic]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(diagnostics)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{catalog, CheckId, Diagnostic, Location, Severity};

    fn sample() -> Diagnostic {
        Diagnostic {
            id: CheckId::ZeroDivision,
            severity: Severity::Error,
            message: "division by zero".to_string(),
            location: Some(Location {
                file: "a.c".to_string(),
                line: 3,
            }),
        }
    }

    #[test]
    fn text_format_is_one_line_per_finding() {
        let text = render_text(&[sample()]);
        assert_eq!(text, "a.c:3: error: division by zero [zero_division]\n");
    }

    #[test]
    fn catalog_renders_without_locations() {
        let text = render_text(&catalog());
        assert!(text.contains("error: division by zero [zero_division]"));
        assert!(!text.contains(".c:"));
    }

    #[test]
    fn json_round_trips() {
        let json = render_json(&[sample()]).unwrap();
        let back: Vec<Diagnostic> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id, CheckId::ZeroDivision);
    }
}
