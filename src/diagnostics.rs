//! Diagnostic identifiers, severities, messages, and the static catalog.

use serde::{Deserialize, Serialize};

use crate::tokens::TokenList;

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Likely undefined behavior or a definite bug.
    Error,
    /// Suspicious construct that is probably unintended.
    Warning,
    /// Coding-style finding; gated by the style toggle.
    Style,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Style => write!(f, "style"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "style" => Ok(Severity::Style),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Stable identifiers for every finding the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    CStyleCast,
    RedundantDeleteNullCheck,
    RedundantRemoveNullCheck,
    DangerousStrtolBase,
    SprintfOverlappingData,
    IfNoAction,
    ConditionAlwaysTrue,
    ConditionAlwaysFalse,
    UnsignedDivision,
    UnsignedDivisionSuspected,
    UnusedStructMember,
    PassedByValue,
    NoEffectStatement,
    CharArrayIndex,
    CharBitOp,
    VariableScope,
    StrPlusChar,
    ReturnLocalAddress,
    NullPointerDeref,
    ZeroDivision,
}

impl CheckId {
    /// Every identifier, in catalog order.
    pub const ALL: &'static [CheckId] = &[
        CheckId::CStyleCast,
        CheckId::RedundantDeleteNullCheck,
        CheckId::RedundantRemoveNullCheck,
        CheckId::DangerousStrtolBase,
        CheckId::SprintfOverlappingData,
        CheckId::IfNoAction,
        CheckId::ConditionAlwaysTrue,
        CheckId::ConditionAlwaysFalse,
        CheckId::UnsignedDivision,
        CheckId::UnsignedDivisionSuspected,
        CheckId::UnusedStructMember,
        CheckId::PassedByValue,
        CheckId::NoEffectStatement,
        CheckId::CharArrayIndex,
        CheckId::CharBitOp,
        CheckId::VariableScope,
        CheckId::StrPlusChar,
        CheckId::ReturnLocalAddress,
        CheckId::NullPointerDeref,
        CheckId::ZeroDivision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckId::CStyleCast => "c_style_cast",
            CheckId::RedundantDeleteNullCheck => "redundant_delete_null_check",
            CheckId::RedundantRemoveNullCheck => "redundant_remove_null_check",
            CheckId::DangerousStrtolBase => "dangerous_strtol_base",
            CheckId::SprintfOverlappingData => "sprintf_overlapping_data",
            CheckId::IfNoAction => "if_no_action",
            CheckId::ConditionAlwaysTrue => "condition_always_true",
            CheckId::ConditionAlwaysFalse => "condition_always_false",
            CheckId::UnsignedDivision => "unsigned_division",
            CheckId::UnsignedDivisionSuspected => "unsigned_division_suspected",
            CheckId::UnusedStructMember => "unused_struct_member",
            CheckId::PassedByValue => "passed_by_value",
            CheckId::NoEffectStatement => "no_effect_statement",
            CheckId::CharArrayIndex => "char_array_index",
            CheckId::CharBitOp => "char_bit_op",
            CheckId::VariableScope => "variable_scope",
            CheckId::StrPlusChar => "str_plus_char",
            CheckId::ReturnLocalAddress => "return_local_address",
            CheckId::NullPointerDeref => "null_pointer_deref",
            CheckId::ZeroDivision => "zero_division",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        CheckId::ALL.iter().copied().find(|id| id.as_str() == s)
    }

    /// Severity is a fixed property of the identifier, set by the
    /// detector's design, not per finding.
    pub fn severity(&self) -> Severity {
        match self {
            CheckId::DangerousStrtolBase
            | CheckId::SprintfOverlappingData
            | CheckId::UnsignedDivision
            | CheckId::StrPlusChar
            | CheckId::ReturnLocalAddress
            | CheckId::NullPointerDeref
            | CheckId::ZeroDivision => Severity::Error,
            CheckId::UnsignedDivisionSuspected
            | CheckId::CharArrayIndex
            | CheckId::CharBitOp => Severity::Warning,
            CheckId::CStyleCast
            | CheckId::RedundantDeleteNullCheck
            | CheckId::RedundantRemoveNullCheck
            | CheckId::IfNoAction
            | CheckId::ConditionAlwaysTrue
            | CheckId::ConditionAlwaysFalse
            | CheckId::UnusedStructMember
            | CheckId::PassedByValue
            | CheckId::NoEffectStatement
            | CheckId::VariableScope => Severity::Style,
        }
    }

    /// Message template with `{}` placeholders left unsubstituted.
    pub fn template(&self) -> &'static str {
        match self {
            CheckId::CStyleCast => "C-style cast to {} used",
            CheckId::RedundantDeleteNullCheck => {
                "redundant null check: it is safe to delete a null pointer"
            }
            CheckId::RedundantRemoveNullCheck => {
                "redundant find before remove: remove does nothing when the element is absent"
            }
            CheckId::DangerousStrtolBase => {
                "dangerous usage of {}: the radix {} is outside the valid range"
            }
            CheckId::SprintfOverlappingData => {
                "undefined behavior: {} is used as both destination and source in {}"
            }
            CheckId::IfNoAction => "the if statement has no action: 'if (condition);'",
            CheckId::ConditionAlwaysTrue => "condition is always true",
            CheckId::ConditionAlwaysFalse => "condition is always false",
            CheckId::UnsignedDivision => {
                "unsigned division: dividing {} by a negative value gives a wrong result"
            }
            CheckId::UnsignedDivisionSuspected => {
                "suspected unsigned division: {} is unsigned but {} may be negative"
            }
            CheckId::UnusedStructMember => "struct member '{}::{}' is never used",
            CheckId::PassedByValue => {
                "parameter '{}' is passed by value, it could be passed by const reference"
            }
            CheckId::NoEffectStatement => "statement has no effect: a lone {}",
            CheckId::CharArrayIndex => {
                "char variable '{}' used as array index: sign extension may give a negative index"
            }
            CheckId::CharBitOp => {
                "char variable '{}' used in bit operation: sign extension may set unexpected bits"
            }
            CheckId::VariableScope => "the scope of the variable '{}' can be reduced",
            CheckId::StrPlusChar => {
                "adding {} to a string literal shifts the pointer, it does not append"
            }
            CheckId::ReturnLocalAddress => "returning the address of local variable '{}'",
            CheckId::NullPointerDeref => "possible null pointer dereference of '{}'",
            CheckId::ZeroDivision => "division by zero",
        }
    }
}

impl std::fmt::Display for CheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source position of a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

/// A single finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: CheckId,
    pub severity: Severity,
    pub message: String,
    /// Absent only for catalog enumeration.
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Build a finding located at a triggering token.
    pub fn at(id: CheckId, list: &TokenList, token: usize, message: String) -> Self {
        Diagnostic {
            id,
            severity: id.severity(),
            message,
            location: Some(Location {
                file: list.file().to_string(),
                line: list.line(token),
            }),
        }
    }
}

/// Receives diagnostics as they are produced. The runner forwards findings
/// here in sorted order; implementations must not assume deduplication.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// The full catalog of findable diagnostics: every identifier with its
/// severity and raw message template, location absent. Used to document
/// the engine without running any analysis.
pub fn catalog() -> Vec<Diagnostic> {
    CheckId::ALL
        .iter()
        .map(|&id| Diagnostic {
            id,
            severity: id.severity(),
            message: id.template().to_string(),
            location: None,
        })
        .collect()
}
