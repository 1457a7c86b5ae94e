//! Scope tree and per-variable usage tracking.
//!
//! Built once per detector invocation that needs it, from a read-only
//! token list, and discarded afterwards. Declarations are recognized
//! lexically (type tokens, then a name, then `;`/`=`/`[`/`,`), never
//! through a symbol table; each later textual occurrence of a declared
//! name inside its scope is classified from the surrounding tokens. The
//! closest preceding declaration of a name wins; per-branch liveness is
//! deliberately not modeled.

use crate::tokens::{TokenKind, TokenList};

/// Builtin type keywords that can start a declaration.
const TYPE_KEYWORDS: &[&str] = &[
    "bool", "char", "double", "float", "int", "long", "short", "signed",
    "unsigned", "void", "wchar_t",
];

/// True for builtin scalar type names (used to tell heavy class types from
/// cheap primitives).
pub fn is_primitive_type(text: &str) -> bool {
    TYPE_KEYWORDS.contains(&text)
}

/// A lexical block bounded by a matching `{`/`}` pair, or the whole
/// translation unit for the root.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Index of the opening `{` (0 for the root).
    pub start: usize,
    /// Index of the closing `}` (one past the last token for the root or
    /// an unterminated scope).
    pub end: usize,
    pub depth: u32,
    pub parent: Option<usize>,
    /// True for struct/class/union/enum bodies, which declare members
    /// rather than block-local variables.
    pub is_record: bool,
}

/// Scopes in creation (token) order; index 0 is the translation unit.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn build(list: &TokenList) -> Self {
        let mut scopes = vec![Scope {
            start: 0,
            end: list.len(),
            depth: 0,
            parent: None,
            is_record: false,
        }];
        let mut stack: Vec<usize> = vec![0];
        for i in list.indices() {
            match list.text(i) {
                "{" => {
                    let parent = *stack.last().unwrap_or(&0);
                    scopes.push(Scope {
                        start: i,
                        end: list.len(),
                        depth: scopes[parent].depth + 1,
                        parent: Some(parent),
                        is_record: record_header_before(list, i),
                    });
                    stack.push(scopes.len() - 1);
                }
                "}" => {
                    // An unmatched close brace is skipped, never popping
                    // the root.
                    if stack.len() > 1 {
                        let id = stack.pop().unwrap();
                        scopes[id].end = i;
                    }
                }
                _ => {}
            }
        }
        ScopeTree { scopes }
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: usize) -> &Scope {
        &self.scopes[id]
    }

    pub fn contains(&self, id: usize, token: usize) -> bool {
        let s = &self.scopes[id];
        token >= s.start && token <= s.end
    }

    /// The deepest scope whose span covers `token`.
    pub fn innermost_at(&self, token: usize) -> usize {
        let mut best = 0;
        for (id, s) in self.scopes.iter().enumerate() {
            if token >= s.start && token <= s.end && s.depth >= self.scopes[best].depth {
                best = id;
            }
        }
        best
    }

    /// Nearest scope covering both arguments.
    pub fn common_ancestor(&self, a: usize, b: usize) -> usize {
        let (mut a, mut b) = (a, b);
        while self.scopes[a].depth > self.scopes[b].depth {
            a = self.scopes[a].parent.unwrap_or(0);
        }
        while self.scopes[b].depth > self.scopes[a].depth {
            b = self.scopes[b].parent.unwrap_or(0);
        }
        while a != b {
            a = self.scopes[a].parent.unwrap_or(0);
            b = self.scopes[b].parent.unwrap_or(0);
        }
        a
    }

    /// True when `inner` is strictly nested inside `outer`.
    pub fn is_strictly_inside(&self, inner: usize, outer: usize) -> bool {
        let mut cur = self.scopes[inner].parent;
        while let Some(id) = cur {
            if id == outer {
                return true;
            }
            cur = self.scopes[id].parent;
        }
        false
    }
}

/// Look back from a `{` for a struct/class/union/enum header, stopping at
/// any token that ends the previous statement.
pub(crate) fn record_header_before(list: &TokenList, brace: usize) -> bool {
    let mut i = brace;
    for _ in 0..8 {
        if i == 0 {
            return false;
        }
        i -= 1;
        match list.text(i) {
            "struct" | "class" | "union" | "enum" => return true,
            ";" | ")" | "}" | "{" | "=" => return false,
            _ => {}
        }
    }
    false
}

/// How one occurrence of a variable's name is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Read,
    Write,
    AddressTaken,
    Deref,
}

#[derive(Debug, Clone, Copy)]
pub struct Occurrence {
    pub token: usize,
    pub kind: UsageKind,
}

/// One declared variable and every classified occurrence of its name up to
/// the end of its declaring scope.
#[derive(Debug, Clone)]
pub struct VariableUsage {
    pub name: String,
    /// The name token in the declaration.
    pub decl_token: usize,
    /// First type token text (`unsigned`, `char`, a class name, ...).
    pub type_name: String,
    pub is_pointer: bool,
    pub is_array: bool,
    pub is_static: bool,
    /// Declared inside a `for (...)` header, where the scope is already
    /// as tight as the language allows.
    pub in_for_header: bool,
    /// Declaring scope, as an index into the tree.
    pub scope: usize,
    pub occurrences: Vec<Occurrence>,
}

/// Scope tree plus usage records for every recognized local declaration.
#[derive(Debug)]
pub struct UsageIndex {
    pub scopes: ScopeTree,
    pub variables: Vec<VariableUsage>,
}

impl UsageIndex {
    pub fn build(list: &TokenList) -> Self {
        let scopes = ScopeTree::build(list);
        let mut variables = collect_declarations(list, &scopes);
        classify_occurrences(list, &scopes, &mut variables);
        UsageIndex { scopes, variables }
    }
}

/// True when the operator at `op` is unary (no value-yielding token on its
/// left).
pub(crate) fn is_unary_context(list: &TokenList, op: usize) -> bool {
    if op == 0 {
        return true;
    }
    match list.kind(op - 1) {
        Some(TokenKind::Identifier)
        | Some(TokenKind::Number)
        | Some(TokenKind::StringLit)
        | Some(TokenKind::CharLit)
        | Some(TokenKind::CloseBracket) => false,
        Some(TokenKind::Keyword) => matches!(list.text(op - 1), "return" | "case" | "sizeof"),
        _ => true,
    }
}

fn collect_declarations(list: &TokenList, scopes: &ScopeTree) -> Vec<VariableUsage> {
    let mut variables = Vec::new();
    // Innermost parenthesis context: None outside parens, Some(true) for a
    // for-statement header (where declarations are legal), Some(false) for
    // parameter lists and call arguments.
    let mut paren_stack: Vec<bool> = Vec::new();
    let mut i = 0;
    while i < list.len() {
        match list.text(i) {
            "(" => {
                let is_for = i > 0 && list.text(i - 1) == "for";
                paren_stack.push(is_for);
                i += 1;
                continue;
            }
            ")" => {
                paren_stack.pop();
                i += 1;
                continue;
            }
            _ => {}
        }
        if matches!(paren_stack.last(), Some(false)) {
            i += 1;
            continue;
        }
        let in_for = matches!(paren_stack.last(), Some(true));
        if let Some(end) = try_declaration(list, scopes, i, in_for, &mut variables) {
            i = end;
        } else {
            i += 1;
        }
    }
    variables
}

/// Try to read a declaration starting at `i`; returns the cursor after the
/// declared name(s) on success so the caller does not rescan the type.
fn try_declaration(
    list: &TokenList,
    scopes: &ScopeTree,
    start: usize,
    in_for_header: bool,
    out: &mut Vec<VariableUsage>,
) -> Option<usize> {
    let mut i = start;
    let mut is_static = false;
    while matches!(list.text(i), "static" | "const" | "register") {
        if list.text(i) == "static" {
            is_static = true;
        }
        i += 1;
    }
    let type_start = i;
    if TYPE_KEYWORDS.contains(&list.text(i)) {
        i += 1;
        while TYPE_KEYWORDS.contains(&list.text(i)) {
            i += 1;
        }
    } else if matches!(list.text(i), "struct" | "class" | "union") && list.is_name(i + 1) {
        i += 2;
        // `struct Foo {` is a definition, not a variable declaration.
        if list.text(i) == "{" {
            return None;
        }
    } else if list.is_name(i) {
        // Possible class-type declaration: `Foo x`, `std :: string s`.
        i += 1;
        while list.text(i) == "::" && list.is_name(i + 1) {
            i += 2;
        }
    } else {
        return None;
    }
    let type_name = list.text(type_start).to_string();
    if list.text(type_start) == "void" && list.text(i) != "*" {
        return None;
    }

    loop {
        let mut is_pointer = false;
        while matches!(list.text(i), "*" | "&") {
            is_pointer = list.text(i) == "*" || is_pointer;
            i += 1;
        }
        if !list.is_name(i) {
            return None;
        }
        let decl_token = i;
        i += 1;
        let mut is_array = false;
        match list.text(i) {
            ";" | "=" | "," => {}
            "[" => is_array = true,
            _ => return None,
        }
        out.push(VariableUsage {
            name: list.text(decl_token).to_string(),
            decl_token,
            type_name: type_name.clone(),
            is_pointer,
            is_array,
            is_static,
            in_for_header,
            scope: scopes.innermost_at(decl_token),
            occurrences: Vec::new(),
        });

        // Skip to the end of this declarator: past array brackets and any
        // initializer, up to `,` (more declarators) or `;`.
        loop {
            match list.text(i) {
                "," => {
                    i += 1;
                    break;
                }
                ";" | "" => return Some(i),
                "(" | "[" | "{" => match list.link(i) {
                    Some(close) => i = close + 1,
                    None => return Some(i),
                },
                _ => i += 1,
            }
        }
    }
}

fn classify_occurrences(list: &TokenList, scopes: &ScopeTree, variables: &mut Vec<VariableUsage>) {
    for t in list.indices() {
        if !list.is_name(t) {
            continue;
        }
        // Member accesses and qualified names are not uses of a local.
        if matches!(list.text(t.wrapping_sub(1)), "." | "->" | "::")
            || list.text(t + 1) == "::"
        {
            continue;
        }
        let name = list.text(t);
        // Closest preceding declaration whose scope covers this token.
        let var = variables
            .iter_mut()
            .filter(|v| {
                v.name == name && v.decl_token < t && scopes.contains(v.scope, t)
            })
            .max_by_key(|v| v.decl_token);
        let var = match var {
            Some(v) => v,
            None => continue,
        };
        let kind = classify_one(list, t, var.is_pointer);
        var.occurrences.push(Occurrence { token: t, kind });
    }
}

fn classify_one(list: &TokenList, t: usize, is_pointer: bool) -> UsageKind {
    if t > 0 {
        let prev = list.text(t - 1);
        if prev == "&" && is_unary_context(list, t - 1) {
            return UsageKind::AddressTaken;
        }
        if prev == "*" && is_unary_context(list, t - 1) {
            return UsageKind::Deref;
        }
        if prev == "++" || prev == "--" {
            return UsageKind::Write;
        }
    }
    match list.text(t + 1) {
        "->" => UsageKind::Deref,
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | ">>=" => {
            UsageKind::Write
        }
        "++" | "--" => UsageKind::Write,
        "[" if is_pointer => UsageKind::Deref,
        _ => UsageKind::Read,
    }
}
