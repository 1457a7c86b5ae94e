//! Token model for one translation unit.
//!
//! The external tokenizer feeds tokens through [`TokenList::push`]; the
//! analysis core only ever reads them. Tokens live in an index-addressed
//! arena, so neighbor and bracket-match traversal are O(1) array lookups
//! and "links" are plain indices with no ownership cycles.

use serde::{Deserialize, Serialize};

/// C/C++ keywords, used to separate identifiers from keywords at push time.
static KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
    "alignas", "alignof", "asm", "auto", "bool", "break", "case", "catch",
    "char", "class", "const", "const_cast", "continue", "default", "delete",
    "do", "double", "dynamic_cast", "else", "enum", "explicit", "extern",
    "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "operator", "private", "protected",
    "public", "register", "reinterpret_cast", "return", "short", "signed",
    "sizeof", "static", "static_cast", "struct", "switch", "template",
    "this", "throw", "true", "try", "typedef", "typeid", "typename", "union",
    "unsigned", "using", "virtual", "void", "volatile", "wchar_t", "while",
};

/// Lexical classification of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    /// A double-quoted string literal, text includes the quotes.
    StringLit,
    /// A single-quoted character literal, text includes the quotes.
    CharLit,
    Operator,
    OpenBracket,
    CloseBracket,
}

/// One lexical unit: text, classification, source line, and the index of
/// the matching bracket if this token is one half of a `()`/`[]`/`{}` pair.
#[derive(Debug, Clone)]
pub struct Token {
    text: String,
    kind: TokenKind,
    line: u32,
    link: Option<usize>,
}

impl Token {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Index of the matching bracket, if this is a linked bracket token.
    pub fn link(&self) -> Option<usize> {
        self.link
    }
}

fn classify(text: &str) -> TokenKind {
    let mut chars = text.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return TokenKind::Operator,
    };
    match first {
        '(' | '[' | '{' => TokenKind::OpenBracket,
        ')' | ']' | '}' => TokenKind::CloseBracket,
        '"' => TokenKind::StringLit,
        '\'' => TokenKind::CharLit,
        '0'..='9' => TokenKind::Number,
        c if c.is_ascii_alphabetic() || c == '_' => {
            if KEYWORDS.contains(text) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            }
        }
        _ => TokenKind::Operator,
    }
}

/// The token arena for one translation-unit variant (raw or simplified).
///
/// Owned by the tokenizer side of the boundary; detectors borrow it
/// read-only for the duration of one pass.
#[derive(Debug, Default)]
pub struct TokenList {
    file: String,
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            tokens: Vec::new(),
        }
    }

    /// File this translation unit came from.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Append one token. Classification is derived from the text; bracket
    /// links are established afterwards by [`TokenList::link_brackets`].
    pub fn push(&mut self, text: impl Into<String>, line: u32) -> usize {
        let text = text.into();
        let kind = classify(&text);
        self.tokens.push(Token {
            text,
            kind,
            line,
            link: None,
        });
        self.tokens.len() - 1
    }

    /// Pair up `()`, `[]` and `{}` tokens. Unmatched brackets are left
    /// unlinked; detectors treat unlinked brackets as regions to skip.
    pub fn link_brackets(&mut self) {
        let mut stack: Vec<usize> = Vec::new();
        for i in 0..self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::OpenBracket => stack.push(i),
                TokenKind::CloseBracket => {
                    let want = match self.tokens[i].text.as_str() {
                        ")" => "(",
                        "]" => "[",
                        _ => "{",
                    };
                    if let Some(&open) = stack.last() {
                        if self.tokens[open].text == want {
                            stack.pop();
                            self.tokens[open].link = Some(i);
                            self.tokens[i].link = Some(open);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Token text at `index`, or `""` past the end. Most detector patterns
    /// read through this so that lookahead never needs bounds checks.
    pub fn text(&self, index: usize) -> &str {
        self.tokens.get(index).map(|t| t.text.as_str()).unwrap_or("")
    }

    pub fn kind(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|t| t.kind)
    }

    pub fn line(&self, index: usize) -> u32 {
        self.tokens.get(index).map(|t| t.line).unwrap_or(0)
    }

    pub fn link(&self, index: usize) -> Option<usize> {
        self.tokens.get(index).and_then(|t| t.link)
    }

    /// True if the token is an identifier (a name, never a keyword).
    pub fn is_name(&self, index: usize) -> bool {
        self.kind(index) == Some(TokenKind::Identifier)
    }

    pub fn is_number(&self, index: usize) -> bool {
        self.kind(index) == Some(TokenKind::Number)
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        0..self.tokens.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::lex;

    #[test]
    fn classifies_token_kinds() {
        let list = lex("t.c", "int x = 42 ; f ( \"s\" , 'c' ) ;");
        assert_eq!(list.kind(0), Some(TokenKind::Keyword));
        assert_eq!(list.kind(1), Some(TokenKind::Identifier));
        assert_eq!(list.kind(2), Some(TokenKind::Operator));
        assert_eq!(list.kind(3), Some(TokenKind::Number));
        assert_eq!(list.kind(6), Some(TokenKind::OpenBracket));
        assert_eq!(list.kind(7), Some(TokenKind::StringLit));
        assert_eq!(list.kind(9), Some(TokenKind::CharLit));
    }

    #[test]
    fn links_nested_brackets() {
        let list = lex("t.c", "if ( a [ 0 ] ) { }");
        assert_eq!(list.link(1), Some(6)); // ( .. )
        assert_eq!(list.link(3), Some(5)); // [ .. ]
        assert_eq!(list.link(7), Some(8)); // { .. }
        assert_eq!(list.link(0), None);
    }

    #[test]
    fn unmatched_brackets_stay_unlinked() {
        let list = lex("t.c", "f ( a ; }");
        assert_eq!(list.link(1), None);
        assert_eq!(list.link(4), None);
    }

    #[test]
    fn text_past_end_is_empty() {
        let list = lex("t.c", "x");
        assert_eq!(list.text(0), "x");
        assert_eq!(list.text(99), "");
    }
}
