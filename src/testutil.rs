//! Minimal fixture tokenizer for tests.
//!
//! This is not a C preprocessor or lexer; production callers feed
//! [`TokenList`](crate::tokens::TokenList) through its push API from the
//! real tokenizer. The fixture splitter understands just enough (string
//! and character literals, multi-character operators, line counting) to
//! write readable detector tests.

use crate::tokens::TokenList;

/// Two-character operators the splitter keeps together.
const DIGRAPHS: &[&str] = &[
    "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "::",
];

/// Tokenize whitespace-insensitive C-like source into a linked token list.
pub fn lex(file: &str, source: &str) -> TokenList {
    let mut list = TokenList::new(file);
    for (line_idx, line) in source.lines().enumerate() {
        let line_no = line_idx as u32 + 1;
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            if c == '"' || c == '\'' {
                // Quoted literal, with backslash escapes.
                let mut text = String::from(c);
                let mut j = i + 1;
                while j < chars.len() {
                    text.push(chars[j]);
                    if chars[j] == '\\' && j + 1 < chars.len() {
                        text.push(chars[j + 1]);
                        j += 2;
                        continue;
                    }
                    if chars[j] == c {
                        break;
                    }
                    j += 1;
                }
                list.push(text, line_no);
                i = j + 1;
                continue;
            }
            if c.is_ascii_alphanumeric() || c == '_' {
                let mut j = i;
                while j < chars.len()
                    && (chars[j].is_ascii_alphanumeric()
                        || chars[j] == '_'
                        || (chars[j] == '.' && chars[i].is_ascii_digit()))
                {
                    j += 1;
                }
                let text: String = chars[i..j].iter().collect();
                list.push(text, line_no);
                i = j;
                continue;
            }
            if i + 1 < chars.len() {
                let pair: String = chars[i..i + 2].iter().collect();
                if DIGRAPHS.contains(&pair.as_str()) {
                    list.push(pair, line_no);
                    i += 2;
                    continue;
                }
            }
            list.push(c.to_string(), line_no);
            i += 1;
        }
    }
    list.link_brackets();
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_digraphs_and_literals() {
        let list = lex("t.c", "p -> x += \"a b\" + 'c' ;");
        let texts: Vec<&str> = list.indices().map(|i| list.text(i)).collect();
        assert_eq!(texts, vec!["p", "->", "x", "+=", "\"a b\"", "+", "'c'", ";"]);
    }

    #[test]
    fn counts_lines() {
        let list = lex("t.c", "a ;\nb ;");
        assert_eq!(list.line(0), 1);
        assert_eq!(list.line(2), 2);
    }
}
