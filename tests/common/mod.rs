//! Shared fixture support for integration tests.
//!
//! Fixtures are written one-token-per-whitespace, the shape the external
//! tokenizer hands the engine, so building a list is just a split.

use tokencheck::TokenList;

pub fn lex(file: &str, source: &str) -> TokenList {
    let mut list = TokenList::new(file);
    for (idx, line) in source.lines().enumerate() {
        for word in line.split_whitespace() {
            list.push(word, idx as u32 + 1);
        }
    }
    list.link_brackets();
    list
}
