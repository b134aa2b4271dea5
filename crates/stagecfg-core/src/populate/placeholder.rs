//! Placeholder tokens embedded in string values
//!
//! `${name}` refers to a variable and `$${name}` to a template. Names are
//! ASCII letters, digits, `_`, `.` and `-`. There is no escape syntax; text
//! that does not form a complete token is left as written.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(\$)?\{([A-Za-z0-9_.\-]+)\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Variable,
    Template,
}

/// One placeholder occurrence inside a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub name: &'a str,
    pub span: Range<usize>,
}

/// Find every placeholder in `text`, left to right.
pub(crate) fn scan(text: &str) -> Vec<Token<'_>> {
    TOKEN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str();
            let kind = if caps.get(1).is_some() {
                TokenKind::Template
            } else {
                TokenKind::Variable
            };
            Some(Token {
                kind,
                name,
                span: whole.range(),
            })
        })
        .collect()
}

/// Whether `text` contains at least one placeholder.
pub fn contains_placeholder(text: &str) -> bool {
    TOKEN.is_match(text)
}
