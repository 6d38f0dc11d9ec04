// src/parser/elfen/tokens.rs

//! Token stream for Elfen `.mes` files.
//!
//! Tokens are separated by whitespace and by the punctuation `#`, `"`, `{`,
//! `}` and `*`. Text between a pair of double quotes is one quoted token,
//! which readers never treat as data.

use crate::error::{parse_float, parse_int, Location, MeshImportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub line: usize,
    pub quoted: bool,
}

pub fn tokenize(content: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut word: Option<(usize, usize)> = None;
    let mut quote: Option<(usize, usize)> = None;

    for (offset, c) in content.char_indices() {
        if let Some((start, start_line)) = quote {
            if c == '"' {
                tokens.push(Token {
                    text: &content[start..offset],
                    line: start_line,
                    quoted: true,
                });
                quote = None;
            }
        } else if c.is_whitespace() || matches!(c, '#' | '"' | '{' | '}' | '*') {
            if let Some((start, start_line)) = word.take() {
                tokens.push(Token {
                    text: &content[start..offset],
                    line: start_line,
                    quoted: false,
                });
            }
            if c == '"' {
                quote = Some((offset + 1, line));
            }
        } else if word.is_none() {
            word = Some((offset, line));
        }

        if c == '\n' {
            line += 1;
        }
    }

    if let Some((start, start_line)) = word {
        tokens.push(Token {
            text: &content[start..],
            line: start_line,
            quoted: false,
        });
    }
    if let Some((start, start_line)) = quote {
        tokens.push(Token {
            text: &content[start..],
            line: start_line,
            quoted: true,
        });
    }

    tokens
}

/// Reads unquoted tokens in order.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(content: &'a str) -> Self {
        TokenCursor {
            tokens: tokenize(content),
            pos: 0,
        }
    }

    /// Next unquoted token with its location.
    pub fn next_token(&mut self) -> Option<(Token<'a>, Location)> {
        while let Some(&token) = self.tokens.get(self.pos) {
            let location = Location::Token {
                index: self.pos,
                line: token.line,
            };
            self.pos += 1;
            if !token.quoted {
                return Some((token, location));
            }
        }
        None
    }

    /// Next token as an integer. `section`, `expected` and `found` describe
    /// the record run being read, for the error raised at end of input.
    pub fn next_int<T: std::str::FromStr>(
        &mut self,
        what: &str,
        section: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(T, Location), MeshImportError> {
        let (token, location) = self.next_token().ok_or(MeshImportError::Truncated {
            section,
            expected,
            found,
        })?;
        Ok((parse_int(token.text, what, location)?, location))
    }

    pub fn next_float(
        &mut self,
        section: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<f64, MeshImportError> {
        let (token, location) = self.next_token().ok_or(MeshImportError::Truncated {
            section,
            expected,
            found,
        })?;
        parse_float(token.text, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(content: &str) -> Vec<(&str, bool)> {
        tokenize(content)
            .into_iter()
            .map(|token| (token.text, token.quoted))
            .collect()
    }

    #[test]
    fn test_punctuation_splits_tokens() {
        assert_eq!(
            texts("coordinates*2{1 0.5#x\n}"),
            vec![
                ("coordinates", false),
                ("2", false),
                ("1", false),
                ("0.5", false),
                ("x", false),
            ]
        );
    }

    #[test]
    fn test_quoted_text_is_one_token() {
        let tokens = tokenize("\"mesh of a plate\" {\n 3 }");
        assert_eq!(tokens[0].text, "mesh of a plate");
        assert!(tokens[0].quoted);
        assert_eq!(tokens[1].text, "3");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_cursor_skips_quoted_tokens() {
        let mut cursor = TokenCursor::new("\"12\" 7 \"unterminated 9");
        let (value, location): (u32, _) = cursor.next_int("value", "test", 1, 0).unwrap();
        assert_eq!(value, 7);
        assert_eq!(location, Location::Token { index: 1, line: 1 });
        assert!(cursor.next_token().is_none());
    }

    #[test]
    fn test_cursor_reports_truncation() {
        let mut cursor = TokenCursor::new("1.5");
        assert_eq!(cursor.next_float("coordinates", 2, 0).unwrap(), 1.5);
        assert!(matches!(
            cursor.next_float("coordinates", 2, 1),
            Err(MeshImportError::Truncated { section: "coordinates", expected: 2, found: 1 })
        ));
    }
}
