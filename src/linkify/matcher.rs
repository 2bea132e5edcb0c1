//! Token matching.
//!
//! A match must sit on ASCII word boundaries: the characters immediately
//! before and after it (if any) may not be ASCII letters, digits or `_`.
//! Anything else, including CJK text, counts as a boundary, so
//! `作品RJ123456です` yields `RJ123456`.

use regex::Regex;

/// One token occurrence; `start..end` is a byte range into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    pub token: &'t str,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct TokenMatcher {
    regex: Regex,
}

impl TokenMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// All matches in `text`, left to right. Every call starts a fresh scan.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            text,
            inner: self.regex.find_iter(text),
        }
    }

    /// Whether `text` contains at least one match.
    pub fn contains_token(&self, text: &str) -> bool {
        self.find_iter(text).next().is_some()
    }
}

impl Default for TokenMatcher {
    fn default() -> Self {
        Self {
            regex: Regex::new("RJ[0-9]{6,}").expect("built-in pattern is valid"),
        }
    }
}

/// Iterator returned by [`TokenMatcher::find_iter`].
pub struct Matches<'r, 't> {
    text: &'t str,
    inner: regex::Matches<'r, 't>,
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        for m in self.inner.by_ref() {
            if m.is_empty() {
                continue;
            }
            if is_word_boundary(self.text, m.start(), m.end()) {
                return Some(Match {
                    token: m.as_str(),
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        None
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}
