//! Capture sequence passed to route handlers

use std::ops::Deref;

/// Substrings matched by a pattern's capture groups, in left-to-right order.
///
/// Group 0 (the whole match) is never included. A group that did not take
/// part in the match (for example the optional group in `/a(/b)?` matched
/// against `/a`) is represented by an empty string, so `len()` always equals
/// the number of capture groups in the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(Vec<String>);

impl Captures {
    pub(crate) fn from_regex(caps: &regex::Captures<'_>) -> Self {
        Self(
            caps.iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Capture `n` using 1-based numbering, as in `$1`
    pub fn group(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.0.get(i))
            .map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Substitute `$n`, `${n}` and `$$` in `template`.
    ///
    /// Groups are numbered from 1. References to groups that do not exist
    /// expand to nothing; a `$` not followed by a digit, `{` or `$` is kept
    /// as is.
    pub fn expand(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
                continue;
            }

            if let Some(inner) = after.strip_prefix('{') {
                if let Some(close) = inner.find('}') {
                    if let Ok(n) = inner[..close].parse::<usize>() {
                        out.push_str(self.group(n).unwrap_or_default());
                        rest = &inner[close + 1..];
                        continue;
                    }
                }
                out.push('$');
                rest = after;
                continue;
            }

            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                out.push('$');
                rest = after;
                continue;
            }
            let n = after[..digits].parse::<usize>().unwrap_or(0);
            out.push_str(self.group(n).unwrap_or_default());
            rest = &after[digits..];
        }

        out.push_str(rest);
        out
    }
}

impl Deref for Captures {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Captures {
    fn from(groups: Vec<String>) -> Self {
        Self(groups)
    }
}

impl IntoIterator for Captures {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
