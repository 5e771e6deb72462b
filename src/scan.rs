//! Line scanning and field splitting shared by every file format.

use crate::error::LineError;
use itertools::Itertools;
use std::ops::Index;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Splits text into `(line_number, raw_line)` pairs, numbered from 1.
///
/// `\r\n` counts as one line break; a lone `\r` or `\n` is a break of its own.
pub fn lines(text: &str) -> Lines<'_> {
    Lines {
        rest: Some(text.trim_start_matches(BYTE_ORDER_MARK)),
        number: 0,
    }
}

pub struct Lines<'a> {
    rest: Option<&'a str>,
    number: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        let line = match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(i) => {
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = Some(&rest[i + skip..]);
                &rest[..i]
            }
            None => {
                self.rest = None;
                rest
            }
        };
        self.number += 1;
        Some((self.number, line))
    }
}

/// Reduces a raw line to its data part, or `None` when nothing is left once
/// whitespace and comments are removed.
pub fn logical_line(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c.is_control());
    if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with("//") {
        return None;
    }

    let end = comment_start(trimmed).unwrap_or_else(|| trimmed.len());
    let line = trimmed[..end].trim_end_matches(|c: char| c.is_whitespace() || c.is_control());
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}

fn comment_start(line: &str) -> Option<usize> {
    match (line.find(';'), line.find("//")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// `[HIGH  airway]` -> `HIGH AIRWAY`
pub fn header_name(line: &str) -> Option<String> {
    if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
        Some(line[1..line.len() - 1].split_whitespace().join(" ").to_ascii_uppercase())
    } else {
        None
    }
}

/// The fields of one logical line.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    /// `:` separated, each field trimmed.
    pub fn colon(line: &'a str) -> Self {
        Fields {
            fields: line.split(':').map(str::trim).collect(),
        }
    }

    /// Runs of whitespace separate fields.
    pub fn whitespace(line: &'a str) -> Self {
        Fields {
            fields: line.split_whitespace().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn require(self, expected: usize) -> Result<Self, LineError> {
        if self.fields.len() < expected {
            Err(LineError::FieldCount {
                expected,
                actual: self.fields.len(),
            })
        } else {
            Ok(self)
        }
    }

    pub fn get(&self, i: usize) -> Option<&'a str> {
        self.fields.get(i).cloned()
    }

    /// Present, non-empty and not the `-` placeholder.
    pub fn optional(&self, i: usize) -> Option<&'a str> {
        self.get(i).filter(|f| !f.is_empty() && *f != "-")
    }

    pub fn slice(&self, from: usize, to: usize) -> &[&'a str] {
        let to = to.min(self.fields.len());
        &self.fields[from.min(to)..to]
    }

    /// Everything from `from` on, joined back with `sep`.
    pub fn rest(&self, from: usize, sep: &str) -> String {
        self.slice(from, self.fields.len()).iter().join(sep)
    }
}

impl<'a> Index<usize> for Fields<'a> {
    type Output = &'a str;

    fn index(&self, i: usize) -> &Self::Output {
        &self.fields[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn numbers_lines_from_one() {
        let lines: Vec<_> = lines("a\nb\r\nc\rd").collect();
        assert_eq!(lines, vec![(1, "a"), (2, "b"), (3, "c"), (4, "d")]);
    }

    #[test]
    fn consecutive_breaks_yield_empty_lines() {
        let lines: Vec<_> = lines("a\n\n\nb\n").collect();
        assert_eq!(lines, vec![(1, "a"), (2, ""), (3, ""), (4, "b"), (5, "")]);
    }

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(lines("\u{feff}[INFO]").next(), Some((1, "[INFO]")));
    }

    #[test]
    fn whole_line_comments_are_dropped() {
        assert_eq!(logical_line("; a comment"), None);
        assert_eq!(logical_line("   ;indented"), None);
        assert_eq!(logical_line("// slashes"), None);
        assert_eq!(logical_line(" \t "), None);
    }

    #[test]
    fn trailing_comments_are_cut() {
        assert_eq!(
            logical_line("SANAD S031.23.11.000 E151.24.44.640 ;trailing note"),
            Some("SANAD S031.23.11.000 E151.24.44.640")
        );
        assert_eq!(logical_line("A:B:C // why\t"), Some("A:B:C"));
        assert_eq!(logical_line("  keep me  \r"), Some("keep me"));
    }

    #[rstest]
    #[case("[high  airway]", "HIGH AIRWAY")]
    #[case("[INFO]", "INFO")]
    #[case("[ ARTCC low ]", "ARTCC LOW")]
    fn normalizes_headers(#[case] line: &str, #[case] name: &str) {
        assert_eq!(header_name(line).as_deref(), Some(name));
    }

    #[test]
    fn data_lines_are_not_headers() {
        assert_eq!(header_name("SANAD S031.23.11.000 E151.24.44.640"), None);
        assert_eq!(header_name("["), None);
    }

    #[test]
    fn colon_fields_are_trimmed() {
        let fields = Fields::colon("EDDM_TWR: Muenchen Tower :118.700");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1], "Muenchen Tower");
        assert_eq!(fields.get(3), None);
    }

    #[test]
    fn require_reports_expected_and_actual() {
        let err = Fields::colon("a:b:c:d:e").require(7).unwrap_err();
        assert_eq!(
            err,
            LineError::FieldCount {
                expected: 7,
                actual: 5
            }
        );
    }

    #[test]
    fn optional_skips_placeholders() {
        let fields = Fields::colon("a::-:d");
        assert_eq!(fields.optional(1), None);
        assert_eq!(fields.optional(2), None);
        assert_eq!(fields.optional(3), Some("d"));
        assert_eq!(fields.rest(1, ":"), ":-:d");
    }
}
