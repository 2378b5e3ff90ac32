//! Small text helpers shared by the dialect parsers.

/// Split on `\n`, `\r\n` or a bare `\r`.
///
/// Behaves like normalizing every terminator to `\n` and then splitting,
/// without allocating a normalized copy.
pub fn split_lines(content: &str) -> Lines<'_> {
    Lines { rest: Some(content) }
}

pub struct Lines<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        match rest.find(['\r', '\n']) {
            Some(i) => {
                let line = &rest[..i];
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = Some(&rest[i + skip..]);
                Some(line)
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

/// Leading integer of a cell, the way spreadsheet exports write day counts
/// ("400", " 400 days", "400.5"). `None` when no digits lead.
pub fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturates instead of failing on runs too long for i64.
    let value = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    Some(if negative { -value } else { value })
}

/// First `width` characters of `s`.
pub fn truncate_chars(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}
