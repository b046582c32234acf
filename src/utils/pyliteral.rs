// src/utils/pyliteral.rs

//! Rewrites Python literal text into JSON.
//!
//! Older scrape files hold one `str(dict)` per line, e.g.
//! `{'Show': {'ep_total': 12, 'isExplicit': True, 'recent_eps': [('2023-01-10', '00:30:00', 5)]}}`.
//! This converts quoting, escapes, `True`/`False`/`None` and tuples so the
//! result can go through `serde_json`. It does not validate structure; a
//! malformed literal yields malformed JSON and fails downstream.

use std::iter::Peekable;
use std::str::Chars;

/// Convert a Python literal to JSON text, or `None` on an unterminated string
/// or bad escape.
pub fn to_json(literal: &str) -> Option<String> {
    let mut out = String::with_capacity(literal.len() + 16);
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let text = read_string(&mut chars, c)?;
                out.push_str(&serde_json::to_string(&text).ok()?);
            }
            '(' => out.push('['),
            ')' => out.push(']'),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    other => other,
                });
            }
            other => out.push(other),
        }
    }

    Some(out)
}

/// Read the body of a quoted string whose opening quote was consumed.
fn read_string(chars: &mut Peekable<Chars<'_>>, quote: char) -> Option<String> {
    let mut text = String::new();
    loop {
        match chars.next()? {
            c if c == quote => return Some(text),
            '\\' => match chars.next()? {
                'n' => text.push('\n'),
                'r' => text.push('\r'),
                't' => text.push('\t'),
                '0' => text.push('\0'),
                'x' => text.push(read_hex(chars, 2)?),
                'u' => text.push(read_hex(chars, 4)?),
                'U' => text.push(read_hex(chars, 8)?),
                other => text.push(other),
            },
            c => text.push(c),
        }
    }
}

fn read_hex(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Option<char> {
    let hex: String = (0..digits).map(|_| chars.next()).collect::<Option<_>>()?;
    let code = u32::from_str_radix(&hex, 16).ok()?;
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn parse(literal: &str) -> Value {
        serde_json::from_str(&to_json(literal).unwrap()).unwrap()
    }

    #[test]
    fn test_dict_with_keywords_and_tuples() {
        let value = parse(
            "{'Show': {'ep_total': 12, 'isExplicit': True, 'chan_desc': None, \
             'recent_eps': [('2023-01-10', '00:30:00', 5)]}}",
        );
        assert_eq!(
            value,
            json!({"Show": {
                "ep_total": 12,
                "isExplicit": true,
                "chan_desc": null,
                "recent_eps": [["2023-01-10", "00:30:00", 5]]
            }})
        );
    }

    #[test]
    fn test_escapes_and_mixed_quotes() {
        let value = parse(r#"{"Bob's Show": {'author': 'A\xa0B', 'note': 'say \'hi\'\n'}}"#);
        assert_eq!(
            value,
            json!({"Bob's Show": {"author": "A\u{a0}B", "note": "say 'hi'\n"}})
        );
    }

    #[test]
    fn test_keywords_inside_strings_untouched() {
        let value = parse("{'True Crime Daily': {'title': 'None of the above'}}");
        assert_eq!(
            value,
            json!({"True Crime Daily": {"title": "None of the above"}})
        );
    }

    #[test]
    fn test_json_passes_through() {
        let value = parse(r#"{"Show": {"ep_total": 3, "links": ["http://x.com"]}}"#);
        assert_eq!(value, json!({"Show": {"ep_total": 3, "links": ["http://x.com"]}}));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(to_json("{'Show': {'author': 'oops}}").is_none());
    }
}
