//! # Lexer
//!
//! Two small scanners used by the parser:
//!
//! - [`classify_line`] decides whether a source line is blank, a directive
//!   (`{name}` / `{name: value}`) or chord/lyric content.
//! - [`Lexer`] splits a content line into text runs and `[chord]` tokens.
//!
//! ## Chord tokens
//! A `[` starts a chord token that ends at the next `]`. The contents are taken
//! verbatim and must be non-empty and free of `[`. Anything that does not form
//! a token (an unclosed `[`, an empty `[]`, the first `[` of `[[G]`) is plain text.
//!
//! ## Example
//! ```rust
//! use chordpro::lexer::{Lexer, Token};
//!
//! let tokens: Vec<_> = Lexer::new("Oh [G]grace").collect();
//! assert_eq!(tokens, vec![Token::Text("Oh "), Token::Chord("G"), Token::Text("grace")]);
//! ```

/// A run of a content line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Lyric text, exactly as written
    Text(&'a str),
    /// Contents of a `[...]` chord marker, without the brackets
    Chord(&'a str),
}

/// Scanner over one content line
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }
}

/// Byte length of the chord token at the start of `s`, brackets included.
fn chord_token_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        match b {
            b']' if i > 1 => return Some(i + 1),
            b']' | b'[' => return None,
            _ => {}
        }
    }
    None
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.input[self.position..];
        if rest.is_empty() {
            return None;
        }

        if let Some(len) = chord_token_len(rest) {
            self.position += len;
            return Some(Token::Chord(&rest[1..len - 1]));
        }

        // Text runs up to the next '[' that really opens a chord.
        // Brackets are ASCII, so every '[' offset is a char boundary.
        let end = rest
            .match_indices('[')
            .map(|(i, _)| i)
            .find(|&i| i > 0 && chord_token_len(&rest[i..]).is_some())
            .unwrap_or(rest.len());

        self.position += end;
        Some(Token::Text(&rest[..end]))
    }
}

/// Classification of one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine<'a> {
    /// Empty or whitespace only
    Blank,
    /// `{name}` or `{name: value}`; `name` is lower-cased, `value` trimmed
    Directive { name: String, value: &'a str },
    /// Chord/lyric text, trimmed
    Content(&'a str),
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split a trimmed line into directive name and value.
///
/// The whole line must be `{` + word characters + optional `:value` + `}`.
/// A colon must be followed by at least one character before the closing
/// brace, so `{title:}` is not a directive.
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix('{')?.strip_suffix('}')?;
    let name_end = inner.find(|c: char| !is_word_char(c)).unwrap_or(inner.len());
    if name_end == 0 {
        return None;
    }

    let (name, rest) = inner.split_at(name_end);
    if rest.is_empty() {
        return Some((name, ""));
    }

    let value = rest.strip_prefix(':')?;
    if value.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

/// Classify a raw source line (without its line terminator).
pub fn classify_line(raw: &str) -> SourceLine<'_> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return SourceLine::Blank;
    }

    match split_directive(trimmed) {
        Some((name, value)) => SourceLine::Directive {
            name: name.to_ascii_lowercase(),
            value,
        },
        None => SourceLine::Content(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<Token<'_>> {
        Lexer::new(line).collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(tokens("Just some lyrics"), vec![Token::Text("Just some lyrics")]);
        assert_eq!(tokens(""), vec![]);
    }

    #[test]
    fn test_chords_and_text() {
        assert_eq!(
            tokens("[G]Amazing [G7]grace"),
            vec![
                Token::Chord("G"),
                Token::Text("Amazing "),
                Token::Chord("G7"),
                Token::Text("grace"),
            ]
        );
    }

    #[test]
    fn test_adjacent_chords() {
        assert_eq!(
            tokens("[Am][C]"),
            vec![Token::Chord("Am"), Token::Chord("C")]
        );
    }

    #[test]
    fn test_chord_contents_verbatim() {
        assert_eq!(
            tokens("[F#m7b5/E] [N.C.]"),
            vec![
                Token::Chord("F#m7b5/E"),
                Token::Text(" "),
                Token::Chord("N.C."),
            ]
        );
    }

    #[test]
    fn test_unclosed_bracket_is_text() {
        assert_eq!(tokens("wait [G"), vec![Token::Text("wait [G")]);
        assert_eq!(
            tokens("[C]wait [G"),
            vec![Token::Chord("C"), Token::Text("wait [G")]
        );
    }

    #[test]
    fn test_empty_brackets_are_text() {
        assert_eq!(tokens("a [] b"), vec![Token::Text("a [] b")]);
        assert_eq!(tokens("[]"), vec![Token::Text("[]")]);
    }

    #[test]
    fn test_no_nested_brackets() {
        assert_eq!(
            tokens("[a[G]x"),
            vec![Token::Text("[a"), Token::Chord("G"), Token::Text("x")]
        );
        assert_eq!(tokens("[[G]"), vec![Token::Text("["), Token::Chord("G")]);
    }

    #[test]
    fn test_stray_close_bracket_is_text() {
        assert_eq!(
            tokens("x] [D]y"),
            vec![Token::Text("x] "), Token::Chord("D"), Token::Text("y")]
        );
    }

    #[test]
    fn test_multibyte_lyrics() {
        assert_eq!(
            tokens("[E]Café [A]ñandú"),
            vec![
                Token::Chord("E"),
                Token::Text("Café "),
                Token::Chord("A"),
                Token::Text("ñandú"),
            ]
        );
    }

    #[test]
    fn test_classify_blank() {
        assert_eq!(classify_line(""), SourceLine::Blank);
        assert_eq!(classify_line("  \t\r"), SourceLine::Blank);
    }

    #[test]
    fn test_classify_directive_with_value() {
        assert_eq!(
            classify_line("  {Title:   Amazing Grace  }\r"),
            SourceLine::Directive {
                name: "title".to_string(),
                value: "Amazing Grace",
            }
        );
    }

    #[test]
    fn test_classify_directive_without_value() {
        assert_eq!(
            classify_line("{soc}"),
            SourceLine::Directive {
                name: "soc".to_string(),
                value: "",
            }
        );
    }

    #[test]
    fn test_classify_directive_value_keeps_inner_colons() {
        assert_eq!(
            classify_line("{comment: Chorus: x2}"),
            SourceLine::Directive {
                name: "comment".to_string(),
                value: "Chorus: x2",
            }
        );
    }

    #[test]
    fn test_classify_whitespace_only_value() {
        assert_eq!(
            classify_line("{title: }"),
            SourceLine::Directive {
                name: "title".to_string(),
                value: "",
            }
        );
    }

    #[test]
    fn test_classify_malformed_directives_as_content() {
        assert_eq!(classify_line("{title:}"), SourceLine::Content("{title:}"));
        assert_eq!(classify_line("{}"), SourceLine::Content("{}"));
        assert_eq!(classify_line("{two words}"), SourceLine::Content("{two words}"));
        assert_eq!(classify_line("{title: x"), SourceLine::Content("{title: x"));
        assert_eq!(classify_line("{-x}"), SourceLine::Content("{-x}"));
    }

    #[test]
    fn test_classify_content_is_trimmed() {
        assert_eq!(
            classify_line("  [G]Amazing grace  \r"),
            SourceLine::Content("[G]Amazing grace")
        );
    }
}
