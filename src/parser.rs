//! # Parser Module
//!
//! Turns ChordPro source text into a [`ParsedSong`].
//!
//! ## Algorithm
//! A single forward pass over the source lines. Each line is classified by
//! the lexer and folded into a [`SongBuilder`], which holds the finished
//! sections, the metadata and the section currently being filled:
//!
//! - **Blank line**: appended as a spacer only when the open section already
//!   has a line; otherwise dropped.
//! - **Section start** (`{start_of_verse}`, `{soc: Chorus 2}`, ...): flush the
//!   open section and open a new one.
//! - **Section end** (`{eov}`, `{end_of_chorus}`, ...): flush the open section.
//! - **Comment** (`{comment: Verse 1}`, `{c: Solo}`): flush, then open a
//!   section whose type is guessed from the comment and labelled with it.
//! - **Metadata** (`{title: ...}`, `{t: ...}`, `{key: G}`, ...): stored under the
//!   canonical key; a repeated key keeps the last value.
//! - **Unknown directive**: stored under its own name.
//! - **Content**: split into chord/lyric segments and appended to the open
//!   section, opening an unlabelled `unknown` section if there is none.
//!
//! Flushing keeps a section only if it received at least one line. The same
//! flush runs once at the end of input.
//!
//! Parsing never fails: anything that is not a well-formed directive is lyric
//! text.
//!
//! ## Example
//! ```rust
//! use chordpro::{parse, SectionType};
//!
//! let song = parse("{title: Amazing Grace}\n{sov}\n[G]Amazing [C]grace\n{eov}");
//!
//! assert_eq!(song.metadata["title"], "Amazing Grace");
//! assert_eq!(song.sections.len(), 1);
//! assert_eq!(song.sections[0].section_type, SectionType::Verse);
//! assert_eq!(song.sections[0].label, "Verse");
//! ```

use crate::ast::*;
use crate::lexer::{classify_line, Lexer, SourceLine, Token};
use crate::lexicon::{classify_directive, DirectiveKind};
use tracing::debug;

/// Accumulator threaded through the line fold
#[derive(Debug, Default)]
pub struct SongBuilder {
    metadata: Metadata,
    sections: Vec<SongSection>,
    current: Option<SongSection>,
}

impl SongBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the open section, keeping it only if it has lines
    fn flush(&mut self) {
        if let Some(section) = self.current.take() {
            if section.lines.is_empty() {
                debug!(
                    section_type = ?section.section_type,
                    label = %section.label,
                    "discarding empty section"
                );
            } else {
                self.sections.push(section);
            }
        }
    }

    fn open(&mut self, section_type: SectionType, label: &str) {
        self.flush();
        self.current = Some(SongSection::new(section_type, label));
    }

    /// Fold one source line into the builder
    pub fn step(mut self, line: SourceLine<'_>) -> Self {
        match line {
            SourceLine::Blank => {
                if let Some(section) = self.current.as_mut() {
                    if !section.lines.is_empty() {
                        section.lines.push(SongLine::blank());
                    }
                }
            }
            SourceLine::Directive { name, value } => self.directive(&name, value),
            SourceLine::Content(text) => {
                self.current
                    .get_or_insert_with(|| SongSection::new(SectionType::Unknown, ""))
                    .lines
                    .push(parse_line(text));
            }
        }
        self
    }

    fn directive(&mut self, name: &str, value: &str) {
        match classify_directive(name) {
            DirectiveKind::SectionStart(section_type) => {
                let label = if value.is_empty() {
                    section_type.default_label()
                } else {
                    value
                };
                self.open(section_type, label);
            }
            DirectiveKind::SectionEnd => self.flush(),
            DirectiveKind::Comment => self.open(SectionType::guess_from_label(value), value),
            DirectiveKind::Metadata(key) => {
                self.metadata.insert(key.to_string(), value.to_string());
            }
            DirectiveKind::Unknown => {
                debug!(directive = %name, "storing unknown directive as metadata");
                self.metadata.insert(name.to_string(), value.to_string());
            }
        }
    }

    /// Flush the open section and return the song
    pub fn finish(mut self) -> ParsedSong {
        self.flush();
        ParsedSong {
            metadata: self.metadata,
            sections: self.sections,
        }
    }
}

/// Parse ChordPro source into a song tree.
///
/// Lines are split on `\n`; a trailing `\r` is removed with the rest of the
/// surrounding whitespace.
pub fn parse(source: &str) -> ParsedSong {
    source
        .split('\n')
        .map(classify_line)
        .fold(SongBuilder::new(), SongBuilder::step)
        .finish()
}

/// Split one chord/lyric line into segments.
///
/// Text before the first chord becomes a segment without a chord; every chord
/// opens a segment holding the text up to the next chord. A line without
/// chords is a single chordless segment holding the whole line.
///
/// # Example
/// ```rust
/// use chordpro::{parse_line, LineSegment};
///
/// let line = parse_line("Oh [G]Amazing grace");
/// assert_eq!(
///     line.segments,
///     vec![LineSegment::new(None, "Oh "), LineSegment::new(Some("G"), "Amazing grace")]
/// );
/// ```
pub fn parse_line(text: &str) -> SongLine {
    let mut segments: Vec<LineSegment> = Vec::new();

    for token in Lexer::new(text) {
        match token {
            Token::Chord(chord) => segments.push(LineSegment::new(Some(chord), "")),
            Token::Text(run) => match segments.last_mut() {
                Some(last) => last.lyrics.push_str(run),
                None => segments.push(LineSegment::new(None, run)),
            },
        }
    }

    if segments.is_empty() {
        segments.push(LineSegment::new(None, text));
    }

    SongLine { segments }
}
