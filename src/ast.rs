//! # Parsed Song Types
//!
//! This module defines the document tree produced by the parser and consumed
//! by the transposer, the emitter and any renderer.
//!
//! ## Type Hierarchy
//! ```text
//! ParsedSong
//!   ├── metadata: directive key → value
//!   └── Vec<SongSection>
//!         ├── type: SectionType (verse, chorus, bridge, tag, intro, outro, instrumental, unknown)
//!         ├── label: String
//!         └── Vec<SongLine>
//!               └── Vec<LineSegment>
//!                     ├── chord: Option<String>
//!                     └── lyrics: String
//! ```
//!
//! ## Key Concepts
//!
//! ### Segments
//! A segment pairs an optional chord with the lyric text that follows it up to
//! the next chord or the end of the line. Concatenating the `lyrics` of every
//! segment in a line gives back the source line with the `[chord]` markers
//! removed, character for character.
//!
//! ### Blank lines
//! A `SongLine` with no segments is a blank line kept inside a section for
//! spacing. It never carries text.
//!
//! ### Sections
//! Every section in a `ParsedSong` has at least one line. Sections that were
//! opened and closed without content are dropped by the parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directive key → value. Known directives use their canonical key
/// (`title`, `artist`, `key`, `tempo`, `timeSignature`, `capo`, `copyright`,
/// `ccli`); unknown ones keep their lower-cased directive name.
pub type Metadata = BTreeMap<String, String>;

/// Kind of song section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Verse,
    Chorus,
    Bridge,
    Tag,
    Intro,
    Outro,
    Instrumental,
    #[default]
    Unknown,
}

impl SectionType {
    /// Label used when a section is opened without one
    pub fn default_label(self) -> &'static str {
        match self {
            SectionType::Verse => "Verse",
            SectionType::Chorus => "Chorus",
            SectionType::Bridge => "Bridge",
            SectionType::Intro => "Intro",
            SectionType::Outro => "Outro",
            SectionType::Instrumental => "Instrumental",
            SectionType::Tag => "Tag",
            SectionType::Unknown => "",
        }
    }

    /// Guess a section type from a free-form label such as "Verse 2" or "Solo".
    ///
    /// Case-insensitive prefix match; anything unrecognized is `Unknown`.
    pub fn guess_from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.starts_with("verse") {
            SectionType::Verse
        } else if lower.starts_with("chorus") {
            SectionType::Chorus
        } else if lower.starts_with("bridge") {
            SectionType::Bridge
        } else if lower.starts_with("intro") {
            SectionType::Intro
        } else if lower.starts_with("outro") {
            SectionType::Outro
        } else if lower.starts_with("instrumental") || lower.starts_with("solo") {
            SectionType::Instrumental
        } else if lower.starts_with("tag") {
            SectionType::Tag
        } else {
            SectionType::Unknown
        }
    }
}

/// A chord (or no chord) and the lyrics that follow it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSegment {
    pub chord: Option<String>,
    pub lyrics: String,
}

impl LineSegment {
    pub fn new(chord: Option<&str>, lyrics: &str) -> Self {
        Self {
            chord: chord.map(str::to_string),
            lyrics: lyrics.to_string(),
        }
    }
}

/// One line of a section. Empty `segments` means a blank spacer line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongLine {
    pub segments: Vec<LineSegment>,
}

impl SongLine {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.segments.is_empty()
    }

    /// Lyric text of the line with all chords removed
    pub fn lyrics(&self) -> String {
        self.segments.iter().map(|s| s.lyrics.as_str()).collect()
    }

    /// Chords of the line, left to right
    pub fn chords(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| s.chord.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSection {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub label: String,
    pub lines: Vec<SongLine>,
}

impl SongSection {
    /// Open an empty section
    pub fn new(section_type: SectionType, label: impl Into<String>) -> Self {
        Self {
            section_type,
            label: label.into(),
            lines: Vec::new(),
        }
    }
}

/// Parser output: metadata plus sections in source order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSong {
    pub metadata: Metadata,
    pub sections: Vec<SongSection>,
}

impl ParsedSong {
    /// The `key` metadata value, if present and non-empty
    pub fn key(&self) -> Option<&str> {
        self.metadata
            .get("key")
            .map(String::as_str)
            .filter(|k| !k.is_empty())
    }

    /// Typed view of the well-known metadata keys
    pub fn info(&self) -> SongInfo {
        let text = |key: &str| {
            self.metadata
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
        };

        SongInfo {
            title: text("title"),
            artist: text("artist"),
            key: text("key"),
            tempo: text("tempo").and_then(|t| t.parse().ok()),
            time_signature: text("timeSignature"),
            capo: text("capo")
                .and_then(|c| c.parse::<u8>().ok())
                .filter(|&c| c <= MAX_CAPO)
                .unwrap_or(0),
            ccli: text("ccli"),
            copyright: text("copyright"),
        }
    }

    /// Every chord in the song, in reading order
    pub fn chords(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter())
            .flat_map(|l| l.chords())
    }
}

/// Highest capo fret accepted anywhere in the crate
pub const MAX_CAPO: u8 = 12;

/// Song-level fields taken from the metadata directives.
///
/// Values that are missing or empty are `None`; a tempo that is not a whole
/// number is `None`; a capo that is not a fret in `0..=12` is 0.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub tempo: Option<u16>,
    pub time_signature: Option<String>,
    pub capo: u8,
    pub ccli: Option<String>,
    pub copyright: Option<String>,
}
