//! # Lexicon
//!
//! Static tables shared by the parser, the transposer and the emitter.
//!
//! ## Contents
//! - Chromatic scale in sharp and flat spelling, indexed by pitch class (C = 0)
//! - Note name → pitch class, including the enharmonic edge cases E#, Fb, B#, Cb
//! - Keys that conventionally use flat spelling
//! - Directive dictionaries: section open/close and metadata synonyms
//!
//! Everything here is a `const` table or a closed `match`, so there is no
//! runtime initialization and nothing mutable.

use crate::ast::SectionType;

/// Chromatic scale spelled with sharps, indexed by pitch class
pub const SHARP_NOTES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Chromatic scale spelled with flats, indexed by pitch class
pub const FLAT_NOTES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Keys that conventionally render with flats
pub const FLAT_KEYS: [&str; 12] = [
    "F", "Bb", "Eb", "Ab", "Db", "Gb", "Dm", "Gm", "Cm", "Fm", "Bbm", "Ebm",
];

/// Map a note name (letter plus optional single `#` or `b`) to its pitch class.
///
/// # Examples
/// ```
/// use chordpro::lexicon::pitch_class;
///
/// assert_eq!(pitch_class("C"), Some(0));
/// assert_eq!(pitch_class("Db"), Some(1));
/// assert_eq!(pitch_class("Cb"), Some(11));
/// assert_eq!(pitch_class("H"), None);
/// ```
pub fn pitch_class(name: &str) -> Option<u8> {
    let pc = match name {
        "C" | "B#" => 0,
        "C#" | "Db" => 1,
        "D" => 2,
        "D#" | "Eb" => 3,
        "E" | "Fb" => 4,
        "F" | "E#" => 5,
        "F#" | "Gb" => 6,
        "G" => 7,
        "G#" | "Ab" => 8,
        "A" => 9,
        "A#" | "Bb" => 10,
        "B" | "Cb" => 11,
        _ => return None,
    };
    Some(pc)
}

/// Spell a pitch class (any integer, reduced mod 12) with sharps or flats
pub fn note_name(pitch_class: i32, prefer_flats: bool) -> &'static str {
    let idx = pitch_class.rem_euclid(12) as usize;
    if prefer_flats {
        FLAT_NOTES[idx]
    } else {
        SHARP_NOTES[idx]
    }
}

/// Whether `key` is one of the flat-preferring keys
pub fn is_flat_key(key: &str) -> bool {
    FLAT_KEYS.contains(&key)
}

/// Canonical metadata keys, in the order the emitter writes them
pub const CANONICAL_METADATA: [&str; 8] = [
    "title",
    "artist",
    "key",
    "tempo",
    "timeSignature",
    "capo",
    "copyright",
    "ccli",
];

/// What a directive name means to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Opens a section of the given type
    SectionStart(SectionType),
    /// Closes the open section, whatever its type
    SectionEnd,
    /// `{comment}` / `{c}`: informal section marker
    Comment,
    /// Known metadata directive, carrying its canonical key
    Metadata(&'static str),
    /// Anything else; stored verbatim as metadata
    Unknown,
}

/// Classify a lower-cased directive name.
pub fn classify_directive(name: &str) -> DirectiveKind {
    use DirectiveKind::*;

    match name {
        "start_of_verse" | "sov" => SectionStart(SectionType::Verse),
        "start_of_chorus" | "soc" => SectionStart(SectionType::Chorus),
        "start_of_bridge" | "sob" => SectionStart(SectionType::Bridge),
        "start_of_tab" | "sot" | "start_of_grid" | "sog" => {
            SectionStart(SectionType::Instrumental)
        }

        "end_of_verse" | "eov" | "end_of_chorus" | "eoc" | "end_of_bridge" | "eob"
        | "end_of_tab" | "eot" | "end_of_grid" | "eog" => SectionEnd,

        "comment" | "c" => Comment,

        "title" | "t" => Metadata("title"),
        "subtitle" | "st" | "artist" => Metadata("artist"),
        "key" => Metadata("key"),
        "tempo" => Metadata("tempo"),
        "time" => Metadata("timeSignature"),
        "capo" => Metadata("capo"),
        "copyright" => Metadata("copyright"),
        "ccli" => Metadata("ccli"),

        _ => Unknown,
    }
}

/// Long-form open/close directive pair for a section type.
///
/// Types that ChordPro has no environment for (intro, outro, tag, unknown)
/// return `None` and are written as comment markers instead.
pub fn section_directives(section_type: SectionType) -> Option<(&'static str, &'static str)> {
    match section_type {
        SectionType::Verse => Some(("start_of_verse", "end_of_verse")),
        SectionType::Chorus => Some(("start_of_chorus", "end_of_chorus")),
        SectionType::Bridge => Some(("start_of_bridge", "end_of_bridge")),
        SectionType::Instrumental => Some(("start_of_tab", "end_of_tab")),
        SectionType::Intro | SectionType::Outro | SectionType::Tag | SectionType::Unknown => None,
    }
}

/// Directive name to write for a canonical metadata key.
///
/// Keys without a dedicated directive are written under their own name.
pub fn metadata_directive(key: &str) -> &str {
    match key {
        "timeSignature" => "time",
        other => other,
    }
}
