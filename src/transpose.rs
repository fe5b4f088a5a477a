//! # Transposition
//!
//! Shift chords, keys and whole songs by a number of semitones.
//!
//! All functions are total: a token that does not start with a note name
//! (`N.C.`, `%`, an empty string) comes back unchanged.
//!
//! ## Spelling
//! The new root is spelled from the sharp or flat chromatic scale. Callers may
//! force the choice with `prefer_flats`; otherwise a chord keeps flats if its
//! own root was written with `b` or is a flat key name (`F`, `Bb`, ...), and
//! uses sharps otherwise. [`transpose_song`] picks one policy from the song's
//! key so every chord in the song is spelled consistently.

use std::borrow::Cow;

use crate::ast::{LineSegment, ParsedSong, SongLine, SongSection};
use crate::lexicon::{is_flat_key, note_name, pitch_class};
use tracing::trace;

/// Split a chord into root (`A`-`G` plus optional `#`/`b`) and quality suffix
fn split_root(chord: &str) -> Option<(&str, &str)> {
    let bytes = chord.as_bytes();
    if !matches!(bytes.first(), Some(b'A'..=b'G')) {
        return None;
    }
    let root_len = match bytes.get(1) {
        Some(b'#') | Some(b'b') => 2,
        _ => 1,
    };
    Some(chord.split_at(root_len))
}

/// Transpose a chord token by `semitones`.
///
/// The quality suffix (`m7`, `maj7`, `sus4`, ...) is carried over untouched.
/// Slash chords transpose both sides.
///
/// # Examples
/// ```
/// use chordpro::transpose_chord;
///
/// assert_eq!(transpose_chord("G/B", 2, None), "A/C#");
/// assert_eq!(transpose_chord("Cmaj7", 4, None), "Emaj7");
/// assert_eq!(transpose_chord("C", 1, Some(true)), "Db");
/// assert_eq!(transpose_chord("N.C.", 3, None), "N.C.");
/// ```
pub fn transpose_chord(chord: &str, semitones: i32, prefer_flats: Option<bool>) -> String {
    if let Some(slash) = chord.find('/').filter(|&i| i > 0) {
        let (upper, bass) = (&chord[..slash], &chord[slash + 1..]);
        return format!(
            "{}/{}",
            transpose_chord(upper, semitones, prefer_flats),
            transpose_chord(bass, semitones, prefer_flats)
        );
    }

    let Some((root, quality)) = split_root(chord) else {
        trace!(chord, "no note name, leaving chord as written");
        return chord.to_string();
    };
    let Some(index) = pitch_class(root) else {
        trace!(chord, "unknown root spelling, leaving chord as written");
        return chord.to_string();
    };

    let use_flats = prefer_flats.unwrap_or_else(|| root.contains('b') || is_flat_key(root));
    let new_root = note_name(i32::from(index) + semitones.rem_euclid(12), use_flats);

    format!("{}{}", new_root, quality)
}

/// Transpose a key name (`G`, `Bb`, `F#m`, ...). Keys share the chord grammar.
pub fn transpose_key(key: &str, semitones: i32, prefer_flats: Option<bool>) -> String {
    transpose_chord(key, semitones, prefer_flats)
}

/// Whether `key` is conventionally written with flats. No key means no.
///
/// ```
/// use chordpro::key_uses_flats;
///
/// assert!(key_uses_flats(Some("Bb")));
/// assert!(key_uses_flats(Some("Dm")));
/// assert!(!key_uses_flats(Some("G")));
/// assert!(!key_uses_flats(None));
/// ```
pub fn key_uses_flats(key: Option<&str>) -> bool {
    key.is_some_and(is_flat_key)
}

/// Chord shapes to finger with a capo at `capo_fret` while the song sounds in `key`.
///
/// Equivalent to transposing the key down by the fret number, spelled by the
/// original key's convention. Capo 0 returns the key as written.
///
/// ```
/// use chordpro::capo_key;
///
/// assert_eq!(capo_key("G", 3), "E");
/// assert_eq!(capo_key("A", 2), "G");
/// assert_eq!(capo_key("C", 0), "C");
/// ```
pub fn capo_key(key: &str, capo_fret: u8) -> String {
    if capo_fret == 0 {
        return key.to_string();
    }
    transpose_key(key, -i32::from(capo_fret), Some(key_uses_flats(Some(key))))
}

fn transpose_line(line: &SongLine, semitones: i32, prefer_flats: bool) -> SongLine {
    SongLine {
        segments: line
            .segments
            .iter()
            .map(|segment| LineSegment {
                chord: segment
                    .chord
                    .as_deref()
                    .map(|chord| transpose_chord(chord, semitones, Some(prefer_flats))),
                lyrics: segment.lyrics.clone(),
            })
            .collect(),
    }
}

/// Transpose every chord in a song, and its `key` metadata.
///
/// A shift of 0 borrows the input unchanged, so callers can detect a no-op
/// without comparing trees. Any other shift builds a new tree; lyrics and
/// labels are copied as they are.
///
/// Without an explicit `prefer_flats`, the spelling comes from the song's
/// original key via [`key_uses_flats`] and applies to every chord.
///
/// # Example
/// ```
/// use std::borrow::Cow;
/// use chordpro::{parse, transpose_song};
///
/// let song = parse("{key: G}\n[G]Amazing [C]grace");
///
/// let same = transpose_song(&song, 0, None);
/// assert!(matches!(same, Cow::Borrowed(_)));
///
/// let up = transpose_song(&song, 2, None);
/// assert_eq!(up.metadata["key"], "A");
/// assert_eq!(up.sections[0].lines[0].segments[1].chord.as_deref(), Some("D"));
/// ```
pub fn transpose_song(
    song: &ParsedSong,
    semitones: i32,
    prefer_flats: Option<bool>,
) -> Cow<'_, ParsedSong> {
    if semitones == 0 {
        return Cow::Borrowed(song);
    }

    let prefer_flats = prefer_flats.unwrap_or_else(|| key_uses_flats(song.key()));

    let mut metadata = song.metadata.clone();
    if let Some(key) = song.key() {
        metadata.insert(
            "key".to_string(),
            transpose_key(key, semitones, Some(prefer_flats)),
        );
    }

    let sections = song
        .sections
        .iter()
        .map(|section| SongSection {
            section_type: section.section_type,
            label: section.label.clone(),
            lines: section
                .lines
                .iter()
                .map(|line| transpose_line(line, semitones, prefer_flats))
                .collect(),
        })
        .collect();

    Cow::Owned(ParsedSong { metadata, sections })
}
