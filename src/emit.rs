//! # ChordPro Emitter
//!
//! Writes a [`ParsedSong`] back out as ChordPro source, e.g. to save a song
//! after transposing it.
//!
//! Metadata comes first (canonical keys in a fixed order, then the rest
//! sorted), followed by the sections. Verse, chorus, bridge and instrumental
//! sections use `{start_of_*}`/`{end_of_*}` and are followed by a blank line;
//! the other types are introduced with a `{comment}` marker, which the parser
//! reads back as the same section type. Those have no closing directive, so
//! nothing is written between them and the next marker.
//!
//! For any song produced by [`parse`](crate::parse),
//! `parse(&to_chordpro(&song)) == song`.

use crate::ast::*;
use crate::lexicon::{metadata_directive, section_directives, CANONICAL_METADATA};

/// Convert a song to ChordPro source text
pub fn to_chordpro(song: &ParsedSong) -> String {
    let mut out = String::new();

    let canonical = CANONICAL_METADATA
        .iter()
        .filter_map(|&key| song.metadata.get_key_value(key));
    let others = song
        .metadata
        .iter()
        .filter(|(key, _)| !CANONICAL_METADATA.contains(&key.as_str()));

    for (key, value) in canonical.chain(others) {
        out.push_str(&directive(metadata_directive(key), value));
        out.push('\n');
    }

    let mut separate = !out.is_empty();
    for (i, section) in song.sections.iter().enumerate() {
        if separate {
            out.push('\n');
        }
        out.push_str(&section_to_chordpro(section, i == 0));
        // A blank line after an open-ended section would be read back as one
        // of its lines.
        separate = section_directives(section.section_type).is_some();
    }

    out
}

fn directive(name: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{{{}}}", name)
    } else {
        format!("{{{}: {}}}", name, value)
    }
}

fn section_to_chordpro(section: &SongSection, first: bool) -> String {
    let mut out = String::new();

    let closing = match section_directives(section.section_type) {
        Some((start, end)) => {
            let label = if section.label == section.section_type.default_label() {
                ""
            } else {
                section.label.as_str()
            };
            out.push_str(&directive(start, label));
            out.push('\n');
            Some(end)
        }
        None => {
            // An unlabelled leading section needs no marker; a later one does,
            // or it would merge into the section before it.
            if !(section.label.is_empty() && first) {
                out.push_str(&directive("comment", &section.label));
                out.push('\n');
            }
            None
        }
    };

    for line in &section.lines {
        out.push_str(&line_to_chordpro(line));
        out.push('\n');
    }

    if let Some(end) = closing {
        out.push_str(&directive(end, ""));
        out.push('\n');
    }

    out
}

/// Render one line with its chords in `[brackets]`
pub fn line_to_chordpro(line: &SongLine) -> String {
    let mut out = String::new();
    for segment in &line.segments {
        if let Some(chord) = &segment.chord {
            out.push('[');
            out.push_str(chord);
            out.push(']');
        }
        out.push_str(&segment.lyrics);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_line_rendering() {
        let line = parse("Oh [G]Amazing [D/F#]grace").sections[0].lines[0].clone();
        assert_eq!(line_to_chordpro(&line), "Oh [G]Amazing [D/F#]grace");
        assert_eq!(line_to_chordpro(&SongLine::blank()), "");
    }

    #[test]
    fn test_empty_song() {
        assert_eq!(to_chordpro(&ParsedSong::default()), "");
    }

    #[test]
    fn test_metadata_order() {
        let song = parse("{x_custom: 1}\n{time: 3/4}\n{key: G}\n{t: Title}\n{new_page}");
        assert_eq!(
            to_chordpro(&song),
            "{title: Title}\n{key: G}\n{time: 3/4}\n{new_page}\n{x_custom: 1}\n"
        );
    }

    #[test]
    fn test_sections_with_environments() {
        let song = parse("{sov}\n[G]one\n{eov}\n{soc: Refrain}\n[C]two\n{eoc}");
        assert_eq!(
            to_chordpro(&song),
            "{start_of_verse}\n[G]one\n{end_of_verse}\n\n\
             {start_of_chorus: Refrain}\n[C]two\n{end_of_chorus}\n"
        );
    }

    #[test]
    fn test_comment_sections() {
        let song = parse("{c: Intro}\n[G] [C]\n{c: Pre-Chorus}\nla");
        assert_eq!(
            to_chordpro(&song),
            "{comment: Intro}\n[G] [C]\n{comment: Pre-Chorus}\nla\n"
        );
    }

    #[test]
    fn test_unlabelled_sections() {
        let song = parse("[G]first\n{eov}\n[C]second");
        assert_eq!(to_chordpro(&song), "[G]first\n{comment}\n[C]second\n");
    }

    #[test]
    fn test_open_sections_reparse_without_extra_lines() {
        let song = parse("{c: Intro}\n[G]x\n{c: Outro}\n[C]y");
        let reparsed = parse(&to_chordpro(&song));
        assert_eq!(reparsed.sections[0].lines.len(), 1);
        assert_eq!(reparsed, song);

        let song = parse("[G]first\n{c: Tag}\n[C]end\n{sov}\n[D]v");
        assert_eq!(
            to_chordpro(&song),
            "[G]first\n{comment: Tag}\n[C]end\n{start_of_verse}\n[D]v\n{end_of_verse}\n"
        );
        assert_eq!(parse(&to_chordpro(&song)), song);
    }

    #[test]
    fn test_trailing_blank_in_open_section_kept() {
        let song = parse("{c: Intro}\n[G]x\n\n{c: Tag}\n[C]y\n");
        assert_eq!(song.sections[0].lines.len(), 2);
        assert_eq!(parse(&to_chordpro(&song)), song);
    }

    #[test]
    fn test_blank_lines_inside_sections() {
        let song = parse("{sov}\n[G]a\n\n[C]b\n{eov}");
        assert_eq!(
            to_chordpro(&song),
            "{start_of_verse}\n[G]a\n\n[C]b\n{end_of_verse}\n"
        );
    }

    #[test]
    fn test_reparse_realistic_song() {
        let source = "{title: Amazing Grace}
{st: John Newton}
{key: G}
{capo: 2}
{ccli: 22025}

{start_of_verse: Verse 1}
[G]Amazing [G7]grace how [C]sweet the [G]sound
That [G]saved a [Em]wretch like [D]me

{comment: Chorus}
[C]How sweet [G]the sound

{c: Solo}
[G] [D] [Em] [C]
{sot}
e|--3--2--0--|
{eot}
{c: Tag}
[G]Was blind but [D]now I [G]see
{start_of_bridge}
{start_of_chorus}
[C]End[G]ing";
        let song = parse(source);
        let reparsed = parse(&to_chordpro(&song));
        assert_eq!(reparsed, song);
    }
}
