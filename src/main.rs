use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;

use chordpro::{
    capo_key, parse_file, to_chordpro, transpose_chord, Arrangement, ChordProError, Performance,
    Setlist, MAX_CAPO,
};

#[derive(Parser, Debug)]
#[command(name = "chordpro", version)]
#[command(about = "Parse, transpose and re-emit ChordPro chord sheets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a song and print it, optionally transposed
    Render {
        file: PathBuf,

        /// Semitones to shift every chord by
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        transpose: i32,

        /// Capo fret; defaults to the song's own {capo}
        #[arg(short, long, value_parser = capo_fret)]
        capo: Option<u8>,

        #[command(flatten)]
        spelling: Spelling,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Transpose a single chord symbol
    Transpose {
        chord: String,

        #[arg(allow_negative_numbers = true)]
        semitones: i32,

        #[command(flatten)]
        spelling: Spelling,
    },

    /// Show which chord shapes to play for a key with a capo
    Capo {
        key: String,

        #[arg(value_parser = capo_fret)]
        fret: u8,
    },

    /// Render every song of a YAML setlist with its arrangement
    Setlist {
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Args, Debug)]
struct Spelling {
    /// Spell transposed roots with flats
    #[arg(long, conflicts_with = "prefer_sharps")]
    prefer_flats: bool,

    /// Spell transposed roots with sharps
    #[arg(long)]
    prefer_sharps: bool,
}

impl Spelling {
    fn policy(&self) -> Option<bool> {
        match (self.prefer_flats, self.prefer_sharps) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Chordpro,
}

fn capo_fret(s: &str) -> Result<u8, String> {
    let fret: u8 = s.parse().map_err(|_| format!("'{}' is not a fret number", s))?;
    if fret > MAX_CAPO {
        return Err(format!("capo must be between 0 and {}", MAX_CAPO));
    }
    Ok(fret)
}

/// One rendered setlist slot
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetlistItem<'a> {
    position: usize,
    file: PathBuf,
    notes: Option<String>,
    #[serde(flatten)]
    performance: Performance<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedSetlist<'a> {
    name: &'a str,
    description: Option<&'a str>,
    date: Option<&'a str>,
    songs: Vec<SetlistItem<'a>>,
}

/// Encode a result; `sheet` supplies the ChordPro text for that format
fn encode<T: Serialize>(
    value: &T,
    format: Format,
    sheet: impl FnOnce() -> String,
) -> Result<String, ChordProError> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(value)?),
        Format::Yaml => {
            serde_yaml::to_string(value).map_err(|e| ChordProError::Output(e.to_string()))
        }
        Format::Chordpro => Ok(sheet()),
    }
}

fn render(
    file: PathBuf,
    transpose: i32,
    capo: Option<u8>,
    prefer_flats: Option<bool>,
    format: Format,
) -> Result<String, ChordProError> {
    let song = parse_file(&file)?;
    debug!(sections = song.sections.len(), "parsed {}", file.display());

    let performance = Arrangement::for_song(&song, transpose, capo).apply_with(&song, prefer_flats);
    encode(&performance, format, || to_chordpro(&performance.song))
}

fn render_setlist(file: PathBuf, format: Format) -> Result<String, ChordProError> {
    let setlist = Setlist::load(&file)?;
    let songs = setlist
        .songs
        .iter()
        .map(|entry| entry.load_song().map(|song| (entry, song)))
        .collect::<Result<Vec<_>, _>>()?;

    let rendered = RenderedSetlist {
        name: &setlist.name,
        description: setlist.description.as_deref(),
        date: setlist.date.as_deref(),
        songs: songs
            .iter()
            .enumerate()
            .map(|(i, (entry, song))| SetlistItem {
                position: i + 1,
                file: entry.file.clone(),
                notes: entry.notes.clone(),
                performance: entry.arrangement(song).apply(song),
            })
            .collect(),
    };

    encode(&rendered, format, || {
        rendered
            .songs
            .iter()
            .map(|item| to_chordpro(&item.performance.song))
            .collect::<Vec<_>>()
            .join("\n{new_song}\n\n")
    })
}

fn run(cli: Cli) -> Result<String, ChordProError> {
    match cli.command {
        Command::Render {
            file,
            transpose,
            capo,
            spelling,
            format,
        } => render(file, transpose, capo, spelling.policy(), format),
        Command::Transpose {
            chord,
            semitones,
            spelling,
        } => Ok(transpose_chord(&chord, semitones, spelling.policy())),
        Command::Capo { key, fret } => Ok(capo_key(&key, fret)),
        Command::Setlist { file, format } => render_setlist(file, format),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_capo_fret_range() {
        assert_eq!(capo_fret("0"), Ok(0));
        assert_eq!(capo_fret("12"), Ok(12));
        assert!(capo_fret("13").is_err());
        assert!(capo_fret("-1").is_err());
        assert!(capo_fret("two").is_err());
    }

    #[test]
    fn test_spelling_policy() {
        let policy = |prefer_flats, prefer_sharps| {
            Spelling {
                prefer_flats,
                prefer_sharps,
            }
            .policy()
        };
        assert_eq!(policy(true, false), Some(true));
        assert_eq!(policy(false, true), Some(false));
        assert_eq!(policy(false, false), None);
    }

    #[test]
    fn test_spelling_flags_conflict() {
        let result = Cli::try_parse_from([
            "chordpro",
            "transpose",
            "C",
            "1",
            "--prefer-flats",
            "--prefer-sharps",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_semitones_parse() {
        let cli = Cli::try_parse_from(["chordpro", "transpose", "Bb", "-2", "--prefer-flats"]).unwrap();
        assert_eq!(run(cli).unwrap(), "Ab");

        let cli = Cli::try_parse_from(["chordpro", "capo", "G", "3"]).unwrap();
        assert_eq!(run(cli).unwrap(), "E");
    }

    #[test]
    fn test_render_chordpro_format() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("song.cho");
        fs::write(&song, "{key: G}\n{sov}\n[G]Hello [D/F#]world\n{eov}\n").unwrap();

        let output = render(song, 2, None, None, Format::Chordpro).unwrap();
        assert_eq!(
            output,
            "{key: A}\n\n{start_of_verse}\n[A]Hello [E/G#]world\n{end_of_verse}\n"
        );
    }

    #[test]
    fn test_render_json_format() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("song.cho");
        fs::write(&song, "{key: F}\n{capo: 1}\n[F]la").unwrap();

        let output = render(song, 0, None, None, Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["soundingKey"], "F");
        assert_eq!(value["capoKey"], "E");
        assert_eq!(value["arrangement"]["capo"], 1);
    }

    #[test]
    fn test_setlist_chordpro_joins_songs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.cho"), "{key: G}\n[G]one").unwrap();
        fs::write(dir.path().join("two.cho"), "{key: F}\n[F]two").unwrap();
        let setlist = dir.path().join("set.yaml");
        fs::write(
            &setlist,
            "name: Test\nsongs:\n  - file: one.cho\n    transpose: 2\n  - file: two.cho\n",
        )
        .unwrap();

        let output = render_setlist(setlist, Format::Chordpro).unwrap();
        assert_eq!(
            output,
            "{key: A}\n\n[A]one\n\n{new_song}\n\n{key: F}\n\n[F]two\n"
        );
    }

    #[test]
    fn test_setlist_missing_song_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let setlist = dir.path().join("set.yaml");
        fs::write(&setlist, "name: Test\nsongs:\n  - file: gone.cho\n").unwrap();

        let result = render_setlist(setlist, Format::Yaml);
        assert!(matches!(result, Err(ChordProError::Io { .. })));
    }
}
