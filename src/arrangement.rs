//! # Arrangements and Setlists
//!
//! An [`Arrangement`] is how a song is played on a given occasion: shifted by
//! some semitones and with a capo at some fret. Applying it to a parsed song
//! gives a [`Performance`]: the key the audience hears, the chord shapes the
//! guitarist fingers, and the song with every chord transposed.
//!
//! A [`Setlist`] is an ordered list of song files, each with its own
//! arrangement, loaded from YAML:
//!
//! ```yaml
//! name: Sunday Morning
//! date: 2026-10-25
//! songs:
//!   - file: amazing-grace.cho
//!     transpose: 2
//!   - file: how-great.cho
//!     capo: 3
//!     notes: Slow intro
//! ```
//!
//! Song paths are resolved relative to the setlist file.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{ParsedSong, SongInfo, MAX_CAPO};
use crate::error::ChordProError;
use crate::transpose::{capo_key, key_uses_flats, transpose_key, transpose_song};

/// Transposition and capo for one performance of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrangement {
    pub transpose: i32,
    pub capo: u8,
}

impl Arrangement {
    pub fn new(transpose: i32, capo: u8) -> Self {
        Self { transpose, capo }
    }

    /// Arrangement for `song`, falling back to the song's own `{capo}` when no
    /// capo is given
    pub fn for_song(song: &ParsedSong, transpose: i32, capo: Option<u8>) -> Self {
        Self::new(transpose, capo.unwrap_or_else(|| song.info().capo))
    }

    fn sounding_key_with(&self, original: Option<&str>, prefer_flats: Option<bool>) -> Option<String> {
        let original = original.filter(|k| !k.is_empty())?;
        if self.transpose == 0 {
            return Some(original.to_string());
        }
        let flats = prefer_flats.unwrap_or_else(|| key_uses_flats(Some(original)));
        Some(transpose_key(original, self.transpose, Some(flats)))
    }

    /// Key the song sounds in after transposing
    ///
    /// ```
    /// use chordpro::Arrangement;
    ///
    /// assert_eq!(Arrangement::new(2, 0).sounding_key(Some("G")).as_deref(), Some("A"));
    /// assert_eq!(Arrangement::new(1, 0).sounding_key(Some("F")).as_deref(), Some("Gb"));
    /// assert_eq!(Arrangement::new(3, 0).sounding_key(None), None);
    /// ```
    pub fn sounding_key(&self, original: Option<&str>) -> Option<String> {
        self.sounding_key_with(original, None)
    }

    /// Chord shapes to play with the capo, if a capo is used
    ///
    /// ```
    /// use chordpro::Arrangement;
    ///
    /// assert_eq!(Arrangement::new(0, 3).capo_key(Some("G")).as_deref(), Some("E"));
    /// assert_eq!(Arrangement::new(2, 2).capo_key(Some("G")).as_deref(), Some("G"));
    /// assert_eq!(Arrangement::new(2, 0).capo_key(Some("G")), None);
    /// ```
    pub fn capo_key(&self, original: Option<&str>) -> Option<String> {
        if self.capo == 0 {
            return None;
        }
        self.sounding_key(original)
            .map(|key| capo_key(&key, self.capo))
    }

    /// Apply to a song, spelling chords by the song's key
    pub fn apply<'a>(&self, song: &'a ParsedSong) -> Performance<'a> {
        self.apply_with(song, None)
    }

    /// Apply to a song with an explicit sharp/flat policy
    pub fn apply_with<'a>(&self, song: &'a ParsedSong, prefer_flats: Option<bool>) -> Performance<'a> {
        let original = song.key();
        let flats = prefer_flats.unwrap_or_else(|| key_uses_flats(original));
        let sounding_key = self.sounding_key_with(original, Some(flats));
        let capo_key = match (&sounding_key, self.capo) {
            (Some(key), capo) if capo > 0 => Some(capo_key(key, capo)),
            _ => None,
        };

        Performance {
            info: song.info(),
            arrangement: *self,
            sounding_key,
            capo_key,
            song: transpose_song(song, self.transpose, Some(flats)),
        }
    }
}

/// A song as it will be played
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance<'a> {
    /// Fields of the song as written
    pub info: SongInfo,
    pub arrangement: Arrangement,
    pub sounding_key: Option<String>,
    pub capo_key: Option<String>,
    /// Borrowed when the arrangement does not transpose
    pub song: Cow<'a, ParsedSong>,
}

/// Raw setlist for YAML deserialization
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawSetlist {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    songs: Vec<RawSetlistEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawSetlistEntry {
    file: PathBuf,
    #[serde(default)]
    transpose: i32,
    #[serde(default)]
    capo: Option<u8>,
    #[serde(default)]
    notes: Option<String>,
}

/// One song slot in a setlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetlistEntry {
    pub file: PathBuf,
    pub transpose: i32,
    /// Capo override; the song's own `{capo}` applies when absent
    pub capo: Option<u8>,
    pub notes: Option<String>,
}

impl SetlistEntry {
    /// Read and parse the song file
    pub fn load_song(&self) -> Result<ParsedSong, ChordProError> {
        crate::parse_file(&self.file)
    }

    pub fn arrangement(&self, song: &ParsedSong) -> Arrangement {
        Arrangement::for_song(song, self.transpose, self.capo)
    }
}

/// An ordered list of songs for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    pub name: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub songs: Vec<SetlistEntry>,
}

impl Setlist {
    /// Parse setlist YAML. Song paths are kept as written.
    pub fn from_yaml(content: &str) -> Result<Self, ChordProError> {
        let raw: RawSetlist = serde_yaml::from_str(content)?;

        let songs = raw
            .songs
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                if let Some(capo) = entry.capo.filter(|&c| c > MAX_CAPO) {
                    return Err(ChordProError::Setlist(format!(
                        "song {} ('{}'): capo must be between 0 and {}, got {}",
                        i + 1,
                        entry.file.display(),
                        MAX_CAPO,
                        capo
                    )));
                }
                Ok(SetlistEntry {
                    file: entry.file,
                    transpose: entry.transpose,
                    capo: entry.capo,
                    notes: entry.notes.filter(|n| !n.is_empty()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Setlist {
            name: raw.name,
            description: raw.description,
            date: raw.date,
            songs,
        })
    }

    /// Load a setlist file, resolving song paths against its directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChordProError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ChordProError::io(path, e))?;
        let mut setlist = Self::from_yaml(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for entry in &mut setlist.songs {
            if entry.file.is_relative() {
                entry.file = base.join(&entry.file);
            }
        }

        debug!(
            name = %setlist.name,
            songs = setlist.songs.len(),
            "loaded setlist from {}",
            path.display()
        );
        Ok(setlist)
    }
}
