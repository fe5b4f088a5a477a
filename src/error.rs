//! # Error Types
//!
//! Parsing, transposing and emitting never fail: malformed ChordPro degrades
//! to lyric text or opaque metadata. Errors only come from the surfaces around
//! that core: reading files, loading setlist configuration and encoding output.
//!
//! ## Usage
//! ```rust,no_run
//! use chordpro::{ChordProError, Setlist};
//!
//! match Setlist::load("sunday.yaml") {
//!     Ok(setlist) => println!("{} songs", setlist.songs.len()),
//!     Err(ChordProError::Io { path, source }) => eprintln!("cannot read {}: {}", path.display(), source),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChordProError {
    /// A song or setlist file could not be read.
    #[error("Cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid setlist configuration.
    ///
    /// # Example
    /// ```
    /// # use chordpro::ChordProError;
    /// let err = ChordProError::Setlist("capo must be between 0 and 12, got 15".to_string());
    /// assert_eq!(err.to_string(), "Invalid setlist: capo must be between 0 and 12, got 15");
    /// ```
    #[error("Invalid setlist: {0}")]
    Setlist(String),

    /// Rendering a result as JSON or YAML failed.
    #[error("Output error: {0}")]
    Output(String),
}

impl From<serde_yaml::Error> for ChordProError {
    fn from(e: serde_yaml::Error) -> Self {
        ChordProError::Setlist(e.to_string())
    }
}

impl From<serde_json::Error> for ChordProError {
    fn from(e: serde_json::Error) -> Self {
        ChordProError::Output(e.to_string())
    }
}

impl ChordProError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChordProError::Io {
            path: path.into(),
            source,
        }
    }
}
