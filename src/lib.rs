pub mod arrangement;
pub mod ast;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod lexicon;
pub mod parser;
pub mod transpose;

use std::fs;
use std::path::Path;

pub use arrangement::{Arrangement, Performance, Setlist, SetlistEntry};
pub use ast::*;
pub use emit::to_chordpro;
pub use error::*;
pub use parser::{parse, parse_line};
pub use transpose::{capo_key, key_uses_flats, transpose_chord, transpose_key, transpose_song};

/// Read and parse a ChordPro file.
/// Only reading can fail; the content itself always parses.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedSong, ChordProError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| ChordProError::io(path, e))?;
    Ok(parse(&source))
}
