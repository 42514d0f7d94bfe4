//! Save/load of universe state as JSON.
//!
//! Only scalar cell state is persisted: coordinates, density, and
//! temperature, plus the seed and counters. Bodies are decorative and are
//! not restored; loaded cells are plain.

use std::error::Error;
use std::fmt;
use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

pub use cosmos_core::CellRecord;

/// Version number of the save format (increment when the format changes).
pub const SAVE_VERSION: u32 = 1;

/// Serializable universe state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedUniverse {
    /// Save format version.
    pub version: u32,
    /// Universe seed.
    pub seed: u64,
    /// Time counter.
    pub time_step: u64,
    /// Whether the big bang has happened.
    pub big_bang_occurred: bool,
    /// Cell scalars in traversal order.
    pub cells: Vec<CellRecord>,
}

/// Errors from saving or loading.
#[derive(Debug)]
pub enum PersistError {
    /// The reader or writer failed.
    Io(io::Error),
    /// The document is not a valid save.
    Format(serde_json::Error),
    /// The save was written by an incompatible format version.
    UnsupportedVersion {
        /// The version found in the document.
        found: u32,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "save i/o: {e}"),
            Self::Format(e) => write!(f, "save format: {e}"),
            Self::UnsupportedVersion { found } => write!(
                f,
                "save version {found} is not supported (expected {SAVE_VERSION})"
            ),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::Io(e.into())
        } else {
            Self::Format(e)
        }
    }
}

impl SavedUniverse {
    /// Write the save as JSON.
    pub fn save_json<W: Write>(&self, writer: W) -> Result<(), PersistError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Read a save written by [`save_json`](Self::save_json).
    pub fn load_json<R: Read>(reader: R) -> Result<Self, PersistError> {
        let saved: SavedUniverse = serde_json::from_reader(reader)?;
        if saved.version != SAVE_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: saved.version,
            });
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SavedUniverse {
        SavedUniverse {
            version: SAVE_VERSION,
            seed: 17,
            time_step: 120,
            big_bang_occurred: true,
            cells: vec![
                CellRecord { x: -1, y: 0, density: 0.25, temperature: 9_000.0 },
                CellRecord { x: 0, y: 0, density: 6.0, temperature: 10_000.0 },
            ],
        }
    }

    #[test]
    fn json_round_trip() {
        let mut buf = Vec::new();
        sample().save_json(&mut buf).unwrap();
        let back = SavedUniverse::load_json(buf.as_slice()).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut s = sample();
        s.version = 2;
        let json = serde_json::to_vec(&s).unwrap();
        match SavedUniverse::load_json(json.as_slice()) {
            Err(PersistError::UnsupportedVersion { found: 2 }) => {}
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_format_error() {
        match SavedUniverse::load_json(&b"{\"version\": 1, \"cells\": 3}"[..]) {
            Err(PersistError::Format(_)) => {}
            other => panic!("expected Format, got {other:?}"),
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_failure_is_an_io_error() {
        match sample().save_json(FailingWriter) {
            Err(e @ PersistError::Io(_)) => assert!(e.source().is_some()),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
