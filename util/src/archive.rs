//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
pub struct Archiver {
    writer: Writer<File>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not open the archive file: {0}")]
    FileError(std::io::Error),

    #[error("Could not write the record: {0}")]
    WriteError(csv::Error),

    #[error("Could not flush the archive: {0}")]
    FlushError(std::io::Error)
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a timestamped csv.
///
/// Structs implementing this trait shall hold their `Archiver`s as members,
/// set up in the struct's `init` or `new` functions.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        Self::from_file(session.arch_root.join(path))
    }

    /// Create a new archiver writing to the given file, creating the file and
    /// any parent directories.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(ArchiveError::FileError)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(ArchiveError::FileError)?;

        // Headers are written from the field names of the first record
        let writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self { writer })
    }

    /// Serialise a record into the archive.
    ///
    /// Records must be flat (no nested structs or maps), and shall carry their
    /// own timestamp if one is needed.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        self.writer
            .serialize(record)
            .map_err(ArchiveError::WriteError)?;

        self.writer.flush().map_err(ArchiveError::FlushError)
    }
}
