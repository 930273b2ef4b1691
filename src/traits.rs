//! Traits for reading translation catalogs from any source.

use std::{
    fs::File,
    io::{BufRead, BufReader, Cursor},
    path::Path,
};

use crate::{error::Error, read_options::ReadOptions};

/// A trait for parsing one translation file.
///
/// # Example
///
/// ```rust,no_run
/// use pocodec::traits::Parser;
/// let format = pocodec::formats::po::Format::read_from("fr.po")?;
/// println!("{} messages", format.messages.len());
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader with explicit options.
    fn from_reader_with_options<R: BufRead>(reader: R, options: &ReadOptions) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader_with_options(reader, &ReadOptions::default())
    }

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}
