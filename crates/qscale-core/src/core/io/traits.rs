use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading one kind of whitespace-separated record file.
///
/// Implementors parse a single input stream into a typed value. Readers that
/// need extra context (such as the expected atom count) carry it in `self`.
pub trait RecordFile {
    /// The parsed contents of the file.
    type Output;

    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads and parses the whole stream.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be parsed or the reader fails.
    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Opens `path` and reads it with [`RecordFile::read_from`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }
}
