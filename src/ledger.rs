//! The record of points already tried against the remote checker

use std::{
    collections::HashSet,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use geocheck_types::Point;

/// Failure to read or write the ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// File access failed
    #[error("checked points ledger {}: {source}", .path.display())]
    Io {
        /// The ledger file
        path: PathBuf,
        /// The underlying failure
        #[source]
        source: io::Error,
    },
}

/// Durable set of the points that were rejected by the remote side
pub trait Ledger {
    /// Was the point already tried?
    ///
    /// # Errors
    /// The storage cannot be read.
    fn contains(&self, point: &Point) -> Result<bool, LedgerError>;

    /// Remember the point as tried.
    ///
    /// # Errors
    /// The storage cannot be written.
    fn record(&mut self, point: &Point) -> Result<(), LedgerError>;
}

/// Plain text file with a point per line.
///
/// Every check reads the whole file, so the entries appended by
/// the previous runs (or by another process) are never missed.
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    /// Ledger stored at `path`, the file is created on the first record
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All the entries of the file, missing file is empty
    ///
    /// # Errors
    /// The file exists but cannot be read.
    pub fn entries(&self) -> Result<HashSet<String>, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn io_error(&self, source: io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Ledger for FileLedger {
    fn contains(&self, point: &Point) -> Result<bool, LedgerError> {
        Ok(self.entries()?.contains(&point.to_string()))
    }

    fn record(&mut self, point: &Point) -> Result<(), LedgerError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| self.io_error(err))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| self.io_error(err))?;
        writeln!(file, "{point}").map_err(|err| self.io_error(err))?;
        file.flush().map_err(|err| self.io_error(err))
    }
}

/// Non-durable ledger remembering the order of the records
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    order: Vec<Point>,
    seen: HashSet<Point>,
}

impl MemoryLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded points, oldest first
    pub fn entries(&self) -> &[Point] {
        &self.order
    }
}

impl Ledger for MemoryLedger {
    fn contains(&self, point: &Point) -> Result<bool, LedgerError> {
        Ok(self.seen.contains(point))
    }

    fn record(&mut self, point: &Point) -> Result<(), LedgerError> {
        if self.seen.insert(*point) {
            self.order.push(*point);
        }
        Ok(())
    }
}
