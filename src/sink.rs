//! Durable storage for discovered seeds.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::worker::MatchResult;

/// Persists a discovered seed. Called at most once per search instance, by
/// the worker that won the claim.
pub trait ResultSink: Send + Sync {
    /// Writes `result` and returns where it went.
    fn persist(&self, result: &MatchResult) -> io::Result<PathBuf>;
}

/// Writes each result to `<dir>/<address>.txt`, containing only the seed
/// phrase.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the file a result for `address` is written to.
    pub fn path_for(&self, address: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", address))
    }
}

impl ResultSink for FileSink {
    fn persist(&self, result: &MatchResult) -> io::Result<PathBuf> {
        if result.address.is_empty()
            || result.address.contains(|c: char| c == '/' || c == '\\' || c == '.')
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("address {:?} is not usable as a file name", result.address),
            ));
        }

        let path = self.path_for(&result.address);

        // Never overwrite: an existing file may hold an earlier secret.
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;

        let written = file
            .write_all(result.seed.as_bytes())
            .and_then(|()| file.sync_all());

        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        debug!(path = %path.display(), "seed written");
        Ok(path)
    }
}
