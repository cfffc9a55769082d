//! Backing file naming.
//!
//! Files are named `mmap.<sequence>` inside the configured directory. Two
//! policies pick the sequence:
//!
//! - [`NamingPolicy::Probe`] (default) looks for the first unused name starting
//!   from 0, so a fresh process pointed at a non-empty directory never reuses a
//!   file that already holds an array.
//! - [`NamingPolicy::Counter`] hands out an in-memory counter and never touches
//!   the directory. A new counter starting over in the same directory truncates
//!   and reuses existing files.

use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Serializable selector for the naming policy of an allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    #[default]
    Probe,
    Counter,
}

/// Returns the path of backing file `sequence` in `dir`.
pub fn backing_file_path(dir: &Path, sequence: u32) -> PathBuf {
    dir.join(format!("mmap.{sequence}"))
}

/// Stateful naming policy of one allocator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    #[default]
    Probe,
    Counter { next: u32 },
}

/// A newly created backing file, opened read-write and still empty.
#[derive(Debug)]
pub struct ClaimedFile {
    pub sequence: u32,
    pub path: PathBuf,
    pub file: File,
}

impl NamingPolicy {
    pub fn from_strategy(strategy: NamingStrategy) -> NamingPolicy {
        match strategy {
            NamingStrategy::Probe => NamingPolicy::Probe,
            NamingStrategy::Counter => NamingPolicy::Counter { next: 0 },
        }
    }

    /// A counter policy resuming at `next`, e.g. one past the highest
    /// `file_sequence` found in persisted headers.
    pub fn counter_from(next: u32) -> NamingPolicy {
        NamingPolicy::Counter { next }
    }

    pub fn strategy(&self) -> NamingStrategy {
        match self {
            NamingPolicy::Probe => NamingStrategy::Probe,
            NamingPolicy::Counter { .. } => NamingStrategy::Counter,
        }
    }

    /// Picks the sequence for an allocation that does not need a file.
    ///
    /// Probing reports the first unused name without reserving it; the counter
    /// advances as for any other allocation.
    pub fn next_sequence(&mut self, dir: &Path) -> std::io::Result<u32> {
        match self {
            NamingPolicy::Probe => probe(dir, 0),
            NamingPolicy::Counter { next } => take(next),
        }
    }

    /// Picks a sequence and creates its backing file.
    ///
    /// Probing creates the file exclusively: a name that shows up between the
    /// existence check and the creation is skipped and probing resumes past it.
    pub fn claim(&mut self, dir: &Path) -> std::io::Result<ClaimedFile> {
        match self {
            NamingPolicy::Probe => {
                let mut start = 0;
                loop {
                    let sequence = probe(dir, start)?;
                    let path = backing_file_path(dir, sequence);
                    match OpenOptions::new()
                        .read(true)
                        .write(true)
                        .create_new(true)
                        .open(&path)
                    {
                        Ok(file) => {
                            return Ok(ClaimedFile {
                                sequence,
                                path,
                                file,
                            });
                        }
                        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                            log::trace!("{} appeared while probing, skipping", path.display());
                            start = next_after(sequence)?;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
            NamingPolicy::Counter { next } => {
                let sequence = take(next)?;
                let path = backing_file_path(dir, sequence);
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&path)?;
                Ok(ClaimedFile {
                    sequence,
                    path,
                    file,
                })
            }
        }
    }
}

fn probe(dir: &Path, start: u32) -> std::io::Result<u32> {
    let mut sequence = start;
    loop {
        let path = backing_file_path(dir, sequence);
        if !path.try_exists()? {
            log::trace!("probe found free backing file name {}", path.display());
            return Ok(sequence);
        }
        sequence = next_after(sequence)?;
    }
}

fn take(next: &mut u32) -> std::io::Result<u32> {
    let sequence = *next;
    *next = next_after(sequence)?;
    Ok(sequence)
}

fn next_after(sequence: u32) -> std::io::Result<u32> {
    sequence
        .checked_add(1)
        .ok_or_else(|| std::io::Error::other("backing file sequence numbers exhausted"))
}
