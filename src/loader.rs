//! Loading of algorithm and machine definitions from files or in-memory
//! text. This is glue around the engines' own parsers; I/O failures get
//! their own error so the engine fault surface stays untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::machine::Machine;
use crate::markov::Algorithm;
use crate::types::Fault;

/// Errors surfaced by the loading layer: either the file could not be read,
/// or its content failed to parse as a definition.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Fault(#[from] Fault),
}

/// Entry points for loading engine definitions from the line-oriented
/// source formats.
pub struct SourceLoader;

impl SourceLoader {
    /// Loads a Markov algorithm from a file, one rule per non-blank line.
    pub fn load_algorithm(path: &Path) -> Result<Algorithm, LoadError> {
        Ok(Self::algorithm_from_str(&read(path)?)?)
    }

    /// Parses a Markov algorithm from in-memory text.
    pub fn algorithm_from_str(content: &str) -> Result<Algorithm, Fault> {
        Algorithm::build(content.lines())
    }

    /// Loads a Turing machine from a file: alphabet line first, then one
    /// state row per non-blank line.
    pub fn load_machine(path: &Path) -> Result<Machine, LoadError> {
        Ok(Self::machine_from_str(&read(path)?)?)
    }

    /// Parses a Turing machine from in-memory text.
    pub fn machine_from_str(content: &str) -> Result<Machine, Fault> {
        Machine::build(content.lines())
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
