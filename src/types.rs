//! Core data model shared by both engines: the Markov rewrite rule, the
//! Turing transition and head direction, the reserved tokens of the textual
//! formats, and the fault types surfaced to callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The designated "empty cell" symbol; must be present in every alphabet.
pub const BLANK_SYMBOL: char = '_';
/// The fixed start state of every Turing machine.
pub const START_STATE: &str = "0";
/// The reserved terminal state token; never a key in the state table.
pub const TERM_STATE: &str = "!";

/// A single Markov rewrite rule.
///
/// Rules live in an ordered list owned by an
/// [`Algorithm`](crate::markov::Algorithm); their position in that list is
/// significant and immutable once appended. A terminal rule stops execution
/// as soon as it fires, regardless of later rules that might also match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Substring to search for; the empty pattern matches at position 0.
    pub pattern: String,
    /// Text substituted at the leftmost occurrence of `pattern`.
    pub replacement: String,
    /// Whether firing this rule halts the algorithm.
    pub terminal: bool,
}

/// A defined Turing transition: what to write, where to move, which state
/// comes next. An undefined table slot is modeled as `None` in an
/// `Option<Transition>` and faults if ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Symbol written at the head position.
    pub write: char,
    /// Head movement applied after writing.
    pub movement: Direction,
    /// Name of the next state, or the terminal token.
    pub next: String,
}

/// Head movement of a transition. The textual format spells these `L`, `N`
/// and `R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    Left,
    /// Keep the head where it is.
    Stay,
    /// Move the head one cell to the right.
    Right,
}

impl Direction {
    /// Signed head displacement of this movement.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Stay => 0,
            Direction::Right => 1,
        }
    }

    /// Parses the single-letter spelling used by the state-table format.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "L" => Some(Direction::Left),
            "N" => Some(Direction::Stay),
            "R" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Direction::Left => "L",
            Direction::Stay => "N",
            Direction::Right => "R",
        };
        f.write_str(letter)
    }
}

/// Faults surfaced by the engines. All are detected synchronously, never
/// retried internally, and always propagate to the immediate caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Malformed rule/state text or an inconsistent definition: wrong rule
    /// count, duplicate state, missing blank symbol, missing start state or
    /// terminal reachability. The engine's structural state is left
    /// unchanged.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// A tape/step-time violation: invalid character during tape
    /// initialization, or an undefined transition encountered while
    /// stepping. Run state may be left mid-flight.
    #[error("runtime error: {0}")]
    Runtime(String),
    /// The step budget was exhausted before a halting condition. Only raised
    /// when a budget is supplied; distinguishable from definition and
    /// stepping faults so harnesses can treat non-termination separately.
    #[error("execution has not stopped within {0} steps")]
    Timeout(usize),
}
