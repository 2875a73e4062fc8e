//! This crate simulates two classical models of computation — a Markov
//! algorithm string rewriter and a single-tape Turing machine — from compact
//! line-oriented textual descriptions. Both engines can execute directly
//! against input strings or emit equivalent standalone Rust source that
//! performs the same execution.

pub mod codegen;
pub mod loader;
pub mod machine;
pub mod markov;
pub mod programs;
pub mod types;

/// Re-exports the serialization and program-emission helpers.
pub use codegen::{compile_algorithm, compile_machine, serialize_machine, serialize_rule, serialize_state};
/// Re-exports the file/string loading layer.
pub use loader::{LoadError, SourceLoader};
/// Re-exports the Turing machine engine.
pub use machine::Machine;
/// Re-exports the Markov algorithm engine.
pub use markov::Algorithm;
/// Re-exports the embedded demo registry.
pub use programs::{find_demo, Demo, DemoKind, DEMOS};
/// Re-exports the shared data model and fault types.
pub use types::{Direction, Fault, Rule, Transition, BLANK_SYMBOL, START_STATE, TERM_STATE};
