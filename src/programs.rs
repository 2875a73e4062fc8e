//! Embedded demo programs, parsed once on first access.

use lazy_static::lazy_static;

use crate::machine::Machine;
use crate::markov::Algorithm;
use crate::types::Fault;

// Default embedded programs
const DEMO_SOURCES: [(&str, &str, DemoKind, &str); 4] = [
    (
        "duplicate",
        "Markov algorithm doubling a word of x's via a travelling marker",
        DemoKind::Markov,
        include_str!("../demos/duplicate.mkv"),
    ),
    (
        "squash",
        "Markov algorithm collapsing runs of doubled letters",
        DemoKind::Markov,
        include_str!("../demos/squash.mkv"),
    ),
    (
        "append-a",
        "Turing machine appending the letter a to its input",
        DemoKind::Turing,
        include_str!("../demos/append-a.tm"),
    ),
    (
        "increment",
        "Turing machine adding one to a binary number",
        DemoKind::Turing,
        include_str!("../demos/increment.tm"),
    ),
];

/// Which engine a demo program targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Markov,
    Turing,
}

#[derive(Clone)]
enum Engine {
    Markov(Algorithm),
    Turing(Machine),
}

/// A named, known-good program embedded in the crate.
pub struct Demo {
    pub name: &'static str,
    pub summary: &'static str,
    pub kind: DemoKind,
    pub source: &'static str,
    engine: Engine,
}

impl Demo {
    /// Executes the demo against one input line on a fresh engine clone.
    /// Markov demos strip all whitespace from the input first, like the
    /// command-line runner does.
    pub fn run(&self, input: &str, max_steps: Option<usize>) -> Result<String, Fault> {
        match &self.engine {
            Engine::Markov(algorithm) => {
                let input: String = input.split_whitespace().collect();
                algorithm.clone().execute(&input, max_steps)
            }
            Engine::Turing(machine) => machine.clone().execute(input, max_steps),
        }
    }

    /// Emits the standalone program for this demo.
    pub fn compile(&self) -> String {
        match &self.engine {
            Engine::Markov(algorithm) => algorithm.compile(),
            Engine::Turing(machine) => machine.compile(),
        }
    }
}

lazy_static! {
    /// Demo registry, parsed once. Sources that fail to parse are skipped;
    /// the tests assert that none do.
    pub static ref DEMOS: Vec<Demo> = DEMO_SOURCES
        .iter()
        .filter_map(|&(name, summary, kind, source)| {
            let engine = match kind {
                DemoKind::Markov => Engine::Markov(Algorithm::build(source.lines()).ok()?),
                DemoKind::Turing => Engine::Turing(Machine::build(source.lines()).ok()?),
            };
            Some(Demo {
                name,
                summary,
                kind,
                source,
                engine,
            })
        })
        .collect();
}

/// Looks up an embedded demo by name.
pub fn find_demo(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}
