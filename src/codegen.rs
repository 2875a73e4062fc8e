//! Re-serialization of engine definitions back to their textual formats, and
//! emission of standalone Rust programs that reproduce an engine's exact
//! rule/state tables and execution semantics.

use crate::machine::Machine;
use crate::markov::Algorithm;
use crate::types::{Rule, Transition};

const ALGORITHM_PRELUDE: &str = "\
use std::io::{self, BufRead};

use tumark::markov::Algorithm;

fn main() {
    let mut algorithm = Algorithm::new();
";

const ALGORITHM_EPILOGUE: &str = "
    for line in io::stdin().lock().lines() {
        let line = line.expect(\"failed to read input\");
        let input: String = line.split_whitespace().collect();
        println!(\"{}\", algorithm.execute(&input, None).expect(\"execution failed\"));
    }
}
";

const MACHINE_PRELUDE: &str = "\
use std::io::{self, BufRead};

use tumark::machine::Machine;

fn main() {
";

const MACHINE_EPILOGUE: &str = "
    for line in io::stdin().lock().lines() {
        let line = line.expect(\"failed to read input\");
        println!(\"{}\", machine.execute(&line, None).expect(\"execution failed\"));
    }
}
";

/// Serializes one rule back to `pattern->replacement` /
/// `pattern=>replacement` form, re-parseable by
/// [`Algorithm::add_rule`](crate::markov::Algorithm::add_rule).
pub fn serialize_rule(rule: &Rule) -> String {
    let arrow = if rule.terminal { "=>" } else { "->" };
    format!("{}{}{}", rule.pattern, arrow, rule.replacement)
}

/// Serializes one state row back to `name spec spec ...` form with `-` for
/// undefined slots, re-parseable by
/// [`Machine::add_state`](crate::machine::Machine::add_state).
pub fn serialize_state(name: &str, rules: &[Option<Transition>]) -> String {
    let mut line = name.to_string();
    for slot in rules {
        line.push(' ');
        match slot {
            Some(transition) => {
                line.push(transition.write);
                line.push(',');
                line.push_str(&transition.movement.to_string());
                line.push(',');
                line.push_str(&transition.next);
            }
            None => line.push('-'),
        }
    }
    line
}

/// Serializes a whole machine to the line-oriented source format: the
/// alphabet line followed by one state line per row, in insertion order.
pub fn serialize_machine(machine: &Machine) -> String {
    let mut lines = vec![machine
        .alphabet()
        .iter()
        .map(|symbol| symbol.to_string())
        .collect::<Vec<_>>()
        .join(" ")];

    for (name, rules) in machine.states() {
        lines.push(serialize_state(name, rules));
    }

    lines.join("\n")
}

/// Emits a standalone Rust program that rebuilds `algorithm` rule by rule
/// and executes it against every whitespace-stripped line of stdin.
pub fn compile_algorithm(algorithm: &Algorithm) -> String {
    let mut out = String::from(ALGORITHM_PRELUDE);

    for rule in algorithm.rules() {
        out.push_str(&format!(
            "    algorithm.add_rule({}).expect(\"invalid rule\");\n",
            quote(&serialize_rule(rule))
        ));
    }

    out.push_str(ALGORITHM_EPILOGUE);
    out
}

/// Emits a standalone Rust program that rebuilds `machine` with its exact
/// alphabet and state table and executes it against every line of stdin.
pub fn compile_machine(machine: &Machine) -> String {
    let mut out = String::from(MACHINE_PRELUDE);

    let alphabet = machine
        .alphabet()
        .iter()
        .map(|symbol| format!("'{}'", symbol.escape_default()))
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!(
        "    let mut machine = Machine::new(vec![{alphabet}]).expect(\"invalid alphabet\");\n"
    ));

    for (name, rules) in machine.states() {
        out.push_str(&format!(
            "    machine.add_state({}).expect(\"invalid state\");\n",
            quote(&serialize_state(name, rules))
        ));
    }
    out.push_str("    machine.check().expect(\"incomplete machine\");\n");

    out.push_str(MACHINE_EPILOGUE);
    out
}

/// Renders `text` as a double-quoted Rust string literal, escaping quote
/// and backslash characters.
fn quote(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for c in text.chars() {
        literal.extend(c.escape_default());
    }
    literal.push('"');
    literal
}
