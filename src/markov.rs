//! Markov-algorithm engine: an ordered rule list applied to a string until a
//! terminal rule fires or no rule matches.

use crate::codegen;
use crate::types::{Fault, Rule};

/// A normal Markov algorithm: an ordered, append-only sequence of rewrite
/// rules plus the index of the rule applied by the most recent step.
///
/// `last_rule` distinguishes "no rule matched" from "a terminal rule
/// matched" when a run stops; it is reset at the start of every
/// [`execute`](Algorithm::execute) call.
#[derive(Debug, Clone, Default)]
pub struct Algorithm {
    rules: Vec<Rule>,
    last_rule: Option<usize>,
}

impl Algorithm {
    /// Creates an algorithm with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an algorithm by feeding every non-blank line to
    /// [`add_rule`](Algorithm::add_rule).
    pub fn build<'a, I>(lines: I) -> Result<Self, Fault>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut algorithm = Self::new();
        for line in lines {
            if !line.trim().is_empty() {
                algorithm.add_rule(line)?;
            }
        }
        Ok(algorithm)
    }

    /// Parses one rule line and appends it to the rule list.
    ///
    /// Accepted forms are `pattern -> replacement` (non-terminal) and
    /// `pattern => replacement` (terminal). Exactly one of the two arrow
    /// tokens must appear, exactly once; any other count or a mix of both
    /// arrows is a syntax fault. All whitespace is removed from each side,
    /// so `b c c cc -> c` defines the pattern `bcccc`. On failure nothing is
    /// appended.
    pub fn add_rule(&mut self, line: &str) -> Result<(), Fault> {
        let plain = line.matches("->").count();
        let terminal = line.matches("=>").count();

        let (arrow, terminal) = match (plain, terminal) {
            (1, 0) => ("->", false),
            (0, 1) => ("=>", true),
            _ => return Err(Fault::Syntax(format!("wrong rule format: {}", line.trim()))),
        };

        let Some((pattern, replacement)) = line.split_once(arrow) else {
            return Err(Fault::Syntax(format!("wrong rule format: {}", line.trim())));
        };

        self.rules.push(Rule {
            pattern: strip_whitespace(pattern),
            replacement: strip_whitespace(replacement),
            terminal,
        });

        Ok(())
    }

    /// Applies the first matching rule once.
    ///
    /// Rules are scanned in insertion order; the first rule whose pattern
    /// occurs as a substring fires at the leftmost occurrence, and
    /// `last_rule` records it. When no rule matches, `last_rule` is cleared
    /// and the string is returned unchanged. The empty pattern always
    /// matches at position 0.
    pub fn execute_once(&mut self, string: &str) -> String {
        for (i, rule) in self.rules.iter().enumerate() {
            if let Some(pos) = string.find(&rule.pattern) {
                self.last_rule = Some(i);

                let mut next =
                    String::with_capacity(string.len() + rule.replacement.len());
                next.push_str(&string[..pos]);
                next.push_str(&rule.replacement);
                next.push_str(&string[pos + rule.pattern.len()..]);
                return next;
            }
        }

        self.last_rule = None;
        string.to_string()
    }

    /// Runs the algorithm to completion.
    ///
    /// Repeats [`execute_once`](Algorithm::execute_once) until either no
    /// rule matched the previous step or the matched rule was terminal.
    /// With a step budget, [`Fault::Timeout`] is raised once `max_steps`
    /// steps have elapsed without stopping; without one, an algorithm such
    /// as `x -> xx` runs forever.
    pub fn execute(&mut self, string: &str, max_steps: Option<usize>) -> Result<String, Fault> {
        let mut string = string.to_string();
        let mut counter = 0;
        self.last_rule = None;

        loop {
            string = self.execute_once(&string);

            match self.last_rule {
                None => break,
                Some(i) if self.rules[i].terminal => break,
                Some(_) => {}
            }

            counter += 1;
            if let Some(max) = max_steps {
                if counter >= max {
                    return Err(Fault::Timeout(max));
                }
            }
        }

        Ok(string)
    }

    /// Emits a standalone Rust program that reconstructs this rule list and
    /// executes it against every line of stdin.
    pub fn compile(&self) -> String {
        codegen::compile_algorithm(self)
    }

    /// The ordered rule list.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rule applied by the most recent step, if any.
    pub fn last_rule(&self) -> Option<&Rule> {
        self.last_rule.map(|i| &self.rules[i])
    }
}

fn strip_whitespace(text: &str) -> String {
    text.split_whitespace().collect()
}
