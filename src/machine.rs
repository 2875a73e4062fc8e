//! Single-tape Turing machine engine: an alphabet, per-state transition rows
//! indexed by alphabet position, and a sparse bi-infinite tape.

use std::collections::{BTreeMap, HashMap};

use crate::codegen;
use crate::types::{Direction, Fault, Transition, BLANK_SYMBOL, START_STATE, TERM_STATE};

/// One row of the state table: a state name plus one transition slot per
/// alphabet symbol, in alphabet order. `None` marks an undefined transition.
#[derive(Debug, Clone)]
struct StateRow {
    name: String,
    rules: Vec<Option<Transition>>,
}

/// A deterministic single-tape Turing machine.
///
/// The machine owns its alphabet and state table plus transient run state:
/// the current state name, the head position and the tape. All three are
/// `None` until [`init_tape`](Machine::init_tape) succeeds, and are
/// repopulated on every [`execute`](Machine::execute) call.
///
/// The tape is conceptually bi-infinite and stored as a sparse map keyed by
/// signed cell index; an absent key reads as the blank symbol, so leftward
/// growth needs no re-indexing.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Vec<char>,
    states: Vec<StateRow>,
    index: HashMap<String, usize>,
    state: Option<String>,
    head: Option<i64>,
    tape: Option<BTreeMap<i64, char>>,
}

impl Machine {
    /// Creates a machine over the given alphabet.
    ///
    /// The alphabet must contain the blank symbol `_` and must not repeat a
    /// symbol; either violation is a [`Fault::Syntax`].
    pub fn new(alphabet: Vec<char>) -> Result<Self, Fault> {
        if !alphabet.contains(&BLANK_SYMBOL) {
            return Err(Fault::Syntax(format!(
                "missing {BLANK_SYMBOL:?} symbol in alphabet"
            )));
        }

        for (i, symbol) in alphabet.iter().enumerate() {
            if alphabet[..i].contains(symbol) {
                return Err(Fault::Syntax(format!(
                    "duplicate symbol in alphabet: {symbol}"
                )));
            }
        }

        Ok(Self {
            alphabet,
            states: Vec::new(),
            index: HashMap::new(),
            state: None,
            head: None,
            tape: None,
        })
    }

    /// Builds a machine from line-oriented source text.
    ///
    /// The first line is the whitespace-separated alphabet; every following
    /// non-blank line is fed to [`add_state`](Machine::add_state), and
    /// [`check`](Machine::check) runs at the end. Zero lines is a
    /// [`Fault::Syntax`].
    pub fn build<'a, I>(lines: I) -> Result<Self, Fault>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut lines = lines.into_iter();
        let Some(first) = lines.next() else {
            return Err(Fault::Syntax("empty source".to_string()));
        };

        let mut machine = Self::new(parse_alphabet(first)?)?;
        for line in lines {
            if !line.trim().is_empty() {
                machine.add_state(line)?;
            }
        }

        machine.check()?;
        Ok(machine)
    }

    /// Parses one state line and inserts its transition row.
    ///
    /// The first whitespace-separated token is the state name; the remaining
    /// tokens are one transition spec per alphabet symbol, in alphabet
    /// order. A spec of exactly `-` stores an undefined slot; otherwise it
    /// is `write,move,next` with `move` one of `L`/`N`/`R`, an empty `write`
    /// defaulting to the column's alphabet symbol and an empty `next`
    /// defaulting to the state itself. The whole row is parsed before it is
    /// committed, so a failed call never leaves a partial entry. A blank
    /// line is ignored.
    pub fn add_state(&mut self, line: &str) -> Result<(), Fault> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(());
        };
        let specs: Vec<&str> = tokens.collect();

        if specs.len() != self.alphabet.len() {
            return Err(Fault::Syntax(format!(
                "wrong count of rules ({}/{}): {}",
                specs.len(),
                self.alphabet.len(),
                line.trim()
            )));
        }

        if name == TERM_STATE || self.index.contains_key(name) {
            return Err(Fault::Syntax(format!("double definition of state: {name}")));
        }

        let mut rules = Vec::with_capacity(specs.len());
        for (column, spec) in specs.iter().enumerate() {
            rules.push(parse_transition(name, self.alphabet[column], spec)?);
        }

        self.index.insert(name.to_string(), self.states.len());
        self.states.push(StateRow {
            name: name.to_string(),
            rules,
        });

        Ok(())
    }

    /// Validates global consistency before a run.
    ///
    /// The start state `0` must exist, every defined next-state must be the
    /// terminal token or name an existing state, and at least one transition
    /// in the whole table must target the terminal token.
    pub fn check(&self) -> Result<(), Fault> {
        if !self.index.contains_key(START_STATE) {
            return Err(Fault::Syntax("undefined start state".to_string()));
        }

        let mut has_term = false;
        for row in &self.states {
            for transition in row.rules.iter().flatten() {
                if transition.next == TERM_STATE {
                    has_term = true;
                } else if !self.index.contains_key(&transition.next) {
                    return Err(Fault::Syntax(format!(
                        "unexpected state: {}",
                        transition.next
                    )));
                }
            }
        }

        if !has_term {
            return Err(Fault::Syntax("missing terminal state".to_string()));
        }

        Ok(())
    }

    /// Positions the machine at the start of the given input.
    ///
    /// Runs [`check`](Machine::check) first, then validates that every input
    /// character is an alphabet symbol or whitespace (whitespace is input
    /// sugar for blank and is never stored raw). Any other character is a
    /// [`Fault::Runtime`], and on failure `state`/`head`/`tape` stay unset.
    /// On success the state is the start state, the head is at cell 0 and
    /// the tape holds the input index-by-index.
    pub fn init_tape(&mut self, input: &str) -> Result<(), Fault> {
        self.check()?;

        for c in input.chars() {
            if !self.alphabet.contains(&c) && !c.is_whitespace() {
                return Err(Fault::Runtime(format!("invalid symbol: {c:?}")));
            }
        }

        let tape = input
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let symbol = if c.is_whitespace() { BLANK_SYMBOL } else { c };
                (i as i64, symbol)
            })
            .collect();

        self.state = Some(START_STATE.to_string());
        self.head = Some(0);
        self.tape = Some(tape);

        Ok(())
    }

    /// Performs one transition.
    ///
    /// Reads the symbol under the head (blank when the cell was never
    /// written), looks up the transition for the current state by alphabet
    /// column, writes, moves and switches state. An undefined transition is
    /// a [`Fault::Runtime`], as is stepping a machine whose tape was never
    /// initialized.
    pub fn execute_once(&mut self) -> Result<(), Fault> {
        let (state, head) = match (&self.state, self.head) {
            (Some(state), Some(head)) => (state.clone(), head),
            _ => return Err(Fault::Runtime("machine is not initialized".to_string())),
        };
        let Some(tape) = self.tape.as_mut() else {
            return Err(Fault::Runtime("machine is not initialized".to_string()));
        };

        let symbol = tape.get(&head).copied().unwrap_or(BLANK_SYMBOL);
        let Some(column) = self.alphabet.iter().position(|&c| c == symbol) else {
            return Err(Fault::Runtime(format!("unexpected symbol: {symbol}")));
        };

        let row = match self.index.get(&state) {
            Some(&i) => &self.states[i],
            None => {
                return Err(Fault::Runtime(format!("no transitions from state: {state}")));
            }
        };
        let transition = row.rules[column]
            .clone()
            .ok_or_else(|| Fault::Runtime(format!("unexpected symbol: {symbol}")))?;

        tape.insert(head, transition.write);
        self.head = Some(head + transition.movement.offset());
        self.state = Some(transition.next);

        Ok(())
    }

    /// Runs the machine against `input` until the terminal state.
    ///
    /// Initializes the tape, then repeats
    /// [`execute_once`](Machine::execute_once) until the current state is
    /// the terminal token, raising [`Fault::Timeout`] if `max_steps` steps
    /// elapse first. Returns the rendered tape.
    pub fn execute(&mut self, input: &str, max_steps: Option<usize>) -> Result<String, Fault> {
        self.init_tape(input)?;
        let mut counter = 0;

        loop {
            self.execute_once()?;
            if self.state.as_deref() == Some(TERM_STATE) {
                break;
            }

            counter += 1;
            if let Some(max) = max_steps {
                if counter >= max {
                    return Err(Fault::Timeout(max));
                }
            }
        }

        Ok(self.get_tape())
    }

    /// Renders the written span of the tape as a string.
    ///
    /// Covers the closed interval from the lowest to the highest written
    /// cell, substituting a space for the blank symbol, then trims leading
    /// and trailing spaces. Interior blanks are preserved. A tape with no
    /// written cell renders as the empty string.
    pub fn get_tape(&self) -> String {
        let Some(tape) = self.tape.as_ref() else {
            return String::new();
        };
        let (Some((&min, _)), Some((&max, _))) = (tape.iter().next(), tape.iter().next_back())
        else {
            return String::new();
        };

        (min..=max)
            .map(|i| match tape.get(&i).copied().unwrap_or(BLANK_SYMBOL) {
                BLANK_SYMBOL => ' ',
                symbol => symbol,
            })
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Emits a standalone Rust program reconstructing this machine and
    /// executing it against every line of stdin.
    pub fn compile(&self) -> String {
        codegen::compile_machine(self)
    }

    /// The alphabet, in column order.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// State rows in insertion order, as `(name, transitions)` pairs.
    pub fn states(&self) -> impl Iterator<Item = (&str, &[Option<Transition>])> {
        self.states
            .iter()
            .map(|row| (row.name.as_str(), row.rules.as_slice()))
    }

    /// The transition row for a state, if defined.
    pub fn state_rules(&self, name: &str) -> Option<&[Option<Transition>]> {
        self.index.get(name).map(|&i| self.states[i].rules.as_slice())
    }

    /// Current state name; `None` until the tape is initialized.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Current head position; `None` until the tape is initialized.
    pub fn head(&self) -> Option<i64> {
        self.head
    }

    /// The sparse tape; `None` until the tape is initialized.
    pub fn tape(&self) -> Option<&BTreeMap<i64, char>> {
        self.tape.as_ref()
    }
}

fn parse_alphabet(line: &str) -> Result<Vec<char>, Fault> {
    line.split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => Ok(symbol),
                _ => Err(Fault::Syntax(format!(
                    "alphabet symbols must be single characters: {token}"
                ))),
            }
        })
        .collect()
}

fn parse_transition(
    state: &str,
    column_symbol: char,
    spec: &str,
) -> Result<Option<Transition>, Fault> {
    if spec == "-" {
        return Ok(None);
    }

    let fields: Vec<&str> = spec.split(',').collect();
    let [write, movement, next] = fields.as_slice() else {
        return Err(Fault::Syntax(format!("wrong format of rule: {spec}")));
    };

    let Some(movement) = Direction::from_letter(movement) else {
        return Err(Fault::Syntax(format!("wrong format of rule: {spec}")));
    };

    let write = if write.is_empty() {
        column_symbol
    } else {
        let mut chars = write.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => symbol,
            _ => return Err(Fault::Syntax(format!("wrong format of rule: {spec}"))),
        }
    };

    let next = if next.is_empty() {
        state.to_string()
    } else {
        next.to_string()
    };

    Ok(Some(Transition {
        write,
        movement,
        next,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> Machine {
        Machine::new(vec!['a', 'b', 'c', '_']).unwrap()
    }

    fn transition(write: char, movement: Direction, next: &str) -> Option<Transition> {
        Some(Transition {
            write,
            movement,
            next: next.to_string(),
        })
    }

    #[test]
    fn test_machine_init() {
        let machine = machine();
        assert_eq!(machine.alphabet(), &['a', 'b', 'c', '_']);
        assert!(machine.state().is_none());
        assert!(machine.head().is_none());
        assert!(machine.tape().is_none());
    }

    #[test]
    fn test_missing_blank_symbol() {
        let result = Machine::new(vec!['a']);
        assert!(matches!(result, Err(Fault::Syntax(_))));
    }

    #[test]
    fn test_duplicate_alphabet_symbol() {
        let result = Machine::new(vec!['a', 'a', '_']);
        assert!(matches!(result, Err(Fault::Syntax(_))));
    }

    #[test]
    fn test_add_state_with_defaults() {
        let mut machine = machine();

        // Empty write defaults to the column symbol, empty next to the
        // state itself.
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,1").unwrap();
        assert_eq!(
            machine.state_rules("0").unwrap(),
            &[
                transition('a', Direction::Right, "0"),
                transition('b', Direction::Right, "0"),
                transition('c', Direction::Right, "0"),
                transition('a', Direction::Stay, "1"),
            ]
        );

        machine.add_state("1  ,L,  ,L,  ,L,  _,R,!").unwrap();
        assert_eq!(
            machine.state_rules("1").unwrap(),
            &[
                transition('a', Direction::Left, "1"),
                transition('b', Direction::Left, "1"),
                transition('c', Direction::Left, "1"),
                transition('_', Direction::Right, "!"),
            ]
        );

        assert_eq!(machine.states().count(), 2);
    }

    #[test]
    fn test_add_state_undefined_slot() {
        let mut machine = machine();
        machine.add_state("0 - - - a,N,!").unwrap();

        let rules = machine.state_rules("0").unwrap();
        assert_eq!(rules[0], None);
        assert_eq!(rules[3], transition('a', Direction::Stay, "!"));
    }

    #[test]
    fn test_add_state_syntax_faults() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();
        machine.add_state("").unwrap();

        let bad_lines = [
            "0  ,R,  ,R,  ,R,  a,N,!",    // duplicate state
            "!  ,R,  ,R,  ,R,  a,N,2",    // reserved terminal token
            "1  R,  ,R,  ,R,  a,N,!",     // one comma
            "2  ,,R,  ,R,  ,R,  a,N,!",   // too many commas
            "3  ,R, ,R,  ,R,  ,R,  a,N,!", // too many rules
            "4  ,R,  ,,  ,R,  a,N,!",     // missing movement
            "5  ,R,  ,R,  a,N,!",         // missing rule
            "6  ,X,  ,R,  ,R,  a,N,!",    // unknown movement letter
            "7  ab,R,  ,R,  ,R,  a,N,!",  // multi-character write
        ];
        for bad in bad_lines {
            let result = machine.add_state(bad);
            assert!(
                matches!(result, Err(Fault::Syntax(_))),
                "expected syntax fault for {bad:?}"
            );
        }

        // Failed calls must not leave partially populated rows behind.
        assert_eq!(machine.states().count(), 1);
        assert!(machine.state_rules("1").is_none());
    }

    #[test]
    fn test_check_semantics() {
        let mut machine = machine();
        assert!(matches!(machine.check(), Err(Fault::Syntax(_))));

        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();
        machine.check().unwrap();

        machine.add_state("1  ,L,  ,L,  ,L,  a,R,2").unwrap();
        assert!(matches!(machine.check(), Err(Fault::Syntax(_))));

        machine.add_state("2  ,L,  ,L,  ,L,  a,R,2").unwrap();
        machine.check().unwrap();
    }

    #[test]
    fn test_check_requires_terminal_reachability() {
        let mut machine = Machine::new(vec!['a', '_']).unwrap();
        machine.add_state("0 ,L, ,R,").unwrap();
        assert!(matches!(machine.check(), Err(Fault::Syntax(_))));
    }

    #[test]
    fn test_init_tape_requires_complete_machine() {
        let mut machine = machine();

        assert!(matches!(machine.init_tape("abacab"), Err(Fault::Syntax(_))));
        assert!(machine.state().is_none());
        assert!(machine.head().is_none());
        assert!(machine.tape().is_none());
    }

    #[test]
    fn test_init_tape_rejects_invalid_symbols() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();

        assert!(matches!(machine.init_tape("addd"), Err(Fault::Runtime(_))));
        assert!(machine.state().is_none());
        assert!(machine.head().is_none());
        assert!(machine.tape().is_none());
    }

    #[test]
    fn test_init_tape() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();

        machine.init_tape("abacab").unwrap();
        assert_eq!(machine.head(), Some(0));
        assert_eq!(machine.state(), Some(START_STATE));

        let tape = machine.tape().unwrap();
        let cells: String = (0..6).map(|i| tape[&i]).collect();
        assert_eq!(cells, "abacab");
    }

    #[test]
    fn test_get_tape_trims_outer_blanks_only() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();

        machine.init_tape("   aba caba_caba  caba   ").unwrap();
        assert_eq!(machine.get_tape(), "aba caba caba  caba");
    }

    #[test]
    fn test_get_tape_on_empty_tape() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();

        machine.init_tape("").unwrap();
        assert_eq!(machine.get_tape(), "");
    }

    #[test]
    fn test_execute_once_trace() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  c,L,!").unwrap();
        machine.init_tape("ab").unwrap();

        machine.execute_once().unwrap();
        assert_eq!(machine.head(), Some(1));
        assert_eq!(machine.state(), Some("0"));
        assert_eq!(machine.tape().unwrap()[&0], 'a');
        assert_eq!(machine.tape().unwrap()[&1], 'b');

        machine.execute_once().unwrap();
        assert_eq!(machine.head(), Some(2));
        assert_eq!(machine.state(), Some("0"));
        assert!(!machine.tape().unwrap().contains_key(&2));

        // The head now sits on a never-written cell, which reads as blank.
        machine.execute_once().unwrap();
        assert_eq!(machine.head(), Some(1));
        assert_eq!(machine.state(), Some(TERM_STATE));
        assert_eq!(machine.tape().unwrap()[&2], 'c');

        assert_eq!(machine.get_tape(), "abc");
    }

    #[test]
    fn test_execute_once_uninitialized() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();

        assert!(matches!(machine.execute_once(), Err(Fault::Runtime(_))));
    }

    #[test]
    fn test_execute_appends_letter() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();

        let result = machine.execute("abacab", Some(500)).unwrap();
        assert_eq!(result, "abacaba");
    }

    #[test]
    fn test_execute_invalid_input() {
        let mut machine = machine();
        machine.add_state("0  ,R,  ,R,  ,R,  a,N,!").unwrap();

        assert!(matches!(
            machine.execute("daba", Some(500)),
            Err(Fault::Runtime(_))
        ));
    }

    #[test]
    fn test_execute_timeout() {
        let mut machine = Machine::new(vec!['a', 'b', '_']).unwrap();
        machine.add_state("0 ,R, ,N,! ,R,").unwrap();

        // Input never contains `b`, so the terminal transition never fires.
        let result = machine.execute("aaa", Some(500));
        assert_eq!(result, Err(Fault::Timeout(500)));
    }

    #[test]
    fn test_execute_grows_tape_leftward() {
        let mut machine = Machine::new(vec!['a', '_']).unwrap();
        // Walk left once from the start, write `a` on the fresh cell, halt.
        machine.add_state("0 ,L,1 ,L,1").unwrap();
        machine.add_state("1 a,N,! a,N,!").unwrap();

        let result = machine.execute("a", Some(10)).unwrap();
        assert_eq!(result, "aa");
        assert_eq!(machine.head(), Some(-1));
    }

    #[test]
    fn test_build() {
        let machine = Machine::build([
            "a b c _",
            "",
            "0  ,R,  ,R,  ,R,  a,N,!",
        ])
        .unwrap();

        assert_eq!(machine.alphabet(), &['a', 'b', 'c', '_']);
        assert_eq!(machine.states().count(), 1);
    }

    #[test]
    fn test_build_empty_source() {
        let result = Machine::build([]);
        assert!(matches!(result, Err(Fault::Syntax(_))));
    }

    #[test]
    fn test_build_runs_check() {
        // No transition targets the terminal token.
        let result = Machine::build(["a _", "0 ,R, ,R,"]);
        assert!(matches!(result, Err(Fault::Syntax(_))));
    }
}
