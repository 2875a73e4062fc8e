use std::fmt;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tumark::loader::{LoadError, SourceLoader};
use tumark::programs::{find_demo, DemoKind, DEMOS};
use tumark::Fault;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program file against every line of stdin
    Run {
        /// Which engine interprets the file
        #[clap(value_enum)]
        engine: EngineKind,

        /// The program file to execute
        file: PathBuf,

        /// Step budget per input line; unbounded when omitted
        #[clap(short, long)]
        max_steps: Option<usize>,
    },

    /// Emit an equivalent standalone Rust program to stdout
    Compile {
        /// Which engine interprets the file
        #[clap(value_enum)]
        engine: EngineKind,

        /// The program file to compile
        file: PathBuf,
    },

    /// List the embedded demo programs
    Demos,

    /// Run an embedded demo program against every line of stdin
    Demo {
        /// Demo name, as listed by `demos`
        name: String,

        /// Step budget per input line; unbounded when omitted
        #[clap(short, long)]
        max_steps: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineKind {
    Markov,
    Turing,
}

#[derive(Debug)]
enum CliError {
    Load(LoadError),
    Fault(Fault),
    Io(io::Error),
    UnknownDemo(String),
}

impl CliError {
    fn fault(&self) -> Option<&Fault> {
        match self {
            CliError::Fault(fault) => Some(fault),
            CliError::Load(LoadError::Fault(fault)) => Some(fault),
            _ => None,
        }
    }

    /// Distinct exit codes per fault kind, so harnesses can tell a bad
    /// definition from a bad tape from a blown step budget.
    fn code(&self) -> u8 {
        match self.fault() {
            Some(Fault::Syntax(_)) => 2,
            Some(Fault::Runtime(_)) => 3,
            Some(Fault::Timeout(_)) => 4,
            None => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Load(error) => write!(f, "{error}"),
            CliError::Fault(error) => write!(f, "{error}"),
            CliError::Io(error) => write!(f, "failed to read input: {error}"),
            CliError::UnknownDemo(name) => write!(f, "no demo named {name:?}"),
        }
    }
}

impl From<LoadError> for CliError {
    fn from(error: LoadError) -> Self {
        CliError::Load(error)
    }
}

impl From<Fault> for CliError {
    fn from(error: Fault) -> Self {
        CliError::Fault(error)
    }
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        CliError::Io(error)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(error.code())
        }
    }
}

fn dispatch(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run {
            engine,
            file,
            max_steps,
        } => run(engine, &file, max_steps),
        Command::Compile { engine, file } => compile(engine, &file),
        Command::Demos => {
            list_demos();
            Ok(())
        }
        Command::Demo { name, max_steps } => run_demo(&name, max_steps),
    }
}

fn run(engine: EngineKind, file: &Path, max_steps: Option<usize>) -> Result<(), CliError> {
    match engine {
        EngineKind::Markov => {
            let mut algorithm = SourceLoader::load_algorithm(file)?;
            for line in io::stdin().lock().lines() {
                let input: String = line?.split_whitespace().collect();
                println!("{}", algorithm.execute(&input, max_steps)?);
            }
        }
        EngineKind::Turing => {
            let mut machine = SourceLoader::load_machine(file)?;
            for line in io::stdin().lock().lines() {
                println!("{}", machine.execute(&line?, max_steps)?);
            }
        }
    }

    Ok(())
}

fn compile(engine: EngineKind, file: &Path) -> Result<(), CliError> {
    let code = match engine {
        EngineKind::Markov => SourceLoader::load_algorithm(file)?.compile(),
        EngineKind::Turing => SourceLoader::load_machine(file)?.compile(),
    };

    print!("{code}");
    Ok(())
}

fn list_demos() {
    for demo in DEMOS.iter() {
        let kind = match demo.kind {
            DemoKind::Markov => "markov",
            DemoKind::Turing => "turing",
        };
        println!("{:<12} {:<8} {}", demo.name, kind, demo.summary);
    }
}

fn run_demo(name: &str, max_steps: Option<usize>) -> Result<(), CliError> {
    let demo = find_demo(name).ok_or_else(|| CliError::UnknownDemo(name.to_string()))?;

    for line in io::stdin().lock().lines() {
        println!("{}", demo.run(&line?, max_steps)?);
    }

    Ok(())
}
