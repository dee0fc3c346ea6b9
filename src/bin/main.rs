use clap::Parser;
use log::LevelFilter;
use monkey_lang::{repl, InterpretError, Interpreter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "The Monkey programming language", long_about = None)]
struct Args {
    /// Evaluate this file instead of starting the REPL
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Prompt shown by the REPL
    #[arg(long, default_value = ">> ")]
    prompt: String,

    /// Log more (-v info, -vv debug, -vvv trace). Without it RUST_LOG applies.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();

    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }

    builder.init();
}

fn run_file(path: &Path) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match Interpreter::new().eval(&source) {
        Ok(evaluated) => {
            println!("{}", evaluated);
            ExitCode::SUCCESS
        }
        Err(InterpretError::Parse(errors)) => {
            eprintln!("Parser errors:");
            for error in errors {
                eprintln!("\t{}", error);
            }
            ExitCode::FAILURE
        }
        Err(InterpretError::Eval(err)) => {
            eprintln!("ERROR: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(path) = &args.file {
        return run_file(path);
    }

    println!("Hello! This is the Monkey programming language!");
    println!("Feel free to type in commands");

    let stdin = io::stdin();
    match repl::start(stdin.lock(), io::stdout(), &args.prompt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error talking to the terminal: {}", e);
            ExitCode::FAILURE
        }
    }
}
