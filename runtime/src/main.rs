use std::env;
use std::path::Path;
use std::process;

use iris::Seq;
use iris_runtime::{Config, RunError, Runtime, init_tracing};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

const PROMPT: &str = ">>> ";

fn repl(config: Config) -> Result<(), ReadlineError> {
    let history = config.history_file.clone();
    let runtime = Runtime::new(config);
    let mut rl = DefaultEditor::new()?;
    if let Some(path) = &history {
        // A missing history file is expected on first start
        let _ = rl.load_history(path);
    }

    println!("Iris REPL");
    println!("Type expressions to evaluate, (quit) or Ctrl-D to exit");
    println!();

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                // (quit) never returns here
                if let Some(path) = &history {
                    save_history(&mut rl, path);
                }

                match runtime.run_str(line) {
                    Ok(result) => println!("{}", result.repr()),
                    Err(RunError::Script { error, .. }) => println!("{}", error.repr()),
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn save_history(rl: &mut DefaultEditor, path: &Path) {
    if let Err(e) = rl.save_history(path) {
        warn!(path = %path.display(), error = %e, "failed to save history");
    }
}

fn run_file(config: Config, args: &[String]) -> Result<(), RunError> {
    let runtime = Runtime::with_argv(config, Seq::from_strs(args));
    runtime.run_file(Path::new(&args[0]))?;
    Ok(())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  iris                     Start interactive REPL");
    eprintln!("  iris <file> [args...]    Run a source file, binding *argv*");
    eprintln!("  iris --help              Show this help message");
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env();

    match args.first().map(String::as_str) {
        None => {
            if let Err(e) = repl(config) {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
        Some("--help") | Some("-h") => print_usage(),
        Some(_) => {
            if let Err(e) = run_file(config, &args) {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    }
}
