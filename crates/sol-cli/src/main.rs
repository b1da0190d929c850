use std::{
    env, fs,
    io::{self, Write},
    process::ExitCode,
};

use sol::{EvalTracer, NoopTracer, RunError, Runner, Session, StdPrint, StderrTracer, Value, statement_complete};

fn main() -> ExitCode {
    let mut debug = false;
    let mut path: Option<String> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--debug" => debug = true,
            other if other.starts_with('-') => {
                eprintln!("unknown option: {other}");
                eprintln!("usage: sol [file] [--debug]");
                return ExitCode::FAILURE;
            }
            other => {
                if path.is_some() {
                    eprintln!("usage: sol [file] [--debug]");
                    return ExitCode::FAILURE;
                }
                path = Some(other.to_owned());
            }
        }
    }

    match (path, debug) {
        (Some(path), true) => run_file(&path, &mut StderrTracer::new()),
        (Some(path), false) => run_file(&path, &mut NoopTracer),
        (None, true) => interactive(&mut StderrTracer::new()),
        (None, false) => interactive(&mut NoopTracer),
    }
}

/// File mode: parse the whole file up front, then evaluate statements in
/// order. Uncaught errors print to stderr and exit 1; `exit` and
/// `unwrap_or_exit` set the process exit code directly.
fn run_file<T: EvalTracer>(path: &str, tracer: &mut T) -> ExitCode {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let runner = match Runner::new(&source) {
        Ok(runner) => runner,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };
    // bind first so the print writer is dropped (and stdout flushed) before
    // the process code is returned
    let result = runner.run(&mut StdPrint::new(), tracer);
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(RunError::Error(error)) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
        Err(RunError::Exit(code)) => exit_code(code),
    }
}

/// Interactive mode: read lines until a statement-terminating period is
/// seen, evaluate against a persistent session, and echo bare-expression
/// values. Errors abort only the current statement.
fn interactive<T: EvalTracer>(tracer: &mut T) -> ExitCode {
    let mut session = Session::new("<stdin>");
    let mut source = String::new();

    loop {
        let prompt = if source.is_empty() { ">>> " } else { "... " };
        let Some(line) = read_line(prompt) else {
            println!();
            break;
        };

        if source.is_empty() && line.trim().is_empty() {
            continue;
        }
        if !source.is_empty() {
            source.push('\n');
        }
        source.push_str(&line);

        if !statement_complete(&source) {
            continue;
        }

        // bind first so the print writer is dropped (and echo output flushed)
        // before the bare value is printed
        let result = session.execute(&source, &mut StdPrint::new(), tracer);
        match result {
            Ok(value) => {
                if value != Value::Null {
                    println!("{}", value.render());
                }
            }
            Err(RunError::Error(error)) => eprintln!("{error}"),
            Err(RunError::Exit(code)) => return exit_code(code),
        }
        source.clear();
    }

    ExitCode::SUCCESS
}

fn read_file(path: &str) -> Result<String, String> {
    match fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("error: {path} is not a file"));
            }
        }
        Err(error) => return Err(format!("error reading {path}: {error}")),
    }
    fs::read_to_string(path).map_err(|error| format!("error reading {path}: {error}"))
}

/// Reads one line from stdin after printing a prompt.
///
/// Returns `None` on EOF (Ctrl+D).
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    if io::stdout().flush().is_err() {
        return None;
    }
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input).ok()?;
    if read == 0 {
        return None;
    }
    Some(input.trim_end_matches(['\r', '\n']).to_owned())
}

/// Maps a Sol exit code onto the process exit code, wrapping to the 0..=255
/// range the platform supports.
fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code.rem_euclid(256) as u8)
}
