//! Simple command that prints one or '-n count' UUIDv4 strings, or validates '-p uuid' strings

use std::{env, io, io::Write, process::ExitCode};

use tracing_subscriber::EnvFilter;
use uuid4ctr::Uuid;

enum Command {
    Generate(usize),
    Parse(Vec<String>),
}

fn main() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let command = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count | -p uuid...]",
                    program.as_deref().unwrap_or("uuid4ctr")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let mut buf = io::BufWriter::new(io::stdout());
    match command {
        Command::Generate(count) => {
            uuid4ctr::ensure_initialized();
            for _ in 0..count {
                writeln!(buf, "{}", uuid4ctr::uuid4())?;
            }
        }
        Command::Parse(inputs) => {
            let mut all_valid = true;
            for input in inputs {
                let (uuid, ok) = Uuid::parse_or_nil(&input);
                if ok {
                    writeln!(buf, "{}\t{:?}", uuid, uuid.variant())?;
                } else {
                    all_valid = false;
                    writeln!(buf, "{}\tinvalid", uuid)?;
                }
            }
            if !all_valid {
                buf.flush()?;
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let Some(arg) = args.next() else {
        return Ok(Command::Generate(1));
    };
    match arg.as_str() {
        "-n" => {
            let Some(n_arg) = args.next() else {
                return Err("argument to option 'n' missing".to_owned());
            };
            let Ok(count) = n_arg.parse() else {
                return Err(format!("invalid argument to option 'n': '{}'", n_arg));
            };
            if let Some(extra) = args.next() {
                return Err(format!("unrecognized argument '{}'", extra));
            }
            Ok(Command::Generate(count))
        }
        "-p" => {
            let inputs: Vec<String> = args.collect();
            if inputs.is_empty() {
                return Err("argument to option 'p' missing".to_owned());
            }
            Ok(Command::Parse(inputs))
        }
        _ => Err(format!("unrecognized argument '{}'", arg)),
    }
}
