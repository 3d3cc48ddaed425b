//! Splits a SQL script or dump and prints each executable statement with the
//! line it starts on.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=sqlsplit=debug cargo run -p sqlsplit --example split_dump -- dump.sql
//! ```
//!
//! Without a path the script is read from standard input. Pass `--raw` to
//! print the segments the splitter produced instead of classified
//! statements.

use std::{
    env,
    io::{self, Read},
    process::ExitCode,
};

use bstr::ByteSlice;
use sqlsplit::{ExecutableStatement, ScriptParser};
use tracing_subscriber::EnvFilter;

fn read_input(path: Option<&str>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut raw = false;
    let mut path = None;
    for arg in env::args().skip(1) {
        if arg == "--raw" {
            raw = true;
        } else {
            path = Some(arg);
        }
    }

    let input = match read_input(path.as_deref()) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("failed to read input: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut parser = ScriptParser::default();
    let result = if raw {
        parser.split(&input).map(|segments| {
            for segment in segments {
                println!("{:>6} {:?}: {}", segment.start_line, segment.kind, segment.text());
            }
        })
    } else {
        parser.parse(&input).map(|statements| {
            for statement in statements {
                let label = match &statement {
                    ExecutableStatement::Parsed(_) => "parsed",
                    ExecutableStatement::Unparsed(_) => "unparsed",
                };
                let text = statement.text();
                let first = text.lines().next().unwrap_or_default().as_bstr();
                println!("{:>6} {label:<8} {first}", statement.start_line());
            }
        })
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
