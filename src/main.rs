use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rust_rowdb::{DbError, InputType, MetaCommand, Statement, Table};

/// A tiny single-table database with a line-oriented prompt.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Database file, created if it does not exist
    filename: PathBuf,
}

struct InputBuffer {
    buffer: String,
}

impl InputBuffer {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Returns false once stdin is exhausted.
    fn read_input(&mut self) -> io::Result<bool> {
        self.buffer.clear();
        let bytes_read = io::stdin().read_line(&mut self.buffer)?;
        self.buffer = self.buffer.trim().to_string();
        Ok(bytes_read > 0)
    }
}

fn print_prompt() -> io::Result<()> {
    print!("db > ");
    io::stdout().flush()
}

fn execute_statement(statement: Statement, table: &mut Table) -> Result<(), DbError> {
    match statement {
        Statement::Insert(row) => table.insert(&row)?,
        Statement::Select => {
            for row in table.select_all() {
                println!("{}", row?);
            }
        }
    }
    println!("Executed.");
    Ok(())
}

fn run(table: &mut Table) -> Result<(), DbError> {
    let mut input_buffer = InputBuffer::new();

    loop {
        print_prompt()?;
        if !input_buffer.read_input()? {
            let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "Error reading input");
            return Err(eof.into());
        }

        let result = InputType::parse(&input_buffer.buffer).and_then(|input| match input {
            InputType::Meta(MetaCommand::Exit) => Ok(false),
            InputType::Statement(statement) => execute_statement(statement, table).map(|_| true),
        });

        match result {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => println!("{e}"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut table = match Table::open(&cli.filename) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Unable to open {}: {e}", cli.filename.display());
            return ExitCode::FAILURE;
        }
    };

    // Close on every path; a failed flush is reported next to whatever
    // ended the session.
    let outcome = run(&mut table);
    let closed = table.close();

    let mut status = ExitCode::SUCCESS;
    for e in [outcome.err(), closed.err()].into_iter().flatten() {
        eprintln!("{e}");
        status = ExitCode::FAILURE;
    }
    status
}
