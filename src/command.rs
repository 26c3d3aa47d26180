use crate::error::{DbError, Result};
use crate::row::Row;

// Non-SQL statements like .exit are called “meta-commands”.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
}

impl MetaCommand {
    fn parse(input: &str) -> Option<Result<MetaCommand>> {
        match input {
            ".exit" => Some(Ok(MetaCommand::Exit)),
            _ if input.starts_with('.') => {
                Some(Err(DbError::UnrecognizedMetaCommand(input.to_string())))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

impl Statement {
    fn parse(input: &str) -> Result<Statement> {
        let mut words = input.split_whitespace();
        match words.next() {
            Some("insert") => {
                let args: Vec<&str> = words.collect();
                let [id, username, email] = args[..] else {
                    return Err(DbError::Syntax);
                };
                let id: i32 = id.parse().map_err(|_| DbError::Syntax)?;
                Ok(Statement::Insert(Row::new(id, username, email)?))
            }
            Some("select") => match words.next() {
                None => Ok(Statement::Select),
                Some(_) => Err(DbError::Syntax),
            },
            _ => Err(DbError::UnrecognizedStatement(input.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    Meta(MetaCommand),
    Statement(Statement),
}

impl InputType {
    /// Classifies one trimmed input line.
    pub fn parse(input: &str) -> Result<InputType> {
        match MetaCommand::parse(input) {
            Some(meta) => meta.map(InputType::Meta),
            None => Statement::parse(input).map(InputType::Statement),
        }
    }
}
