pub mod util;
pub mod interpreter;
pub mod error;
pub mod repl;

use std::path::PathBuf;
use clap::Parser as ClapParser;
use tracing::debug;
use crate::interpreter::ast::Program;
use crate::interpreter::environment::{make_environment, Env};
use crate::interpreter::evaluator::eval;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::object::Object;
use crate::interpreter::parser::Parser;

pub use crate::error::Error;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Source file to run; starts a REPL if omitted")]
    pub input: Option<PathBuf>,

    #[clap(long, help = "Print the parsed program instead of evaluating it")]
    pub print_ast: bool,
    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

pub fn run(config: Config) -> Result<(), Error> {
    let input = match config.input {
        Some(input) => input,
        None => {
            let stdin = std::io::stdin();
            repl::start(stdin.lock(), std::io::stdout(), config.print_ast)?;

            return Ok(());
        },
    };

    debug!(path = %input.display(), "running file");

    let source = std::fs::read_to_string(&input)?;
    let program = parse(&source)?;

    if config.print_ast {
        println!("{}", program);
    } else {
        println!("{}", eval(&program, &make_environment()).inspect());
    }

    Ok(())
}

/// Parses and evaluates `source` in `env`.
///
/// Nothing is evaluated if the parser recorded any error; the messages are returned in
/// [`Error::Parse`] instead. Runtime failures are not Rust errors: they come back as an
/// [`Object::Error`] value.
pub fn interpret(source: &str, env: &Env) -> Result<Object, Error> {
    let program = parse(source)?;
    Ok(eval(&program, env))
}

fn parse(source: &str) -> Result<Program, Error> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    if parser.had_error() {
        return Err(Error::Parse(parser.errors()));
    }

    Ok(program)
}
