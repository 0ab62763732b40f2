use std::io::{BufRead, Write};
use tracing::debug;
use crate::interpreter::environment::make_environment;
use crate::interpreter::evaluator::eval;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;

pub const PROMPT: &str = "-> ";

/// Reads lines from `input` until it is exhausted, evaluating each one in a single shared root
/// environment and writing the result to `output`.
///
/// Parse errors are reported and the line is skipped; they never end the session. With
/// `print_ast`, each line's canonical syntax tree is written instead of being evaluated.
pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W, print_ast: bool) -> std::io::Result<()> {
    let env = make_environment();
    let mut line = String::new();

    debug!(print_ast, "starting REPL");

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();

        if input.read_line(&mut line)? == 0 {
            break;
        }

        let source = line.trim_end_matches(['\n', '\r']);

        if source.trim().is_empty() {
            continue;
        }

        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();

        if parser.had_error() {
            write_parser_errors(&mut output, &parser.errors())?;
            continue;
        }

        if print_ast {
            writeln!(output, "{}", program)?;
        } else {
            writeln!(output, "{}", eval(&program, &env).inspect())?;
        }
    }

    debug!("REPL input exhausted");
    Ok(())
}

pub fn write_parser_errors<W: Write>(output: &mut W, errors: &[String]) -> std::io::Result<()> {
    writeln!(output, "Parser errors:")?;

    for message in errors {
        writeln!(output, "\t{}", message)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use pretty_assertions::assert_eq;
    use super::*;

    fn session(input: &str, print_ast: bool) -> String {
        let mut output = Vec::new();
        start(Cursor::new(input), &mut output, print_ast).unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_bindings_persist_between_lines() {
        let output = session("let add = fn(a, b) { a + b };\nadd(2, 3)\n", false);

        assert_eq!("-> null\n-> 5\n-> ", output);
    }

    #[test]
    fn test_parse_errors_do_not_end_session() {
        let output = session("let = 5;\n\n1 + 1\n", false);

        assert_eq!(
            "-> Parser errors:\n\
             \t[line 1 column 5] expected next token to be IDENTIFIER, got = instead\n\
             \t[line 1 column 5] no prefix parse function for = found\n\
             -> -> 2\n-> ",
            output,
        );
    }

    #[test]
    fn test_runtime_errors_are_printed() {
        let output = session("missing\r\n", false);

        assert_eq!("-> Erroridentifier not found: missing\n-> ", output);
    }

    #[test]
    fn test_print_ast() {
        let output = session("-a * b\nlet x = 1 + 2 + 3;\n", true);

        assert_eq!("-> ((-a) * b)\n-> let x = ((1 + 2) + 3);\n-> ", output);
    }
}
