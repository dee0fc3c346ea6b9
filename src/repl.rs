use crate::interpreter::{InterpretError, Interpreter};
use crate::parser::ParserError;
use log::info;
use std::io::{self, BufRead, Write};

const MONKEY_FACE: &str = r#"            __,__
   .--.  .-"     "-.  .--.
  / .. \/  .-. .-.  \/ .. \
 | |  '|  /   Y   \  |'  | |
 | \   \  \ 0 | 0 /  /   / |
  \ '- ,\.-"""""""-./, -' /
   ''-' /_   ^ ^   _\ '-''
       |  \._   _./  |
       \   \ '~' /   /
        '._ '-=-' _.'
           '-----'
"#;

/// Reads lines from `input` until end of input, evaluating each one against
/// a single environment that lasts for the whole session.
pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W, prompt: &str) -> io::Result<()> {
    let mut interpreter = Interpreter::new();
    info!("REPL started");

    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            info!("end of input, leaving REPL");
            return Ok(());
        }

        match interpreter.eval(&line) {
            Ok(evaluated) => writeln!(output, "{}", evaluated)?,
            Err(InterpretError::Parse(errors)) => print_parser_errors(&mut output, &errors)?,
            Err(InterpretError::Eval(err)) => writeln!(output, "ERROR: {}", err)?,
        }
    }
}

fn print_parser_errors<W: Write>(output: &mut W, errors: &[ParserError]) -> io::Result<()> {
    writeln!(output, "{}", MONKEY_FACE)?;
    writeln!(output, "Woops! We ran into some monkey business here!")?;
    writeln!(output, " parser errors:")?;
    for error in errors {
        writeln!(output, "\t{}", error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::start;
    use std::io::Cursor;

    fn run(input: &str) -> String {
        let mut output = Vec::new();
        start(Cursor::new(input), &mut output, ">> ").unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn environment_persists_across_lines() {
        let output = run("let x = 5;\nx * 2\n");

        assert_eq!(output, ">> null\n>> 10\n>> ");
    }

    #[test]
    fn errors_are_rendered_and_the_session_continues() {
        let output = run("foobar\n1 + 1\n");

        assert_eq!(output, ">> ERROR: identifier not found: foobar\n>> 2\n>> ");
    }

    #[test]
    fn parse_errors_are_listed() {
        let output = run("let x 5;\n");

        assert!(output.contains("monkey business"));
        assert!(output.contains("\texpected next token to be =, got INT instead\n"));
    }
}
