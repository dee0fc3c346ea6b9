use monkey_lang::{ast::Program, evaluator, object::Environment, parser::Parser};

fn main() {
    let program = parse();

    let env = Environment::new_shared();

    match evaluator::eval(&program, &env) {
        Ok(obj) => println!("Result: {}", obj),
        Err(e) => println!("Unexpected error: {}", e),
    }
}

fn parse() -> Program {
    let mut parser = Parser::from_source(
        "
    let fibonacci = fn(x) {
		if (x == 0) {
			0
		} else {
			if (x == 1) {
				return 1;
			} else {
				fibonacci(x - 1) + fibonacci(x - 2);
			}
		}
	};
    fibonacci(27);
    ",
    );
    parser.parse_program()
}
