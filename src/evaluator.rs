use crate::ast::{
    BlockStatement, Expression, HashLiteral, InfixOperator, PrefixOperator, Program, Statement,
};
use crate::object::{
    builtins, Env, Environment, EvalError, EvalResult, Function, HashPair, Object,
};
use indexmap::IndexMap;
use log::{debug, trace};
use std::convert::TryFrom;
use std::rc::Rc;

/// Evaluates `program` against `env`. A `return` at the top level ends the
/// program with its value.
pub fn eval(program: &Program, env: &Env) -> EvalResult {
    let mut res = Object::Null;

    for statement in &program.statements {
        res = eval_statement(statement, env)?;

        if let Object::Return(value) = res {
            return Ok(*value);
        }
    }

    Ok(res)
}

/// Blocks share the enclosing scope. A `return` is passed up still wrapped so
/// that outer blocks stop too.
fn eval_block_statement(block: &BlockStatement, env: &Env) -> EvalResult {
    let mut res = Object::Null;

    for statement in &block.statements {
        res = eval_statement(statement, env)?;

        if let Object::Return(_) = res {
            return Ok(res);
        }
    }

    Ok(res)
}

fn eval_statement(statement: &Statement, env: &Env) -> EvalResult {
    trace!("eval statement `{}`", statement);

    match statement {
        Statement::Expression(exp) => eval_expression(exp, env),
        Statement::Let(name, exp) => {
            let value = eval_expression(exp, env)?;
            env.borrow_mut().set(name, value);
            Ok(Object::Null)
        }
        Statement::Return(exp) => {
            let value = eval_expression(exp, env)?;
            Ok(Object::Return(Box::new(value)))
        }
    }
}

fn eval_expression(expression: &Expression, env: &Env) -> EvalResult {
    match expression {
        Expression::Identifier(name) => eval_identifier(name, env),
        Expression::IntegerLiteral(v) => Ok(Object::Integer(*v)),
        Expression::StringLiteral(s) => Ok(Object::String(s.clone())),
        Expression::Boolean(b) => Ok(Object::Boolean(*b)),
        Expression::Prefix(operator, right) => {
            let right = eval_expression(right, env)?;
            eval_prefix_expression(*operator, right)
        }
        Expression::Infix(operator, left, right) => {
            let left = eval_expression(left, env)?;
            let right = eval_expression(right, env)?;
            eval_infix_expression(*operator, left, right)
        }
        Expression::If(condition, consequence, alternative) => {
            let condition = eval_expression(condition, env)?;

            if condition.is_truthy() {
                eval_block_statement(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, env)
            } else {
                Ok(Object::Null)
            }
        }
        Expression::FunctionLiteral(parameters, body) => Ok(Object::Function(Rc::new(Function {
            parameters: parameters.clone(),
            body: Rc::clone(body),
            env: Rc::clone(env),
        }))),
        Expression::Call(function, arguments) => {
            let function = eval_expression(function, env)?;
            let args = eval_expressions(arguments, env)?;
            apply_function(function, args)
        }
        Expression::ArrayLiteral(elements) => {
            let elements = eval_expressions(elements, env)?;
            Ok(Object::Array(Rc::new(elements)))
        }
        Expression::IndexExpression(left, index) => {
            let left = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            eval_index_expression(left, index)
        }
        Expression::HashLiteral(hash) => eval_hash_literal(hash, env),
    }
}

fn eval_identifier(name: &str, env: &Env) -> EvalResult {
    if let Some(value) = env.borrow().get(name) {
        return Ok(value);
    }

    builtins::lookup(name).ok_or_else(|| EvalError::IdentifierNotFound(name.to_string()))
}

/// Evaluates left to right, stopping at the first error.
fn eval_expressions(expressions: &[Expression], env: &Env) -> Result<Vec<Object>, EvalError> {
    expressions
        .iter()
        .map(|exp| eval_expression(exp, env))
        .collect()
}

fn eval_prefix_expression(operator: PrefixOperator, right: Object) -> EvalResult {
    match (operator, &right) {
        (PrefixOperator::Bang, _) => Ok(Object::Boolean(!right.is_truthy())),
        (PrefixOperator::Minus, Object::Integer(v)) => Ok(Object::Integer(v.wrapping_neg())),
        (PrefixOperator::Minus, _) => Err(EvalError::UnknownPrefixOperator(
            operator,
            right.type_name(),
        )),
    }
}

fn eval_infix_expression(operator: InfixOperator, left: Object, right: Object) -> EvalResult {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => {
            eval_integer_infix_expression(operator, *l, *r)
        }
        (Object::String(l), Object::String(r)) => eval_string_infix_expression(operator, l, r),
        _ => match operator {
            InfixOperator::Eq => Ok(Object::Boolean(left.is_identical(&right))),
            InfixOperator::NotEq => Ok(Object::Boolean(!left.is_identical(&right))),
            _ if left.type_name() != right.type_name() => Err(EvalError::TypeMismatch(
                operator,
                left.type_name(),
                right.type_name(),
            )),
            _ => Err(EvalError::UnknownInfixOperator(
                operator,
                left.type_name(),
                right.type_name(),
            )),
        },
    }
}

fn eval_integer_infix_expression(operator: InfixOperator, l: i64, r: i64) -> EvalResult {
    let res = match operator {
        InfixOperator::Plus => Object::Integer(l.wrapping_add(r)),
        InfixOperator::Minus => Object::Integer(l.wrapping_sub(r)),
        InfixOperator::Asterisk => Object::Integer(l.wrapping_mul(r)),
        InfixOperator::Slash => {
            if r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Object::Integer(l.wrapping_div(r))
        }
        InfixOperator::Lt => Object::Boolean(l < r),
        InfixOperator::Gt => Object::Boolean(l > r),
        InfixOperator::Eq => Object::Boolean(l == r),
        InfixOperator::NotEq => Object::Boolean(l != r),
    };

    Ok(res)
}

fn eval_string_infix_expression(operator: InfixOperator, l: &str, r: &str) -> EvalResult {
    match operator {
        InfixOperator::Plus => Ok(Object::String(format!("{}{}", l, r))),
        _ => Err(EvalError::UnknownInfixOperator(operator, "STRING", "STRING")),
    }
}

fn apply_function(function: Object, args: Vec<Object>) -> EvalResult {
    match function {
        Object::Function(function) => {
            debug!(
                "calling fn({}) with {} arguments",
                function.parameters.join(", "),
                args.len()
            );

            if function.parameters.len() != args.len() {
                return Err(EvalError::WrongArgumentCount {
                    got: args.len(),
                    want: function.parameters.len(),
                });
            }

            let env = Environment::extend(&function.env);
            for (parameter, arg) in function.parameters.iter().zip(args) {
                env.borrow_mut().set(parameter, arg);
            }

            match eval_block_statement(&function.body, &env)? {
                Object::Return(value) => Ok(*value),
                value => Ok(value),
            }
        }
        Object::BuiltIn(builtin) => {
            debug!("calling builtin {} with {} arguments", builtin.name, args.len());
            builtin.call(args)
        }
        other => Err(EvalError::NotAFunction(other.type_name())),
    }
}

fn eval_index_expression(left: Object, index: Object) -> EvalResult {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Object::Null)),
        (Object::Hash(pairs), _) => {
            let key = index
                .hash_key()
                .ok_or_else(|| EvalError::UnusableHashKey(index.type_name()))?;

            Ok(pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Object::Null))
        }
        _ => Ok(Object::Null),
    }
}

fn eval_hash_literal(hash: &HashLiteral, env: &Env) -> EvalResult {
    let mut pairs = IndexMap::with_capacity(hash.pairs.len());

    for (key_exp, value_exp) in &hash.pairs {
        let key = eval_expression(key_exp, env)?;
        let hash_key = key
            .hash_key()
            .ok_or_else(|| EvalError::UnusableHashKey(key.type_name()))?;

        let value = eval_expression(value_exp, env)?;
        pairs.insert(hash_key, HashPair { key, value });
    }

    Ok(Object::Hash(Rc::new(pairs)))
}

#[cfg(test)]
mod tests {
    use crate::evaluator;
    use crate::object::{EvalResult, Environment, Object};
    use crate::parser::Parser;

    fn eval_input(input: &str) -> EvalResult {
        let mut parser = Parser::from_source(input);
        let program = parser.parse_program();

        assert!(
            parser.errors().is_empty(),
            "Parser errors for `{}`: {:?}",
            input,
            parser.errors()
        );

        evaluator::eval(&program, &Environment::new_shared())
    }

    fn expect_values(tests: Vec<(&str, &str)>) {
        for (input, expected) in &tests {
            match eval_input(input) {
                Ok(obj) => {
                    assert_eq!(obj.to_string(), expected.to_string(), "for `{}`", input);
                }
                Err(err) => {
                    panic!(
                        "expected `{}`, but got error={} for `{}`",
                        expected, err, input
                    );
                }
            }
        }
    }

    fn expect_errors(tests: Vec<(&str, &str)>) {
        for (input, expected) in &tests {
            match eval_input(input) {
                Ok(obj) => {
                    panic!(
                        "expected error `{}`, but got value={} for `{}`",
                        expected, obj, input
                    );
                }
                Err(err) => {
                    assert_eq!(err.to_string(), expected.to_string(), "for `{}`", input);
                }
            }
        }
    }

    #[test]
    fn eval_integer_expression() {
        expect_values(vec![
            ("5;", "5"),
            ("10;", "10"),
            ("-5", "-5"),
            ("-10", "-10"),
            ("5 + 5 + 5 + 5 - 10", "10"),
            ("2 * 2 * 2 * 2 * 2", "32"),
            ("-50 + 100 + -50", "0"),
            ("5 * 2 + 10", "20"),
            ("5 + 2 * 10", "25"),
            ("20 + 2 * -10", "0"),
            ("50 / 2 * 2 + 10", "60"),
            ("2 * (5 + 10)", "30"),
            ("3 * 3 * 3 + 10", "37"),
            ("3 * (3 * 3) + 10", "37"),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", "50"),
            ("7 / 2", "3"),
            ("-7 / 2", "-3"),
        ]);
    }

    #[test]
    fn eval_boolean_expression() {
        expect_values(vec![
            ("true;", "true"),
            ("false;", "false"),
            ("1 < 2", "true"),
            ("1 > 2", "false"),
            ("1 == 1", "true"),
            ("1 != 1", "false"),
            ("true == true", "true"),
            ("true != false", "true"),
            ("(1 < 2) == true", "true"),
            ("(1 > 2) == true", "false"),
            ("1 == true", "false"),
            ("1 != true", "true"),
        ]);
    }

    #[test]
    fn eval_bang_expression() {
        expect_values(vec![
            ("!true;", "false"),
            ("!false;", "true"),
            ("!5;", "false"),
            ("!0;", "false"),
            ("!!true;", "true"),
            ("!!false;", "false"),
            ("!!5;", "true"),
        ]);
    }

    #[test]
    fn eval_if_else_expression() {
        expect_values(vec![
            ("if (true) { 10 }", "10"),
            ("if (false) { 10 }", "null"),
            ("if (1) { 10 }", "10"),
            ("if (1 < 2) { 10 }", "10"),
            ("if (1 > 2) { 10 }", "null"),
            ("if (1 > 2) { 10 } else { 20 }", "20"),
            ("if (1 < 2) { 10 } else { 20 }", "10"),
        ]);
    }

    #[test]
    fn eval_return_statement() {
        expect_values(vec![
            ("return 10;", "10"),
            ("return 10; 9;", "10"),
            ("return 2 * 5; 9;", "10"),
            ("9; return 2 * 5; 9;", "10"),
            (
                "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                "10",
            ),
            (
                "if (true) { if (true) { return 10; } return 1; } return 0;",
                "10",
            ),
        ]);
    }

    #[test]
    fn error_handling() {
        expect_errors(vec![
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
            (r#""a" == "a""#, "unknown operator: STRING == STRING"),
            ("1 / 0", "division by zero"),
            ("5(1)", "not a function: INTEGER"),
            (r#"{"name": "Monkey"}[fn(x) { x }];"#, "unusable as hash key: FUNCTION"),
            (r#"{[1]: 2}"#, "unusable as hash key: ARRAY"),
        ]);
    }

    #[test]
    fn errors_stop_before_side_effects() {
        expect_errors(vec![
            ("let a = foo; a", "identifier not found: foo"),
            ("[1, bar, baz]", "identifier not found: bar"),
            ("let f = fn(x) { x }; f(missing, also_missing)", "identifier not found: missing"),
        ]);
    }

    #[test]
    fn let_statements() {
        expect_values(vec![
            ("let a = 5; a;", "5"),
            ("let a = 5 * 5; a;", "25"),
            ("let a = 5; let b = a; b;", "5"),
            ("let a = 5; let b = a; let c = a + b + 5; c;", "15"),
        ]);
    }

    #[test]
    fn function_object() {
        expect_values(vec![("fn(x) { x + 2; };", "fn(x) {\n(x + 2)\n}")]);
    }

    #[test]
    fn function_application() {
        expect_values(vec![
            ("let identity = fn(x) { x; }; identity(5);", "5"),
            ("let identity = fn(x) { return x; }; identity(5);", "5"),
            ("let double = fn(x) { x * 2; }; double(5);", "10"),
            ("let add = fn(x, y) { x + y; }; add(5, 5);", "10"),
            ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", "20"),
            ("fn(x) { x; }(5)", "5"),
            ("let f = fn() { return 1; 2 }; f() + 10", "11"),
            ("let noop = fn() { }; noop()", "null"),
        ]);
    }

    #[test]
    fn wrong_argument_count() {
        expect_errors(vec![
            (
                "let f = fn(x, y) { x }; f(1)",
                "wrong number of arguments. got=1, want=2",
            ),
            (
                "fn() { 1 }(1, 2)",
                "wrong number of arguments. got=2, want=0",
            ),
        ]);
    }

    #[test]
    fn closures() {
        expect_values(vec![
            (
                "let newAdder = fn(x) { fn(y) { x + y }; }; let addTwo = newAdder(2); addTwo(2);",
                "4",
            ),
            (
                "let makeAdder = fn(x) { fn(y) { x + y } }; let addFive = makeAdder(5); addFive(3);",
                "8",
            ),
            (
                "let x = 1; let f = fn() { let x = 2; x }; f();",
                "2",
            ),
            ("let x = 1; let f = fn() { let x = 2; x }; f(); x;", "1"),
        ]);
    }

    #[test]
    fn recursion() {
        expect_values(vec![(
            "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(15);",
            "610",
        )]);
    }

    #[test]
    fn string_concatenation() {
        expect_values(vec![
            (r#""Hello World!""#, "Hello World!"),
            (r#""Hello" + " " + "World!""#, "Hello World!"),
        ]);
    }

    #[test]
    fn builtin_functions() {
        expect_values(vec![
            (r#"len("")"#, "0"),
            (r#"len("four")"#, "4"),
            ("len([1, 2, 3])", "3"),
            ("first([1, 2, 3])", "1"),
            ("last([1, 2, 3])", "3"),
            ("rest([1, 2, 3])", "[2, 3]"),
            ("push([], 1)", "[1]"),
            ("let a = [1]; push(a, 2); a", "[1]"),
            (r#"puts(1, "a")"#, "null"),
            ("last([])", "null"),
            ("len", "builtin function"),
        ]);
        expect_errors(vec![
            ("len(1)", "argument to `len` not supported, got INTEGER"),
            (
                r#"len("one", "two")"#,
                "wrong number of arguments. got=2, want=1",
            ),
        ]);
    }

    #[test]
    fn builtins_can_be_shadowed() {
        expect_values(vec![("let len = fn(x) { 42 }; len([1])", "42")]);
    }

    #[test]
    fn array_literals_and_indexing() {
        expect_values(vec![
            ("[1, 2 * 2, 3 + 3]", "[1, 4, 6]"),
            ("[1, 2, 3][0]", "1"),
            ("[1, 2, 3][1]", "2"),
            ("let i = 0; [1][i];", "1"),
            ("[1, 2, 3][1 + 1];", "3"),
            ("let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];", "6"),
            ("[1, 2, 3][3]", "null"),
            ("[1, 2, 3][5]", "null"),
            ("[1, 2, 3][-1]", "null"),
            ("1[0]", "null"),
            (r#"[1, 2]["a"]"#, "null"),
        ]);
    }

    #[test]
    fn hash_literals_and_indexing() {
        expect_values(vec![
            (
                r#"let two = "two"; {"one": 10 - 9, two: 1 + 1, "thr" + "ee": 6 / 2, 4: 4, true: 5, false: 6}"#,
                "{one: 1, two: 2, three: 3, 4: 4, true: 5, false: 6}",
            ),
            (r#"{"foo": 5}["foo"]"#, "5"),
            (r#"{"foo": 5}["bar"]"#, "null"),
            (r#"let key = "foo"; {"foo": 5}[key]"#, "5"),
            (r#"{}["foo"]"#, "null"),
            ("{5: 5}[5]", "5"),
            ("{true: 5}[true]", "5"),
            ("{1: 1, true: 2}[1]", "1"),
            ("{1: 1, true: 2}[true]", "2"),
        ]);
    }

    #[test]
    fn identity_equality() {
        expect_values(vec![
            ("let a = [1]; a == a", "true"),
            ("[1] == [1]", "false"),
            ("let f = fn() { 1 }; f == f", "true"),
            ("len == len", "true"),
            ("if (false) { 1 } == if (false) { 2 }", "true"),
        ]);
    }

    #[test]
    fn integer_arithmetic_wraps() {
        expect_values(vec![("9223372036854775807 + 1", "-9223372036854775808")]);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let mut parser = Parser::from_source("let a = 2; let f = fn(x) { x * a }; f(21)");
        let program = parser.parse_program();
        let before = program.to_string();

        let first = evaluator::eval(&program, &Environment::new_shared());
        let second = evaluator::eval(&program, &Environment::new_shared());

        assert_eq!(first, Ok(Object::Integer(42)));
        assert_eq!(first, second);
        assert_eq!(program.to_string(), before);
    }
}
