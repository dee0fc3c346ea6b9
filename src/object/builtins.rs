use super::{assert_argument_count, EvalError, EvalResult, Object};
use std::fmt;
use std::rc::Rc;

pub type BuiltInFunction = fn(Vec<Object>) -> EvalResult;

/// A native function callable from the language.
#[derive(Clone, Copy)]
pub struct BuiltIn {
    pub name: &'static str,
    pub func: BuiltInFunction,
}

impl BuiltIn {
    pub fn call(&self, args: Vec<Object>) -> EvalResult {
        (self.func)(args)
    }
}

impl fmt::Debug for BuiltIn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BuiltIn({})", self.name)
    }
}

// Builtins are singletons keyed by name.
impl PartialEq for BuiltIn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// BUILTINS provides a stable iteration order for lookups.
pub const BUILTINS: &[BuiltIn] = &[
    BuiltIn {
        name: "len",
        func: len,
    },
    BuiltIn {
        name: "puts",
        func: puts,
    },
    BuiltIn {
        name: "first",
        func: first,
    },
    BuiltIn {
        name: "last",
        func: last,
    },
    BuiltIn {
        name: "rest",
        func: rest,
    },
    BuiltIn {
        name: "push",
        func: push,
    },
];

pub fn lookup(name: &str) -> Option<Object> {
    BUILTINS
        .iter()
        .find(|builtin| builtin.name == name)
        .map(|builtin| Object::BuiltIn(*builtin))
}

fn len(args: Vec<Object>) -> EvalResult {
    assert_argument_count(1, &args)?;

    match &args[0] {
        Object::String(value) => Ok(Object::Integer(value.len() as i64)),
        Object::Array(elements) => Ok(Object::Integer(elements.len() as i64)),
        other => Err(EvalError::UnsupportedArgument("len", other.type_name())),
    }
}

fn first(args: Vec<Object>) -> EvalResult {
    assert_argument_count(1, &args)?;

    match &args[0] {
        Object::Array(elements) => Ok(elements.first().cloned().unwrap_or(Object::Null)),
        other => Err(EvalError::UnsupportedArgument("first", other.type_name())),
    }
}

fn last(args: Vec<Object>) -> EvalResult {
    assert_argument_count(1, &args)?;

    match &args[0] {
        Object::Array(elements) => Ok(elements.last().cloned().unwrap_or(Object::Null)),
        other => Err(EvalError::UnsupportedArgument("last", other.type_name())),
    }
}

fn rest(args: Vec<Object>) -> EvalResult {
    assert_argument_count(1, &args)?;

    match &args[0] {
        Object::Array(elements) => Ok(if elements.is_empty() {
            Object::Null
        } else {
            Object::Array(Rc::new(elements[1..].to_vec()))
        }),
        other => Err(EvalError::UnsupportedArgument("rest", other.type_name())),
    }
}

fn push(args: Vec<Object>) -> EvalResult {
    assert_argument_count(2, &args)?;

    match (&args[0], &args[1]) {
        (Object::Array(elements), value) => {
            let mut new_elements = elements.to_vec();
            new_elements.push(value.clone());
            Ok(Object::Array(Rc::new(new_elements)))
        }
        (other, _) => Err(EvalError::UnsupportedArgument("push", other.type_name())),
    }
}

fn puts(args: Vec<Object>) -> EvalResult {
    for arg in args {
        println!("{}", arg);
    }

    Ok(Object::Null)
}
