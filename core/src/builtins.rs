//! The built-in function roster (§6.3), resolved by index through
//! [`crate::symbol_table::BUILTIN_NAMES`] and `OpGetBuiltin`.
//!
//! Builtins never return `Result::Err`: arity and type mismatches surface as
//! an ordinary [`Value::Error`] on the stack, same as any other Monkey-level
//! error value (§7).

use once_cell::sync::Lazy;

use crate::value::Value;

/// The sink `puts` writes to (§5: "treat as an injected interface
/// `println(string) -> void`"). Ignored by every other builtin.
pub type Sink<'a> = &'a mut dyn FnMut(&str);

type BuiltinFn = fn(&[Value], Sink) -> Value;

/// The roster in canonical index order. Index *is* the `OpGetBuiltin` operand;
/// reordering this breaks every compiled program that calls a builtin.
pub static BUILTINS: Lazy<[BuiltinFn; 6]> =
    Lazy::new(|| [len, puts, first, last, rest, push]);

fn arity_error(got: usize, want: usize) -> Value {
    Value::error(format!("wrong number of arguments, got={got}, want={want}"))
}

fn len(args: &[Value], _sink: Sink) -> Value {
    if args.len() != 1 {
        return arity_error(args.len(), 1);
    }
    match &args[0] {
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        other => Value::error(format!(
            "argument to `len` not supported, got {}",
            other.type_tag()
        )),
    }
}

fn puts(args: &[Value], sink: Sink) -> Value {
    for arg in args {
        sink(&arg.inspect());
    }
    Value::Null
}

fn first(args: &[Value], _sink: Sink) -> Value {
    if args.len() != 1 {
        return arity_error(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => elements.first().cloned().unwrap_or(Value::Null),
        other => Value::error(format!(
            "argument to `first` must be ARRAY, got {}",
            other.type_tag()
        )),
    }
}

fn last(args: &[Value], _sink: Sink) -> Value {
    if args.len() != 1 {
        return arity_error(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => elements.last().cloned().unwrap_or(Value::Null),
        other => Value::error(format!(
            "argument to `last` must be ARRAY, got {}",
            other.type_tag()
        )),
    }
}

fn rest(args: &[Value], _sink: Sink) -> Value {
    if args.len() != 1 {
        return arity_error(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                Value::Null
            } else {
                Value::array(elements[1..].to_vec())
            }
        }
        other => Value::error(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.type_tag()
        )),
    }
}

fn push(args: &[Value], _sink: Sink) -> Value {
    if args.len() != 2 {
        return arity_error(args.len(), 2);
    }
    match &args[0] {
        Value::Array(elements) => {
            let mut new_elements = elements.as_ref().clone();
            new_elements.push(args[1].clone());
            Value::array(new_elements)
        }
        other => Value::error(format!(
            "argument to `push` must be ARRAY, got {}",
            other.type_tag()
        )),
    }
}

#[cfg(test)]
mod builtins_test;
