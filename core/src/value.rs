//! The runtime value model shared by the compiler's constants pool and the VM's stack.
//!
//! Values are a tagged union (§3 of the design). Heap-shaped variants
//! (`String`, `Array`, `Hash`, `CompiledFunction`, `Closure`) are `Rc`-wrapped
//! so cloning a `Value` off the stack is cheap, the way the original's
//! garbage-collected `object.Object` pointers were cheap to copy around.

use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::code::Instructions;

/// A Monkey runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Hash(Rc<HashObj>),
    CompiledFunction(Rc<CompiledFunction>),
    Closure(Rc<Closure>),
    Builtin(Builtin),
    Error(Rc<str>),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(elements))
    }

    pub fn error(message: impl Into<String>) -> Value {
        Value::Error(Rc::from(message.into()))
    }

    /// The type tag used verbatim in error messages (§4.A).
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::String(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::CompiledFunction(_) => "FUNCTION",
            Value::Closure(_) => "CLOSURE",
            Value::Builtin(_) => "BUILTIN",
            Value::Error(_) => "ERROR",
        }
    }

    /// Truthiness per §4.E: only `False` and `Null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    /// Human-readable rendering used by `puts` and diagnostics (§4.A).
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::String(s) => s.to_string(),
            Value::Array(elements) => {
                let items: Vec<String> = elements.iter().map(Value::inspect).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Hash(hash) => {
                let items: Vec<String> = hash
                    .pairs
                    .values()
                    .map(|(key, value)| format!("{}: {}", key.inspect(), value.inspect()))
                    .collect();
                format!("{{{}}}", items.join(", "))
            }
            Value::CompiledFunction(_) => "CompiledFunction[...]".to_string(),
            Value::Closure(_) => "Closure[...]".to_string(),
            Value::Builtin(_) => "builtin function".to_string(),
            Value::Error(message) => format!("ERROR: {message}"),
        }
    }

    /// Structural/value equality for the `==`/`!=` *evaluated by the VM's
    /// dispatch loop* (§4.E), as opposed to the derived [`PartialEq`] used
    /// by tests. Integers and strings compare by value; everything else
    /// (including the canonical booleans and null) compares by reference
    /// identity, matching the original's pointer-compared `object.Object`.
    ///
    /// Strings are a deliberate deviation from the original's pointer
    /// comparison (see SPEC_FULL.md §9 "Open question — resolved").
    pub fn vm_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b),
            (Value::CompiledFunction(a), Value::CompiledFunction(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.index == b.index,
            (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Structural equality, used by tests (`assert_eq!(value, Value::Integer(5))`)
/// and nowhere in VM dispatch — see [`Value::vm_eq`] for the `==`/`!=`
/// opcode's reference-identity semantics.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a.pairs == b.pairs,
            (Value::CompiledFunction(a), Value::CompiledFunction(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => {
                a.function == b.function && a.free == b.free
            }
            (Value::Builtin(a), Value::Builtin(b)) => a.index == b.index,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

/// A fixed-arity native function, identified by its index into the builtin
/// roster (§6.3). Equality and `Debug` are by index; the function pointer
/// itself is resolved through [`crate::builtins::BUILTINS`].
#[derive(Clone, Copy)]
pub struct Builtin {
    pub index: u8,
    pub name: &'static str,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// A compiled function body: bytecode plus the frame-sizing metadata the VM
/// needs to set up locals on call (§4.E `OpCall`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    pub instructions: Instructions,
    pub num_locals: usize,
    pub num_parameters: usize,
}

/// A compiled function paired with its captured free variables.
#[derive(Debug, Clone)]
pub struct Closure {
    pub function: Rc<CompiledFunction>,
    pub free: Vec<Value>,
}

/// A hash value: preserves the original (unhashed) key alongside its value
/// so `puts`/`inspect` can render the real key, not just its `HashKey`.
#[derive(Debug, Clone, Default)]
pub struct HashObj {
    pub pairs: HashMap<HashKey, (Value, Value)>,
}

/// The hashable projection of a [`Value`]: `(type_tag, derived u64)` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: HashKeyKind,
    pub bits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKeyKind {
    Integer,
    Boolean,
    String,
}

/// Error returned when a [`Value`] is not hashable (§3, §7: "unusable as hash key").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotHashable;

impl Value {
    /// Compute this value's [`HashKey`], or `None` if it isn't hashable.
    ///
    /// Only `Integer`, `Boolean`, and `String` are hashable (§3).
    pub fn hash_key(&self) -> Result<HashKey, NotHashable> {
        match self {
            Value::Integer(i) => Ok(HashKey {
                kind: HashKeyKind::Integer,
                bits: *i as u64,
            }),
            Value::Boolean(b) => Ok(HashKey {
                kind: HashKeyKind::Boolean,
                bits: *b as u64,
            }),
            Value::String(s) => Ok(HashKey {
                kind: HashKeyKind::String,
                bits: fnv1a64(s.as_bytes()),
            }),
            _ => Err(NotHashable),
        }
    }
}

/// FNV-1a-64, used to derive [`HashKey::bits`] for string keys (§3).
fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut hash = OFFSET_BASIS;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

#[cfg(test)]
mod value_test;
