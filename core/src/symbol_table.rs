//! Lexical scoping for the compiler (§4.C). A `SymbolTable` tracks one
//! lexical scope; nested scopes chain to their `outer` table and promote
//! resolved outer locals to `Free` symbols as they're captured.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// The builtin roster in canonical index order (§6.3). `OpGetBuiltin`'s
/// operand is the index into this table, so the order is load-bearing.
pub const BUILTIN_NAMES: &[&str] = &["len", "puts", "first", "last", "rest", "push"];

/// Where a resolved name lives, and which opcode reads it (§4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolScope {
    Global,
    Local,
    Builtin,
    Free,
    Function,
}

impl fmt::Display for SymbolScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolScope::Global => "Global",
            SymbolScope::Local => "Local",
            SymbolScope::Builtin => "Builtin",
            SymbolScope::Free => "Free",
            SymbolScope::Function => "Function",
        };
        write!(f, "{name}")
    }
}

/// A resolved name: its scope and the slot index the corresponding
/// `OpGet*`/`OpSet*` opcode addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub scope: SymbolScope,
    pub index: usize,
}

impl Symbol {
    fn new(name: impl Into<String>, scope: SymbolScope, index: usize) -> Self {
        Self {
            name: name.into(),
            scope,
            index,
        }
    }
}

pub type SymbolTableRef = Rc<RefCell<SymbolTable>>;

/// One lexical scope. The outermost table (`outer: None`) defines globals;
/// every function literal compiles against a freshly enclosed table (§4.D).
#[derive(Debug, Default)]
pub struct SymbolTable {
    store: HashMap<String, Symbol>,
    outer: Option<SymbolTableRef>,
    num_definitions: usize,
    pub free_symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table for registering the builtin roster, enclosing nothing.
    pub fn new_with_builtins() -> Self {
        let mut table = Self::new();
        for (index, &name) in BUILTIN_NAMES.iter().enumerate() {
            table.define_builtin(index, name);
        }
        table
    }

    pub fn new_enclosed(outer: SymbolTableRef) -> Self {
        Self {
            outer: Some(outer),
            ..Self::default()
        }
    }

    pub fn into_ref(self) -> SymbolTableRef {
        Rc::new(RefCell::new(self))
    }

    pub fn num_definitions(&self) -> usize {
        self.num_definitions
    }

    pub fn outer_ref(&self) -> Option<SymbolTableRef> {
        self.outer.clone()
    }

    /// Define a `let`-bound name in this scope. Global at the outermost
    /// table, Local everywhere else.
    pub fn define(&mut self, name: impl Into<String>) -> Symbol {
        let name = name.into();
        let scope = if self.outer.is_none() {
            SymbolScope::Global
        } else {
            SymbolScope::Local
        };

        let symbol = Symbol::new(name.clone(), scope, self.num_definitions);
        self.store.insert(name, symbol.clone());
        self.num_definitions += 1;
        symbol
    }

    fn define_builtin(&mut self, index: usize, name: impl Into<String>) -> Symbol {
        let name = name.into();
        let symbol = Symbol::new(name.clone(), SymbolScope::Builtin, index);
        self.store.insert(name, symbol.clone());
        symbol
    }

    /// Bind a function literal's own name inside its body, enabling
    /// unassisted recursion without a preceding `let` (§4.D, §4.E `OpCurrentClosure`).
    pub fn define_function_name(&mut self, name: impl Into<String>) -> Symbol {
        let name = name.into();
        let symbol = Symbol::new(name.clone(), SymbolScope::Function, 0);
        self.store.insert(name, symbol.clone());
        symbol
    }

    /// Resolve a name, recursing into enclosing scopes. A name found in an
    /// outer `Local`, `Free`, or `Function` scope is promoted to a `Free`
    /// symbol in every scope between its definition and this one, so the
    /// compiler can emit `OpClosure`'s free-variable list.
    pub fn resolve(&mut self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.store.get(name) {
            return Some(symbol.clone());
        }

        let outer = self.outer.clone()?;
        let resolved = outer.borrow_mut().resolve(name)?;

        match resolved.scope {
            SymbolScope::Global | SymbolScope::Builtin => Some(resolved),
            SymbolScope::Local | SymbolScope::Free | SymbolScope::Function => {
                Some(self.define_free(resolved))
            }
        }
    }

    fn define_free(&mut self, original: Symbol) -> Symbol {
        let symbol = Symbol::new(
            original.name.clone(),
            SymbolScope::Free,
            self.free_symbols.len(),
        );
        self.free_symbols.push(original);
        self.store.insert(symbol.name.clone(), symbol.clone());
        symbol
    }
}

#[cfg(test)]
mod symbol_table_test;
