//! Monkey - a bytecode compiler and stack-based virtual machine
//!
//! This crate re-exports [`monkey_core`]'s public API: an AST-consuming
//! [`Compiler`] that produces [`Bytecode`], and a [`VM`] that executes it.
//! Lexing and parsing source text into an AST is out of scope here; callers
//! hand in AST nodes (see `monkey_core::ast`) however they like.
//!
//! # Quick start
//!
//! ```
//! use monkey::{Compiler, VM};
//! use monkey_core::ast::test_support::*;
//! use monkey_core::ast::Program;
//!
//! let program = Program {
//!     statements: vec![expr_stmt(infix("+", int(1), int(2)))],
//! };
//! let bytecode = Compiler::new().compile(&program).unwrap();
//! let mut vm = VM::new(bytecode);
//! vm.run().unwrap();
//! assert_eq!(vm.last_popped_stack_elem().inspect(), "3");
//! ```

pub use monkey_core::{Bytecode, CompileError, Compiler, RuntimeError, Value, VM};
