//! AST → bytecode compiler (§4.D).

mod error;
mod scope;

pub use error::CompileError;
use scope::{CompilationScope, EmittedInstruction};

use crate::ast::{
    BlockStatement, CallExpression, Expression, FunctionLiteral, IfExpression, IndexExpression,
    InfixExpression, PrefixExpression, Program, Statement,
};
use crate::code::{make, Bytecode, Instructions, Opcode};
use crate::symbol_table::{SymbolScope, SymbolTable, SymbolTableRef};
use crate::value::{CompiledFunction, Value};

use std::rc::Rc;

/// Walks an AST, emitting bytecode and tracking lexical scope as it goes.
///
/// One `Compiler` compiles one program; `compile` consumes `self` to produce
/// the final [`Bytecode`]. Nested function literals push and pop
/// [`CompilationScope`]s (and enclosed symbol tables) rather than recursing
/// into fresh `Compiler`s, so a single `constants` pool and `symbol_table`
/// chain is shared across the whole walk.
pub struct Compiler {
    constants: Vec<Value>,
    symbol_table: SymbolTableRef,
    scopes: Vec<CompilationScope>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            constants: Vec::new(),
            symbol_table: SymbolTable::new_with_builtins().into_ref(),
            scopes: vec![CompilationScope::default()],
        }
    }

    pub fn compile(mut self, program: &Program) -> Result<Bytecode, CompileError> {
        for statement in &program.statements {
            self.compile_statement(statement)?;
        }
        Ok(Bytecode {
            instructions: self.leave_top_level(),
            constants: self.constants,
        })
    }

    fn leave_top_level(&mut self) -> Instructions {
        std::mem::take(&mut self.scopes[0].instructions)
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Expression(stmt) => {
                self.compile_expression(&stmt.expression)?;
                self.emit(Opcode::OpPop, &[]);
            }
            Statement::Let(stmt) => {
                // A function literal can see its own name before compiling its
                // body (for recursion); everything else defines after.
                let symbol = if matches!(&stmt.value, Expression::Function(_)) {
                    let symbol = self.symbol_table.borrow_mut().define(&stmt.name);
                    self.compile_expression(&stmt.value)?;
                    symbol
                } else {
                    self.compile_expression(&stmt.value)?;
                    self.symbol_table.borrow_mut().define(&stmt.name)
                };
                match symbol.scope {
                    SymbolScope::Global => self.emit(Opcode::OpSetGlobal, &[symbol.index]),
                    SymbolScope::Local => self.emit(Opcode::OpSetLocal, &[symbol.index]),
                    _ => unreachable!("let always defines Global or Local"),
                };
            }
            Statement::Return(stmt) => {
                self.compile_expression(&stmt.value)?;
                self.emit(Opcode::OpReturnValue, &[]);
            }
            Statement::Block(block) => self.compile_block(block)?,
        }
        Ok(())
    }

    fn compile_block(&mut self, block: &BlockStatement) -> Result<(), CompileError> {
        for statement in &block.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_expression(&mut self, expression: &Expression) -> Result<(), CompileError> {
        match expression {
            Expression::IntegerLiteral(value) => {
                let idx = self.add_constant(Value::Integer(*value));
                self.emit(Opcode::OpConstant, &[idx]);
            }
            Expression::StringLiteral(value) => {
                let idx = self.add_constant(Value::string(value.clone()));
                self.emit(Opcode::OpConstant, &[idx]);
            }
            Expression::BooleanLiteral(true) => {
                self.emit(Opcode::OpTrue, &[]);
            }
            Expression::BooleanLiteral(false) => {
                self.emit(Opcode::OpFalse, &[]);
            }
            Expression::ArrayLiteral(elements) => {
                for element in elements {
                    self.compile_expression(element)?;
                }
                self.emit(Opcode::OpArray, &[elements.len()]);
            }
            Expression::HashLiteral(pairs) => {
                let mut sorted = pairs.clone();
                sorted.sort_by(|(a, _), (b, _)| a.to_string().cmp(&b.to_string()));
                for (key, value) in &sorted {
                    self.compile_expression(key)?;
                    self.compile_expression(value)?;
                }
                self.emit(Opcode::OpHash, &[sorted.len() * 2]);
            }
            Expression::Prefix(prefix) => self.compile_prefix(prefix)?,
            Expression::Infix(infix) => self.compile_infix(infix)?,
            Expression::If(if_expr) => self.compile_if(if_expr)?,
            Expression::Index(index) => self.compile_index(index)?,
            Expression::Identifier(name) => self.compile_identifier(name)?,
            Expression::Function(func) => self.compile_function(func)?,
            Expression::Call(call) => self.compile_call(call)?,
        }
        Ok(())
    }

    fn compile_prefix(&mut self, prefix: &PrefixExpression) -> Result<(), CompileError> {
        self.compile_expression(&prefix.right)?;
        match prefix.operator.as_str() {
            "!" => self.emit(Opcode::OpBang, &[]),
            "-" => self.emit(Opcode::OpMinus, &[]),
            other => unreachable!("unknown prefix operator {other:?}"),
        };
        Ok(())
    }

    fn compile_infix(&mut self, infix: &InfixExpression) -> Result<(), CompileError> {
        // `<` has no opcode of its own: swap operands and compare the other way.
        if infix.operator == "<" {
            self.compile_expression(&infix.right)?;
            self.compile_expression(&infix.left)?;
            self.emit(Opcode::OpGreaterThan, &[]);
            return Ok(());
        }

        self.compile_expression(&infix.left)?;
        self.compile_expression(&infix.right)?;
        match infix.operator.as_str() {
            "+" => self.emit(Opcode::OpAdd, &[]),
            "-" => self.emit(Opcode::OpSub, &[]),
            "*" => self.emit(Opcode::OpMul, &[]),
            "/" => self.emit(Opcode::OpDiv, &[]),
            ">" => self.emit(Opcode::OpGreaterThan, &[]),
            "==" => self.emit(Opcode::OpEqual, &[]),
            "!=" => self.emit(Opcode::OpNotEqual, &[]),
            other => unreachable!("unknown infix operator {other:?}"),
        };
        Ok(())
    }

    fn compile_if(&mut self, if_expr: &IfExpression) -> Result<(), CompileError> {
        self.compile_expression(&if_expr.condition)?;
        let jump_not_truthy_pos = self.emit(Opcode::OpJumpNotTruthy, &[0xFFFF]);

        self.compile_block(&if_expr.consequence)?;
        if self.current_scope().last_instruction_is(Opcode::OpPop) {
            self.current_scope_mut().remove_last();
        }

        let jump_pos = self.emit(Opcode::OpJump, &[0xFFFF]);
        let after_consequence = self.current_scope().instructions.len();
        self.change_operand(jump_not_truthy_pos, after_consequence);

        match &if_expr.alternative {
            Some(alternative) => {
                self.compile_block(alternative)?;
                if self.current_scope().last_instruction_is(Opcode::OpPop) {
                    self.current_scope_mut().remove_last();
                }
            }
            None => {
                self.emit(Opcode::OpNull, &[]);
            }
        }

        let after_alternative = self.current_scope().instructions.len();
        self.change_operand(jump_pos, after_alternative);
        Ok(())
    }

    fn compile_index(&mut self, index: &IndexExpression) -> Result<(), CompileError> {
        self.compile_expression(&index.left)?;
        self.compile_expression(&index.index)?;
        self.emit(Opcode::OpIndex, &[]);
        Ok(())
    }

    fn compile_identifier(&mut self, name: &str) -> Result<(), CompileError> {
        let symbol = self
            .symbol_table
            .borrow_mut()
            .resolve(name)
            .ok_or_else(|| CompileError::UndefinedVariable {
                name: name.to_string(),
            })?;
        self.load_symbol(&symbol);
        Ok(())
    }

    fn load_symbol(&mut self, symbol: &crate::symbol_table::Symbol) {
        match symbol.scope {
            SymbolScope::Global => self.emit(Opcode::OpGetGlobal, &[symbol.index]),
            SymbolScope::Local => self.emit(Opcode::OpGetLocal, &[symbol.index]),
            SymbolScope::Builtin => self.emit(Opcode::OpGetBuiltin, &[symbol.index]),
            SymbolScope::Free => self.emit(Opcode::OpGetFree, &[symbol.index]),
            SymbolScope::Function => self.emit(Opcode::OpCurrentClosure, &[]),
        };
    }

    fn compile_function(&mut self, func: &FunctionLiteral) -> Result<(), CompileError> {
        self.enter_scope();

        if let Some(name) = &func.name {
            self.symbol_table.borrow_mut().define_function_name(name);
        }
        for param in &func.parameters {
            self.symbol_table.borrow_mut().define(param);
        }

        self.compile_block(&func.body)?;

        if self.current_scope().last_instruction_is(Opcode::OpPop) {
            self.replace_last_pop_with_return();
        }
        if !self.current_scope().last_instruction_is(Opcode::OpReturnValue) {
            self.emit(Opcode::OpReturn, &[]);
        }

        let free_symbols = self.symbol_table.borrow().free_symbols.clone();
        let num_locals = self.symbol_table.borrow().num_definitions();
        let instructions = self.leave_scope();

        for free in &free_symbols {
            self.load_symbol(free);
        }

        let compiled = Value::CompiledFunction(Rc::new(CompiledFunction {
            instructions,
            num_locals,
            num_parameters: func.parameters.len(),
        }));
        let const_idx = self.add_constant(compiled);
        self.emit(Opcode::OpClosure, &[const_idx, free_symbols.len()]);
        Ok(())
    }

    fn replace_last_pop_with_return(&mut self) {
        let scope = self.current_scope();
        let last = scope.last_emitted.expect("checked by caller");
        let new_instruction = make(Opcode::OpReturnValue, &[]);
        self.current_scope_mut()
            .replace_instruction(last.position, &new_instruction);
        self.current_scope_mut().last_emitted = Some(EmittedInstruction {
            op: Opcode::OpReturnValue,
            position: last.position,
        });
    }

    fn compile_call(&mut self, call: &CallExpression) -> Result<(), CompileError> {
        self.compile_expression(&call.function)?;
        for arg in &call.arguments {
            self.compile_expression(arg)?;
        }
        self.emit(Opcode::OpCall, &[call.arguments.len()]);
        Ok(())
    }

    fn enter_scope(&mut self) {
        self.scopes.push(CompilationScope::default());
        let outer = self.symbol_table.clone();
        self.symbol_table = SymbolTable::new_enclosed(outer).into_ref();
        tracing::debug!(depth = self.scopes.len(), "entering function scope");
    }

    fn leave_scope(&mut self) -> Instructions {
        let scope = self.scopes.pop().expect("enter_scope/leave_scope balance");
        let outer = self
            .symbol_table
            .borrow()
            .outer_ref()
            .expect("leave_scope without a matching enter_scope");
        self.symbol_table = outer;
        tracing::debug!(depth = self.scopes.len(), "leaving function scope");
        scope.instructions
    }

    fn current_scope(&self) -> &CompilationScope {
        self.scopes.last().expect("at least the top-level scope")
    }

    fn current_scope_mut(&mut self) -> &mut CompilationScope {
        self.scopes.last_mut().expect("at least the top-level scope")
    }

    fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let instruction = make(op, operands);
        let position = self.current_scope().instructions.len();
        self.current_scope_mut()
            .instructions
            .extend_from_slice(&instruction);

        let scope = self.current_scope_mut();
        scope.previous_emitted = scope.last_emitted;
        scope.last_emitted = Some(EmittedInstruction { op, position });
        position
    }

    fn change_operand(&mut self, position: usize, operand: usize) {
        let op = Opcode::from_byte(self.current_scope().instructions[position])
            .expect("position always points at an opcode byte this compiler emitted");
        let new_instruction = make(op, &[operand]);
        self.current_scope_mut()
            .replace_instruction(position, &new_instruction);
    }
}

#[cfg(test)]
mod compiler_test;
