use thiserror::Error;

/// Failure during `VM::run` (§7). Aborts the run immediately; the stack is
/// left in whatever state the failing opcode left it in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("stack overflow")]
    StackOverflow,

    #[error("unsupported types for binary operation: {left} {right}")]
    UnsupportedBinaryOperands { left: &'static str, right: &'static str },

    #[error("unknown string operator")]
    UnknownStringOperator,

    #[error("unusable as hash key: {type_tag}")]
    UnusableHashKey { type_tag: &'static str },

    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongArity { want: usize, got: usize },

    #[error("calling non-function and non-built-in")]
    NotCallable,

    #[error("index operator not supported: {type_tag}")]
    IndexOperatorNotSupported { type_tag: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("unsupported type for negation: {type_tag}")]
    UnsupportedNegation { type_tag: &'static str },

    #[error("unknown operator for types: {left} {right}")]
    UnknownComparisonOperator { left: &'static str, right: &'static str },

    #[error("not a function: constant at index {index} is not a CompiledFunction")]
    NotAFunctionConstant { index: usize },
}
