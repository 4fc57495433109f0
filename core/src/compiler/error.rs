use thiserror::Error;

/// Failure producing bytecode from an AST (§7). The only failure mode at
/// compile time is a name that never resolves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("undefined variable {name}")]
    UndefinedVariable { name: String },
}
