//! The stack-based virtual machine that executes compiled bytecode (§4.E).

mod error;
mod frame;
mod runtime;

pub use error::RuntimeError;
pub use runtime::{VM, GLOBAL_SIZE, MAX_FRAMES, STACK_SIZE};
