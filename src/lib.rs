#![deny(unsafe_code)]

mod error;
mod function;
mod instruction;
mod machine;
mod memory;
mod value;

pub use error::Error;
pub use function::{ExternalFunction, FuncEntry, Function};
pub use instruction::Instruction;
pub use machine::{Locals, Machine, TraceEvent};
pub use memory::LinearMemory;
pub use value::Value;
