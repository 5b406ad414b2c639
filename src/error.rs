use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    InvalidOpcode(&'static str),
    StackUnderflow(&'static str),
    MemoryFault(&'static str),
    UnmatchedBranch(&'static str),
    UnknownLocal(&'static str),
    UnknownFunction(&'static str),
    HostFault(&'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidOpcode(s)
            | Error::StackUnderflow(s)
            | Error::MemoryFault(s)
            | Error::UnmatchedBranch(s)
            | Error::UnknownLocal(s)
            | Error::UnknownFunction(s)
            | Error::HostFault(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for Error {}

// Dispatch errors
pub const UNSUPPORTED_OPCODE: &str = "unsupported opcode";
pub const STACK_UNDERFLOW: &str = "stack underflow";
pub const UNKNOWN_LOCAL: &str = "unknown local";
pub const NO_LOCAL_SCOPE: &str = "local access outside a function call";
// Memory errors
pub const OOB_MEMORY_ACCESS: &str = "out of bounds memory access";
pub const INVALID_ADDRESS: &str = "invalid memory address";
// Control-flow errors
pub const UNMATCHED_BRANCH: &str = "branch target outside enclosing blocks";
// Call errors
pub const UNKNOWN_FUNC: &str = "unknown function";
pub const HOST_NO_RESULT: &str = "external function produced no result";
