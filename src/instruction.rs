use crate::value::Value;
use serde::{Deserialize, Serialize};

/// One opcode plus its immediate operands. Control constructs carry
/// their body as a nested sequence rather than a jump target; branches
/// name an enclosing construct by level, counted outward from the
/// innermost one.
///
/// The wire form is adjacently tagged (`{"op": "...", "args": ...}`);
/// opcodes without operands omit `args`. An unrecognized tag
/// deserializes to `Unknown` and is rejected by the dispatcher, so a
/// malformed program still parses and fails with `InvalidOpcode` at
/// the offending instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Instruction {
    Const(Value),
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Ne,
    Load,
    Store,
    #[serde(rename = "local.get")]
    LocalGet(u32),
    #[serde(rename = "local.set")]
    LocalSet(u32),
    Call(u32),
    Br(u32),
    BrIf(u32),
    Block(Vec<Instruction>),
    Loop(Vec<Instruction>),
    Return,
    #[serde(other)]
    Unknown,
}
