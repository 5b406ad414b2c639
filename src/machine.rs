use crate::error::*;
use crate::function::FuncEntry;
use crate::instruction::Instruction;
use crate::memory::LinearMemory;
use crate::value::Value;
use nohash_hasher::IntMap;
use std::rc::Rc;

/// Per-call-activation scope mapping local indices to values. Exists
/// only for interpreted function calls; top-level code and external
/// calls have none.
pub type Locals = IntMap<u32, Value>;

/// Observation point reported to an installed trace hook: the opcode
/// about to be dispatched, then the stack it left behind.
#[derive(Debug)]
pub enum TraceEvent<'a> {
    Opcode { instruction: &'a Instruction },
    Stack { values: &'a [Value] },
}

/// Outcome of running one instruction sequence. Branches and returns
/// travel up the recursive dispatch as values rather than host
/// exceptions; each enclosing `block`/`loop` inspects the signal and
/// either absorbs it or re-raises it with the level decremented.
enum Signal {
    Continue,
    Break(u32),
    Return,
}

macro_rules! binary {
    ($self:ident, $op:tt) => {{
        let right = $self.pop()?.as_f64();
        let left = $self.pop()?.as_f64();
        $self.stack.push(Value::Number(left $op right));
    }};
}

macro_rules! compare {
    ($self:ident, $op:tt) => {{
        let right = $self.pop()?.as_f64();
        let left = $self.pop()?.as_f64();
        $self.stack.push(Value::Boolean(left $op right));
    }};
}

/// A stack machine with one operand stack, one linear memory arena and
/// one read-only function table for its entire lifetime. Execution is
/// synchronous and single-threaded; instances share nothing.
pub struct Machine {
    functions: Rc<[FuncEntry]>,
    memory: LinearMemory,
    stack: Vec<Value>,
    trace: Option<Box<dyn FnMut(TraceEvent<'_>)>>,
}

impl Machine {
    pub fn new(functions: Vec<FuncEntry>) -> Self {
        Self::with_memory_size(functions, LinearMemory::DEFAULT_SIZE)
    }

    pub fn with_memory_size(functions: Vec<FuncEntry>, memory_size: usize) -> Self {
        Self {
            functions: functions.into(),
            memory: LinearMemory::new(memory_size),
            stack: Vec::new(),
            trace: None,
        }
    }

    /// Install a trace hook receiving a `TraceEvent` pair per
    /// dispatched instruction. Replaces any previous hook.
    pub fn set_trace(&mut self, hook: impl FnMut(TraceEvent<'_>) + 'static) {
        self.trace = Some(Box::new(hook));
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn memory_size(&self) -> usize {
        self.memory.size()
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Result<Value, Error> {
        self.stack.pop().ok_or(Error::StackUnderflow(STACK_UNDERFLOW))
    }

    pub fn load(&self, addr: usize) -> Result<f64, Error> {
        self.memory.load_f64(addr).map_err(Error::MemoryFault)
    }

    pub fn store(&mut self, addr: usize, value: f64) -> Result<(), Error> {
        self.memory.store_f64(addr, value).map_err(Error::MemoryFault)
    }

    /// Run an instruction sequence against the shared stack and memory.
    /// `locals` is the scope of the enclosing call, or `None` for
    /// top-level code. A `return` ends the sequence; a branch that no
    /// enclosing construct absorbs is a malformed program.
    pub fn execute(
        &mut self,
        instructions: &[Instruction],
        locals: Option<&mut Locals>,
    ) -> Result<(), Error> {
        match self.run(instructions, locals)? {
            Signal::Continue | Signal::Return => Ok(()),
            Signal::Break(_) => Err(Error::UnmatchedBranch(UNMATCHED_BRANCH)),
        }
    }

    fn run(
        &mut self,
        instructions: &[Instruction],
        mut locals: Option<&mut Locals>,
    ) -> Result<Signal, Error> {
        for instruction in instructions {
            if let Some(hook) = self.trace.as_mut() {
                hook(TraceEvent::Opcode { instruction });
            }
            match instruction {
                Instruction::Const(v) => self.stack.push(*v),
                Instruction::Add => binary!(self, +),
                Instruction::Sub => binary!(self, -),
                Instruction::Mul => binary!(self, *),
                Instruction::Div => binary!(self, /),
                Instruction::Mod => binary!(self, %),
                Instruction::Ge => compare!(self, >=),
                Instruction::Gt => compare!(self, >),
                Instruction::Le => compare!(self, <=),
                Instruction::Lt => compare!(self, <),
                Instruction::Eq => compare!(self, ==),
                Instruction::Ne => compare!(self, !=),
                Instruction::Load => {
                    let addr = address(self.pop()?)?;
                    let v = self.load(addr)?;
                    self.stack.push(Value::Number(v));
                }
                Instruction::Store => {
                    let value = self.pop()?;
                    let addr = address(self.pop()?)?;
                    self.store(addr, value.as_f64())?;
                }
                Instruction::LocalGet(i) => {
                    let scope = locals
                        .as_deref()
                        .ok_or(Error::UnknownLocal(NO_LOCAL_SCOPE))?;
                    let v = *scope.get(i).ok_or(Error::UnknownLocal(UNKNOWN_LOCAL))?;
                    self.stack.push(v);
                }
                Instruction::LocalSet(i) => {
                    let v = self.pop()?;
                    locals
                        .as_deref_mut()
                        .ok_or(Error::UnknownLocal(NO_LOCAL_SCOPE))?
                        .insert(*i, v);
                }
                Instruction::Call(f) => self.call_index(*f as usize)?,
                Instruction::Br(level) => return Ok(Signal::Break(*level)),
                Instruction::BrIf(level) => {
                    if self.pop()?.is_truthy() {
                        return Ok(Signal::Break(*level));
                    }
                }
                Instruction::Block(body) => {
                    match self.run(body, locals.as_deref_mut())? {
                        Signal::Continue => {}
                        // A level-0 branch targets this block: execution
                        // resumes after it in the parent sequence.
                        Signal::Break(0) => {}
                        Signal::Break(level) => return Ok(Signal::Break(level - 1)),
                        Signal::Return => return Ok(Signal::Return),
                    }
                }
                Instruction::Loop(body) => loop {
                    match self.run(body, locals.as_deref_mut())? {
                        // The body ran to completion without branching:
                        // the loop terminates. Iteration is expressed by
                        // an explicit `br 0` back to the loop itself.
                        Signal::Continue => break,
                        // A level-0 branch targets this loop: re-enter
                        // the body. The same absorption serves break and
                        // continue; only instruction placement differs.
                        Signal::Break(0) => continue,
                        Signal::Break(level) => return Ok(Signal::Break(level - 1)),
                        Signal::Return => return Ok(Signal::Return),
                    }
                },
                Instruction::Return => return Ok(Signal::Return),
                Instruction::Unknown => {
                    return Err(Error::InvalidOpcode(UNSUPPORTED_OPCODE))
                }
            }
            if let Some(hook) = self.trace.as_mut() {
                hook(TraceEvent::Stack { values: &self.stack });
            }
        }
        Ok(Signal::Continue)
    }

    /// Resolve a function-table index and apply the call convention:
    /// the top `nparams` stack values become the arguments, in
    /// declaration order. Interpreted bodies run against fresh locals
    /// with `return` captured at this boundary; external callables are
    /// invoked directly. A declared result stays on / is pushed onto
    /// the shared stack.
    fn call_index(&mut self, idx: usize) -> Result<(), Error> {
        let functions = Rc::clone(&self.functions);
        let entry = functions.get(idx).ok_or(Error::UnknownFunction(UNKNOWN_FUNC))?;
        let nparams = entry.nparams();
        if self.stack.len() < nparams {
            return Err(Error::StackUnderflow(STACK_UNDERFLOW));
        }
        let args = self.stack.split_off(self.stack.len() - nparams);
        match entry {
            FuncEntry::Interpreted(func) => {
                let mut scope: Locals = args
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i as u32, *v))
                    .collect();
                let depth = self.stack.len();
                match self.run(&func.code, Some(&mut scope))? {
                    Signal::Continue | Signal::Return => {}
                    Signal::Break(_) => {
                        return Err(Error::UnmatchedBranch(UNMATCHED_BRANCH))
                    }
                }
                // The body is responsible for the declared net stack
                // effect; a violation surfaces later as underflow.
                if func.returns {
                    debug_assert_eq!(self.stack.len(), depth + 1);
                } else {
                    debug_assert_eq!(self.stack.len(), depth);
                }
            }
            FuncEntry::External(ext) => {
                let result = ext.invoke(&args);
                if ext.returns {
                    let v = result.ok_or(Error::HostFault(HOST_NO_RESULT))?;
                    self.stack.push(v);
                }
            }
        }
        Ok(())
    }
}

fn address(v: Value) -> Result<usize, Error> {
    let n = v.as_f64();
    if !n.is_finite() || n < 0.0 {
        return Err(Error::MemoryFault(INVALID_ADDRESS));
    }
    Ok(n as usize)
}
