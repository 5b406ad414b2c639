use crate::instruction::Instruction;
use crate::value::Value;
use std::rc::Rc;

/// An interpreted function: a body executed by the dispatcher against
/// a fresh locals scope built from its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub nparams: usize,
    pub returns: bool,
    pub code: Vec<Instruction>,
}

impl Function {
    pub fn new(nparams: usize, returns: bool, code: Vec<Instruction>) -> Self {
        Self { nparams, returns, code }
    }
}

/// A host-supplied callable invoked outside the bytecode world. The
/// callback receives the arguments in declaration order and yields a
/// result only when the function is declared as returning one.
#[derive(Clone)]
pub struct ExternalFunction {
    pub nparams: usize,
    pub returns: bool,
    callback: Rc<dyn Fn(&[Value]) -> Option<Value>>,
}

impl ExternalFunction {
    pub fn new(
        nparams: usize,
        returns: bool,
        callback: impl Fn(&[Value]) -> Option<Value> + 'static,
    ) -> Self {
        Self { nparams, returns, callback: Rc::new(callback) }
    }

    pub fn invoke(&self, args: &[Value]) -> Option<Value> {
        (self.callback)(args)
    }
}

/// One entry of the function table, polymorphic over the two function
/// kinds. Built once at machine construction, read-only afterwards.
#[derive(Clone)]
pub enum FuncEntry {
    Interpreted(Function),
    External(ExternalFunction),
}

impl FuncEntry {
    pub fn nparams(&self) -> usize {
        match self {
            FuncEntry::Interpreted(f) => f.nparams,
            FuncEntry::External(f) => f.nparams,
        }
    }

    pub fn returns(&self) -> bool {
        match self {
            FuncEntry::Interpreted(f) => f.returns,
            FuncEntry::External(f) => f.returns,
        }
    }
}

impl From<Function> for FuncEntry {
    fn from(f: Function) -> Self {
        FuncEntry::Interpreted(f)
    }
}

impl From<ExternalFunction> for FuncEntry {
    fn from(f: ExternalFunction) -> Self {
        FuncEntry::External(f)
    }
}
