use clap::Parser;
use picovm::{FuncEntry, Function, Instruction, Machine, TraceEvent};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "picovm-run")]
#[command(about = "Execute picovm JSON programs")]
#[command(long_about = "
Picovm Run - stack machine program runner

Runs a JSON program file against a fresh machine and prints whatever
the program left on the operand stack.

A program file holds a top-level instruction sequence plus optional
interpreted function definitions:

  {
    \"functions\": [
      { \"nparams\": 2, \"returns\": true,
        \"code\": [ {\"op\": \"local.get\", \"args\": 0},
                  {\"op\": \"local.get\", \"args\": 1},
                  {\"op\": \"add\"} ] }
    ],
    \"code\": [ {\"op\": \"const\", \"args\": 2.0},
              {\"op\": \"const\", \"args\": 3.0},
              {\"op\": \"call\", \"args\": 0} ]
  }

External functions cannot be expressed in JSON; embed the crate as a
library to register those.

Examples:
  # Run a program and print the final stack
  picovm-run program.json

  # Trace every dispatched instruction to stderr
  picovm-run program.json --trace

  # Run against a small memory arena
  picovm-run program.json --memory-size 1024
")]
struct Args {
    /// Path to the JSON program file
    program: PathBuf,

    /// Linear memory size in bytes
    #[arg(short, long, default_value_t = picovm::LinearMemory::DEFAULT_SIZE)]
    memory_size: usize,

    /// Trace each instruction and the stack it leaves to stderr
    #[arg(short, long)]
    trace: bool,
}

#[derive(Deserialize)]
struct FunctionDef {
    nparams: usize,
    returns: bool,
    code: Vec<Instruction>,
}

#[derive(Deserialize)]
struct ProgramFile {
    #[serde(default)]
    functions: Vec<FunctionDef>,
    code: Vec<Instruction>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let text = fs::read_to_string(&args.program)
        .map_err(|e| format!("failed to read {}: {}", args.program.display(), e))?;
    let program: ProgramFile = serde_json::from_str(&text)
        .map_err(|e| format!("failed to parse program: {}", e))?;

    let functions = program
        .functions
        .into_iter()
        .map(|f| FuncEntry::from(Function::new(f.nparams, f.returns, f.code)))
        .collect();

    let mut machine = Machine::with_memory_size(functions, args.memory_size);
    if args.trace {
        machine.set_trace(|event| match event {
            TraceEvent::Opcode { instruction } => eprintln!("OPCODE: {:?}", instruction),
            TraceEvent::Stack { values } => eprintln!("STACK:  {:?}", values),
        });
    }

    machine
        .execute(&program.code, None)
        .map_err(|e| format!("execution failed: {}", e))?;

    for (i, value) in machine.stack().iter().enumerate() {
        println!("[{}] {}", i, value);
    }

    Ok(())
}
