use picovm::{ExternalFunction, FuncEntry, Function, Instruction, Machine, Value};
use std::cell::RefCell;
use std::rc::Rc;

struct HostState {
    call_count: RefCell<u32>,
    last_printed: RefCell<Option<f64>>,
}

// fun countdown(x):
//     while x >= 0:
//         print(x)
//         x = x - 1
//
// Function 0 is the host print; function 1 is the countdown itself.
fn countdown() -> Function {
    Function::new(1, false, vec![
        Instruction::Block(vec![
            Instruction::Loop(vec![
                Instruction::LocalGet(0),
                Instruction::Call(0),
                // test
                Instruction::Const(Value::Number(0.0)),
                Instruction::LocalGet(0),
                Instruction::Ge,
                Instruction::BrIf(1), // break
                // body
                Instruction::LocalGet(0),
                Instruction::Const(Value::Number(1.0)),
                Instruction::Sub,
                Instruction::LocalSet(0),
                Instruction::Br(0), // continue
            ]),
        ]),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let host_state = Rc::new(HostState {
        call_count: RefCell::new(0),
        last_printed: RefCell::new(None),
    });

    let state = host_state.clone();
    let print_fn = ExternalFunction::new(1, false, move |args| {
        let value = args[0].as_f64();
        println!("  [Host Print] Value: {}", value);
        *state.last_printed.borrow_mut() = Some(value);
        *state.call_count.borrow_mut() += 1;
        None
    });

    let functions = vec![
        FuncEntry::from(print_fn),
        FuncEntry::from(countdown()),
    ];

    let program = [
        Instruction::Const(Value::Number(10.0)),
        Instruction::Call(1),
    ];

    let mut machine = Machine::new(functions);
    machine.execute(&program, None)?;

    println!("Total host print calls: {}", *host_state.call_count.borrow());
    if let Some(last) = *host_state.last_printed.borrow() {
        println!("Last printed value: {}", last);
    }

    Ok(())
}
