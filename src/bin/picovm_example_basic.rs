use picovm::{FuncEntry, Function, Instruction, Machine, Value};

// 2.0 * 3.0, evaluated on a bare machine.
fn expression() -> Result<(), picovm::Error> {
    let program = [
        Instruction::Const(Value::Number(2.0)),
        Instruction::Const(Value::Number(3.0)),
        Instruction::Mul,
    ];

    let mut machine = Machine::new(vec![]);
    machine.execute(&program, None)?;
    println!("2.0 * 3.0 = {}", machine.pop()?);
    Ok(())
}

// x = 2.0 + 3.0, with x stored in linear memory at address 0.
fn assignment() -> Result<(), picovm::Error> {
    let x_addr = 0;
    let program = [
        Instruction::Const(Value::Number(x_addr as f64)),
        Instruction::Const(Value::Number(2.0)),
        Instruction::Const(Value::Number(3.0)),
        Instruction::Add,
        Instruction::Store,
    ];

    let mut machine = Machine::new(vec![]);
    machine.execute(&program, None)?;
    println!("x = {}", machine.load(x_addr)?);
    Ok(())
}

// div(mul(add(1.0, 2.0), 5.0), 3.0) through the function table.
fn chained_calls() -> Result<(), picovm::Error> {
    let binop = |op: Instruction| {
        Function::new(2, true, vec![
            Instruction::LocalGet(0),
            Instruction::LocalGet(1),
            op,
        ])
    };

    let functions = vec![
        FuncEntry::from(binop(Instruction::Add)), // 0
        FuncEntry::from(binop(Instruction::Mul)), // 1
        FuncEntry::from(binop(Instruction::Div)), // 2
    ];

    let program = [
        Instruction::Const(Value::Number(1.0)),
        Instruction::Const(Value::Number(2.0)),
        Instruction::Call(0),
        Instruction::Const(Value::Number(5.0)),
        Instruction::Call(1),
        Instruction::Const(Value::Number(3.0)),
        Instruction::Call(2),
    ];

    let mut machine = Machine::new(functions);
    machine.execute(&program, None)?;
    println!("div(mul(add(1, 2), 5), 3) = {}", machine.pop()?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    expression()?;
    assignment()?;
    chained_calls()?;
    Ok(())
}
