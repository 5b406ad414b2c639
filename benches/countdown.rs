use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use picovm::{FuncEntry, Function, Instruction, Machine, Value};

fn num(n: f64) -> Value {
    Value::Number(n)
}

// countdown(x): decrement a local until it drops below zero. One call
// drives 1001 loop iterations through the dispatcher, the control-flow
// engine and the call convention.
fn countdown_function() -> Function {
    Function::new(1, false, vec![
        Instruction::Block(vec![
            Instruction::Loop(vec![
                Instruction::Const(num(0.0)),
                Instruction::LocalGet(0),
                Instruction::Ge,
                Instruction::BrIf(1),
                Instruction::LocalGet(0),
                Instruction::Const(num(1.0)),
                Instruction::Sub,
                Instruction::LocalSet(0),
                Instruction::Br(0),
            ]),
        ]),
    ])
}

fn bench_countdown(c: &mut Criterion) {
    let program = [Instruction::Const(num(1000.0)), Instruction::Call(0)];

    let mut group = c.benchmark_group("countdown");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("iterative_1000", |b| {
        b.iter(|| {
            let mut machine = Machine::new(vec![FuncEntry::from(countdown_function())]);
            machine.execute(black_box(&program), None).unwrap();
            black_box(machine.stack().len())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_countdown);
criterion_main!(benches);
