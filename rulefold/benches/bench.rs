use colosseum::unsync::Arena;
use criterion::{criterion_group, criterion_main, Criterion};
use rulefold::{fold, Expr, Graph, Interpreter, Names, Rule, RuleName};

/// Rules `chain . r0`, ..., `chain . rn`, where every rule adds one to its predecessor.
///
/// If `input` is set, the first rule is a question.
fn chain<'s>(arena: &'s Arena<String>, n: usize, input: bool) -> (Graph<'s>, RuleName<'s>) {
    let mut names = Names::new();
    let mut graph = Graph::new();
    let mut prev = None;
    for i in 0..n {
        let id: &str = arena.alloc(format!("chain . r{}", i));
        let name = names.insert(id).unwrap();
        let rule = match prev {
            None if input => Rule::new(name).with_question("?"),
            None => Rule::new(name).with_value(Expr::from(0.)),
            Some(prev) => Rule::new(name).with_value(Expr::from(prev) + Expr::from(1.)),
        };
        graph.insert(rule).unwrap();
        prev = Some(name);
    }
    (graph, prev.unwrap())
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let arena = Arena::new();
    let (constant, last) = chain(&arena, 200, false);
    let (dependent, _) = chain(&arena, 200, true);

    let keep = fold::Options::new().keep(move |rule| rule.name == last);
    let all = fold::Options::new();

    c.bench_function("constant", |b| {
        b.iter(|| fold(&constant, &mut Interpreter::new(), &keep).unwrap())
    });
    c.bench_function("dependent", |b| {
        b.iter(|| fold(&dependent, &mut Interpreter::new(), &all).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
