use boxterm::runtime::operators;
use boxterm::runtime::pattern::try_match;
use boxterm::runtime::stdlib::load_stdlib;
use boxterm::runtime::{Comprehension, Generator};
use boxterm::{deserialize, serialize, Clause, Environment, Interpreter, ModuleRegistry, Term};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn ints(n: i64) -> Term {
    Term::list((0..n).map(Term::integer).collect())
}

fn nested_term() -> Term {
    Term::tuple(vec![
        Term::atom("ok"),
        ints(32),
        Term::map_from_pairs(
            (0..16)
                .map(|i| (Term::atom(&format!("k{}", i)), Term::string(format!("v{}", i))))
                .collect(),
        ),
        Term::integer(9_007_199_254_740_993i64),
    ])
}

/// Benchmark pattern matching
fn benchmark_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");
    let value = nested_term();
    let cases = vec![
        ("wildcard", Term::match_placeholder()),
        ("variable", Term::variable_pattern("x")),
        (
            "tuple_cons",
            Term::tuple(vec![
                Term::atom("ok"),
                Term::cons_pattern(Term::variable_pattern("h"), Term::variable_pattern("t")),
                Term::match_placeholder(),
                Term::variable_pattern("n"),
            ]),
        ),
        ("literal", value.clone()),
    ];

    for (name, pattern) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &pattern, |b, pattern| {
            b.iter(|| try_match(black_box(pattern), black_box(&value), &Environment::new()));
        });
    }
    group.finish();
}

/// Benchmark named dispatch through recursive clauses
fn benchmark_dispatch(c: &mut Criterion) {
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            "Elixir.Bench",
            "len",
            1,
            vec![
                Clause::new(vec![Term::list(vec![])], |_, _| Ok(Term::integer(0))),
                Clause::new(
                    vec![Term::cons_pattern(
                        Term::match_placeholder(),
                        Term::variable_pattern("t"),
                    )],
                    |interpreter, scope| {
                        let rest = interpreter.invoke("Elixir.Bench", "len", &[scope.fetch("t")?.clone()])?;
                        operators::addition(&rest, &Term::integer(1))
                    },
                ),
            ],
        )
        .expect("register");
    load_stdlib(&mut registry);
    let interpreter = Interpreter::new(registry);

    let mut group = c.benchmark_group("dispatch");
    for size in [8i64, 64] {
        let list = ints(size);
        group.bench_with_input(BenchmarkId::new("clauses", size), &list, |b, list| {
            b.iter(|| interpreter.invoke("Elixir.Bench", "len", &[black_box(list.clone())]));
        });
        group.bench_with_input(BenchmarkId::new("native_reverse", size), &list, |b, list| {
            b.iter(|| interpreter.invoke("lists", "reverse", &[black_box(list.clone())]));
        });
    }
    group.finish();
}

fn benchmark_comprehension(c: &mut Criterion) {
    let interpreter = Interpreter::new(ModuleRegistry::new());
    let comprehension = Comprehension::new(|_, scope| {
        operators::multiplication(scope.fetch("x")?, scope.fetch("y")?)
    })
    .generator(Generator::new(Term::variable_pattern("x"), ints(20)))
    .generator(Generator::new(Term::variable_pattern("y"), ints(20)))
    .unique(true);

    c.bench_function("comprehension_20x20_unique", |b| {
        b.iter(|| comprehension.evaluate(&interpreter, &Environment::new()));
    });
}

fn benchmark_codec(c: &mut Criterion) {
    let term = nested_term();
    let text = serialize(&term).expect("serialize");
    let mut group = c.benchmark_group("codec");
    group.bench_function("serialize", |b| b.iter(|| serialize(black_box(&term))));
    group.bench_function("deserialize", |b| b.iter(|| deserialize(black_box(&text))));
    group.finish();
}

criterion_group!(
    benches,
    benchmark_matching,
    benchmark_dispatch,
    benchmark_comprehension,
    benchmark_codec
);
criterion_main!(benches);
