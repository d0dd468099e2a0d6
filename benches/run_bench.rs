use casebook::core::catalog;
use casebook::core::planner::start_run;
use casebook::core::slug::{render, Variables};
use casebook::models::{NewCase, NewEnvironment, NewStep, NewVariable};
use casebook::Store;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_render(c: &mut Criterion) {
    let variables: Variables = (0..20)
        .map(|i| (format!("var{i}"), format!("value{i}")))
        .collect();
    let template = "/+var0+/+var5+/items/+var19+?q=+unknown+";

    c.bench_function("render_slug", |b| {
        b.iter(|| render(black_box(Some(template)), black_box(&variables)));
    });
}

fn bench_start_run(c: &mut Criterion) {
    let mut store = Store::open_in_memory().unwrap();
    for case_no in 0..50 {
        let case = catalog::add_case(
            &store,
            &NewCase {
                title: format!("Case {case_no}"),
                description: None,
            },
        )
        .unwrap();
        for step_no in 0..10 {
            catalog::add_step(
                &store,
                case.id,
                &NewStep {
                    step_text: format!("Step {step_no}"),
                    expected_result: "ok".to_string(),
                    slug: Some("/+tenant+".to_string()),
                },
            )
            .unwrap();
        }
    }
    let env = catalog::add_environment(
        &store,
        &NewEnvironment {
            title: "Bench".to_string(),
            url: "https://bench.test".to_string(),
            description: None,
        },
    )
    .unwrap();
    catalog::add_variable(
        &store,
        env.id,
        &NewVariable {
            name: "tenant".to_string(),
            value: "acme".to_string(),
        },
    )
    .unwrap();

    c.bench_function("start_run_500_steps", |b| {
        b.iter(|| start_run(&mut store, black_box(env.id), None).unwrap());
    });
}

criterion_group!(benches, bench_render, bench_start_run);
criterion_main!(benches);
