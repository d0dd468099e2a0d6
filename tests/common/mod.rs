// Shared test helpers for integration tests
#![allow(dead_code)]

use casebook::core::catalog;
use casebook::models::{Environment, NewCase, NewEnvironment, NewStep, NewVariable, TestCase, TestStep};
use casebook::Store;

pub fn memory_store() -> Store {
    Store::open_in_memory().expect("Failed to open in-memory store")
}

pub fn add_case(store: &Store, title: &str) -> TestCase {
    catalog::add_case(
        store,
        &NewCase {
            title: title.to_string(),
            description: None,
        },
    )
    .expect("Failed to add case")
}

pub fn add_step(store: &Store, case_id: i64, text: &str, slug: Option<&str>) -> TestStep {
    catalog::add_step(
        store,
        case_id,
        &NewStep {
            step_text: text.to_string(),
            expected_result: format!("{text} works"),
            slug: slug.map(str::to_string),
        },
    )
    .expect("Failed to add step")
}

pub fn add_environment(store: &Store, title: &str, vars: &[(&str, &str)]) -> Environment {
    let env = catalog::add_environment(
        store,
        &NewEnvironment {
            title: title.to_string(),
            url: format!("https://{}.example.test", title.to_lowercase()),
            description: None,
        },
    )
    .expect("Failed to add environment");
    for (name, value) in vars {
        catalog::add_variable(
            store,
            env.id,
            &NewVariable {
                name: name.to_string(),
                value: value.to_string(),
            },
        )
        .expect("Failed to add variable");
    }
    env
}

/// Two cases: "Login" with two steps and "Checkout" with one, plus a
/// "Staging" environment with `tenant=acme`.
pub fn seeded_store() -> (Store, Environment) {
    let store = memory_store();
    let login = add_case(&store, "Login");
    add_step(&store, login.id, "Open login page", Some("/+tenant+/login"));
    add_step(&store, login.id, "Submit credentials", None);
    let checkout = add_case(&store, "Checkout");
    add_step(&store, checkout.id, "Pay", Some("/+tenant+/pay?+missing+"));
    let env = add_environment(&store, "Staging", &[("tenant", "acme")]);
    (store, env)
}
