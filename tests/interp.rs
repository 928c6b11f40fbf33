// To debug or develop a test, try `eprintln!("{:#?}", state)`

use tinypta::interp::{self, Value};
use tinypta::{parser, Name};

// ------------------------------------------------------------------
// Helpers

fn run(text: &str) -> (interp::Env, interp::Storage) {
    let (env, program) = match parser::parse(text) {
        Ok(parsed) => parsed,
        Err(e) => panic!("{}", e),
    };
    match interp::run(&program, env) {
        Ok(state) => state,
        Err(e) => panic!("{}", e),
    }
}

fn get(env: &interp::Env, var: &str) -> Value {
    match env.get(&Name::from(var)) {
        Ok(value) => value.clone(),
        Err(e) => panic!("{}", e),
    }
}

fn fails(text: &str) -> String {
    let (env, program) = parser::parse(text).unwrap();
    interp::run(&program, env).unwrap_err().to_string()
}

// ------------------------------------------------------------------

#[test]
fn arithmetic_over_the_initial_environment() {
    let (env, _storage) = run(
        r#"{"x": 2, "y": 3}
        z = add x y
        w = mul z z"#,
    );
    assert_eq!(Value::Int(5), get(&env, "z"));
    assert_eq!(Value::Int(25), get(&env, "w"));
}

#[test]
fn comparisons_produce_booleans() {
    let (env, _storage) = run(
        r#"{"x": 2, "y": 3}
        a = lth x y
        b = lth y x
        c = geq x y
        d = geq x x"#,
    );
    assert_eq!(Value::Bool(true), get(&env, "a"));
    assert_eq!(Value::Bool(false), get(&env, "b"));
    assert_eq!(Value::Bool(false), get(&env, "c"));
    assert_eq!(Value::Bool(true), get(&env, "d"));
}

#[test]
fn rebinding_shadows_but_keeps_history() {
    let (env, _storage) = run(
        r#"{"a": 1, "b": 2}
        m = move a
        m = move b"#,
    );
    assert_eq!(Value::Int(2), get(&env, "m"));
    assert_eq!(4, env.bindings().count());
    let mut bindings = env.bindings();
    assert_eq!(
        Some(&(Name::from("m"), Value::Int(2))),
        bindings.next()
    );
}

#[test]
fn minimum_via_a_conditional_branch() {
    // answer starts at a and is overwritten unless the branch skips the
    // overwrite.
    let min = |a: i64, b: i64| {
        let (env, _storage) = run(&format!(
            r#"{{"a": {}, "b": {}}}
            answer = move a
            c = lth a b
            bt c 4
            answer = move b
            d = move answer"#,
            a, b
        ));
        get(&env, "answer")
    };
    assert_eq!(Value::Int(2), min(9, 2));
    assert_eq!(Value::Int(1), min(1, 5));
}

#[test]
fn backward_branches_loop() {
    // Runs the allocation site twice, so two distinct locations exist.
    let (env, storage) = run(
        r#"{"i": 0, "one": 1, "two": 2}
        p = alloca
        i = add i one
        c = lth i two
        bt c 0"#,
    );
    assert_eq!(Value::Ref(Name::from("ref_0_1")), get(&env, "p"));
    assert_eq!(2, storage.cells().len());
}

#[test]
fn branching_on_a_nonzero_integer() {
    let (env, _storage) = run(
        r#"{"n": 5}
        bt n 2
        m = move n
        d = move n"#,
    );
    assert_eq!(Value::Int(5), get(&env, "d"));
    assert!(env.get(&Name::from("m")).is_err());
}

#[test]
fn branching_on_a_reference() {
    let (env, storage) = run(
        r#"{}
        p = alloca
        bt p 3
        q = alloca
        r = move p"#,
    );
    assert_eq!(1, storage.cells().len());
    assert_eq!(Value::Ref(Name::from("ref_0_0")), get(&env, "r"));
    assert!(env.get(&Name::from("q")).is_err());
}

#[test]
fn stores_are_visible_through_aliases() {
    let (env, _storage) = run(
        r#"{"one": 1}
        x = alloca
        p = move x
        *p = one
        v = *x"#,
    );
    assert_eq!(Value::Int(1), get(&env, "v"));
}

#[test]
fn storage_records_one_cell_per_allocation() {
    let (_env, storage) = run(
        r#"{"one": 1}
        p = alloca
        *p = one"#,
    );
    let cells = storage.cells();
    assert_eq!(1, cells.len());
    assert!(*cells[0].0 == "ref_0_0");
    assert_eq!(Some(&Value::Int(1)), cells[0].1);
}

#[test]
fn a_program_without_instructions_just_binds_the_environment() {
    let (env, storage) = run(r#"{"x": 1}"#);
    assert_eq!(Value::Int(1), get(&env, "x"));
    assert!(storage.cells().is_empty());
}

// ------------------------------------------------------------------
// Evaluation errors

#[test]
fn loading_from_a_never_stored_cell_fails() {
    let err = fails(
        r#"{}
        p = alloca
        v = *p"#,
    );
    assert_eq!("Evaluation error: Uninitialized location ref_0_0", err);
}

#[test]
fn reading_an_absent_variable_fails() {
    let err = fails(
        r#"{}
        z = add x y"#,
    );
    assert_eq!("Evaluation error: Absent key x", err);
}

#[test]
fn storing_through_a_non_pointer_fails() {
    let err = fails(
        r#"{"x": 1}
        *x = x"#,
    );
    assert_eq!("Evaluation error: x holds 1, not a reference", err);
}

#[test]
fn arithmetic_on_a_pointer_fails() {
    let err = fails(
        r#"{}
        p = alloca
        z = add p p"#,
    );
    assert_eq!("Evaluation error: p holds ref_0_0, not an integer", err);
}

#[test]
fn integer_overflow_is_an_error() {
    let err = fails(
        r#"{"big": 9223372036854775807, "one": 1}
        z = add big one"#,
    );
    assert_eq!(
        "Evaluation error: Integer overflow at 0: z = add big one",
        err
    );
}
