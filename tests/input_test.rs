mod common;
use bastos::lang::ErrorCode;
use bastos::mach::{State, Val};
use common::*;

#[test]
fn test_input_with_prompt() {
    let mut m = machine();
    m.enter(&["10 INPUT \"NAME\";N$", "20 PRINT \"HI \";N$"]);
    assert_eq!(m.run("RUN"), "NAME");
    assert_eq!(m.runtime.state(), State::AwaitingInput);
    m.enter(&["Bob"]);
    assert_eq!(m.exec(), "HI Bob\n");
    assert_eq!(m.runtime.state(), State::Halted);
}

#[test]
fn test_input_number() {
    let mut m = machine();
    m.enter(&["10 INPUT A", "20 PRINT A*2"]);
    assert_eq!(m.run("RUN"), "? ");
    m.enter(&[" 21 "]);
    assert_eq!(m.exec(), "42\n");
}

#[test]
fn test_input_looks_like_a_command() {
    let mut m = machine();
    m.enter(&["10 INPUT A$", "20 PRINT A$"]);
    assert_eq!(m.run("RUN"), "? ");
    m.enter(&["10 PRINT"]);
    assert_eq!(m.exec(), "10 PRINT\n");
    assert_eq!(m.runtime.program().len(), 2);
}

#[test]
fn test_input_not_a_number() {
    let mut m = machine();
    m.enter(&["10 INPUT A", "20 PRINT A"]);
    assert_eq!(m.run("RUN"), "? ");
    let e = m.runtime.enter("TEN").unwrap_err();
    assert!(e.is(ErrorCode::SyntaxError));
    assert_eq!(e.line_number(), Some(10));
    assert_eq!(m.runtime.state(), State::Halted);
    assert_eq!(m.exec(), "");
}

#[test]
fn test_direct_input() {
    let mut m = machine();
    assert_eq!(m.run("INPUT X"), "? ");
    m.enter(&["3"]);
    assert_eq!(m.exec(), "");
    assert_eq!(m.runtime.var("x"), Some(&Val::Number(3.0)));
    assert_eq!(m.runtime.state(), State::Halted);
}

#[test]
fn test_input_last_line() {
    let mut m = machine();
    m.enter(&["10 INPUT \"OK\",A$"]);
    assert_eq!(m.run("RUN"), "OK");
    m.enter(&["Y"]);
    assert_eq!(m.exec(), "");
    assert_eq!(m.runtime.state(), State::Halted);
    assert_eq!(m.runtime.var("A$"), Some(&Val::String("Y".to_string())));
}

#[test]
fn test_interrupt_input() {
    let mut m = machine();
    m.enter(&["10 INPUT A", "20 PRINT A"]);
    assert_eq!(m.run("RUN"), "? ");
    m.runtime.interrupt();
    assert_eq!(m.exec(), "?BREAK IN 10\n");
    assert_eq!(m.run("CONT"), "? ");
    m.enter(&["5"]);
    assert_eq!(m.exec(), "5\n");
}

#[test]
fn test_input_syntax() {
    let mut m = machine();
    assert!(m.runtime.enter("INPUT").is_err());
    assert!(m.runtime.enter("INPUT \"X\" A").is_err());
    assert!(m.runtime.enter("INPUT 1").is_err());
}

#[test]
fn test_input_string_too_long() {
    let mut m = machine();
    m.enter(&["10 INPUT A$"]);
    assert_eq!(m.run("RUN"), "? ");
    let e = m.runtime.enter(&"Y".repeat(300)).unwrap_err();
    assert!(e.is(ErrorCode::StringTooLong));
    assert_eq!(e.line_number(), Some(10));
    assert_eq!(m.runtime.var("A$"), None);
}
