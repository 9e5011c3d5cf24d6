mod common;
use bastos::mach::Val;
use common::*;

#[test]
fn test_lines_are_ordered() {
    let mut m = machine();
    m.enter(&["30 PRINT 3", "10 PRINT 1", "20 PRINT 2"]);
    assert_eq!(m.run("LIST"), "10 PRINT 1\n20 PRINT 2\n30 PRINT 3\n");
    assert_eq!(m.run("RUN"), "1\n2\n3\n");
}

#[test]
fn test_second_write_wins() {
    let mut m = machine();
    m.enter(&["10 PRINT 1", "10 PRINT 2"]);
    assert_eq!(m.runtime.program().len(), 1);
    assert_eq!(m.run("RUN"), "2\n");
}

#[test]
fn test_number_alone_deletes() {
    let mut m = machine();
    m.enter(&["10 PRINT 1", "20 PRINT 2", "10", "99"]);
    assert_eq!(m.run("LIST"), "20 PRINT 2\n");
}

#[test]
fn test_number_and_string_are_separate() {
    let mut m = machine();
    assert_eq!(m.run("A=1"), "");
    assert_eq!(m.run("A$=\"X\""), "");
    assert_eq!(m.run("PRINT A;A$"), "1X\n");
    assert_eq!(m.runtime.var("A"), Some(&Val::Number(1.0)));
    assert_eq!(m.runtime.var("a$"), Some(&Val::String("X".to_string())));
}

#[test]
fn test_save_load() {
    let mut m = machine();
    m.enter(&["10 PRINT A;B$", "20 PRINT \"END\""]);
    assert_eq!(m.run("A=5"), "");
    assert_eq!(m.run("B$=\"X\""), "");
    assert_eq!(m.run("SAVE \"PROG\""), "");
    assert!(m.disk.file("PROG").is_some());
    assert_eq!(m.run("NEW"), "");
    assert_eq!(m.run("PRINT A"), "0\n");
    assert_eq!(m.run("LOAD \"PROG\""), "");
    assert_eq!(m.run("PRINT A;B$"), "5X\n");
    assert_eq!(m.run("LIST"), "10 PRINT a; b$\n20 PRINT \"END\"\n");
}

#[test]
fn test_load_missing_file() {
    let mut m = machine();
    m.enter(&["10 PRINT 1"]);
    assert_eq!(m.run("LOAD \"NOPE\""), "?FILE NOT FOUND\n");
    assert!(m.runtime.program().is_empty());
}

#[test]
fn test_bad_file_name() {
    let mut m = machine();
    assert_eq!(m.run("SAVE \"\""), "?BAD FILE NAME\n");
    assert_eq!(m.run("ERASE \"\""), "?BAD FILE NAME\n");
}

#[test]
fn test_erase() {
    let mut m = machine();
    assert_eq!(m.run("SAVE \"A\""), "");
    assert_eq!(m.run("ERASE \"A\""), "");
    assert!(m.disk.file("A").is_none());
    assert_eq!(m.run("ERASE \"A\""), "?FILE NOT FOUND\n");
}

#[test]
fn test_cat() {
    let mut m = machine();
    m.disk.put_file("GAME", vec![0; 12]);
    m.disk.put_file("DEMO", vec![0; 3]);
    assert_eq!(
        m.run("CAT"),
        "DEMO            3\nGAME            12\n"
    );
}

#[test]
fn test_load_in_program() {
    let mut m = machine();
    m.enter(&["10 PRINT \"SAVED\""]);
    assert_eq!(m.run("SAVE \"P\""), "");
    m.enter(&["10 LOAD \"P\"", "20 PRINT \"NOT REACHED\""]);
    assert_eq!(m.run("RUN"), "");
    assert_eq!(m.run("RUN"), "SAVED\n");
}

#[test]
fn test_load_rejects_trailing_bytes() {
    let mut m = machine();
    m.enter(&["10 PRINT 1"]);
    assert_eq!(m.run("A=2"), "");
    assert_eq!(m.run("SAVE \"P\""), "");
    let mut image = m.disk.file("P").unwrap();
    image.extend_from_slice(b"GARBAGE");
    m.disk.put_file("P", image);
    assert_eq!(m.run("LOAD \"P\""), "?DISK I/O ERROR\n");
    assert!(m.runtime.program().is_empty());
    assert_eq!(m.runtime.var("A"), None);
}
