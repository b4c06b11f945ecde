use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn runs_a_well_formed_program_successfully() {
    Command::cargo_bin("spi")
        .unwrap()
        .arg(fixture("part12.pas"))
        .assert()
        .success();
}

#[test]
fn exits_nonzero_on_semantic_error() {
    Command::cargo_bin("spi")
        .unwrap()
        .arg(fixture("undeclared_var.pas"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("SemanticError"));
}

#[test]
fn exits_nonzero_on_syntax_error() {
    Command::cargo_bin("spi")
        .unwrap()
        .arg(fixture("syntax_error.pas"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("ParserError"));
}

#[test]
fn missing_input_file_is_reported() {
    Command::cargo_bin("spi")
        .unwrap()
        .arg(fixture("does_not_exist.pas"))
        .assert()
        .failure();
}

#[test]
fn scope_flag_enables_scope_tracing_without_failing() {
    Command::cargo_bin("spi")
        .unwrap()
        .arg("--scope")
        .arg(fixture("part12.pas"))
        .assert()
        .success();
}
