//! Runs the `combtab` binary on small netlists, checking stdout, stderr and the exit status.

use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

fn combtab(args: &[&str], stdin: &str) -> Output {
    combtab_bytes(args, stdin.as_bytes())
}

fn combtab_bytes(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_combtab"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin)
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn prints_truth_table() {
    let output = combtab(&[], "NOT 2 1\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "01\n10\n");
    assert_eq!(stderr(&output), "");
}

#[test]
fn dash_reads_stdin() {
    let output = combtab(&["-"], "AND 3 1 2\n");
    assert_eq!(stdout(&output), "000\n010\n100\n111\n");
}

#[test]
fn parallel_output_is_identical() {
    let netlist = "XOR 10 1 2\nNAND 11 10 3 4\nNOR 12 11 5\nNOT 13 12\nOR 14 13 6 7 8\n";
    let sequential = combtab(&[], netlist);
    let parallel = combtab(&["--parallel", "--chunk-size", "5"], netlist);
    assert_eq!(sequential.stdout, parallel.stdout);
    assert_eq!(stdout(&parallel).lines().count(), 256);
}

#[test]
fn diagnostics_exit_zero() {
    let output = combtab(&[], "NOT 5 1\nNOT 5 2\nXOR 3 1\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(
        stderr(&output),
        "Error in line 2: signal 5 is assigned to multiple outputs.\n\
         Error in line 3: XOR 3 1\n"
    );
}

#[test]
fn non_utf8_line_is_malformed() {
    let output = combtab_bytes(&[], b"FOO\nNOT 2 \xff1\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(
        stderr(&output),
        "Error in line 1: FOO\n\
         Error in line 2: NOT 2 \u{fffd}1\n"
    );
}

#[test]
fn cycle_exits_zero() {
    let output = combtab(&[], "AND 1 2 3\nAND 2 1 4\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(
        stderr(&output),
        "Error: sequential logic analysis has not yet been implemented.\n"
    );
}

#[test]
fn dot_output() {
    let output = combtab(&["--dot"], "NOT 2 1\n");
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("digraph {"));
    assert!(stdout(&output).contains("1 -> 2"));
}

#[test]
fn missing_file_fails() {
    let output = combtab(&["/this/netlist/does/not/exist"], "");
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("io error:"));
}
