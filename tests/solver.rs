//! Runs stub solvers that record their arguments.
#![cfg(unix)]

use std::{
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use serial_test::serial;
use smtcheck::{
    check_obligation, run, Error, Options, Outcome, RunError, SolverInvocation,
};
use tempfile::TempDir;

/// Creates an executable shell script named `solver` in `dir`.
fn stub_solver(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("solver");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn script(dir: &Path) -> PathBuf {
    let path = dir.join("input.smt2");
    std::fs::write(&path, "(assert true)\n(check-sat)\n").unwrap();
    path
}

#[test]
#[serial]
fn test_invocation_shape() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), r#"for a in "$@"; do echo "[$a]"; done"#);
    let script = script(dir.path());

    let result = run(&script, &solver).unwrap();
    assert_eq!(
        result.output(),
        format!("[--lang=smt2.6]\n[--incremental]\n[{}]\n", script.display())
    );
    assert!(result.success());
}

#[test]
#[serial]
fn test_reads_script_file() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), r#"cat "$3""#);
    let script = script(dir.path());

    let result = run(&script, &solver).unwrap();
    assert_eq!(result.output(), "(assert true)\n(check-sat)\n");
}

#[test]
#[serial]
fn test_combined_output_in_order() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(
        dir.path(),
        "echo unsat\necho 'warning: x' >&2\necho '(error \"y\")'",
    );
    let script = script(dir.path());

    let result = run(&script, &solver).unwrap();
    assert_eq!(result.output(), "unsat\nwarning: x\n(error \"y\")\n");
}

#[test]
#[serial]
fn test_non_zero_exit_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), "echo unknown\necho 'crashed' >&2\nexit 20");
    let script = script(dir.path());

    let result = run(&script, &solver).unwrap();
    assert!(!result.success());
    assert_eq!(result.status().code(), Some(20));
    assert_eq!(result.output(), "unknown\ncrashed\n");
}

#[test]
#[serial]
fn test_launch_failure() {
    let dir = TempDir::new().unwrap();
    let script = script(dir.path());
    let missing = dir.path().join("no-such-solver");

    match run(&script, &missing) {
        Err(RunError::LaunchFailure { executable, source }) => {
            assert_eq!(executable, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("Expected launch failure, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_not_executable_fails_to_launch() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), "echo sat");
    std::fs::set_permissions(&solver, std::fs::Permissions::from_mode(0o644)).unwrap();
    let script = script(dir.path());

    assert!(matches!(
        run(&script, &solver),
        Err(RunError::LaunchFailure { .. })
    ));
}

#[test]
#[serial]
fn test_timeout_kills_solver() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), "exec sleep 30");
    let script = script(dir.path());

    let res = SolverInvocation::new(&solver, &script)
        .with_timeout(Some(Duration::from_millis(200)))
        .run();
    assert!(matches!(res, Err(RunError::Timeout(d)) if d == Duration::from_millis(200)));
}

#[test]
#[serial]
fn test_timeout_not_reached() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), "echo sat");
    let script = script(dir.path());

    let result = SolverInvocation::new(&solver, &script)
        .with_timeout(Some(Duration::from_secs(30)))
        .run()
        .unwrap();
    assert_eq!(result.output(), "sat\n");
}

#[test]
#[serial]
fn test_check_obligation() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), r#"echo "$1 $2"; cat "$3"; exit 1"#);
    let log = dir.path().join("out.txt");
    std::fs::write(
        &log,
        "SMT TRANSLATION OF T.m():\n(assert false)\n(check-sat)\n(get-model)\n[0.1 secs]\n",
    )
    .unwrap();

    let opts = Options {
        log_file: log,
        solver,
        tag: "T.m()".into(),
        ..Default::default()
    };
    match check_obligation(&opts) {
        Ok(Outcome::Solved(result)) => assert_eq!(
            result.output(),
            "--lang=smt2.6 --incremental\n(assert false)\n(check-sat)\n"
        ),
        other => panic!("Expected solver result, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_check_obligation_launch_failure() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("out.txt");
    std::fs::write(&log, "SMT TRANSLATION OF T.m():\n(assert false)\n(check-sat)\n").unwrap();

    let opts = Options {
        log_file: log,
        solver: dir.path().join("missing"),
        tag: "T.m()".into(),
        ..Default::default()
    };
    assert!(matches!(
        check_obligation(&opts),
        Err(Error::Run(RunError::LaunchFailure { .. }))
    ));
}

#[test]
#[serial]
fn test_raw_output_preserved() {
    let dir = TempDir::new().unwrap();
    // Latin-1 encoded `é`, which is not valid UTF-8
    let solver = stub_solver(dir.path(), r"printf 'unsat \351\n'");
    let script = script(dir.path());

    let result = run(&script, &solver).unwrap();
    assert_eq!(result.output_bytes(), b"unsat \xe9\n");
    assert_eq!(result.output(), "unsat \u{FFFD}\n");
}

#[test]
#[serial]
fn test_timeout_returns_promptly() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), "exec sleep 30");
    let script = script(dir.path());

    let t = Instant::now();
    let res = SolverInvocation::new(&solver, &script)
        .with_timeout(Some(Duration::from_millis(100)))
        .run();
    assert!(matches!(res, Err(RunError::Timeout(_))));
    assert!(t.elapsed() < Duration::from_secs(10));
}

#[test]
#[serial]
fn test_check_obligation_keeps_verdict_if_scratch_vanishes() {
    let dir = TempDir::new().unwrap();
    let solver = stub_solver(dir.path(), r#"rm -f "$3"; echo unsat"#);
    let log = dir.path().join("out.txt");
    std::fs::write(&log, "SMT TRANSLATION OF T.m():\n(assert false)\n(check-sat)\n").unwrap();

    let opts = Options {
        log_file: log,
        solver,
        tag: "T.m()".into(),
        ..Default::default()
    };
    match check_obligation(&opts) {
        Ok(Outcome::Solved(result)) => assert_eq!(result.output(), "unsat\n"),
        other => panic!("Expected solver result, got {:?}", other),
    }
}
