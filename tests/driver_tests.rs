use std::fs;
use std::path::{Path, PathBuf};

use oberon2c::compiler::CompilerOptions;
use oberon2c::driver::{compile_file, output_paths};
use tempfile::TempDir;

/// Write `source` into a fresh temp dir
fn stage(name: &str, source: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, source).expect("Failed to write source");
    (dir, path)
}

#[test]
fn test_output_paths() {
    let (c_path, h_path) = output_paths(Path::new("src/Counter.Mod"));
    assert_eq!(c_path, PathBuf::from("src/Counter.c"));
    assert_eq!(h_path, PathBuf::from("src/Counter.h"));

    let (c_path, h_path) = output_paths(Path::new("Plain"));
    assert_eq!(c_path, PathBuf::from("Plain.c"));
    assert_eq!(h_path, PathBuf::from("Plain.h"));
}

#[test]
fn test_writes_both_units() {
    let (dir, path) = stage("Counter.Mod", include_str!("programs/Counter.Mod"));
    compile_file(&path, &CompilerOptions::default()).expect("Counter.Mod should compile");

    let code = fs::read_to_string(dir.path().join("Counter.c")).expect("Counter.c should exist");
    let header = fs::read_to_string(dir.path().join("Counter.h")).expect("Counter.h should exist");
    assert!(code.contains("#include \"Counter.h\"\n"), "own header not included:\n{code}");
    assert!(header.starts_with("#ifndef Counter_H\n"));
    assert!(header.ends_with("#endif\n"));
}

#[test]
fn test_failure_removes_outputs() {
    let (dir, path) = stage("Broken.Mod", "MODULE Broken;\nVAR x: INTEGER;\nBEGIN\n  y := 1\nEND Broken.");
    let c_path = dir.path().join("Broken.c");
    let h_path = dir.path().join("Broken.h");
    fs::write(&c_path, "stale").unwrap();
    fs::write(&h_path, "stale").unwrap();

    let error = compile_file(&path, &CompilerOptions::default()).expect_err("Broken.Mod should fail");
    let message = format!("{error:#}");
    assert!(message.contains(":4: Undeclared identifier 'y'"), "unexpected message: {message}");
    assert!(!c_path.exists(), "stale .c survived");
    assert!(!h_path.exists(), "stale .h survived");
}

#[test]
fn test_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let error = compile_file(&dir.path().join("Nope.Mod"), &CompilerOptions::default()).unwrap_err();
    assert!(error.to_string().contains("failed to read"));
}
