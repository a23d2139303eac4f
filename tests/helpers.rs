use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::process::Command;

pub const GENERATED_HEADER: &str =
    "/* eslint-disable */\n// This file was automatically generated and should not be edited.\n\n";

pub const SDL_SCHEMA_PATH: &str = "tests/fixtures/schema.graphql";
pub const INTROSPECTION_SCHEMA_PATH: &str = "tests/fixtures/schema.json";

/// A `typegen graphql` invocation against a fresh directory, using the SDL
/// schema fixture.
pub fn typegen_command_with_fake_dir() -> (Command, TempDir) {
    let mut cmd = Command::cargo_bin("typegen").unwrap();
    let temp_dir = assert_fs::TempDir::new().unwrap();
    cmd.arg("graphql");
    cmd.arg(temp_dir.path());
    cmd.arg("--schema").arg(SDL_SCHEMA_PATH);
    (cmd, temp_dir)
}

/// Diff predicate for a generated file, ignoring leading/trailing whitespace
/// in the expectation.
pub fn diff(expected: &str) -> predicates::str::DifferencePredicate {
    predicates::str::diff(format!("{GENERATED_HEADER}{}\n", expected.trim()))
}

pub fn assert_generated(dir: &TempDir, relative_path: &str, expected_content: &str) {
    dir.child(relative_path).assert(diff(expected_content));
}

/// The basic outline of a successful compile:
///  * make a fake dir
///  * write in a single file
///  * expect compiled outputs
pub fn basic_success_assert(graphql_content: &str, expectations: &[(&str, &str)]) {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str(graphql_content)
        .unwrap();
    cmd.assert().success();
    for (relative_path, expected_content) in expectations {
        assert_generated(&temp_dir, relative_path, expected_content);
    }
}
