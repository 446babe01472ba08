use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit holding `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string()));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_twig_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    twig_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.current_dir(dir)
        .env("TWIG_AUTHOR_NAME", "fake_user")
        .env("TWIG_AUTHOR_EMAIL", "fake_email@email.com")
        .env_remove("TWIG_AUTHOR_DATE")
        .env_remove("TWIG_DEFAULT_BRANCH")
        .env_remove("TWIG_LOG")
        .env("NO_COLOR", "1")
        .args(args);
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", "-m", message])
}

/// Commit hash a branch ref holds, or an empty string for an empty branch
pub fn read_branch_ref(dir: &Path, branch: &str) -> String {
    std::fs::read_to_string(dir.join(".twig").join("refs").join("heads").join(branch))
        .expect("Failed to read branch ref")
        .trim()
        .to_string()
}
