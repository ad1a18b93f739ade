//! listen command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;
use crate::require_git;

#[test]
fn listen_bootstraps_project() {
  require_git!();
  let env = TestEnv::new();
  env.write_file("README.md", "# My App\n");

  env
    .few_cmd()
    .arg("listen")
    .assert()
    .success()
    .stdout(predicate::str::contains("FEW initialization complete."));

  assert!(env.project().join("PARSEME.md").is_file());
  assert!(env.project().join(".few/words").is_dir());
  assert_eq!(env.read_file("few.litany.yaml"), "words: []\n");
  assert!(env.read_file("README.md").starts_with("<!-- FEW:"));
  assert!(env.read_file("README.md").ends_with("# My App\n"));
  let gitignore = env.read_file(".gitignore");
  assert!(gitignore.lines().any(|l| l == ".few/"));
  assert!(gitignore.lines().any(|l| l == "few.litany.yaml"));
}

#[test]
fn listen_twice_changes_nothing() {
  require_git!();
  let env = TestEnv::new();
  env.write_file("README.md", "# My App\n");

  env.few_cmd().arg("listen").assert().success();
  let readme = env.read_file("README.md");
  let gitignore = env.read_file(".gitignore");

  env
    .few_cmd()
    .arg("listen")
    .assert()
    .success()
    .stdout(predicate::str::contains("FEW already initialized."));

  assert_eq!(env.read_file("README.md"), readme);
  assert_eq!(env.read_file(".gitignore"), gitignore);
}

#[test]
fn listen_adds_word() {
  require_git!();
  let env = TestEnv::new();
  let url = env.publish("cadence", &[("PARSEME.md", "# Cadence\n"), ("src/lib.rs", "pub fn beat() {}\n")]);

  env
    .few_cmd()
    .args(["listen", &url])
    .assert()
    .success()
    .stdout(predicate::str::contains("Word 'cadence' cloned"));

  assert!(env.cache_entry("cadence").join(".git").is_dir());
  assert_eq!(env.read_file(".few/words/cadence/src/lib.rs"), "pub fn beat() {}\n");
  assert!(!env.project_word("cadence").join(".git").exists());
  assert_eq!(env.read_file("few.litany.yaml"), "words:\n- cadence\n");
}

#[test]
fn listen_again_refreshes_from_remote() {
  require_git!();
  let env = TestEnv::new();
  let url = env.publish("cadence", &[("VERSION", "1\n"), ("old.txt", "old\n")]);
  env.few_cmd().args(["listen", &url]).assert().success();

  std::fs::remove_file(env.temp.path().join("remotes/cadence/old.txt")).unwrap();
  env.publish("cadence", &[("VERSION", "2\n")]);

  env
    .few_cmd()
    .args(["listen", &url])
    .assert()
    .success()
    .stdout(predicate::str::contains("Word 'cadence' updated"));

  assert_eq!(env.read_file(".few/words/cadence/VERSION"), "2\n");
  assert!(!env.project_word("cadence").join("old.txt").exists());
  assert_eq!(env.read_file("few.litany.yaml"), "words:\n- cadence\n");
}

#[test]
fn listen_unknown_remote_fails() {
  require_git!();
  let env = TestEnv::new();
  let missing = format!("file://{}", env.temp.path().join("remotes/ghost").display());

  env
    .few_cmd()
    .args(["listen", &missing])
    .assert()
    .failure()
    .stderr(predicate::str::contains("ghost"));

  assert!(!env.project_word("ghost").exists());
}

#[test]
fn listen_invalid_reference_fails() {
  require_git!();
  let env = TestEnv::new();

  env
    .few_cmd()
    .args(["listen", "owner/.."])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid package reference"));
}

#[test]
fn hidden_from_litany_flag_skips_recording() {
  require_git!();
  let env = TestEnv::new();
  let url = env.publish("cadence", &[("PARSEME.md", "# Cadence\n")]);

  env
    .few_cmd()
    .args(["listen", &url, "--from-litany"])
    .assert()
    .success();

  assert!(env.project_word("cadence").is_dir());
  assert_eq!(env.read_file("few.litany.yaml"), "words: []\n");
}
