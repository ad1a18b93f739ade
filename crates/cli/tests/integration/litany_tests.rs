//! litany command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;
use crate::require_git;

#[test]
fn litany_without_file_fails() {
  require_git!();
  let env = TestEnv::new();

  env
    .few_cmd()
    .arg("litany")
    .assert()
    .failure()
    .stderr(predicate::str::contains("few.litany.yaml not found. Run 'few listen' first."));
}

#[test]
fn empty_litany_reports_no_words() {
  require_git!();
  let env = TestEnv::new();
  env.write_file("few.litany.yaml", "words: []\n");

  env
    .few_cmd()
    .arg("litany")
    .assert()
    .success()
    .stdout(predicate::str::contains("No words found"));
}

#[test]
fn corrupt_litany_reports_no_words() {
  require_git!();
  let env = TestEnv::new();
  env.write_file("few.litany.yaml", "words: [unclosed\n");

  env
    .few_cmd()
    .arg("litany")
    .assert()
    .success()
    .stdout(predicate::str::contains("No words found"));
}

#[test]
fn litany_syncs_recorded_words_in_order() {
  require_git!();
  let env = TestEnv::new();
  let alpha = env.publish("alpha", &[("PARSEME.md", "# Alpha\n")]);
  let beta = env.publish("beta", &[("PARSEME.md", "# Beta\n")]);

  env.few_cmd().args(["listen", &alpha]).assert().success();
  env.few_cmd().args(["listen", &beta]).assert().success();
  std::fs::remove_dir_all(env.project().join(".few/words")).unwrap();

  // The cache already holds both words, so the litany only needs names.
  let assert = env.few_cmd().arg("litany").assert().success();
  let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();

  let alpha_at = stdout.find("Word 'alpha'").unwrap();
  let beta_at = stdout.find("Word 'beta'").unwrap();
  assert!(alpha_at < beta_at);
  assert!(stdout.contains("Litany complete: 2 word(s)"));
  assert_eq!(env.read_file(".few/words/alpha/PARSEME.md"), "# Alpha\n");
  assert_eq!(env.read_file(".few/words/beta/PARSEME.md"), "# Beta\n");
  assert_eq!(env.read_file("few.litany.yaml"), "words:\n- alpha\n- beta\n");
}
