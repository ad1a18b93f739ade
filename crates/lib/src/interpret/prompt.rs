//! Prompt construction.

use super::gather::SourceFile;

const TASK: &str = r#"You are the build step of an AI-first project. The project is described
entirely by the notes files below: the root PARSEME.md describes the project
itself, other *.parseme.md files describe parts of it, and files under
.few/words/ describe reusable packages ("words") the project depends on.

Produce the project's source files from these notes.

Respond with a single JSON object and nothing else, shaped exactly like:
{"success": true, "files": [{"path": "relative/path.ext", "content": "full file contents"}]}

Paths are relative to the project root. Every listed file is written verbatim,
replacing any existing file at that path. Do not list the notes files themselves.

If the notes do not give you enough to work with, respond with:
{"success": false, "files": [], "error": "<what is missing>"}"#;

/// Build the prompt for a set of gathered notes files.
pub fn build_prompt(files: &[SourceFile]) -> String {
  let mut prompt = String::from(TASK);
  prompt.push_str("\n\n# Project files\n");

  if files.is_empty() {
    prompt.push_str("\n(no notes files were found)\n");
  }

  for file in files {
    prompt.push_str(&format!("\n=== FILE: {} ===\n", file.path));
    prompt.push_str(&file.content);
    if !file.content.ends_with('\n') {
      prompt.push('\n');
    }
    prompt.push_str(&format!("=== END FILE: {} ===\n", file.path));
  }

  prompt
}

/// Build the follow-up prompt asking the service to correct an unparseable reply.
pub fn build_repair_prompt(error: &str, response: &str) -> String {
  format!(
    "Your previous reply could not be parsed as JSON.\n\n\
     Parse error: {error}\n\n\
     Previous reply:\n{response}\n\n\
     Reply again with only the corrected JSON object, shaped as \
     {{\"success\": bool, \"files\": [{{\"path\": string, \"content\": string}}], \"error\": string}}. \
     Do not add any explanation or text outside the JSON."
  )
}
