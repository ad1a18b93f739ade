use std::io::{self, IsTerminal, Write};

use few_lib::consts::API_KEY_ENV;

/// Ask for an API key on the terminal.
pub fn prompt_api_key() -> io::Result<String> {
  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    return Err(io::Error::other(format!(
      "cannot prompt in non-interactive mode; set {} instead",
      API_KEY_ENV
    )));
  }

  write!(io::stderr(), "Enter your API key (stored for future runs): ")?;
  io::stderr().flush()?;

  let mut input = String::new();
  io::stdin().read_line(&mut input)?;

  Ok(input.trim().to_string())
}
