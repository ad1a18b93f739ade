mod cmd;
mod output;
mod prompts;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{cmd_interpret, cmd_listen, cmd_litany, cmd_prompt, cmd_status};
use crate::output::{OutputFormat, print_error};

/// FEW - an AI-first development package manager and toolkit
#[derive(Parser)]
#[command(name = "few")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Invoke 'few' within an existing development project.")]
struct Cli {
  /// Increase log verbosity (-v for info, -vv for debug)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// (Re)initialize FEW in this project, or add/update a word
  Listen {
    /// Word to add: 'name', 'owner/name' or a git URL
    package: Option<String>,

    /// Do not record the word in few.litany.yaml
    #[arg(long, hide = true)]
    from_litany: bool,
  },

  /// Install or update every word listed in few.litany.yaml
  Litany,

  /// Generate project files from the PARSEME notes
  #[command(visible_alias = "compile")]
  Interpret,

  /// Print the interpretation prompt without sending it
  Prompt,

  /// Show the words of this project and their cache state
  Status {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Listen { package, from_litany } => cmd_listen(package.as_deref(), from_litany),
    Commands::Litany => cmd_litany(),
    Commands::Interpret => cmd_interpret(),
    Commands::Prompt => cmd_prompt(),
    Commands::Status { output } => cmd_status(output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}

/// `RUST_LOG` wins when set, otherwise the level follows `-v`.
fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();
}
