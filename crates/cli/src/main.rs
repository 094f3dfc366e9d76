mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use scaffold_lib::action::LifecycleEvent;
use scaffold_lib::install::InstallError;
use tracing_subscriber::EnvFilter;

use crate::cmd::ProjectArgs;
use crate::output::{OutputFormat, print_error};

/// scaffold - turn a project created from the DrevOps Scaffold template into a generic project
#[derive(Parser)]
#[command(name = "scaffold")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Rewrite the template manifest into a generic project manifest
  Generalize {
    #[command(flatten)]
    project: ProjectArgs,

    /// Dependencies are not installed by the invoking command
    #[arg(long)]
    no_install: bool,

    /// Package manager command that triggered generalization
    #[arg(long, value_name = "NAME")]
    command: Option<String>,

    /// Schedule file (default: .scaffold-schedule.json beside the manifest)
    #[arg(long, value_name = "PATH")]
    schedule: Option<PathBuf>,
  },

  /// Run the scheduled actions for a lifecycle event
  Dispatch {
    #[command(flatten)]
    project: ProjectArgs,

    /// Lifecycle event that was reached
    #[arg(long, value_enum, default_value_t = EventArg::PostCreateProject)]
    event: EventArg,

    /// Schedule file (default: .scaffold-schedule.json beside the manifest)
    #[arg(long, value_name = "PATH")]
    schedule: Option<PathBuf>,

    /// Ask the package manager for colored output
    #[arg(long)]
    ansi: bool,
  },

  /// Add the scaffold package as a development dependency now
  Require {
    #[command(flatten)]
    project: ProjectArgs,

    /// Ask the package manager for colored output
    #[arg(long)]
    ansi: bool,
  },

  /// Run one dependency-resolution cycle over JSON package lists
  Resolve {
    #[command(flatten)]
    project: ProjectArgs,

    /// Candidate pool, rewritten in place
    #[arg(long, value_name = "PATH")]
    pool: PathBuf,

    /// Installed packages, rewritten in place
    #[arg(long, value_name = "PATH")]
    installed: Option<PathBuf>,
  },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EventArg {
  PostCreateProject,
}

impl From<EventArg> for LifecycleEvent {
  fn from(event: EventArg) -> Self {
    match event {
      EventArg::PostCreateProject => LifecycleEvent::PostCreateProject,
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::from(exit_code(&err))
    }
  }
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Generalize {
      project,
      no_install,
      command,
      schedule,
    } => cmd::cmd_generalize(&project, no_install, command.as_deref(), schedule.as_deref(), cli.format),
    Commands::Dispatch {
      project,
      event,
      schedule,
      ansi,
    } => cmd::cmd_dispatch(&project, event.into(), schedule.as_deref(), ansi, cli.format),
    Commands::Require { project, ansi } => cmd::cmd_require(&project, ansi, cli.format),
    Commands::Resolve {
      project,
      pool,
      installed,
    } => cmd::cmd_resolve(&project, &pool, installed.as_deref(), cli.format),
  }
}

/// A failed install exits with the package manager's own status.
fn exit_code(err: &anyhow::Error) -> u8 {
  err
    .chain()
    .find_map(|cause| cause.downcast_ref::<InstallError>())
    .and_then(InstallError::exit_status)
    .and_then(|status| u8::try_from(status).ok())
    .filter(|&status| status != 0)
    .unwrap_or(1)
}
