//! Running the package manager as a child process.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::{CommandOutput, CommandRunner};

/// Runs commands as real child processes.
///
/// Stdin is closed so nothing can prompt. Stdout and stderr are both
/// captured and returned as one block of output, stdout first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
  async fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<CommandOutput> {
    debug!(program = %program, args = ?args, cwd = %cwd.display(), "spawning process");

    let output = Command::new(program)
      .args(args)
      .current_dir(cwd)
      .stdin(Stdio::null())
      .output()
      .await?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
      if !combined.is_empty() && !combined.ends_with('\n') {
        combined.push('\n');
      }
      combined.push_str(&stderr);
    }

    let status = output.status.code();
    debug!(program = %program, status = ?status, "process exited");

    Ok(CommandOutput {
      status,
      output: combined.trim_end().to_string(),
    })
  }
}
