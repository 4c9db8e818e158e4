// ABOUTME: Runs external CLI tools (docker, aws) and captures their output.
// ABOUTME: Shared by the Docker, registry, and ECS adapters.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Result of running an external tool.
#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stderr, falling back to stdout when stderr is empty.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Run `program` with `args`, optionally writing `stdin` to it, and wait for exit.
///
/// Only spawn/wait failures are errors; a non-zero exit is reported in the output.
pub async fn run_command(
    program: &str,
    args: &[String],
    stdin: Option<&[u8]>,
) -> std::io::Result<CommandOutput> {
    tracing::debug!(program, args = ?args, "running command");

    let mut child = Command::new(program)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(input) = stdin
        && let Some(mut pipe) = child.stdin.take()
    {
        pipe.write_all(input).await?;
        // Dropping the pipe closes it so the child sees EOF.
        drop(pipe);
    }

    let output = child.wait_with_output().await?;
    let result = CommandOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    if !result.success {
        tracing::debug!(program, exit_code = ?result.exit_code, "command failed");
    }

    Ok(result)
}
