// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Shell command tool

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::{ShellResult, Tool, ToolArgs, ToolOutput};
use crate::{AgentError, Result};

/// Runs a command through the platform shell
pub struct RunShellTool;

#[async_trait]
impl Tool for RunShellTool {
    fn name(&self) -> &'static str {
        "run_shell"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Run a shell command and capture stdout/stderr.
- args schema:
  {
    "command": "string, the shell command to run"
  }
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let command = args.require("command")?;
        Ok(ToolOutput::Shell(run_shell(&command).await?))
    }
}

/// Run `command` with `sh -c` (or `cmd /C` on Windows) and capture output
pub async fn run_shell(command: &str) -> Result<ShellResult> {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C");
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c");
        c
    };
    cmd.arg(command);

    debug!("Running shell command: {}", command);

    let output = cmd
        .output()
        .await
        .map_err(|e| AgentError::tool(format!("failed to start shell: {}", e)))?;

    info!("Command exited with {:?}", output.status.code());

    Ok(ShellResult {
        command: command.to_string(),
        returncode: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_captures_stdout_stderr_and_code() {
        let result = run_shell("echo out; echo err 1>&2; exit 3").await.unwrap();
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.returncode, Some(3));
    }

    #[tokio::test]
    async fn test_tool_requires_command() {
        let map = json!({"command": ""}).as_object().cloned().unwrap();
        let err = RunShellTool.run(&ToolArgs::new("run_shell", &map)).await.unwrap_err();
        assert!(matches!(err, AgentError::MissingArgument { .. }));
    }
}
