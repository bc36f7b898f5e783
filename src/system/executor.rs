// src/system/executor.rs
//
// Runs the assembled build command as a child process and streams its output
// line by line into a channel, so callers can render progress live instead of
// waiting for the process to finish.

use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No command to execute.")]
    EmptyCommand,
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("Failed while waiting for the build process: {0}")]
    Wait(std::io::Error),
    #[error("Build process exited with code {code:?}")]
    NonZeroExit { code: Option<i32> },
}

/// Spawns `tokens` as a child process, forwarding every stdout and stderr
/// line through `output`. Returns once the process exits; a non-zero exit is
/// an error, but the lines streamed before it remain delivered.
pub async fn run_build(
    tokens: &[String],
    cwd: Option<&Path>,
    output: UnboundedSender<String>,
) -> Result<(), BuildError> {
    let (program, args) = tokens.split_first().ok_or(BuildError::EmptyCommand)?;

    let mut command = Command::new(program);
    command.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    log::info!("Running build: {}", tokens.join(" "));
    let mut child = command.spawn().map_err(|source| BuildError::Spawn {
        program: program.clone(),
        source,
    })?;

    let stdout_task = child
        .stdout
        .take()
        .map(|stream| tokio::spawn(forward_lines(stream, output.clone())));
    let stderr_task = child
        .stderr
        .take()
        .map(|stream| tokio::spawn(forward_lines(stream, output.clone())));

    let status = child.wait().await.map_err(BuildError::Wait)?;

    // Drain both pipes before reporting the exit status.
    if let Some(task) = stdout_task {
        let _ = task.await;
    }
    if let Some(task) = stderr_task {
        let _ = task.await;
    }

    if status.success() {
        Ok(())
    } else {
        Err(BuildError::NonZeroExit {
            code: status.code(),
        })
    }
}

async fn forward_lines<R: AsyncRead + Unpin>(stream: R, output: UnboundedSender<String>) {
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        // A closed receiver means nobody is watching anymore; stop reading.
        if output.send(line).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| (*p).to_string()).collect()
    }

    async fn collect(mut rx: mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_streams_stdout_and_stderr_lines() {
        let (tx, rx) = mpsc::unbounded_channel();
        let result = run_build(
            &tokens(&["sh", "-c", "echo out-line; echo err-line >&2"]),
            None,
            tx,
        )
        .await;
        assert!(result.is_ok());

        let lines = collect(rx).await;
        assert!(lines.contains(&"out-line".to_string()));
        assert!(lines.contains(&"err-line".to_string()));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = run_build(&tokens(&["sh", "-c", "exit 3"]), None, tx).await;
        assert!(matches!(
            result,
            Err(BuildError::NonZeroExit { code: Some(3) })
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = run_build(&tokens(&["definitely-not-a-real-binary"]), None, tx).await;
        assert!(matches!(result, Err(BuildError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_empty_command_is_rejected() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = run_build(&[], None, tx).await;
        assert!(matches!(result, Err(BuildError::EmptyCommand)));
    }

    #[tokio::test]
    async fn test_respects_working_directory() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let (tx, rx) = mpsc::unbounded_channel();
        let result = run_build(&tokens(&["sh", "-c", "pwd"]), Some(dir.path()), tx).await;
        assert!(result.is_ok());

        let lines = collect(rx).await;
        let canonical = dir.path().canonicalize().expect("canonicalize");
        assert_eq!(lines, vec![canonical.display().to_string()]);
    }
}
