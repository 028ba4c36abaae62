use crate::Result;
use crate::error::Error;
use log::{debug, warn};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Replaces each `{placeholder}` in `template` with its value.
pub fn expand(template: &str, substitutions: &[(&str, &str)]) -> String {
    substitutions
        .iter()
        .fold(template.to_string(), |command, (placeholder, value)| {
            command.replace(placeholder, value)
        })
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

/// Runs `command` through the shell and returns its standard output.
///
/// `input` is written to the child's stdin while stdout is drained, so large
/// templates cannot deadlock on a full pipe. The child is killed if `timeout`
/// expires before it exits.
pub async fn run(command: &str, input: Option<&[u8]>, timeout: Option<Duration>) -> Result<Vec<u8>> {
    let start = Instant::now();
    let mut child = shell(command)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let stdin = child.stdin.take();
    let feed = async move {
        if let (Some(mut stdin), Some(bytes)) = (stdin, input) {
            match stdin.write_all(bytes).await {
                // The compiler may exit without reading all of its input;
                // its exit status decides the outcome.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("Compiler closed stdin early: {}", command)
                }
                other => other?,
            }
        }
        Ok::<_, std::io::Error>(())
    };
    let finished = async {
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        fed?;
        output
    };

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, finished)
            .await
            .map_err(|_| {
                let millis = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                warn!("Compiler timed out after {}ms: {}", millis, command);
                Error::CompilerTimeout {
                    command: command.to_string(),
                    millis,
                }
            })??,
        None => finished.await?,
    };

    let elapsed = start.elapsed().as_millis();
    if !output.status.success() {
        warn!(
            "Compiler failed: command={}, status={}, elapsed={}ms, stderr=\n{}",
            command,
            output.status,
            elapsed,
            String::from_utf8_lossy(&output.stderr)
        );
        return Err(Error::CompilerFailed {
            command: command.to_string(),
            status: output.status.to_string(),
        });
    }

    debug!(
        "Compiler: command={}, elapsed={}ms, output={} bytes",
        command,
        elapsed,
        output.stdout.len()
    );
    Ok(output.stdout)
}
