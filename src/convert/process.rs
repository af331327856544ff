//! Bounded execution of external conversion tools
//!
//! Every collaborator call goes through [`run_tool`], which kills the child
//! once the configured timeout elapses.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::types::{ConvertError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Resolve an executable name or path via `PATH`
pub fn resolve_tool(cmd: &str) -> Result<PathBuf> {
    which::which(cmd).map_err(|_| ConvertError::ToolNotFound(cmd.to_string()))
}

/// Run a prepared command to completion, failing on timeout or non-zero exit.
pub fn run_tool(tool: &str, mut cmd: Command, timeout: Duration) -> Result<Output> {
    debug!("running {} timeout={:?}", tool, timeout);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    let output = wait_with_timeout(&mut child, timeout)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => output.status.to_string(),
            msg => msg.to_string(),
        };
        return Err(ConvertError::ToolFailed {
            tool: tool.to_string(),
            detail,
        });
    }

    Ok(output)
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    // Pipes are drained on their own threads so a chatty tool can't block
    // on a full buffer while we poll.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });
    let stderr_thread = thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        let exited = match child.try_wait() {
            Ok(exited) => exited,
            Err(e) => {
                warn!("failed to poll process: {}, killing", e);
                abort_child(child);
                return Err(e.into());
            }
        };
        if let Some(status) = exited {
            let stdout = join_reader(stdout_thread)?;
            let stderr = join_reader(stderr_thread)?;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() >= timeout {
            warn!("process timed out after {:?}, killing", timeout);
            abort_child(child);
            return Err(ConvertError::Timeout(timeout));
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill and reap the child; its exit closes the pipes so the reader threads end.
fn abort_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn join_reader(handle: thread::JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    handle
        .join()
        .map_err(|_| ConvertError::TaskFailed("pipe reader thread panicked".to_string()))?
        .map_err(ConvertError::from)
}
