//! Subprocess execution.
//!
//! Commands are spawned directly with an argument vector; no shell is
//! involved, so package tokens like `numpy>=1.20` never need quoting.

use crate::error::Result;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

/// Render a program and its arguments for display and error messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a program to completion.
///
/// Returns `Err` only when the process could not be spawned; a non-zero
/// exit is reported through [`CommandResult::success`].
pub fn execute(program: &str, args: &[&str], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = Command::new(program);
    cmd.args(args);

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Executing: {}", display_command(program, args));
    let output = cmd.output()?;
    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Run a program, forwarding each output line to `callback` while also
/// collecting it.
pub fn execute_streaming(
    program: &str,
    args: &[&str],
    callback: OutputCallback,
) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Executing (streaming): {}", display_command(program, args));
    let mut child = cmd.spawn()?;

    let (tx, rx) = mpsc::channel();

    let stdout_handle = child.stdout.take().map(|stdout| {
        let tx = tx.clone();
        thread::spawn(move || {
            let mut output = String::new();
            for line in BufReader::new(stdout).lines().map_while(std::result::Result::ok) {
                output.push_str(&line);
                output.push('\n');
                let _ = tx.send(OutputLine::Stdout(line));
            }
            output
        })
    });

    let stderr_handle = child.stderr.take().map(|stderr| {
        let tx = tx.clone();
        thread::spawn(move || {
            let mut output = String::new();
            for line in BufReader::new(stderr).lines().map_while(std::result::Result::ok) {
                output.push_str(&line);
                output.push('\n');
                let _ = tx.send(OutputLine::Stderr(line));
            }
            output
        })
    });

    // Readers hold the remaining senders; the loop ends when both finish.
    drop(tx);
    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr_output = stderr_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    let status = child.wait()?;
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

/// Run a program capturing both streams.
pub fn execute_quiet(program: &str, args: &[&str]) -> Result<CommandResult> {
    let options = CommandOptions {
        capture_stdout: true,
        capture_stderr: true,
        ..Default::default()
    };
    execute(program, args, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PiprError;
    use std::sync::{Arc, Mutex};

    #[test]
    fn display_command_joins_args() {
        assert_eq!(
            display_command("python3", &["-m", "pip", "install", "-r", "reqs.txt"]),
            "python3 -m pip install -r reqs.txt"
        );
        assert_eq!(display_command("python3", &[]), "python3");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let result = execute_quiet("definitely-not-a-real-program-pipr", &[]);
        assert!(matches!(result, Err(PiprError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn execute_captures_stdout() {
        let result = execute_quiet("echo", &["hello"]).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn execute_reports_nonzero_exit() {
        let result = execute_quiet("sh", &["-c", "echo oops >&2; exit 3"]).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[cfg(unix)]
    #[test]
    fn execute_passes_args_verbatim() {
        let result = execute_quiet("echo", &["numpy>=1.20"]).unwrap();
        assert_eq!(result.stdout.trim(), "numpy>=1.20");
    }

    #[cfg(unix)]
    #[test]
    fn execute_without_capture_leaves_output_empty() {
        let result = execute("true", &[], &CommandOptions::default()).unwrap();
        assert!(result.success);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn streaming_forwards_lines() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let result = execute_streaming(
            "sh",
            &["-c", "echo one; echo two >&2"],
            Box::new(move |line| sink.lock().unwrap().push(line)),
        )
        .unwrap();

        assert!(result.success);
        assert_eq!(result.stdout, "one\n");
        assert_eq!(result.stderr, "two\n");
        let seen = seen.lock().unwrap();
        assert!(seen.contains(&OutputLine::Stdout("one".to_string())));
        assert!(seen.contains(&OutputLine::Stderr("two".to_string())));
    }
}
