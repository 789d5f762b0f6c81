//! Desktop notifications.
//!
//! Notifications are fire-and-forget: a failure to deliver one is logged
//! and otherwise ignored. [`notify_quietly`] is the entry point the rest of
//! the crate uses.

use crate::error::{PiprError, Result};
use crate::shell;

/// Application name shown by notification daemons.
const APP_NAME: &str = "pipr";

/// Urgency of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Priority {
    #[default]
    Normal,
    High,
}

impl Priority {
    fn urgency(self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "critical",
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier {
    /// Deliver a notification.
    fn notify(&self, title: &str, message: &str, priority: Priority) -> Result<()>;
}

/// Notifier using the platform's notification tool.
///
/// `notify-send` on Linux, `osascript` on macOS; a no-op elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn command(title: &str, message: &str, priority: Priority) -> Option<(&'static str, Vec<String>)> {
        if cfg!(target_os = "linux") {
            Some((
                "notify-send",
                vec![
                    "--app-name".to_string(),
                    APP_NAME.to_string(),
                    "--urgency".to_string(),
                    priority.urgency().to_string(),
                    title.to_string(),
                    message.to_string(),
                ],
            ))
        } else if cfg!(target_os = "macos") {
            let script = format!(
                "display notification {} with title {}",
                applescript_string(message),
                applescript_string(title)
            );
            Some(("osascript", vec!["-e".to_string(), script]))
        } else {
            None
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str, priority: Priority) -> Result<()> {
        let Some((program, args)) = Self::command(title, message, priority) else {
            return Ok(());
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let result = shell::execute_quiet(program, &args).map_err(|e| {
            PiprError::NotificationFailed {
                message: format!("{}: {}", program, e),
            }
        })?;

        if result.success {
            Ok(())
        } else {
            Err(PiprError::NotificationFailed {
                message: format!("{} exited with {:?}: {}", program, result.exit_code, result.stderr.trim()),
            })
        }
    }
}

/// Notifier that drops everything, used with `--no-notify`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _message: &str, _priority: Priority) -> Result<()> {
        Ok(())
    }
}

/// Deliver a notification, logging instead of failing.
pub fn notify_quietly(notifier: &dyn Notifier, title: &str, message: &str, priority: Priority) {
    if let Err(e) = notifier.notify(title, message, priority) {
        tracing::warn!("{}", e);
    }
}

fn applescript_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Notifier that records every notification, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: std::cell::RefCell<Vec<(String, String, Priority)>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose deliveries always fail (after recording).
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|(t, _, _)| t.clone()).collect()
    }

    pub fn sent(&self) -> Vec<(String, String, Priority)> {
        self.sent.borrow().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str, priority: Priority) -> Result<()> {
        self.sent
            .borrow_mut()
            .push((title.to_string(), message.to_string(), priority));
        if self.fail {
            return Err(PiprError::NotificationFailed {
                message: "daemon unavailable".to_string(),
            });
        }
        Ok(())
    }
}
