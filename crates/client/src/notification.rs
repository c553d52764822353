//! Single-slot notification queue.
//!
//! One notification is visible at a time. Showing a new one replaces the
//! current one and restarts the countdown; the slot empties when the
//! countdown runs out or on an explicit hide.

use std::{fmt, future, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    time::{Instant, sleep_until},
};
use tracing::debug;

/// How long a notification stays visible.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(6_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug)]
enum Command {
    Show(Notification),
    Hide,
}

/// Handle to the notification slot.
///
/// The countdown runs on a background task that ends once every handle
/// is dropped.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    commands: mpsc::UnboundedSender<Command>,
    slot: watch::Receiver<Option<Notification>>,
}

impl NotificationQueue {
    /// Spawn a queue with the standard timeout. Must run inside a tokio runtime.
    #[must_use]
    pub fn spawn() -> Self {
        Self::with_timeout(NOTIFICATION_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (slot_tx, slot) = watch::channel(None);

        tokio::spawn(run(receiver, slot_tx, timeout));

        Self { commands, slot }
    }

    /// Show `message`, replacing whatever is visible.
    pub fn show(&self, message: impl Into<String>, severity: Severity) {
        self.send(Command::Show(Notification {
            message: message.into(),
            severity,
        }));
    }

    /// Clear the slot now.
    pub fn hide(&self) {
        self.send(Command::Hide);
    }

    /// The currently visible notification.
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.slot.borrow().clone()
    }

    /// Watch the slot for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("notification task has stopped");
        }
    }
}

async fn run(
    mut commands: mpsc::UnboundedReceiver<Command>,
    slot: watch::Sender<Option<Notification>>,
    timeout: Duration,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        let expiry = async move {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Show(notification)) => {
                    slot.send_replace(Some(notification));
                    deadline = Some(Instant::now() + timeout);
                }
                Some(Command::Hide) => {
                    slot.send_replace(None);
                    deadline = None;
                }
                None => break,
            },
            () = expiry => {
                slot.send_replace(None);
                deadline = None;
            }
        }
    }
}
