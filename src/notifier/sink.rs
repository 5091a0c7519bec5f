use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[cfg(feature = "emitter")]
use crate::EventEmitter;

/// A platform notification request. Fire-and-forget: there is no delivery
/// confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
}

/// Whether the platform lets us show notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

/// Trait for delivering notifications to the platform.
pub trait NotificationSink {
    type Error: fmt::Display;

    /// Current permission, checked before every delivery.
    fn permission(&self) -> Permission;

    /// Ask for permission. Called at most once per notifier, and only while the
    /// permission is still `Default`.
    fn request_permission(&mut self) -> Permission {
        self.permission()
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogNotifierError {
    BufferPoisoned,
}

impl fmt::Display for LogNotifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogNotifierError::BufferPoisoned => write!(f, "log notifier buffer poisoned"),
        }
    }
}

impl std::error::Error for LogNotifierError {}

/// A simple sink that logs notifications or collects them into a buffer.
pub struct LogNotifier {
    buffer: Option<Arc<Mutex<Vec<Notification>>>>,
    permission: Permission,
    on_request: Permission,
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LogNotifier {
    /// Logs via `tracing` at info level. Permission starts out granted.
    pub fn new() -> Self {
        LogNotifier {
            buffer: None,
            permission: Permission::Granted,
            on_request: Permission::Granted,
        }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<Notification>>>) -> Self {
        LogNotifier {
            buffer: Some(buffer),
            ..Self::new()
        }
    }

    /// Start from `permission` instead of `Granted`.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    /// What the simulated user answers when asked for permission.
    pub fn answering(mut self, answer: Permission) -> Self {
        self.on_request = answer;
        self
    }

    /// Change the permission later, like a user flipping a browser setting.
    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
    }
}

impl NotificationSink for LogNotifier {
    type Error = LogNotifierError;

    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        if self.permission == Permission::Default {
            self.permission = self.on_request;
        }
        self.permission
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), Self::Error> {
        if let Some(buffer) = &self.buffer {
            let mut buffer = buffer
                .lock()
                .map_err(|_| LogNotifierError::BufferPoisoned)?;
            buffer.push(notification.clone());
        } else {
            tracing::info!(
                title = %notification.title,
                body = %notification.body,
                icon = %notification.icon,
                "notification"
            );
        }
        Ok(())
    }
}

/// A sink that emits notifications through an EventEmitter for in-process
/// listeners. Listeners receive the notification as a JSON string.
#[cfg(feature = "emitter")]
pub struct LocalEmitterNotifier {
    emitter: EventEmitter,
    event: String,
    permission: Permission,
}

#[cfg(feature = "emitter")]
impl LocalEmitterNotifier {
    pub const DEFAULT_EVENT: &'static str = "notification";

    pub fn new(emitter: EventEmitter) -> Self {
        LocalEmitterNotifier {
            emitter,
            event: Self::DEFAULT_EVENT.to_string(),
            permission: Permission::Granted,
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }
}

#[cfg(feature = "emitter")]
impl NotificationSink for LocalEmitterNotifier {
    type Error = serde_json::Error;

    fn permission(&self) -> Permission {
        self.permission
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), Self::Error> {
        let payload = serde_json::to_string(notification)?;
        self.emitter.emit(&self.event, payload);
        Ok(())
    }
}
