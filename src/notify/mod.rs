//! Notification dispatch by delivery channel.
//!
//! A [`Notifier`] holds a registry of [`Transport`] implementations keyed by
//! the `notify_method` tag on a task ("email", "push"). Dispatch is a pure
//! lookup; an unregistered or unknown tag is logged and treated as a no-op,
//! never an error to the caller.

pub mod email;

use crate::error::NotifyError;
use crate::types::{NotifyMethod, Task};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A delivery channel for notifications.
///
/// Transports are external collaborators (SMTP servers, push providers); this
/// trait is the whole contract the service has with them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a notification for the task. Failure is non-fatal to the
    /// caller and is recorded as advisory bookkeeping on the task.
    async fn send(&self, task: &Task, message: &str) -> Result<(), NotifyError>;
}

/// What happened to a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transport accepted the notification.
    Delivered,
    /// No transport is registered for the task's notify method; nothing was
    /// sent. This is a success from the caller's point of view.
    Skipped,
}

/// Routes notifications to the transport selected by each task's
/// `notify_method` tag.
#[derive(Clone, Default)]
pub struct Notifier {
    transports: HashMap<String, Arc<dyn Transport>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport under a method tag.
    pub fn with_transport(mut self, method: &str, transport: Arc<dyn Transport>) -> Self {
        self.transports.insert(method.to_string(), transport);
        self
    }

    /// Deliver a notification for the task through its configured channel.
    ///
    /// An unknown or unregistered `notify_method` (including the empty
    /// string) is logged and returns [`Outcome::Skipped`]; only a transport
    /// failure surfaces as an error.
    pub async fn notify(&self, task: &Task, message: &str) -> Result<Outcome, NotifyError> {
        let method = NotifyMethod::parse(&task.notify_method);

        let Some(channel) = method.channel() else {
            warn!(
                task_id = %task.id,
                method = %task.notify_method,
                "unknown notify method, dropping notification"
            );
            return Ok(Outcome::Skipped);
        };

        let Some(transport) = self.transports.get(channel) else {
            warn!(
                task_id = %task.id,
                method = channel,
                "no transport registered for notify method, dropping notification"
            );
            return Ok(Outcome::Skipped);
        };

        transport.send(task, message).await?;
        Ok(Outcome::Delivered)
    }
}

/// Transport that only logs the delivery.
///
/// Stands in for channels without a real backend (the push provider in the
/// default configuration) and for tests.
pub struct LogTransport {
    channel: &'static str,
}

impl LogTransport {
    pub fn new(channel: &'static str) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, task: &Task, message: &str) -> Result<(), NotifyError> {
        info!(
            channel = self.channel,
            task_id = %task.id,
            email = %task.email,
            "{} - {}",
            message,
            task.title
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task_with_method(method: &str) -> Task {
        Task {
            id: "t1".to_string(),
            title: "Title".to_string(),
            description: String::new(),
            priority: String::new(),
            due_date_time: Utc::now(),
            email: "a@b.com".to_string(),
            notify_method: method.to_string(),
            notify_status: String::new(),
            notify_message: String::new(),
            reminders: Vec::new(),
        }
    }

    #[tokio::test]
    async fn unknown_method_is_a_no_op() {
        let notifier = Notifier::new().with_transport("email", Arc::new(LogTransport::new("email")));

        let outcome = notifier
            .notify(&task_with_method("sms"), "Reminder due")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped);

        let outcome = notifier
            .notify(&task_with_method(""), "Reminder due")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[tokio::test]
    async fn known_method_without_transport_is_skipped() {
        let notifier = Notifier::new();

        let outcome = notifier
            .notify(&task_with_method("push"), "Reminder due")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[tokio::test]
    async fn registered_method_delivers() {
        let notifier = Notifier::new().with_transport("push", Arc::new(LogTransport::new("push")));

        let outcome = notifier
            .notify(&task_with_method("push"), "Reminder due")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Delivered);
    }
}
