//! Fire-and-forget background task dispatch.
//!
//! Tasks are typed payloads published to a bounded in-process queue and
//! drained by one worker task. Enqueueing never blocks the originating
//! request and never fails it: a full queue or a delivery failure is logged
//! and dropped, not retried.

use tokio::sync::mpsc;

use washboard_core::Email;

use super::email::EmailService;

/// Default queue capacity before dispatches start dropping.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// A background email task with its typed payload.
#[derive(Debug, Clone)]
pub enum EmailTask {
    /// Deliver generated credentials to a newly created SAAS admin.
    SaasAdminCredentials {
        to: Email,
        first_name: String,
        username: String,
        password: String,
    },
}

/// Producer handle for publishing tasks.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tx: mpsc::Sender<EmailTask>,
}

impl TaskQueue {
    /// Publish a task without waiting for delivery.
    ///
    /// Failures never propagate to the caller; a full or closed queue is
    /// logged and the task is dropped.
    pub fn dispatch(&self, task: EmailTask) {
        if let Err(e) = self.tx.try_send(task) {
            tracing::error!(error = %e, "dropping background email task");
        }
    }
}

/// Spawn the email worker and return the queue handle for producers.
///
/// The worker runs until every [`TaskQueue`] clone is dropped.
#[must_use]
pub fn spawn_email_worker(
    service: EmailService,
    login_url: String,
    capacity: usize,
) -> TaskQueue {
    let (tx, mut rx) = mpsc::channel(capacity);

    tokio::spawn(async move {
        while let Some(task) = rx.recv().await {
            if let Err(e) = run_task(&service, &login_url, task).await {
                tracing::error!(error = %e, "failed to deliver background email");
            }
        }
        tracing::debug!("email worker stopped");
    });

    TaskQueue { tx }
}

async fn run_task(
    service: &EmailService,
    login_url: &str,
    task: EmailTask,
) -> Result<(), super::email::EmailError> {
    match task {
        EmailTask::SaasAdminCredentials {
            to,
            first_name,
            username,
            password,
        } => {
            tracing::info!(admin = %username, "sending SAAS admin credentials email");
            service
                .send_saas_admin_credentials(&to, &first_name, &username, &password, login_url)
                .await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_never_fails_when_queue_is_gone() {
        // Build a queue whose receiver is dropped immediately; dispatch must
        // swallow the failure.
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let queue = TaskQueue { tx };
        queue.dispatch(EmailTask::SaasAdminCredentials {
            to: Email::parse("admin@example.com").unwrap(),
            first_name: "Asha".to_owned(),
            username: "asha.verma".to_owned(),
            password: "tmp".to_owned(),
        });
    }

    #[test]
    fn test_dispatch_never_fails_when_queue_is_full() {
        let (tx, _rx) = mpsc::channel(1);
        let queue = TaskQueue { tx };
        let task = EmailTask::SaasAdminCredentials {
            to: Email::parse("admin@example.com").unwrap(),
            first_name: "Asha".to_owned(),
            username: "asha.verma".to_owned(),
            password: "tmp".to_owned(),
        };
        queue.dispatch(task.clone());
        queue.dispatch(task); // over capacity, dropped silently
    }
}
