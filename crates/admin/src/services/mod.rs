//! Application services: email delivery, password handling, background tasks.

pub mod email;
pub mod password;
pub mod tasks;

pub use email::{EmailError, EmailService};
pub use tasks::{EmailTask, TaskQueue, spawn_email_worker};
