//! Mail delivery backends for the scheduler's [`MailSender`] seam.
//!
//! [`MailSender`]: mailsched_scheduler::MailSender

pub mod outbox;
pub mod smtp;

pub use outbox::{OutboxMailer, OutboxMessage};
pub use smtp::SmtpMailer;
