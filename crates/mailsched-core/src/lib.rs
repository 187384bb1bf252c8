//! Shared building blocks for the mail scheduler: configuration, the
//! top-level error type and identifier newtypes.

pub mod config;
pub mod error;
pub mod types;

pub use config::MailschedConfig;
pub use error::{MailschedError, Result};
pub use types::TriggerUid;
