//! Collaborator interfaces the engine consumes.
//!
//! Every invocation (submit, fire, sweep) is stateless: durable state lives in
//! the row store and the trigger registry, both injected through these traits.

use chrono::{DateTime, Utc};

use crate::{
    error::Result,
    types::{Column, RawRow, RegistrationSpec, TriggerInfo, TriggerUid},
};

/// Backing store of schedule rows (a sheet, a table, …).
pub trait RowStore: Send + Sync {
    /// Read one row. `None` when the row does not exist.
    fn read_row(&self, row: u32) -> Result<Option<RawRow>>;

    /// Overwrite a single cell in place.
    fn write_cell(&self, column: Column, row: u32, value: &str) -> Result<()>;

    /// Index of the last populated row, or `FIRST_DATA_ROW - 1` when empty.
    fn last_row(&self) -> Result<u32>;

    /// Append a row after the last populated one and return its index.
    fn append_row(&self, row: &RawRow) -> Result<u32>;
}

/// The platform's registry of scheduled callbacks.
pub trait TriggerRegistry: Send + Sync {
    /// Register `handler` to fire per `spec`; returns the platform-assigned uid.
    fn create(&self, handler: &str, spec: &RegistrationSpec) -> Result<TriggerUid>;

    fn delete(&self, uid: &TriggerUid) -> Result<()>;

    fn list_all(&self) -> Result<Vec<TriggerInfo>>;
}

/// Outbound mail transport.
pub trait MailSender: Send + Sync {
    /// Send one message. `to` may be a comma-joined list of addresses.
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// Source of "now", injectable so window gating is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
