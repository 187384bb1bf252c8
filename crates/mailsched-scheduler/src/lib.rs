//! `mailsched-scheduler`: recurrence and trigger lifecycle engine for
//! row-driven recurring mail.
//!
//! # Overview
//!
//! Users describe messages as rows (recipients, subject, body, time and a
//! recurrence mode). Submitting a row registers a trigger with the platform
//! and writes its uid back onto the row. Each fire arrives with only that uid;
//! the [`lifecycle::LifecycleManager`] re-reads the row, gates on the start/end
//! window, sends the mail, retires finished triggers and writes a status
//! string back. A periodic sweep deletes triggers whose rows disappeared.
//!
//! # Recurrence modes
//!
//! | Mode      | Registration                                       |
//! |-----------|----------------------------------------------------|
//! | `None`    | One fire at fire-date + HH:MM in the entry's zone  |
//! | `Daily`   | Every day at HH, near MM                           |
//! | `Weekly`  | Every week on a weekday at HH, near MM             |
//! | `Monthly` | On a day of the month at HH, near MM               |
//! | `Custom`  | Never auto-scheduled                               |
//!
//! Collaborators (row store, trigger registry, mail sender, clock) are traits
//! in [`platform`]; SQLite and in-memory implementations are provided.

pub mod db;
pub mod engine;
pub mod error;
pub mod labels;
pub mod lifecycle;
pub mod memory;
pub mod platform;
pub mod recurrence;
pub mod registry;
pub mod repository;
pub mod sheet;
pub mod sweep;
pub mod timezone;
pub mod types;

pub use engine::TriggerDispatcher;
pub use error::{Result, SchedulerError};
pub use labels::Labels;
pub use lifecycle::{FireOutcome, LifecycleManager, SubmitOutcome};
pub use platform::{Clock, MailSender, RowStore, SystemClock, TriggerRegistry};
pub use registry::{Registration, SqliteTriggerRegistry};
pub use repository::EntryRepository;
pub use sheet::SqliteRowStore;
pub use sweep::SweepReport;
pub use timezone::TimezoneCatalog;
pub use types::{
    Column, RawRow, Recurrence, RegistrationSpec, ScheduleEntry, TriggerInfo, TriggerSchedule,
    TriggerUid,
};
