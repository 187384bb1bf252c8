use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub use mailsched_core::TriggerUid;

/// Handler bound to the submission trigger. Not row-correlated.
pub const SUBMIT_HANDLER: &str = "on_schedule_submit";
/// Handler bound to every per-row trigger.
pub const FIRE_HANDLER: &str = "on_schedule_executed";
/// Handler bound to the periodic orphan sweep. Not row-correlated.
pub const CLEANUP_HANDLER: &str = "on_cleanup";

/// First row holding schedule data; row 1 is the sheet header.
pub const FIRST_DATA_ROW: u32 = 2;

/// How often an entry repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recurrence {
    /// A single fire on `sent_on_date`.
    None,
    Daily,
    Weekly,
    Monthly,
    /// Never scheduled automatically; reserved for manually created triggers.
    Custom,
}

impl Recurrence {
    pub const SCHEDULABLE: [Recurrence; 4] = [
        Recurrence::None,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
    ];

    /// Localisation key of the display label, e.g. `recurrence.Daily`.
    pub fn label_key(&self) -> &'static str {
        match self {
            Recurrence::None => "recurrence.None",
            Recurrence::Daily => "recurrence.Daily",
            Recurrence::Weekly => "recurrence.Weekly",
            Recurrence::Monthly => "recurrence.Monthly",
            Recurrence::Custom => "recurrence.Custom",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Recurrence::None)
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Custom => "custom",
        };
        write!(f, "{s}")
    }
}

/// Semantic columns of the persisted row layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Recipients,
    Subject,
    Message,
    Recurrence,
    FireTime,
    Weekday,
    FireDate,
    MonthDay,
    Timezone,
    UniqueMessage,
    StartDate,
    EndDate,
    NeverExpires,
    Uid,
    Execution,
}

impl Column {
    pub const ALL: [Column; 15] = [
        Column::Recipients,
        Column::Subject,
        Column::Message,
        Column::Recurrence,
        Column::FireTime,
        Column::Weekday,
        Column::FireDate,
        Column::MonthDay,
        Column::Timezone,
        Column::UniqueMessage,
        Column::StartDate,
        Column::EndDate,
        Column::NeverExpires,
        Column::Uid,
        Column::Execution,
    ];

    /// Stable snake_case name; doubles as the SQLite column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Recipients => "recipients",
            Column::Subject => "subject",
            Column::Message => "message",
            Column::Recurrence => "recurrence",
            Column::FireTime => "fire_time",
            Column::Weekday => "weekday",
            Column::FireDate => "fire_date",
            Column::MonthDay => "month_day",
            Column::Timezone => "timezone",
            Column::UniqueMessage => "unique_message",
            Column::StartDate => "start_date",
            Column::EndDate => "end_date",
            Column::NeverExpires => "never_expires",
            Column::Uid => "uid",
            Column::Execution => "execution",
        }
    }
}

/// Uninterpreted cell values of one row. Missing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: BTreeMap<Column, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: Column) -> &str {
        self.cells.get(&column).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        self.cells.insert(column, value.into());
    }

    /// Builder-style [`RawRow::set`].
    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }
}

/// One schedule directive, parsed from a row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    /// Positional identity within the row store.
    pub row_no: u32,
    /// Set once the entry has a live trigger.
    pub uid: Option<TriggerUid>,
    /// One or more addresses, comma-joined.
    pub recipients: String,
    pub subject: String,
    /// HTML-capable body.
    pub message: String,
    /// `None` until defaulted to the ambient zone by the recurrence engine.
    pub timezone: Option<Tz>,
    pub mode: Recurrence,
    pub hour: u8,
    pub minute: u8,
    pub weekday: Option<Weekday>,
    pub month_day: Option<u8>,
    pub sent_on_date: Option<NaiveDate>,
    /// Send one message per recipient instead of one multi-recipient message.
    pub unique_message: bool,
    /// Local wall-clock start of the active window.
    pub start_date: Option<NaiveDateTime>,
    /// Local wall-clock end of the active window; ignored when `never_expires`.
    pub end_date: Option<NaiveDateTime>,
    pub never_expires: bool,
    /// Last status written by the fire handler.
    pub execution: Option<String>,
}

impl ScheduleEntry {
    /// Split recipients on commas, dropping blanks.
    pub fn recipient_list(&self) -> Vec<&str> {
        self.recipients
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect()
    }
}

/// Registration parameters handed to the trigger platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSpec {
    /// IANA id the wall-clock fields are interpreted in.
    pub timezone: String,
    pub schedule: TriggerSchedule,
}

/// Concrete fire pattern of a registration.
///
/// `near_minute` is a hint: platforms may fire anywhere inside their
/// tolerance window around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerSchedule {
    /// Exactly one fire at an absolute instant.
    At { at: DateTime<Utc> },
    EveryDays { days: u32, hour: u8, near_minute: u8 },
    EveryWeeks {
        weeks: u32,
        weekday: Weekday,
        hour: u8,
        near_minute: u8,
    },
    OnMonthDay { day: u8, hour: u8, near_minute: u8 },
}

/// A live registration as reported by the trigger platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerInfo {
    pub uid: TriggerUid,
    pub handler: String,
}
