//! Reads and writes [`ScheduleEntry`] records through a [`RowStore`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

use crate::{
    error::{Result, SchedulerError},
    labels::Labels,
    platform::RowStore,
    timezone::TimezoneCatalog,
    types::{Column, RawRow, ScheduleEntry, TriggerUid, FIRST_DATA_ROW},
};

/// Row-store backed repository of schedule entries.
pub struct EntryRepository {
    rows: Arc<dyn RowStore>,
    labels: Labels,
}

impl EntryRepository {
    pub fn new(rows: Arc<dyn RowStore>, labels: Labels) -> Self {
        Self { rows, labels }
    }

    /// Parse the entry stored at `row`.
    pub fn read_by_row(&self, row: u32) -> Result<ScheduleEntry> {
        let raw = self
            .rows
            .read_row(row)?
            .ok_or_else(|| SchedulerError::validation(row, "row does not exist"))?;
        parse_entry(row, &raw, &self.labels)
    }

    /// Row of the first entry whose uid cell equals `uid`.
    ///
    /// Scans from the first data row to the last populated one; with duplicate
    /// uids the lowest row wins.
    pub fn find_row_by_uid(&self, uid: &TriggerUid) -> Result<Option<u32>> {
        if uid.is_empty() {
            return Ok(None);
        }
        for row in FIRST_DATA_ROW..=self.rows.last_row()? {
            if let Some(raw) = self.rows.read_row(row)? {
                if raw.get(Column::Uid).trim() == uid.as_str() {
                    return Ok(Some(row));
                }
            }
        }
        Ok(None)
    }

    /// Resolve a fired trigger back to a freshly read entry.
    pub fn read_by_uid(&self, uid: &TriggerUid) -> Result<ScheduleEntry> {
        match self.find_row_by_uid(uid)? {
            Some(row) => self.read_by_row(row),
            None => Err(SchedulerError::Resolution {
                uid: uid.to_string(),
            }),
        }
    }

    /// Build a uid → row index in a single scan.
    pub fn uid_index(&self) -> Result<UidIndex> {
        let mut rows = HashMap::new();
        for row in FIRST_DATA_ROW..=self.rows.last_row()? {
            if let Some(raw) = self.rows.read_row(row)? {
                let uid = raw.get(Column::Uid).trim();
                if !uid.is_empty() {
                    rows.entry(uid.to_string()).or_insert(row);
                }
            }
        }
        Ok(UidIndex { rows })
    }

    /// Every parseable entry, in row order. Invalid rows are skipped.
    pub fn list(&self) -> Result<Vec<ScheduleEntry>> {
        let mut entries = Vec::new();
        for row in FIRST_DATA_ROW..=self.rows.last_row()? {
            match self.read_by_row(row) {
                Ok(entry) => entries.push(entry),
                Err(SchedulerError::Validation { row, reason }) => {
                    debug!(row, %reason, "skipping invalid row");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(entries)
    }

    pub fn write_uid(&self, row: u32, uid: &TriggerUid) -> Result<()> {
        self.rows.write_cell(Column::Uid, row, uid.as_str())
    }

    pub fn write_status(&self, row: u32, status: &str) -> Result<()> {
        self.rows.write_cell(Column::Execution, row, status)
    }

    pub fn append(&self, raw: &RawRow) -> Result<u32> {
        self.rows.append_row(raw)
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }
}

/// uid → row lookup built from one scan; the first row per uid wins.
#[derive(Debug, Clone, Default)]
pub struct UidIndex {
    rows: HashMap<String, u32>,
}

impl UidIndex {
    pub fn row_of(&self, uid: &TriggerUid) -> Option<u32> {
        self.rows.get(uid.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Interpret a raw row.
///
/// Optional cells that fail to parse are treated as absent; the recurrence
/// engine rejects entries whose mode needs them.
pub fn parse_entry(row: u32, raw: &RawRow, labels: &Labels) -> Result<ScheduleEntry> {
    let recipients = raw.get(Column::Recipients).trim().to_string();
    if recipients.is_empty() {
        return Err(SchedulerError::validation(row, "no recipients"));
    }

    let fire_time = raw.get(Column::FireTime);
    let (hour, minute) = parse_time(fire_time).ok_or_else(|| {
        SchedulerError::validation(row, format!("unreadable fire time {fire_time:?}"))
    })?;

    let uid = raw.get(Column::Uid).trim();
    let execution = raw.get(Column::Execution).trim();

    let entry = ScheduleEntry {
        row_no: row,
        uid: (!uid.is_empty()).then(|| TriggerUid::from(uid)),
        recipients,
        subject: raw.get(Column::Subject).to_string(),
        message: raw.get(Column::Message).to_string(),
        timezone: TimezoneCatalog::resolve(raw.get(Column::Timezone)),
        mode: labels.recurrence(raw.get(Column::Recurrence)),
        hour,
        minute,
        weekday: labels.weekday(raw.get(Column::Weekday)),
        month_day: raw.get(Column::MonthDay).trim().parse::<u8>().ok(),
        sent_on_date: parse_date(raw.get(Column::FireDate)),
        unique_message: parse_flag(raw.get(Column::UniqueMessage), false),
        start_date: parse_local_datetime(raw.get(Column::StartDate)),
        end_date: parse_local_datetime(raw.get(Column::EndDate)),
        never_expires: parse_flag(raw.get(Column::NeverExpires), true),
        execution: (!execution.is_empty()).then(|| execution.to_string()),
    };

    if let (Some(start), Some(end)) = (entry.start_date, entry.end_date) {
        if !entry.never_expires && start > end {
            return Err(SchedulerError::validation(
                row,
                "start date is after end date",
            ));
        }
    }

    Ok(entry)
}

/// `HH:MM`, `HH:MM:SS`, or a full timestamp.
fn parse_time(cell: &str) -> Option<(u8, u8)> {
    let cell = cell.trim();
    let time = NaiveTime::parse_from_str(cell, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(cell, "%H:%M:%S"))
        .ok()
        .or_else(|| parse_local_datetime(cell).map(|dt| dt.time()))?;
    Some((time.hour() as u8, time.minute() as u8))
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    parse_local_datetime(cell).map(|dt| dt.date())
}

/// Date-only cells denote local midnight.
fn parse_local_datetime(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M"))
        .ok()
}

fn parse_flag(cell: &str, default: bool) -> bool {
    match cell.trim().to_lowercase().as_str() {
        "" => default,
        "true" | "yes" | "y" | "1" | "x" => true,
        _ => false,
    }
}
