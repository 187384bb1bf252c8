//! In-memory collaborators for tests and embedding.
//!
//! They honour the same contracts as the SQLite implementations and add a
//! few failure switches so error paths can be exercised.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::{
    error::{Result, SchedulerError},
    platform::{Clock, MailSender, RowStore, TriggerRegistry},
    types::{Column, RawRow, RegistrationSpec, TriggerInfo, TriggerUid, FIRST_DATA_ROW},
};

/// Rows kept in a map keyed by row index.
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: Mutex<BTreeMap<u32, RawRow>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a row entirely, as a manual sheet edit would.
    pub fn remove_row(&self, row: u32) {
        self.rows.lock().unwrap().remove(&row);
    }

    pub fn cell(&self, column: Column, row: u32) -> String {
        self.rows
            .lock()
            .unwrap()
            .get(&row)
            .map(|r| r.get(column).to_string())
            .unwrap_or_default()
    }
}

impl RowStore for MemoryRowStore {
    fn read_row(&self, row: u32) -> Result<Option<RawRow>> {
        Ok(self.rows.lock().unwrap().get(&row).cloned())
    }

    fn write_cell(&self, column: Column, row: u32, value: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let raw = rows
            .get_mut(&row)
            .ok_or_else(|| SchedulerError::Store(format!("row {row} does not exist")))?;
        raw.set(column, value);
        Ok(())
    }

    fn last_row(&self) -> Result<u32> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.keys().next_back().copied().unwrap_or(FIRST_DATA_ROW - 1))
    }

    fn append_row(&self, row: &RawRow) -> Result<u32> {
        let mut rows = self.rows.lock().unwrap();
        let next = rows.keys().next_back().map_or(FIRST_DATA_ROW, |r| r + 1);
        rows.insert(next, row.clone());
        Ok(next)
    }
}

/// Registrations kept in creation order.
#[derive(Debug, Default)]
pub struct MemoryTriggerRegistry {
    triggers: Mutex<Vec<(TriggerInfo, RegistrationSpec)>>,
    counter: AtomicU64,
    fail_deletes: AtomicBool,
}

impl MemoryTriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `delete` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn spec_of(&self, uid: &TriggerUid) -> Option<RegistrationSpec> {
        self.triggers
            .lock()
            .unwrap()
            .iter()
            .find(|(info, _)| &info.uid == uid)
            .map(|(_, spec)| spec.clone())
    }

    pub fn len(&self) -> usize {
        self.triggers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TriggerRegistry for MemoryTriggerRegistry {
    fn create(&self, handler: &str, spec: &RegistrationSpec) -> Result<TriggerUid> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let uid = TriggerUid(format!("mem-{n}"));
        self.triggers.lock().unwrap().push((
            TriggerInfo {
                uid: uid.clone(),
                handler: handler.to_string(),
            },
            spec.clone(),
        ));
        Ok(uid)
    }

    fn delete(&self, uid: &TriggerUid) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(SchedulerError::Registry(format!("delete of {uid} refused")));
        }
        let mut triggers = self.triggers.lock().unwrap();
        let before = triggers.len();
        triggers.retain(|(info, _)| &info.uid != uid);
        if triggers.len() == before {
            return Err(SchedulerError::Registry(format!("unknown trigger {uid}")));
        }
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<TriggerInfo>> {
        Ok(self
            .triggers
            .lock()
            .unwrap()
            .iter()
            .map(|(info, _)| info.clone())
            .collect())
    }
}

/// A message captured by [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Records every send attempt; targets listed via `fail_for` are rejected.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    attempts: Mutex<Vec<SentMail>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, to: &str) {
        self.failing.lock().unwrap().insert(to.to_string());
    }

    /// Every attempt, failed ones included.
    pub fn attempts(&self) -> Vec<SentMail> {
        self.attempts.lock().unwrap().clone()
    }
}

impl MailSender for RecordingMailer {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        self.attempts.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        if self.failing.lock().unwrap().contains(to) {
            return Err(SchedulerError::Send {
                to: to.to_string(),
                reason: "mailbox unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Clock frozen at a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
