//! Trigger lifecycle: registration on submit, the fire handler, retirement.
//!
//! Entry points never propagate errors. Each invocation is independent, so a
//! failure is logged (and, for fires, written to the status cell) and the
//! next scheduled attempt starts from a clean slate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

use crate::{
    error::{Result, SchedulerError},
    platform::{Clock, MailSender, TriggerRegistry},
    recurrence::{compute_registration, describe_next_run, local_to_utc},
    repository::EntryRepository,
    types::{ScheduleEntry, TriggerSchedule, TriggerUid, FIRE_HANDLER},
};

/// Result of [`LifecycleManager::on_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A trigger was created and its uid written onto the row.
    Registered { row: u32, uid: TriggerUid },
    /// The row was invalid or its mode is not auto-scheduled. Nothing was created.
    Skipped { row: u32, reason: String },
    /// The platform refused the trigger, or the uid could not be written back.
    Failed { row: u32, reason: String },
}

/// Result of [`LifecycleManager::on_fire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// No row references the uid; left for the next sweep.
    Unresolved,
    /// Start date not reached: nothing sent, nothing written.
    Dormant { row: u32 },
    Sent { row: u32, retired: bool },
    Failed {
        row: u32,
        retired: bool,
        cause: String,
    },
}

/// Owns creation, correlation, expiry and deletion of per-row triggers.
pub struct LifecycleManager {
    pub(crate) repo: EntryRepository,
    pub(crate) triggers: Arc<dyn TriggerRegistry>,
    mailer: Arc<dyn MailSender>,
    clock: Arc<dyn Clock>,
    pub(crate) ambient_tz: Tz,
}

impl LifecycleManager {
    pub fn new(
        repo: EntryRepository,
        triggers: Arc<dyn TriggerRegistry>,
        mailer: Arc<dyn MailSender>,
        clock: Arc<dyn Clock>,
        ambient_tz: Tz,
    ) -> Self {
        Self {
            repo,
            triggers,
            mailer,
            clock,
            ambient_tz,
        }
    }

    pub fn repository(&self) -> &EntryRepository {
        &self.repo
    }

    pub fn ambient_timezone(&self) -> Tz {
        self.ambient_tz
    }

    /// Register a trigger for the entry at `row` and persist its uid.
    ///
    /// Re-submitting a row that already carries a uid replaces the old
    /// registration, keeping at most one live trigger per entry.
    pub fn on_submit(&self, row: u32) -> SubmitOutcome {
        let mut entry = match self.repo.read_by_row(row) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(row, "schedule row rejected: {e}");
                return SubmitOutcome::Skipped {
                    row,
                    reason: e.to_string(),
                };
            }
        };

        let spec = match compute_registration(&mut entry, self.ambient_tz) {
            Ok(spec) => spec,
            Err(e @ SchedulerError::UnsupportedMode { .. }) => {
                info!(row, mode = %entry.mode, "entry is not auto-scheduled");
                return SubmitOutcome::Skipped {
                    row,
                    reason: e.to_string(),
                };
            }
            Err(e) => {
                warn!(row, "cannot schedule entry: {e}");
                return SubmitOutcome::Skipped {
                    row,
                    reason: e.to_string(),
                };
            }
        };

        // A one-shot instant that has already passed would never fire.
        if let TriggerSchedule::At { at } = spec.schedule {
            if at <= self.clock.now() {
                let e = SchedulerError::validation(row, format!("fire time {at} is in the past"));
                warn!(row, "cannot schedule entry: {e}");
                return SubmitOutcome::Skipped {
                    row,
                    reason: e.to_string(),
                };
            }
        }

        let uid = match self.triggers.create(FIRE_HANDLER, &spec) {
            Ok(uid) => uid,
            Err(e) => {
                error!(row, "trigger creation failed: {e}");
                return SubmitOutcome::Failed {
                    row,
                    reason: e.to_string(),
                };
            }
        };

        // The trigger exists from here on; if the write-back fails it is
        // orphaned until the next sweep.
        if let Err(e) = self.repo.write_uid(row, &uid) {
            error!(row, %uid, "trigger created but uid write-back failed: {e}");
            return SubmitOutcome::Failed {
                row,
                reason: e.to_string(),
            };
        }

        if let Some(previous) = entry.uid.as_ref().filter(|p| **p != uid) {
            self.retire(previous);
        }

        info!(row, %uid, subject = %entry.subject, mode = %entry.mode, "trigger created");
        SubmitOutcome::Registered { row, uid }
    }

    /// Handle one fire of the trigger `uid`.
    pub fn on_fire(&self, uid: &TriggerUid) -> FireOutcome {
        debug!(%uid, "trigger fired");
        let entry = match self.repo.read_by_uid(uid) {
            Ok(entry) => entry,
            Err(e @ SchedulerError::Resolution { .. }) => {
                warn!(%uid, "fired trigger does not map to a row: {e}");
                return FireOutcome::Unresolved;
            }
            Err(SchedulerError::Validation { row, reason }) => {
                let cause = SchedulerError::validation(row, reason).to_string();
                warn!(%uid, row, "fired trigger's row is invalid: {cause}");
                let mut status = StatusWriteBack::arm(&self.repo, row, "none".to_string());
                status.failed(&cause);
                return FireOutcome::Failed {
                    row,
                    retired: false,
                    cause,
                };
            }
            Err(e) => {
                error!(%uid, "row store unreadable, fire abandoned: {e}");
                return FireOutcome::Unresolved;
            }
        };
        let row = entry.row_no;
        let now = self.clock.now();
        let tz = entry.timezone.unwrap_or(self.ambient_tz);

        if let Some(start) = entry.start_date.map(|s| local_to_utc(tz, s)) {
            if now < start {
                info!(%uid, row, %start, "schedule window not open yet, skipping fire");
                return FireOutcome::Dormant { row };
            }
        }

        let mut status = StatusWriteBack::arm(
            &self.repo,
            row,
            describe_next_run(&entry, self.ambient_tz, now),
        );

        let sent = self.deliver(&entry);
        let retire = if entry.mode.is_recurring() {
            sent.is_ok() && window_closed(&entry, tz, now)
        } else {
            true
        };
        let retired = retire && self.retire(uid);

        match sent {
            Ok(()) => {
                status.succeeded();
                FireOutcome::Sent { row, retired }
            }
            Err(e) => {
                let cause = e.to_string();
                status.failed(&cause);
                FireOutcome::Failed {
                    row,
                    retired,
                    cause,
                }
            }
        }
    }

    /// Delete a registration. Failures are logged and reported as `false`.
    pub(crate) fn retire(&self, uid: &TriggerUid) -> bool {
        match self.triggers.delete(uid) {
            Ok(()) => {
                info!(%uid, "trigger deleted");
                true
            }
            Err(e) => {
                let err = SchedulerError::Deletion {
                    uid: uid.to_string(),
                    reason: e.to_string(),
                };
                error!("{err}");
                false
            }
        }
    }

    fn deliver(&self, entry: &ScheduleEntry) -> Result<()> {
        let row = entry.row_no;
        if !entry.unique_message {
            self.mailer
                .send(&entry.recipients, &entry.subject, &entry.message)
                .inspect_err(|e| warn!(row, to = %entry.recipients, "send failed: {e}"))?;
            info!(row, to = %entry.recipients, subject = %entry.subject, "mail sent");
            return Ok(());
        }

        let recipients = entry.recipient_list();
        if recipients.is_empty() {
            return Err(SchedulerError::validation(row, "no recipients"));
        }

        let mut failed_to = Vec::new();
        let mut reasons = Vec::new();
        for to in recipients {
            match self.mailer.send(to, &entry.subject, &entry.message) {
                Ok(()) => info!(row, %to, subject = %entry.subject, "mail sent"),
                Err(e) => {
                    warn!(row, %to, "send failed: {e}");
                    failed_to.push(to.to_string());
                    reasons.push(e.to_string());
                }
            }
        }
        if failed_to.is_empty() {
            Ok(())
        } else {
            Err(SchedulerError::Send {
                to: failed_to.join(", "),
                reason: reasons.join("; "),
            })
        }
    }
}

/// Recurring entries expire at their end date unless they never expire.
fn window_closed(entry: &ScheduleEntry, tz: Tz, now: DateTime<Utc>) -> bool {
    !entry.never_expires
        && entry
            .end_date
            .is_some_and(|end| now >= local_to_utc(tz, end))
}

/// Pending status write for one fire.
///
/// The status cell is written when this value drops, on every exit path of
/// the fire handler including unwinding. Without an explicit outcome the
/// fire is recorded as aborted.
struct StatusWriteBack<'a> {
    repo: &'a EntryRepository,
    row: u32,
    next_run: String,
    status: Option<String>,
}

impl<'a> StatusWriteBack<'a> {
    fn arm(repo: &'a EntryRepository, row: u32, next_run: String) -> Self {
        Self {
            repo,
            row,
            next_run,
            status: None,
        }
    }

    fn succeeded(&mut self) {
        self.status = Some(format!("OK. Next run: {}", self.next_run));
    }

    fn failed(&mut self, cause: &str) {
        self.status = Some(format!("Error: {cause}. Next run: {}", self.next_run));
    }
}

impl Drop for StatusWriteBack<'_> {
    fn drop(&mut self) {
        let status = self.status.take().unwrap_or_else(|| {
            format!("Error: execution aborted. Next run: {}", self.next_run)
        });
        if let Err(e) = self.repo.write_status(self.row, &status) {
            error!(row = self.row, "status write-back failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::labels::Labels;
    use crate::memory::MemoryRowStore;
    use crate::platform::RowStore;
    use crate::types::{Column, RawRow};

    #[test]
    fn status_is_written_even_when_the_handler_unwinds() {
        let store = Arc::new(MemoryRowStore::new());
        let row = store.append_row(&RawRow::new()).unwrap();
        let repo = EntryRepository::new(store.clone(), Labels::default());

        let result = catch_unwind(AssertUnwindSafe(|| {
            let _status = StatusWriteBack::arm(&repo, row, "none".to_string());
            panic!("transport exploded");
        }));

        assert!(result.is_err());
        assert_eq!(
            store.cell(Column::Execution, row),
            "Error: execution aborted. Next run: none"
        );
    }

    #[test]
    fn explicit_outcome_replaces_aborted_status() {
        let store = Arc::new(MemoryRowStore::new());
        let row = store.append_row(&RawRow::new()).unwrap();
        let repo = EntryRepository::new(store.clone(), Labels::default());

        {
            let mut status = StatusWriteBack::arm(&repo, row, "2026-05-05 08:00 UTC".to_string());
            status.failed("Send to a@x.com failed: timeout");
        }
        assert_eq!(
            store.cell(Column::Execution, row),
            "Error: Send to a@x.com failed: timeout. Next run: 2026-05-05 08:00 UTC"
        );
    }
}
