//! Orphan reconciliation: deletes triggers no surviving row references.

use tracing::{error, info, warn};

use crate::{
    error::Result,
    lifecycle::LifecycleManager,
    types::{RegistrationSpec, TriggerSchedule, TriggerUid, CLEANUP_HANDLER, SUBMIT_HANDLER},
};

/// Handlers that are not row-correlated and therefore never swept.
const EXCLUDED_HANDLERS: [&str; 2] = [SUBMIT_HANDLER, CLEANUP_HANDLER];

/// What one sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Row-correlated triggers looked at.
    pub examined: usize,
    pub deleted: Vec<TriggerUid>,
    /// Orphans whose deletion failed; retried by the next sweep.
    pub failed: Vec<TriggerUid>,
}

impl LifecycleManager {
    /// Delete every row-correlated trigger whose uid no row references.
    ///
    /// Deletion failures are logged and do not stop the pass.
    pub fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        let triggers = match self.triggers.list_all() {
            Ok(triggers) => triggers,
            Err(e) => {
                error!("orphan sweep could not list triggers: {e}");
                return report;
            }
        };
        // An unreadable store must not look like "no rows".
        let index = match self.repo.uid_index() {
            Ok(index) => index,
            Err(e) => {
                error!("orphan sweep aborted, row store unreadable: {e}");
                return report;
            }
        };

        for trigger in triggers
            .iter()
            .filter(|t| !EXCLUDED_HANDLERS.contains(&t.handler.as_str()))
        {
            report.examined += 1;
            if index.row_of(&trigger.uid).is_some() {
                continue;
            }
            info!(uid = %trigger.uid, handler = %trigger.handler, "deleting orphaned trigger");
            if self.retire(&trigger.uid) {
                report.deleted.push(trigger.uid.clone());
            } else {
                report.failed.push(trigger.uid.clone());
            }
        }

        if !report.failed.is_empty() {
            warn!(count = report.failed.len(), "some orphaned triggers could not be deleted");
        }
        info!(
            examined = report.examined,
            deleted = report.deleted.len(),
            "orphan sweep complete"
        );
        report
    }

    /// Make sure exactly one daily cleanup trigger exists.
    ///
    /// Idempotent by handler name: an existing registration is kept as is.
    pub fn ensure_cleanup_trigger(&self, hour: u8) -> Result<TriggerUid> {
        if let Some(existing) = self
            .triggers
            .list_all()?
            .into_iter()
            .find(|t| t.handler == CLEANUP_HANDLER)
        {
            info!(uid = %existing.uid, "cleanup trigger already installed");
            return Ok(existing.uid);
        }

        let spec = RegistrationSpec {
            timezone: self.ambient_tz.name().to_string(),
            schedule: TriggerSchedule::EveryDays {
                days: 1,
                hour,
                near_minute: 0,
            },
        };
        let uid = self.triggers.create(CLEANUP_HANDLER, &spec)?;
        info!(%uid, hour, "cleanup trigger installed");
        Ok(uid)
    }
}
