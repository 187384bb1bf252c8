// End-to-end behaviour of submit / fire / sweep against in-memory collaborators.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mailsched_scheduler::memory::{FixedClock, MemoryRowStore, MemoryTriggerRegistry, RecordingMailer};
use mailsched_scheduler::types::{CLEANUP_HANDLER, FIRE_HANDLER};
use mailsched_scheduler::{
    Column, EntryRepository, FireOutcome, Labels, LifecycleManager, RawRow, RowStore,
    SubmitOutcome, TriggerRegistry, TriggerSchedule, TriggerUid,
};

struct Harness {
    store: Arc<MemoryRowStore>,
    registry: Arc<MemoryTriggerRegistry>,
    mailer: Arc<RecordingMailer>,
    clock: Arc<FixedClock>,
    manager: LifecycleManager,
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn harness(now: DateTime<Utc>) -> Harness {
    let store = Arc::new(MemoryRowStore::new());
    let registry = Arc::new(MemoryTriggerRegistry::new());
    let mailer = Arc::new(RecordingMailer::new());
    let clock = Arc::new(FixedClock::new(now));
    let manager = LifecycleManager::new(
        EntryRepository::new(store.clone(), Labels::default()),
        registry.clone(),
        mailer.clone(),
        clock.clone(),
        chrono_tz::UTC,
    );
    Harness {
        store,
        registry,
        mailer,
        clock,
        manager,
    }
}

fn daily(recipients: &str) -> RawRow {
    RawRow::new()
        .with(Column::Recipients, recipients)
        .with(Column::Subject, "Daily digest")
        .with(Column::Message, "<p>hello</p>")
        .with(Column::Recurrence, "Daily")
        .with(Column::FireTime, "08:00")
}

impl Harness {
    fn submit(&self, raw: &RawRow) -> (u32, TriggerUid) {
        let row = self.store.append_row(raw).unwrap();
        match self.manager.on_submit(row) {
            SubmitOutcome::Registered { row, uid } => (row, uid),
            other => panic!("expected registration, got {other:?}"),
        }
    }
}

#[test]
fn daily_row_is_registered_fired_and_stays_armed() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(&daily("a@x.com"));

    assert_eq!(h.store.cell(Column::Uid, row), uid.as_str());
    assert_eq!(h.registry.len(), 1);
    assert!(matches!(
        h.registry.spec_of(&uid).unwrap().schedule,
        TriggerSchedule::EveryDays { hour: 8, .. }
    ));

    h.clock.set(at(2026, 5, 4, 8, 1));
    assert_eq!(h.manager.on_fire(&uid), FireOutcome::Sent { row, retired: false });

    let attempts = h.mailer.attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].to, "a@x.com");
    assert_eq!(attempts[0].html_body, "<p>hello</p>");
    assert_eq!(
        h.store.cell(Column::Execution, row),
        "OK. Next run: 2026-05-05 08:00 UTC"
    );
    assert_eq!(h.registry.len(), 1);
}

#[test]
fn one_shot_entry_is_retired_after_its_only_fire() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(
        &daily("a@x.com")
            .with(Column::Recurrence, "None")
            .with(Column::FireDate, "2026-05-04")
            .with(Column::FireTime, "10:00"),
    );
    assert_eq!(
        h.registry.spec_of(&uid).unwrap().schedule,
        TriggerSchedule::At {
            at: at(2026, 5, 4, 10, 0)
        }
    );

    h.clock.set(at(2026, 5, 4, 10, 0));
    assert_eq!(h.manager.on_fire(&uid), FireOutcome::Sent { row, retired: true });
    assert!(h.registry.is_empty());
    assert_eq!(h.store.cell(Column::Execution, row), "OK. Next run: none");
}

#[test]
fn one_shot_entry_is_retired_even_when_the_send_fails() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(
        &daily("down@x.com")
            .with(Column::Recurrence, "None")
            .with(Column::FireDate, "2026-05-04"),
    );
    h.mailer.fail_for("down@x.com");

    h.clock.set(at(2026, 5, 4, 8, 0));
    match h.manager.on_fire(&uid) {
        FireOutcome::Failed { retired, .. } => assert!(retired),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(h.registry.is_empty());
    assert!(h
        .store
        .cell(Column::Execution, row)
        .starts_with("Error: Send to down@x.com failed: mailbox unavailable. Next run:"));
}

#[test]
fn never_expiring_entry_ignores_end_date() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(&daily("a@x.com").with(Column::EndDate, "2026-05-01"));

    h.clock.set(at(2026, 5, 4, 8, 0));
    assert_eq!(h.manager.on_fire(&uid), FireOutcome::Sent { row, retired: false });
    assert_eq!(h.registry.len(), 1);
}

#[test]
fn expiring_entry_is_retired_at_first_fire_past_end_date() {
    let h = harness(at(2026, 4, 28, 7, 0));
    let (row, uid) = h.submit(
        &daily("a@x.com")
            .with(Column::EndDate, "2026-05-01")
            .with(Column::NeverExpires, "false"),
    );

    h.clock.set(at(2026, 4, 30, 8, 0));
    assert_eq!(h.manager.on_fire(&uid), FireOutcome::Sent { row, retired: false });

    h.clock.set(at(2026, 5, 1, 8, 0));
    assert_eq!(h.manager.on_fire(&uid), FireOutcome::Sent { row, retired: true });
    assert_eq!(h.mailer.attempts().len(), 2);
    assert!(h.registry.is_empty());
}

#[test]
fn expired_entry_stays_armed_when_the_send_fails() {
    let h = harness(at(2026, 4, 28, 7, 0));
    let (_, uid) = h.submit(
        &daily("down@x.com")
            .with(Column::EndDate, "2026-05-01")
            .with(Column::NeverExpires, "no"),
    );
    h.mailer.fail_for("down@x.com");

    h.clock.set(at(2026, 5, 2, 8, 0));
    assert!(matches!(
        h.manager.on_fire(&uid),
        FireOutcome::Failed { retired: false, .. }
    ));
    assert_eq!(h.registry.len(), 1);
}

#[test]
fn fire_before_start_date_is_a_complete_noop() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(&daily("a@x.com").with(Column::StartDate, "2026-06-01"));

    h.clock.set(at(2026, 5, 4, 8, 0));
    assert_eq!(h.manager.on_fire(&uid), FireOutcome::Dormant { row });
    assert!(h.mailer.attempts().is_empty());
    assert_eq!(h.store.cell(Column::Execution, row), "");
    assert_eq!(h.registry.len(), 1);

    h.clock.set(at(2026, 6, 1, 8, 0));
    assert_eq!(h.manager.on_fire(&uid), FireOutcome::Sent { row, retired: false });
}

#[test]
fn unique_message_sends_one_mail_per_recipient() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (_, uid) = h.submit(
        &daily("a@x.com,b@x.com").with(Column::UniqueMessage, "true"),
    );

    h.manager.on_fire(&uid);
    let targets: Vec<_> = h.mailer.attempts().into_iter().map(|m| m.to).collect();
    assert_eq!(targets, vec!["a@x.com", "b@x.com"]);
}

#[test]
fn shared_message_sends_once_to_the_whole_list() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (_, uid) = h.submit(&daily("a@x.com,b@x.com"));

    h.manager.on_fire(&uid);
    let attempts = h.mailer.attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].to, "a@x.com,b@x.com");
}

#[test]
fn one_failing_recipient_does_not_stop_the_others() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(
        &daily("a@x.com, b@x.com, c@x.com").with(Column::UniqueMessage, "yes"),
    );
    h.mailer.fail_for("b@x.com");

    assert!(matches!(h.manager.on_fire(&uid), FireOutcome::Failed { .. }));
    assert_eq!(h.mailer.attempts().len(), 3);
    assert!(h
        .store
        .cell(Column::Execution, row)
        .starts_with("Error: Send to b@x.com failed"));
}

#[test]
fn edits_between_fires_take_effect() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(&daily("a@x.com"));

    h.store.write_cell(Column::Subject, row, "Renamed").unwrap();
    h.store.write_cell(Column::Recipients, row, "z@x.com").unwrap();
    h.manager.on_fire(&uid);

    let attempts = h.mailer.attempts();
    assert_eq!(attempts[0].subject, "Renamed");
    assert_eq!(attempts[0].to, "z@x.com");
}

#[test]
fn unresolved_fire_sends_nothing() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(&daily("a@x.com"));
    h.store.remove_row(row);

    assert_eq!(h.manager.on_fire(&uid), FireOutcome::Unresolved);
    assert!(h.mailer.attempts().is_empty());
    // Cleanup of the firing trigger is left to the sweep.
    assert_eq!(h.registry.len(), 1);
}

#[test]
fn custom_and_invalid_rows_are_skipped() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let custom = h
        .store
        .append_row(&daily("a@x.com").with(Column::Recurrence, "every full moon"))
        .unwrap();
    let weekly_without_day = h
        .store
        .append_row(&daily("a@x.com").with(Column::Recurrence, "Weekly"))
        .unwrap();

    assert!(matches!(h.manager.on_submit(custom), SubmitOutcome::Skipped { .. }));
    assert!(matches!(
        h.manager.on_submit(weekly_without_day),
        SubmitOutcome::Skipped { .. }
    ));
    assert!(matches!(h.manager.on_submit(99), SubmitOutcome::Skipped { .. }));
    assert!(h.registry.is_empty());
    assert_eq!(h.store.cell(Column::Uid, custom), "");
}

#[test]
fn resubmitting_a_row_replaces_its_trigger() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, first) = h.submit(&daily("a@x.com"));

    h.store.write_cell(Column::FireTime, row, "18:30").unwrap();
    let second = match h.manager.on_submit(row) {
        SubmitOutcome::Registered { uid, .. } => uid,
        other => panic!("expected registration, got {other:?}"),
    };

    assert_ne!(first, second);
    assert_eq!(h.registry.len(), 1);
    assert!(h.registry.spec_of(&first).is_none());
    assert_eq!(h.store.cell(Column::Uid, row), second.as_str());
}

#[test]
fn sweep_deletes_orphans_once() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (kept_row, kept) = h.submit(&daily("a@x.com"));
    let (gone_row, gone) = h.submit(&daily("b@x.com"));
    let cleanup = h.manager.ensure_cleanup_trigger(1).unwrap();
    h.store.remove_row(gone_row);

    let first = h.manager.sweep();
    assert_eq!(first.examined, 2);
    assert_eq!(first.deleted, vec![gone]);
    assert!(first.failed.is_empty());

    let second = h.manager.sweep();
    assert!(second.deleted.is_empty());

    let live: Vec<_> = h.registry.list_all().unwrap().into_iter().map(|t| t.uid).collect();
    assert_eq!(h.store.cell(Column::Uid, kept_row), kept.as_str());
    assert_eq!(live, vec![kept, cleanup]);
}

#[test]
fn sweep_survives_deletion_failures() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row_a, a) = h.submit(&daily("a@x.com"));
    let (row_b, b) = h.submit(&daily("b@x.com"));
    h.store.remove_row(row_a);
    h.store.remove_row(row_b);
    h.registry.fail_deletes(true);

    let report = h.manager.sweep();
    assert_eq!(report.failed, vec![a, b]);
    assert_eq!(h.registry.len(), 2);
}

#[test]
fn sweep_skips_cleanup_trigger_but_removes_stray_fire_triggers() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let spec = mailsched_scheduler::RegistrationSpec {
        timezone: "UTC".to_string(),
        schedule: TriggerSchedule::EveryDays {
            days: 1,
            hour: 1,
            near_minute: 0,
        },
    };
    h.registry.create(CLEANUP_HANDLER, &spec).unwrap();
    let stray = h.registry.create(FIRE_HANDLER, &spec).unwrap();

    let report = h.manager.sweep();
    assert_eq!(report.examined, 1);
    assert_eq!(report.deleted, vec![stray]);
}

#[test]
fn cleanup_trigger_installation_is_idempotent() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let first = h.manager.ensure_cleanup_trigger(1).unwrap();
    let second = h.manager.ensure_cleanup_trigger(3).unwrap();
    assert_eq!(first, second);
    assert_eq!(h.registry.len(), 1);
}

#[test]
fn fire_on_a_row_that_no_longer_parses_records_the_error() {
    let h = harness(at(2026, 5, 4, 7, 0));
    let (row, uid) = h.submit(&daily("a@x.com"));
    h.store.write_cell(Column::FireTime, row, "8am").unwrap();

    h.clock.set(at(2026, 5, 4, 8, 0));
    match h.manager.on_fire(&uid) {
        FireOutcome::Failed {
            row: failed_row,
            retired,
            cause,
        } => {
            assert_eq!(failed_row, row);
            assert!(!retired);
            assert!(cause.contains("unreadable fire time"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let status = h.store.cell(Column::Execution, row);
    assert!(status.starts_with(&format!("Error: Invalid entry in row {row}")));
    assert!(status.ends_with("Next run: none"));
    assert!(h.mailer.attempts().is_empty());
    // The row still owns the trigger, so the sweep keeps it.
    assert!(h.manager.sweep().deleted.is_empty());
    assert_eq!(h.registry.len(), 1);
}

#[test]
fn one_shot_in_the_past_is_not_registered() {
    let h = harness(at(2026, 5, 4, 12, 0));
    let row = h
        .store
        .append_row(
            &daily("a@x.com")
                .with(Column::Recurrence, "None")
                .with(Column::FireDate, "2026-05-04"),
        )
        .unwrap();

    match h.manager.on_submit(row) {
        SubmitOutcome::Skipped { reason, .. } => assert!(reason.contains("in the past")),
        other => panic!("expected skip, got {other:?}"),
    }
    assert!(h.registry.is_empty());
    assert_eq!(h.store.cell(Column::Uid, row), "");
}
