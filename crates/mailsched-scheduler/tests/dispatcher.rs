// The local dispatcher driving real SQLite stores.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use mailsched_scheduler::memory::{FixedClock, RecordingMailer};
use mailsched_scheduler::MailSender;
use mailsched_scheduler::{
    Column, EntryRepository, Labels, LifecycleManager, RawRow, RowStore, SqliteRowStore,
    SqliteTriggerRegistry, SubmitOutcome, TriggerDispatcher, TriggerUid,
};
use rusqlite::Connection;
use tokio::sync::watch;

struct Setup {
    rows: Arc<SqliteRowStore>,
    registry: Arc<SqliteTriggerRegistry>,
    mailer: Arc<RecordingMailer>,
    clock: Arc<FixedClock>,
    dispatcher: TriggerDispatcher,
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn setup(now: DateTime<Utc>) -> Setup {
    let mailer = Arc::new(RecordingMailer::new());
    setup_with(now, mailer.clone(), mailer)
}

fn setup_with(
    now: DateTime<Utc>,
    sender: Arc<dyn MailSender>,
    mailer: Arc<RecordingMailer>,
) -> Setup {
    let clock = Arc::new(FixedClock::new(now));
    let rows = Arc::new(SqliteRowStore::new(Connection::open_in_memory().unwrap()).unwrap());
    let registry = Arc::new(
        SqliteTriggerRegistry::new(Connection::open_in_memory().unwrap(), clock.clone()).unwrap(),
    );
    let manager = LifecycleManager::new(
        EntryRepository::new(rows.clone(), Labels::default()),
        registry.clone(),
        sender,
        clock.clone(),
        chrono_tz::UTC,
    );
    let dispatcher = TriggerDispatcher::new(
        manager,
        registry.clone(),
        clock.clone(),
        Duration::from_millis(10),
    );
    Setup {
        rows,
        registry,
        mailer,
        clock,
        dispatcher,
    }
}

impl Setup {
    fn submit(&self, raw: RawRow) -> (u32, TriggerUid) {
        let row = self.rows.append_row(&raw).unwrap();
        match self.dispatcher.manager().on_submit(row) {
            SubmitOutcome::Registered { row, uid } => (row, uid),
            other => panic!("expected registration, got {other:?}"),
        }
    }
}

fn row(recurrence: &str, time: &str) -> RawRow {
    RawRow::new()
        .with(Column::Recipients, "ops@x.com")
        .with(Column::Subject, "Report")
        .with(Column::Message, "<p>numbers</p>")
        .with(Column::Recurrence, recurrence)
        .with(Column::FireTime, time)
}

#[test]
fn daily_trigger_fires_once_per_day() {
    let s = setup(at(2026, 5, 4, 7, 0));
    let (row, _) = s.submit(row("Daily", "08:00"));

    assert_eq!(s.dispatcher.tick().unwrap(), 0);

    s.clock.set(at(2026, 5, 4, 8, 0));
    assert_eq!(s.dispatcher.tick().unwrap(), 1);
    assert_eq!(s.dispatcher.tick().unwrap(), 0);
    assert_eq!(s.mailer.attempts().len(), 1);
    assert_eq!(
        s.rows.read_row(row).unwrap().unwrap().get(Column::Execution),
        "OK. Next run: 2026-05-05 08:00 UTC"
    );

    let registrations = s.registry.registrations().unwrap();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].next_fire, Some(at(2026, 5, 5, 8, 0)));
}

#[test]
fn missed_occurrences_fire_once() {
    let s = setup(at(2026, 5, 4, 7, 0));
    s.submit(row("Daily", "08:00"));

    s.clock.set(at(2026, 5, 9, 12, 0));
    assert_eq!(s.dispatcher.tick().unwrap(), 1);
    assert_eq!(s.dispatcher.tick().unwrap(), 0);
    assert_eq!(
        s.registry.registrations().unwrap()[0].next_fire,
        Some(at(2026, 5, 10, 8, 0))
    );
}

#[test]
fn one_shot_trigger_is_deleted_after_firing() {
    let s = setup(at(2026, 5, 4, 7, 0));
    s.submit(row("None", "09:15").with(Column::FireDate, "2026-05-04"));

    s.clock.set(at(2026, 5, 4, 9, 15));
    assert_eq!(s.dispatcher.tick().unwrap(), 1);
    assert!(s.registry.registrations().unwrap().is_empty());
    assert_eq!(s.mailer.attempts().len(), 1);
}

#[test]
fn cleanup_trigger_sweeps_orphans() {
    let s = setup(at(2026, 5, 4, 7, 0));
    let (row, orphan) = s.submit(row("Daily", "08:00"));
    let cleanup = s.dispatcher.manager().ensure_cleanup_trigger(1).unwrap();
    s.rows.write_cell(Column::Uid, row, "").unwrap();

    s.clock.set(at(2026, 5, 5, 1, 0));
    // Both the orphan (08:00 yesterday was missed) and the cleanup are due.
    assert_eq!(s.dispatcher.tick().unwrap(), 2);

    let remaining: Vec<_> = s
        .registry
        .registrations()
        .unwrap()
        .into_iter()
        .map(|r| r.uid)
        .collect();
    assert_eq!(remaining, vec![cleanup]);
    assert!(!remaining.contains(&orphan));
}

#[tokio::test]
async fn run_stops_on_shutdown_signal() {
    let s = setup(at(2026, 5, 4, 7, 0));
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(s.dispatcher.run(rx));
    tokio::time::sleep(Duration::from_millis(30)).await;
    tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("dispatcher did not stop")
        .unwrap();
}

/// Blocks every send for a fixed time, like an unresponsive relay.
struct StalledRelay(Duration);

impl MailSender for StalledRelay {
    fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> mailsched_scheduler::Result<()> {
        std::thread::sleep(self.0);
        Ok(())
    }
}

#[tokio::test]
async fn shutdown_is_not_held_up_by_a_slow_send() {
    let s = setup_with(
        at(2026, 5, 4, 7, 0),
        Arc::new(StalledRelay(Duration::from_secs(2))),
        Arc::new(RecordingMailer::new()),
    );
    s.submit(row("Daily", "08:00"));
    s.clock.set(at(2026, 5, 4, 8, 0));

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(s.dispatcher.run(rx));
    // First interval tick is immediate; the send is now blocked.
    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_millis(800), handle)
        .await
        .expect("dispatcher waited for the stalled send")
        .unwrap();
}
