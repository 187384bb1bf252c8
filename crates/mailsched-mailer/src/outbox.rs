//! Dry-run delivery: messages are queued in an SQLite `outbox` table instead
//! of being sent.

use std::sync::{Arc, Mutex};

use chrono::SecondsFormat;
use mailsched_scheduler::{Clock, MailSender};
use rusqlite::Connection;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxMessage {
    pub id: i64,
    pub sender: String,
    pub recipients: String,
    pub subject: String,
    pub html_body: String,
    pub queued_at: String,
}

pub struct OutboxMailer {
    conn: Mutex<Connection>,
    from: String,
    clock: Arc<dyn Clock>,
}

impl OutboxMailer {
    pub fn new(
        conn: Connection,
        from: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> mailsched_scheduler::Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS outbox (
                id          INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                sender      TEXT    NOT NULL,
                recipients  TEXT    NOT NULL,
                subject     TEXT    NOT NULL,
                html_body   TEXT    NOT NULL,
                queued_at   TEXT    NOT NULL
            ) STRICT;",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            from: from.into(),
            clock,
        })
    }

    /// Queued messages, oldest first.
    pub fn messages(&self) -> mailsched_scheduler::Result<Vec<OutboxMessage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, sender, recipients, subject, html_body, queued_at
             FROM outbox ORDER BY id",
        )?;
        let messages = stmt
            .query_map([], |r| {
                Ok(OutboxMessage {
                    id: r.get(0)?,
                    sender: r.get(1)?,
                    recipients: r.get(2)?,
                    subject: r.get(3)?,
                    html_body: r.get(4)?,
                    queued_at: r.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(messages)
    }
}

impl MailSender for OutboxMailer {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> mailsched_scheduler::Result<()> {
        let queued_at = self
            .clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO outbox (sender, recipients, subject, html_body, queued_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![self.from, to, subject, html_body, queued_at],
        )?;
        info!(id = conn.last_insert_rowid(), %to, %subject, "message queued in outbox");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mailsched_scheduler::memory::FixedClock;

    use super::*;

    fn outbox() -> OutboxMailer {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap(),
        ));
        OutboxMailer::new(Connection::open_in_memory().unwrap(), "noreply@x.com", clock).unwrap()
    }

    #[test]
    fn send_queues_a_row() {
        let outbox = outbox();
        outbox.send("a@x.com,b@x.com", "Hello", "<b>hi</b>").unwrap();
        outbox.send("c@x.com", "Again", "<i>yo</i>").unwrap();

        let messages = outbox.messages().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].recipients, "a@x.com,b@x.com");
        assert_eq!(messages[0].sender, "noreply@x.com");
        assert_eq!(messages[0].queued_at, "2026-05-04T08:00:00Z");
        assert_eq!(messages[1].subject, "Again");
    }

    #[test]
    fn fresh_outbox_is_empty() {
        assert!(outbox().messages().unwrap().is_empty());
    }
}
