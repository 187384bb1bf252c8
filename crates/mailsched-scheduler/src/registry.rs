//! SQLite-backed [`TriggerRegistry`] with due-time tracking for the local
//! dispatcher.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

use crate::{
    db::init_db,
    error::{Result, SchedulerError},
    platform::{Clock, TriggerRegistry},
    recurrence::next_fire,
    types::{RegistrationSpec, TriggerInfo, TriggerUid},
};

/// A stored registration with its next planned fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub uid: TriggerUid,
    pub handler: String,
    pub spec: RegistrationSpec,
    pub next_fire: Option<DateTime<Utc>>,
}

pub struct SqliteTriggerRegistry {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

fn stamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl SqliteTriggerRegistry {
    pub fn new(conn: Connection, clock: Arc<dyn Clock>) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }

    /// All registrations ordered by creation time.
    pub fn registrations(&self) -> Result<Vec<Registration>> {
        self.query(
            "SELECT uid, handler, spec, next_fire FROM triggers ORDER BY created_at, uid",
            None,
        )
    }

    /// Registrations whose next fire is at or before `now`, earliest first.
    pub fn due(&self, now: DateTime<Utc>) -> Result<Vec<Registration>> {
        self.query(
            "SELECT uid, handler, spec, next_fire FROM triggers
             WHERE next_fire IS NOT NULL AND next_fire <= ?1
             ORDER BY next_fire",
            Some(stamp(now)),
        )
    }

    /// Recompute the next fire of `uid` strictly after `after`.
    ///
    /// No-op for registrations deleted while they were firing. A registration
    /// with no occurrence left is removed.
    pub fn rearm(&self, uid: &TriggerUid, after: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let spec_json: Option<String> = conn
            .query_row(
                "SELECT spec FROM triggers WHERE uid = ?1",
                [uid.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        let Some(spec_json) = spec_json else {
            return Ok(None);
        };
        let spec: RegistrationSpec = serde_json::from_str(&spec_json)?;
        match next_fire(&spec, after) {
            Some(next) => {
                conn.execute(
                    "UPDATE triggers SET next_fire = ?1, updated_at = ?2 WHERE uid = ?3",
                    rusqlite::params![stamp(next), stamp(self.clock.now()), uid.as_str()],
                )?;
                Ok(Some(next))
            }
            None => {
                conn.execute("DELETE FROM triggers WHERE uid = ?1", [uid.as_str()])?;
                info!(%uid, "registration exhausted, removed");
                Ok(None)
            }
        }
    }

    fn query(&self, sql: &str, bound: Option<String>) -> Result<Vec<Registration>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(sql)?;
        let map = |row: &rusqlite::Row<'_>| {
            Ok((
                row.get::<_, String>(0)?,         // uid
                row.get::<_, String>(1)?,         // handler
                row.get::<_, String>(2)?,         // spec JSON
                row.get::<_, Option<String>>(3)?, // next_fire
            ))
        };
        let rows: Vec<_> = match bound {
            Some(value) => stmt.query_map([value], map)?.collect::<rusqlite::Result<_>>()?,
            None => stmt.query_map([], map)?.collect::<rusqlite::Result<_>>()?,
        };

        Ok(rows
            .into_iter()
            .filter_map(|(uid, handler, spec_json, next_fire)| {
                let spec: RegistrationSpec = match serde_json::from_str(&spec_json) {
                    Ok(spec) => spec,
                    Err(e) => {
                        warn!(%uid, "bad registration spec JSON: {e}");
                        return None;
                    }
                };
                let next_fire = next_fire
                    .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                    .map(|dt| dt.with_timezone(&Utc));
                Some(Registration {
                    uid: TriggerUid(uid),
                    handler,
                    spec,
                    next_fire,
                })
            })
            .collect())
    }
}

impl TriggerRegistry for SqliteTriggerRegistry {
    fn create(&self, handler: &str, spec: &RegistrationSpec) -> Result<TriggerUid> {
        let now = self.clock.now();
        let uid = TriggerUid::generate();
        let spec_json = serde_json::to_string(spec)?;
        let next = next_fire(spec, now).map(stamp);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO triggers (uid, handler, spec, next_fire, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![uid.as_str(), handler, spec_json, next, stamp(now)],
        )?;
        info!(%uid, %handler, next_fire = next.as_deref().unwrap_or("none"), "trigger registered");
        Ok(uid)
    }

    fn delete(&self, uid: &TriggerUid) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM triggers WHERE uid = ?1", [uid.as_str()])?;
        if n == 0 {
            return Err(SchedulerError::Registry(format!("unknown trigger {uid}")));
        }
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<TriggerInfo>> {
        Ok(self
            .registrations()?
            .into_iter()
            .map(|r| TriggerInfo {
                uid: r.uid,
                handler: r.handler,
            })
            .collect())
    }
}
