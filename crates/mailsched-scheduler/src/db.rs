use rusqlite::Connection;

use crate::{error::Result, types::Column};

/// Initialise the scheduler schema in `conn`.
///
/// Creates the `schedule_rows` table (one TEXT column per semantic column,
/// keyed by row index) and the `triggers` registry with an index on
/// `next_fire` for the dispatcher's polling query. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    let columns: String = Column::ALL
        .iter()
        .map(|c| format!("{} TEXT NOT NULL DEFAULT '',\n", c.as_str()))
        .collect();

    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS schedule_rows (
            {columns}
            row_no      INTEGER NOT NULL PRIMARY KEY
        ) STRICT;

        CREATE TABLE IF NOT EXISTS triggers (
            uid         TEXT    NOT NULL PRIMARY KEY,
            handler     TEXT    NOT NULL,
            spec        TEXT    NOT NULL,   -- JSON-encoded RegistrationSpec
            next_fire   TEXT,               -- RFC 3339 UTC, NULL if nothing is left
            created_at  TEXT    NOT NULL,
            updated_at  TEXT    NOT NULL
        ) STRICT;

        -- Efficient polling: SELECT … WHERE next_fire <= ?  ORDER BY next_fire
        CREATE INDEX IF NOT EXISTS idx_triggers_next_fire ON triggers (next_fire);
        "
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        init_db(&conn).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('schedule_rows', 'triggers')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }
}
