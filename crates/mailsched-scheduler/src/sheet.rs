//! SQLite-backed [`RowStore`]: the schedule "sheet" as a table.

use std::sync::Mutex;

use rusqlite::{types::Value, Connection, OptionalExtension};
use tracing::debug;

use crate::{
    db::init_db,
    error::{Result, SchedulerError},
    platform::RowStore,
    types::{Column, RawRow, FIRST_DATA_ROW},
};

pub struct SqliteRowStore {
    conn: Mutex<Connection>,
}

impl SqliteRowStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn column_list() -> String {
    Column::ALL
        .iter()
        .map(Column::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl RowStore for SqliteRowStore {
    fn read_row(&self, row: u32) -> Result<Option<RawRow>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {} FROM schedule_rows WHERE row_no = ?1", column_list());
        let raw = conn
            .query_row(&sql, [row], |r| {
                let mut raw = RawRow::new();
                for (i, column) in Column::ALL.iter().enumerate() {
                    raw.set(*column, r.get::<_, String>(i)?);
                }
                Ok(raw)
            })
            .optional()?;
        Ok(raw)
    }

    fn write_cell(&self, column: Column, row: u32, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        // Column names come from a closed enum, never from user input.
        let sql = format!(
            "UPDATE schedule_rows SET {} = ?1 WHERE row_no = ?2",
            column.as_str()
        );
        let n = conn.execute(&sql, rusqlite::params![value, row])?;
        if n == 0 {
            return Err(SchedulerError::Store(format!("row {row} does not exist")));
        }
        debug!(row, column = column.as_str(), "cell written");
        Ok(())
    }

    fn last_row(&self) -> Result<u32> {
        let conn = self.conn.lock().unwrap();
        let last: Option<u32> =
            conn.query_row("SELECT MAX(row_no) FROM schedule_rows", [], |r| r.get(0))?;
        Ok(last.unwrap_or(FIRST_DATA_ROW - 1))
    }

    fn append_row(&self, row: &RawRow) -> Result<u32> {
        let conn = self.conn.lock().unwrap();
        let last: Option<u32> =
            conn.query_row("SELECT MAX(row_no) FROM schedule_rows", [], |r| r.get(0))?;
        let next = last.map_or(FIRST_DATA_ROW, |r| r + 1);

        let placeholders = (2..=Column::ALL.len() + 1)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO schedule_rows (row_no, {}) VALUES (?1, {placeholders})",
            column_list()
        );
        let mut values = vec![Value::Integer(i64::from(next))];
        values.extend(Column::ALL.iter().map(|c| Value::Text(row.get(*c).to_string())));
        conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(next)
    }
}
