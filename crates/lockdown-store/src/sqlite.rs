//! SQLite-based store implementation

use chrono::{DateTime, Local};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::{AuditEvent, AuditEventType, AuditSeverity, Store, StoreResult};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn();

        conn.execute_batch(
            r#"
            -- Audit log (append-only)
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                severity TEXT NOT NULL,
                event_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

impl Store for SqliteStore {
    fn append_audit(&self, mut event: AuditEvent) -> StoreResult<()> {
        let conn = self.conn();
        let event_json = serde_json::to_string(&event.event)?;

        conn.execute(
            "INSERT INTO audit_log (timestamp, severity, event_json) VALUES (?, ?, ?)",
            params![
                event.timestamp.to_rfc3339(),
                event.severity.as_str(),
                event_json
            ],
        )?;

        event.id = conn.last_insert_rowid();
        debug!(event_id = event.id, severity = %event.severity, "Audit event appended");

        Ok(())
    }

    fn get_recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>> {
        let conn = self.conn();

        let mut stmt = conn.prepare(
            "SELECT id, timestamp, severity, event_json FROM audit_log ORDER BY id DESC LIMIT ?",
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let id: i64 = row.get(0)?;
            let timestamp_str: String = row.get(1)?;
            let severity_str: String = row.get(2)?;
            let event_json: String = row.get(3)?;
            Ok((id, timestamp_str, severity_str, event_json))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (id, timestamp_str, severity_str, event_json) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map(|dt| dt.with_timezone(&Local))
                .unwrap_or_else(|_| Local::now());
            let event: AuditEventType = serde_json::from_str(&event_json)?;
            let severity = AuditSeverity::parse(&severity_str).unwrap_or_else(|| {
                warn!(event_id = id, severity = %severity_str, "Unknown audit severity");
                event.severity()
            });

            events.push(AuditEvent {
                id,
                timestamp,
                severity,
                event,
            });
        }

        Ok(events)
    }

    fn is_healthy(&self) -> bool {
        match self
            .conn()
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Store health check failed");
                false
            }
        }
    }
}
