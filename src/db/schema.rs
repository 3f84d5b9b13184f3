//! Idempotent schema creation for the tasks and reminders tables.

use super::Database;
use crate::error::StoreError;

/// SQL executed once at open. `IF NOT EXISTS` makes this safe to rerun on
/// every process start; there is no further migration tooling.
///
/// Timestamps are stored as epoch milliseconds. `reminders.task_id` carries a
/// foreign key to `tasks.id`, but reminder cleanup on task delete is performed
/// explicitly by the store (no `ON DELETE CASCADE`).
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id             TEXT PRIMARY KEY,
    title          TEXT NOT NULL DEFAULT '',
    description    TEXT NOT NULL DEFAULT '',
    priority       TEXT NOT NULL DEFAULT '',
    due_date_time  INTEGER NOT NULL,
    email          TEXT NOT NULL DEFAULT '',
    notify_method  TEXT NOT NULL DEFAULT '',
    notify_status  TEXT NOT NULL DEFAULT '',
    notify_message TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS reminders (
    id          TEXT PRIMARY KEY,
    date        INTEGER NOT NULL,
    task_id     TEXT NOT NULL REFERENCES tasks(id),
    notified_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_reminders_task_id ON reminders(task_id);
CREATE INDEX IF NOT EXISTS idx_reminders_date ON reminders(date);
CREATE INDEX IF NOT EXISTS idx_tasks_due_date_time ON tasks(due_date_time);
";

impl Database {
    /// Create the tasks and reminders tables if they do not exist.
    pub fn create_schema(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
    }
}
