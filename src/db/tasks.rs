//! Task CRUD operations with transactional reminder ownership.
//!
//! Every write spans one transaction: a task row and its reminder rows commit
//! or roll back together. The reminder set is always replaced wholesale on
//! update; there is no standalone reminder CRUD.

use super::{Database, ms_to_ts, ts_to_ms};
use crate::error::StoreError;
use crate::types::{Reminder, Task};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let due_date_time: i64 = row.get("due_date_time")?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: row.get("priority")?,
        due_date_time: ms_to_ts(due_date_time),
        email: row.get("email")?,
        notify_method: row.get("notify_method")?,
        notify_status: row.get("notify_status")?,
        notify_message: row.get("notify_message")?,
        reminders: Vec::new(),
    })
}

fn parse_reminder_row(row: &Row) -> rusqlite::Result<Reminder> {
    let date: i64 = row.get("date")?;
    let notified_at: Option<i64> = row.get("notified_at")?;

    Ok(Reminder {
        id: row.get("id")?,
        date: ms_to_ts(date),
        task_id: row.get("task_id")?,
        notified_at: notified_at.map(ms_to_ts),
    })
}

/// Load all reminders owned by a task, using an existing connection.
fn load_reminders(conn: &Connection, task_id: &str) -> Result<Vec<Reminder>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, date, task_id, notified_at FROM reminders WHERE task_id = ?1",
    )?;

    let reminders = stmt
        .query_map(params![task_id], parse_reminder_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(reminders)
}

/// Insert a task's reminder set, stamping each row with the owning task id.
fn insert_reminders(conn: &Connection, task_id: &str, reminders: &[Reminder]) -> Result<(), StoreError> {
    for reminder in reminders {
        conn.execute(
            "INSERT INTO reminders (id, date, task_id, notified_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                &reminder.id,
                ts_to_ms(reminder.date),
                task_id,
                reminder.notified_at.map(ts_to_ms),
            ],
        )?;
    }
    Ok(())
}

impl Database {
    /// Create a task and its reminders in one transaction.
    ///
    /// All-or-nothing: if any insert fails, the transaction rolls back and no
    /// partial task exists afterward.
    pub fn create_task(&self, task: &Task) -> Result<(), StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO tasks (
                    id, title, description, priority, due_date_time, email,
                    notify_method, notify_status, notify_message
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    &task.id,
                    &task.title,
                    &task.description,
                    &task.priority,
                    ts_to_ms(task.due_date_time),
                    &task.email,
                    &task.notify_method,
                    &task.notify_status,
                    &task.notify_message,
                ],
            )?;

            insert_reminders(&tx, &task.id, &task.reminders)?;

            tx.commit()?;
            Ok(())
        })
    }

    /// Get a task by id, hydrated with its reminders.
    ///
    /// The reminder read is a separate statement, not transactional with the
    /// task read. A caller racing a concurrent update may observe a task
    /// without its latest reminder set; this gap is accepted.
    pub fn get_task(&self, id: &str) -> Result<Task, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;

            let mut task = match stmt.query_row(params![id], parse_task_row) {
                Ok(task) => task,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(StoreError::NotFound(id.to_string()));
                }
                Err(e) => return Err(e.into()),
            };

            task.reminders = load_reminders(conn, id)?;
            Ok(task)
        })
    }

    /// Update a task's fields and fully replace its reminder set in one
    /// transaction.
    ///
    /// All prior reminders for the task are deleted and the new set inserted;
    /// on any failure the rollback leaves the prior state intact. The
    /// advisory `notify_status`/`notify_message` bookkeeping is owned by the
    /// scanner and left untouched here.
    pub fn update_task(&self, id: &str, task: &Task) -> Result<(), StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "UPDATE tasks SET title = ?1, description = ?2, priority = ?3,
                 due_date_time = ?4, email = ?5, notify_method = ?6
                 WHERE id = ?7",
                params![
                    &task.title,
                    &task.description,
                    &task.priority,
                    ts_to_ms(task.due_date_time),
                    &task.email,
                    &task.notify_method,
                    id,
                ],
            )?;

            tx.execute("DELETE FROM reminders WHERE task_id = ?1", params![id])?;
            insert_reminders(&tx, id, &task.reminders)?;

            tx.commit()?;
            Ok(())
        })
    }

    /// Delete a task and its reminders in one transaction.
    ///
    /// Reminders go first: the schema has no `ON DELETE CASCADE`, so ordering
    /// matters for the foreign key.
    pub fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute("DELETE FROM reminders WHERE task_id = ?1", params![id])?;
            tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;

            tx.commit()?;
            Ok(())
        })
    }

    /// List every task, each hydrated with its reminders.
    ///
    /// N+1 read pattern (one query for tasks, one per task for reminders);
    /// acceptable at this system's scale.
    pub fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks")?;
            let mut tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;

            for task in &mut tasks {
                task.reminders = load_reminders(conn, &task.id)?;
            }

            Ok(tasks)
        })
    }

    /// List tasks whose `due_date_time` is at or before the cutoff, hydrated
    /// with their reminders.
    ///
    /// This is the scanner's pre-filter; the authoritative notify trigger is
    /// each reminder's own `date`, checked by the caller.
    pub fn list_due_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Task>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks WHERE due_date_time <= ?1")?;
            let mut tasks = stmt
                .query_map(params![ts_to_ms(cutoff)], parse_task_row)?
                .collect::<Result<Vec<_>, _>>()?;

            for task in &mut tasks {
                task.reminders = load_reminders(conn, &task.id)?;
            }

            Ok(tasks)
        })
    }

    /// Record the outcome of a notification attempt in one transaction.
    ///
    /// Stamps the reminder's `notified_at` so later scan cycles skip it, and
    /// writes the task's advisory `notify_status`/`notify_message` fields.
    pub fn record_notification(
        &self,
        task_id: &str,
        reminder_id: &str,
        status: &str,
        message: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "UPDATE reminders SET notified_at = ?1 WHERE id = ?2",
                params![ts_to_ms(at), reminder_id],
            )?;
            tx.execute(
                "UPDATE tasks SET notify_status = ?1, notify_message = ?2 WHERE id = ?3",
                params![status, message, task_id],
            )?;

            tx.commit()?;
            Ok(())
        })
    }

    /// Record a failed notification attempt on the task's advisory fields.
    ///
    /// The reminder's `notified_at` is deliberately left unstamped so the
    /// next scan cycle retries it (at-least-once delivery).
    pub fn record_notify_failure(&self, task_id: &str, message: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE tasks SET notify_status = 'failed', notify_message = ?1 WHERE id = ?2",
                params![message, task_id],
            )?;
            Ok(())
        })
    }
}
