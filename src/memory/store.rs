// src/memory/store.rs — SQLite operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningProgressRow {
    pub id: i64,
    pub topic: String,
    pub level: String,
    pub learning_style: String,
    pub mode: String,
    pub started_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaughtContentRow {
    pub id: i64,
    pub topic: String,
    pub content: String,
    pub difficulty: String,
    pub examples: Vec<String>,
    pub mode: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessageRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: String,
    pub read: bool,
}

/// Low-level SQLite operations for the usage log and contact inbox.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // -- Learning progress --

    pub fn insert_learning_progress(
        &self,
        topic: &str,
        level: &str,
        learning_style: &str,
        mode: &str,
    ) -> anyhow::Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO learning_progress (topic, level, learning_style, mode, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![topic, level, learning_style, mode, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn query_learning_progress(&self) -> anyhow::Result<Vec<LearningProgressRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, topic, level, learning_style, mode, started_at
             FROM learning_progress ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(LearningProgressRow {
                id: row.get(0)?,
                topic: row.get(1)?,
                level: row.get(2)?,
                learning_style: row.get(3)?,
                mode: row.get(4)?,
                started_at: row.get(5)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // -- Taught content --

    pub fn insert_taught_content(
        &self,
        topic: &str,
        content: &str,
        difficulty: &str,
        examples: &[String],
        mode: &str,
    ) -> anyhow::Result<i64> {
        let now = Utc::now().to_rfc3339();
        let examples = serde_json::to_string(examples)?;
        self.conn.execute(
            "INSERT INTO taught_content (topic, content, difficulty, examples, mode, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![topic, content, difficulty, examples, mode, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All contributions, or those whose topic contains `topic`
    /// (case-insensitive).
    pub fn query_taught_content(
        &self,
        topic: Option<&str>,
    ) -> anyhow::Result<Vec<TaughtContentRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, topic, content, difficulty, examples, mode, created_at
             FROM taught_content
             WHERE ?1 IS NULL OR instr(lower(topic), lower(?1)) > 0
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![topic], taught_content_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // -- Contact messages --

    pub fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> anyhow::Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO contact_messages (name, email, subject, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, email, subject, message, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Newest first.
    pub fn query_contact_messages(
        &self,
        unread_only: bool,
    ) -> anyhow::Result<Vec<ContactMessageRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, subject, message, created_at, read
             FROM contact_messages
             WHERE ?1 = 0 OR read = 0
             ORDER BY id DESC",
        )?;

        let rows = stmt.query_map(params![unread_only], |row| {
            Ok(ContactMessageRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                subject: row.get(3)?,
                message: row.get(4)?,
                created_at: row.get(5)?,
                read: row.get(6)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Returns false if no message has that id.
    pub fn mark_contact_read(&self, id: i64) -> anyhow::Result<bool> {
        let changed = self
            .conn
            .execute("UPDATE contact_messages SET read = 1 WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

fn taught_content_row(row: &Row<'_>) -> rusqlite::Result<TaughtContentRow> {
    let examples: String = row.get(4)?;
    Ok(TaughtContentRow {
        id: row.get(0)?,
        topic: row.get(1)?,
        content: row.get(2)?,
        difficulty: row.get(3)?,
        // Written by insert_taught_content; anything else reads as empty.
        examples: serde_json::from_str(&examples).unwrap_or_default(),
        mode: row.get(5)?,
        created_at: row.get(6)?,
    })
}
