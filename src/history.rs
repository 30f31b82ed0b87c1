use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::HistoryError;
use crate::quiz::Quiz;
use crate::results::{Badge, Ending, QuizResult};

/// One completed quiz attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub quiz_id: String,
    pub quiz_title: String,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub total: usize,
    pub percent: u8,
    pub badge: Badge,
    pub ending: Ending,
    pub completed_at: DateTime<Local>,
}

impl AttemptRecord {
    pub fn new(quiz: &Quiz, result: &QuizResult, completed_at: DateTime<Local>) -> Self {
        Self {
            quiz_id: quiz.id.clone(),
            quiz_title: quiz.title.clone(),
            correct: result.correct,
            incorrect: result.incorrect,
            unanswered: result.unanswered,
            total: result.total,
            percent: result.percent,
            badge: result.badge,
            ending: result.ending,
            completed_at,
        }
    }
}

/// Per-quiz rollup shown on the course screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub quiz_id: String,
    pub attempts: usize,
    pub best_percent: u8,
}

#[derive(Serialize)]
struct ExportRow<'a> {
    completed_at: String,
    quiz_id: &'a str,
    quiz_title: &'a str,
    correct: usize,
    incorrect: usize,
    unanswered: usize,
    total: usize,
    percent: u8,
    badge: String,
    ending: String,
}

const SELECT_ATTEMPT: &str = r#"
    SELECT quiz_id, quiz_title, correct, incorrect, unanswered, total, percent, ending, completed_at
    FROM attempts
"#;

/// SQLite-backed log of completed attempts
#[derive(Debug)]
pub struct AttemptStore {
    conn: Connection,
}

impl AttemptStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self::init(Connection::open(path)?)?;
        debug!(path = %path.display(), "opened attempt history");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, HistoryError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                quiz_id TEXT NOT NULL,
                quiz_title TEXT NOT NULL,
                correct INTEGER NOT NULL,
                incorrect INTEGER NOT NULL,
                unanswered INTEGER NOT NULL,
                total INTEGER NOT NULL,
                percent INTEGER NOT NULL,
                ending TEXT NOT NULL,
                completed_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_attempts_quiz ON attempts(quiz_id)",
            [],
        )?;

        Ok(Self { conn })
    }

    pub fn record(&self, attempt: &AttemptRecord) -> Result<(), HistoryError> {
        self.conn.execute(
            r#"
            INSERT INTO attempts
            (quiz_id, quiz_title, correct, incorrect, unanswered, total, percent, ending, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                attempt.quiz_id,
                attempt.quiz_title,
                attempt.correct as i64,
                attempt.incorrect as i64,
                attempt.unanswered as i64,
                attempt.total as i64,
                attempt.percent,
                attempt.ending.to_string(),
                stored_timestamp(&attempt.completed_at),
            ],
        )?;
        debug!(quiz = %attempt.quiz_id, percent = attempt.percent, "recorded attempt");
        Ok(())
    }

    /// Attempts at one quiz, newest first.
    pub fn attempts_for(&self, quiz_id: &str) -> Result<Vec<AttemptRecord>, HistoryError> {
        let sql = format!("{SELECT_ATTEMPT} WHERE quiz_id = ?1 ORDER BY completed_at DESC, id DESC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([quiz_id], StoredAttempt::from_row)?;
        let attempts = rows
            .map(|row| AttemptRecord::try_from(row?))
            .collect::<Result<Vec<_>, HistoryError>>()?;
        Ok(attempts)
    }

    /// Every attempt, oldest first.
    pub fn all(&self) -> Result<Vec<AttemptRecord>, HistoryError> {
        let sql = format!("{SELECT_ATTEMPT} ORDER BY completed_at ASC, id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], StoredAttempt::from_row)?;
        let attempts = rows
            .map(|row| AttemptRecord::try_from(row?))
            .collect::<Result<Vec<_>, HistoryError>>()?;
        Ok(attempts)
    }

    pub fn best_percent(&self, quiz_id: &str) -> Result<Option<u8>, HistoryError> {
        let best: Option<i64> = self.conn.query_row(
            "SELECT MAX(percent) FROM attempts WHERE quiz_id = ?1",
            [quiz_id],
            |row| row.get(0),
        )?;
        Ok(best.map(|p| p.clamp(0, 100) as u8))
    }

    pub fn progress(&self) -> Result<Vec<QuizProgress>, HistoryError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT quiz_id, COUNT(*), MAX(percent)
            FROM attempts
            GROUP BY quiz_id
            ORDER BY quiz_id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            let attempts: i64 = row.get(1)?;
            let best: i64 = row.get(2)?;
            Ok(QuizProgress {
                quiz_id: row.get(0)?,
                attempts: attempts.max(0) as usize,
                best_percent: best.clamp(0, 100) as u8,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn clear(&self) -> Result<(), HistoryError> {
        self.conn.execute("DELETE FROM attempts", [])?;
        Ok(())
    }

    /// Write every attempt as CSV with a header row. Returns the row count.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize, HistoryError> {
        let attempts = self.all()?;
        let mut wtr = csv::Writer::from_writer(writer);
        for a in &attempts {
            wtr.serialize(ExportRow {
                completed_at: a.completed_at.to_rfc3339(),
                quiz_id: &a.quiz_id,
                quiz_title: &a.quiz_title,
                correct: a.correct,
                incorrect: a.incorrect,
                unanswered: a.unanswered,
                total: a.total,
                percent: a.percent,
                badge: a.badge.label(),
                ending: a.ending.to_string(),
            })?;
        }
        wtr.flush()?;
        Ok(attempts.len())
    }
}

/// UTC with a fixed number of fractional digits, so the text sorts in time
/// order whatever the local offset was when the attempt was recorded.
fn stored_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// An `attempts` row as SQLite hands it back.
struct StoredAttempt {
    quiz_id: String,
    quiz_title: String,
    correct: i64,
    incorrect: i64,
    unanswered: i64,
    total: i64,
    percent: i64,
    ending: String,
    completed_at: String,
}

impl StoredAttempt {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            quiz_id: row.get(0)?,
            quiz_title: row.get(1)?,
            correct: row.get(2)?,
            incorrect: row.get(3)?,
            unanswered: row.get(4)?,
            total: row.get(5)?,
            percent: row.get(6)?,
            ending: row.get(7)?,
            completed_at: row.get(8)?,
        })
    }
}

impl TryFrom<StoredAttempt> for AttemptRecord {
    type Error = HistoryError;

    fn try_from(row: StoredAttempt) -> Result<Self, Self::Error> {
        let count = |n: i64| n.max(0) as usize;

        let ending: Ending = row
            .ending
            .parse()
            .map_err(|_| HistoryError::Ending(row.ending.clone()))?;
        let completed_at = DateTime::parse_from_rfc3339(&row.completed_at)
            .map_err(|_| HistoryError::Timestamp(row.completed_at.clone()))?
            .with_timezone(&Local);

        let correct = count(row.correct);
        let total = count(row.total);

        Ok(AttemptRecord {
            quiz_id: row.quiz_id,
            quiz_title: row.quiz_title,
            correct,
            incorrect: count(row.incorrect),
            unanswered: count(row.unanswered),
            total,
            percent: row.percent.clamp(0, 100) as u8,
            badge: Badge::for_score(correct, total),
            ending,
            completed_at,
        })
    }
}
