// Copyright 2026 The ratecards authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

use ratecards_core::confidence::Confidence;
use ratecards_core::error::ErrorReport;
use ratecards_core::error::Fallible;
use ratecards_core::session::SessionSummary;
use ratecards_core::stats::SessionRecord;
use ratecards_core::stats::StatsRepository;
use ratecards_core::types::aliases::CardId;
use ratecards_core::types::deck::FlashcardDeck;
use ratecards_core::types::timestamp::Timestamp;

/// SQLite store for session history and per-card progress.
pub struct Database {
    conn: Connection,
}

fn db_err(e: rusqlite::Error) -> ErrorReport {
    ErrorReport::new(format!("Database error: {e}"))
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Fallible<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        init_schema(&conn)?;
        Ok(Database { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        init_schema(&conn)?;
        Ok(Database { conn })
    }

    /// Replace the deck's default progress fields with what the database
    /// remembers for this user and deck.
    pub fn overlay_progress(&self, deck: &mut FlashcardDeck) -> Fallible<()> {
        if let Some(completed) = self.completed_count(&deck.user_id, &deck.id)? {
            deck.completed_count = completed;
        }
        let confidences = self.card_confidences(&deck.user_id, &deck.id)?;
        for (card_id, confidence) in confidences {
            for card in deck.cards.iter_mut() {
                if card.id == card_id {
                    card.confidence = confidence;
                }
            }
        }
        Ok(())
    }

    /// Persist a finished session and the deck progress it produced, in one
    /// transaction so a retried flush never records a session twice.
    pub fn flush_session(
        &mut self,
        summary: &SessionSummary,
        deck: &FlashcardDeck,
    ) -> Fallible<()> {
        let tx = self.conn.transaction().map_err(db_err)?;
        insert_session(&tx, summary)?;
        upsert_deck_progress(&tx, deck)?;
        tx.commit().map_err(db_err)?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Fallible<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            deck_id TEXT NOT NULL,
            started_at TEXT NOT NULL,
            finished_at TEXT NOT NULL,
            correct INTEGER NOT NULL,
            incorrect INTEGER NOT NULL,
            cards_studied INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS deck_progress (
            user_id TEXT NOT NULL,
            deck_id TEXT NOT NULL,
            completed_count INTEGER NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, deck_id)
        );
        CREATE TABLE IF NOT EXISTS card_confidence (
            user_id TEXT NOT NULL,
            deck_id TEXT NOT NULL,
            card_id TEXT NOT NULL,
            confidence INTEGER NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, deck_id, card_id)
        );",
    )
    .map_err(db_err)?;
    Ok(())
}

fn insert_session(conn: &Connection, summary: &SessionSummary) -> Fallible<()> {
    conn.execute(
        "INSERT INTO sessions
            (user_id, deck_id, started_at, finished_at, correct, incorrect, cards_studied)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            summary.user_id,
            summary.deck_id,
            summary.started_at.to_string(),
            summary.finished_at.to_string(),
            summary.correct,
            summary.incorrect,
            summary.studied_card_ids.len() as i64,
        ],
    )
    .map_err(db_err)?;
    Ok(())
}

fn upsert_deck_progress(conn: &Connection, deck: &FlashcardDeck) -> Fallible<()> {
    let updated_at = Timestamp::now().to_string();
    conn.execute(
        "INSERT INTO deck_progress (user_id, deck_id, completed_count, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id, deck_id) DO UPDATE SET
                completed_count = excluded.completed_count,
                updated_at = excluded.updated_at",
        params![deck.user_id, deck.id, deck.completed_count, updated_at],
    )
    .map_err(db_err)?;
    for card in &deck.cards {
        conn.execute(
            "INSERT INTO card_confidence (user_id, deck_id, card_id, confidence, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT (user_id, deck_id, card_id) DO UPDATE SET
                    confidence = excluded.confidence,
                    updated_at = excluded.updated_at",
            params![
                deck.user_id,
                deck.id,
                card.id,
                card.confidence.value() as i64,
                updated_at,
            ],
        )
        .map_err(db_err)?;
    }
    Ok(())
}

impl StatsRepository for Database {
    fn save_session(&mut self, summary: &SessionSummary) -> Fallible<()> {
        insert_session(&self.conn, summary)
    }

    fn save_deck_progress(&mut self, deck: &FlashcardDeck) -> Fallible<()> {
        upsert_deck_progress(&self.conn, deck)
    }

    fn sessions(&self) -> Fallible<Vec<SessionRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT user_id, deck_id, started_at, correct, incorrect, cards_studied
                    FROM sessions ORDER BY started_at",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                ))
            })
            .map_err(db_err)?;
        let mut records = Vec::new();
        for row in rows {
            let (user_id, deck_id, started_at, correct, incorrect, cards_studied) =
                row.map_err(db_err)?;
            let started_at = Timestamp::try_from(started_at)?;
            records.push(SessionRecord {
                user_id,
                deck_id,
                date: started_at.date(),
                correct,
                incorrect,
                cards_studied,
            });
        }
        Ok(records)
    }

    fn card_confidences(
        &self,
        user_id: &str,
        deck_id: &str,
    ) -> Fallible<Vec<(CardId, Confidence)>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT card_id, confidence FROM card_confidence
                    WHERE user_id = ?1 AND deck_id = ?2",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![user_id, deck_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(db_err)?;
        let mut confidences = Vec::new();
        for row in rows {
            let (card_id, raw) = row.map_err(db_err)?;
            let raw = u8::try_from(raw)
                .map_err(|_| ErrorReport::new("invalid confidence value in database"))?;
            confidences.push((card_id, Confidence::try_from(raw)?));
        }
        Ok(confidences)
    }

    fn completed_count(&self, user_id: &str, deck_id: &str) -> Fallible<Option<u64>> {
        let count = self
            .conn
            .query_row(
                "SELECT completed_count FROM deck_progress
                    WHERE user_id = ?1 AND deck_id = ?2",
                params![user_id, deck_id],
                |row| row.get::<_, u64>(0),
            )
            .optional()
            .map_err(db_err)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> Fallible<SessionSummary> {
        Ok(SessionSummary {
            user_id: "u1".to_string(),
            deck_id: "d1".to_string(),
            deck_name: "Deck".to_string(),
            started_at: Timestamp::try_from("2026-03-01T10:00:00.000".to_string())?,
            finished_at: Timestamp::try_from("2026-03-01T10:04:00.000".to_string())?,
            cards_total: 2,
            correct: 2,
            incorrect: 0,
            studied_card_ids: vec!["c1".to_string(), "c2".to_string()],
        })
    }

    fn sample_deck() -> Fallible<FlashcardDeck> {
        let text = r#"{
            "id": "d1",
            "user_id": "u1",
            "name": "Deck",
            "cards": [{"id": "c1", "front": "f", "back": "b", "confidence": 4}],
            "completed_count": 7
        }"#;
        Ok(serde_json::from_str(text)?)
    }

    #[test]
    fn test_session_round_trip() -> Fallible<()> {
        let mut db = Database::open_in_memory()?;
        db.save_session(&sample_summary()?)?;
        let records = db.sessions()?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "u1");
        assert_eq!(records[0].deck_id, "d1");
        assert_eq!(records[0].date.to_string(), "2026-03-01");
        assert_eq!(records[0].correct, 2);
        assert_eq!(records[0].incorrect, 0);
        assert_eq!(records[0].cards_studied, 2);
        Ok(())
    }

    #[test]
    fn test_deck_progress_round_trip() -> Fallible<()> {
        let mut db = Database::open_in_memory()?;
        let deck = sample_deck()?;
        db.save_deck_progress(&deck)?;
        assert_eq!(db.completed_count("u1", "d1")?, Some(7));
        let confidences = db.card_confidences("u1", "d1")?;
        assert_eq!(confidences.len(), 1);
        assert_eq!(confidences[0].0, "c1");
        assert_eq!(confidences[0].1.value(), 4);
        Ok(())
    }

    #[test]
    fn test_deck_progress_upsert_overwrites() -> Fallible<()> {
        let mut db = Database::open_in_memory()?;
        let mut deck = sample_deck()?;
        db.save_deck_progress(&deck)?;
        deck.completed_count = 9;
        deck.cards[0].confidence = Confidence::try_from(1)?;
        db.save_deck_progress(&deck)?;
        assert_eq!(db.completed_count("u1", "d1")?, Some(9));
        let confidences = db.card_confidences("u1", "d1")?;
        assert_eq!(confidences.len(), 1);
        assert_eq!(confidences[0].1.value(), 1);
        Ok(())
    }

    #[test]
    fn test_unknown_deck_has_no_progress() -> Fallible<()> {
        let db = Database::open_in_memory()?;
        assert_eq!(db.completed_count("u1", "nope")?, None);
        assert!(db.card_confidences("u1", "nope")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_overlay_progress() -> Fallible<()> {
        let mut db = Database::open_in_memory()?;
        db.save_deck_progress(&sample_deck()?)?;
        let mut fresh = sample_deck()?;
        fresh.completed_count = 0;
        fresh.cards[0].confidence = Confidence::default();
        db.overlay_progress(&mut fresh)?;
        assert_eq!(fresh.completed_count, 7);
        assert_eq!(fresh.cards[0].confidence.value(), 4);
        Ok(())
    }

    #[test]
    fn test_flush_session_is_transactional() -> Fallible<()> {
        let mut db = Database::open_in_memory()?;
        db.flush_session(&sample_summary()?, &sample_deck()?)?;
        assert_eq!(db.sessions()?.len(), 1);
        assert_eq!(db.completed_count("u1", "d1")?, Some(7));
        Ok(())
    }
}
