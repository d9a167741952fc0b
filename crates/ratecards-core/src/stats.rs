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

//! Persistence seam and statistics aggregation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::confidence::Confidence;
use crate::error::Fallible;
use crate::session::SessionSummary;
use crate::types::aliases::CardId;
use crate::types::aliases::DeckId;
use crate::types::aliases::UserId;
use crate::types::date::Date;
use crate::types::deck::FlashcardDeck;

/// One persisted session row.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct SessionRecord {
    pub user_id: UserId,
    pub deck_id: DeckId,
    pub date: Date,
    pub correct: u32,
    pub incorrect: u32,
    pub cards_studied: u32,
}

impl SessionRecord {
    pub fn from_summary(summary: &SessionSummary) -> Self {
        SessionRecord {
            user_id: summary.user_id.clone(),
            deck_id: summary.deck_id.clone(),
            date: summary.started_at.date(),
            correct: summary.correct,
            incorrect: summary.incorrect,
            cards_studied: summary.studied_card_ids.len() as u32,
        }
    }
}

/// Where session results and deck progress live.
///
/// The drill surface is handed an implementation of this trait instead of
/// reaching for storage itself, so tests can run against the in-memory
/// implementation below.
pub trait StatsRepository {
    /// Record one completed session.
    fn save_session(&mut self, summary: &SessionSummary) -> Fallible<()>;

    /// Upsert a deck's completed count and every card's confidence, keyed by
    /// user and deck (and card, for confidences).
    fn save_deck_progress(&mut self, deck: &FlashcardDeck) -> Fallible<()>;

    /// Every persisted session row, oldest first.
    fn sessions(&self) -> Fallible<Vec<SessionRecord>>;

    /// Persisted per-card confidences for one deck.
    fn card_confidences(&self, user_id: &str, deck_id: &str)
    -> Fallible<Vec<(CardId, Confidence)>>;

    /// Persisted completed count for one deck, if any.
    fn completed_count(&self, user_id: &str, deck_id: &str) -> Fallible<Option<u64>>;
}

/// In-memory repository. Used by tests, and the reference for the upsert
/// semantics the SQLite implementation follows.
#[derive(Default)]
pub struct MemoryStatsRepository {
    sessions: Vec<SessionRecord>,
    deck_progress: BTreeMap<(UserId, DeckId), u64>,
    confidences: BTreeMap<(UserId, DeckId, CardId), Confidence>,
}

impl MemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsRepository for MemoryStatsRepository {
    fn save_session(&mut self, summary: &SessionSummary) -> Fallible<()> {
        self.sessions.push(SessionRecord::from_summary(summary));
        Ok(())
    }

    fn save_deck_progress(&mut self, deck: &FlashcardDeck) -> Fallible<()> {
        self.deck_progress.insert(
            (deck.user_id.clone(), deck.id.clone()),
            deck.completed_count,
        );
        for card in &deck.cards {
            self.confidences.insert(
                (deck.user_id.clone(), deck.id.clone(), card.id.clone()),
                card.confidence,
            );
        }
        Ok(())
    }

    fn sessions(&self) -> Fallible<Vec<SessionRecord>> {
        Ok(self.sessions.clone())
    }

    fn card_confidences(
        &self,
        user_id: &str,
        deck_id: &str,
    ) -> Fallible<Vec<(CardId, Confidence)>> {
        Ok(self
            .confidences
            .iter()
            .filter(|((user, deck, _), _)| user == user_id && deck == deck_id)
            .map(|((_, _, card), confidence)| (card.clone(), *confidence))
            .collect())
    }

    fn completed_count(&self, user_id: &str, deck_id: &str) -> Fallible<Option<u64>> {
        Ok(self
            .deck_progress
            .get(&(user_id.to_string(), deck_id.to_string()))
            .copied())
    }
}

/// Aggregate statistics over every persisted session.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct StatsSummary {
    pub total_sessions: u32,
    pub total_answers: u32,
    pub total_correct: u32,
    /// Correct answers as a fraction of all answers. `None` with no answers.
    pub accuracy: Option<f64>,
    pub days_studied: u32,
    pub last_studied: Option<Date>,
    /// Consecutive studied days ending today or yesterday.
    pub current_streak: u32,
    /// The longest run of consecutive studied days on record.
    pub longest_streak: u32,
}

/// Per-deck breakdown of the session history.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct DeckStats {
    pub deck_id: DeckId,
    pub sessions: u32,
    pub answers: u32,
    pub correct: u32,
    pub accuracy: Option<f64>,
}

/// Fold the session history into totals and streaks. `today` anchors the
/// current-streak computation.
pub fn aggregate(records: &[SessionRecord], today: Date) -> StatsSummary {
    let total_sessions = records.len() as u32;
    let total_answers: u32 = records.iter().map(|r| r.correct + r.incorrect).sum();
    let total_correct: u32 = records.iter().map(|r| r.correct).sum();
    let mut days: Vec<Date> = records.iter().map(|r| r.date).collect();
    days.sort();
    days.dedup();
    StatsSummary {
        total_sessions,
        total_answers,
        total_correct,
        accuracy: ratio(total_correct, total_answers),
        days_studied: days.len() as u32,
        last_studied: days.last().copied(),
        current_streak: current_run(&days, today),
        longest_streak: longest_run(&days),
    }
}

/// Group the session history by deck.
pub fn per_deck(records: &[SessionRecord]) -> Vec<DeckStats> {
    let mut grouped: BTreeMap<DeckId, DeckStats> = BTreeMap::new();
    for record in records {
        let entry = grouped
            .entry(record.deck_id.clone())
            .or_insert_with(|| DeckStats {
                deck_id: record.deck_id.clone(),
                sessions: 0,
                answers: 0,
                correct: 0,
                accuracy: None,
            });
        entry.sessions += 1;
        entry.answers += record.correct + record.incorrect;
        entry.correct += record.correct;
    }
    let mut stats: Vec<DeckStats> = grouped.into_values().collect();
    for deck in stats.iter_mut() {
        deck.accuracy = ratio(deck.correct, deck.answers);
    }
    stats
}

fn ratio(correct: u32, total: u32) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(f64::from(correct) / f64::from(total))
    }
}

/// The longest run of consecutive days in a sorted, deduplicated list.
fn longest_run(days: &[Date]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<Date> = None;
    for day in days {
        run = match prev {
            Some(prev) if prev.days_until(*day) == 1 => run + 1,
            _ => 1,
        };
        longest = u32::max(longest, run);
        prev = Some(*day);
    }
    longest
}

/// The run of consecutive days ending at the last studied day, provided that
/// day is today or yesterday. An older last study day means the streak is
/// broken.
fn current_run(days: &[Date], today: Date) -> u32 {
    let last = match days.last() {
        Some(last) => *last,
        None => return 0,
    };
    if last.days_until(today) > 1 {
        return 0;
    }
    let mut run = 1;
    let mut idx = days.len() - 1;
    while idx > 0 && days[idx - 1].days_until(days[idx]) == 1 {
        run += 1;
        idx -= 1;
    }
    run
}
