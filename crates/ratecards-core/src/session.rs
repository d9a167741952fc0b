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

//! The study session state machine.

use serde::Serialize;

use crate::confidence::Verdict;
use crate::rng::TinyRng;
use crate::sequencer::StudySequencer;
use crate::types::aliases::CardId;
use crate::types::aliases::DeckId;
use crate::types::aliases::UserId;
use crate::types::card::Flashcard;
use crate::types::deck::FlashcardDeck;
use crate::types::timestamp::Timestamp;

/// Which face of the current card is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardFace {
    Question,
    Answer,
}

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionPhase {
    Loading,
    InProgress,
    Complete,
}

/// Running totals for one session.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct SessionTallies {
    pub correct: u32,
    pub incorrect: u32,
    /// Distinct cards answered this session, in first-seen order.
    pub studied_card_ids: Vec<CardId>,
}

/// The final report of a completed session.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct SessionSummary {
    pub user_id: UserId,
    pub deck_id: DeckId,
    pub deck_name: String,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    /// How many cards the batch held.
    pub cards_total: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub studied_card_ids: Vec<CardId>,
}

impl SessionSummary {
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Fraction of answers that were correct. `None` when nothing was
    /// answered.
    pub fn accuracy(&self) -> Option<f64> {
        if self.answered() == 0 {
            None
        } else {
            Some(f64::from(self.correct) / f64::from(self.answered()))
        }
    }
}

/// A study session over one deck.
///
/// Sessions move from `Loading` to `InProgress` when [`StudySession::start`]
/// draws the batch, and to `Complete` when the last card is answered or the
/// user ends early. Every transition is a no-op outside the phase it belongs
/// to, so stray requests cannot corrupt the session.
pub struct StudySession {
    sequencer: StudySequencer,
    batch: Vec<Flashcard>,
    index: usize,
    face: CardFace,
    phase: SessionPhase,
    started_at: Option<Timestamp>,
    finished_at: Option<Timestamp>,
    tallies: SessionTallies,
    summary: Option<SessionSummary>,
}

impl StudySession {
    /// A new session in the `Loading` phase.
    pub fn new(sequencer: StudySequencer) -> Self {
        StudySession {
            sequencer,
            batch: Vec::new(),
            index: 0,
            face: CardFace::Question,
            phase: SessionPhase::Loading,
            started_at: None,
            finished_at: None,
            tallies: SessionTallies::default(),
            summary: None,
        }
    }

    /// Draw the card batch and begin. A session whose batch comes back empty
    /// completes immediately.
    pub fn start(&mut self, rng: &mut TinyRng, now: Timestamp) {
        if self.phase != SessionPhase::Loading {
            return;
        }
        self.batch = self.sequencer.next_cards(rng);
        self.started_at = Some(now);
        if self.batch.is_empty() {
            self.complete(now);
        } else {
            self.phase = SessionPhase::InProgress;
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    /// The card currently being studied.
    pub fn current_card(&self) -> Option<&Flashcard> {
        if self.phase == SessionPhase::InProgress {
            self.batch.get(self.index)
        } else {
            None
        }
    }

    /// `(answered so far, batch size)`.
    pub fn position(&self) -> (usize, usize) {
        (self.index, self.batch.len())
    }

    pub fn tallies(&self) -> &SessionTallies {
        &self.tallies
    }

    /// Whole seconds since the session started. Zero before `start`.
    pub fn elapsed_seconds(&self, now: Timestamp) -> i64 {
        match self.started_at {
            Some(started_at) => now.seconds_since(started_at),
            None => 0,
        }
    }

    /// Whole seconds the session ran for. `None` until it completes.
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(started_at), Some(finished_at)) => Some(finished_at.seconds_since(started_at)),
            _ => None,
        }
    }

    /// Toggle between the question and answer face of the current card.
    pub fn flip(&mut self) {
        if self.phase != SessionPhase::InProgress {
            return;
        }
        self.face = match self.face {
            CardFace::Question => CardFace::Answer,
            CardFace::Answer => CardFace::Question,
        };
    }

    /// Answer the current card and advance to the next one, completing the
    /// session when the batch runs out.
    pub fn answer(&mut self, verdict: Verdict, now: Timestamp) {
        if self.phase != SessionPhase::InProgress {
            return;
        }
        let card_id = match self.batch.get(self.index) {
            Some(card) => card.id.clone(),
            None => return,
        };
        self.sequencer.record_result(&card_id, verdict);
        if verdict.is_correct() {
            self.tallies.correct += 1;
        } else {
            self.tallies.incorrect += 1;
        }
        if !self.tallies.studied_card_ids.contains(&card_id) {
            self.tallies.studied_card_ids.push(card_id);
        }
        self.index += 1;
        self.face = CardFace::Question;
        if self.index >= self.batch.len() {
            self.complete(now);
        }
    }

    /// Finish early, keeping whatever was answered so far.
    pub fn end(&mut self, now: Timestamp) {
        if self.phase == SessionPhase::InProgress {
            self.complete(now);
        }
    }

    fn complete(&mut self, now: Timestamp) {
        self.phase = SessionPhase::Complete;
        self.finished_at = Some(now);
        let deck = self.sequencer.deck();
        self.summary = Some(SessionSummary {
            user_id: deck.user_id.clone(),
            deck_id: deck.id.clone(),
            deck_name: deck.name.clone(),
            started_at: self.started_at.unwrap_or(now),
            finished_at: now,
            cards_total: self.batch.len(),
            correct: self.tallies.correct,
            incorrect: self.tallies.incorrect,
            studied_card_ids: self.tallies.studied_card_ids.clone(),
        });
    }

    /// The completion report. Yields `Some` exactly once per completed
    /// session, so the caller that persists it cannot double-write.
    pub fn take_summary(&mut self) -> Option<SessionSummary> {
        self.summary.take()
    }

    pub fn deck(&self) -> &FlashcardDeck {
        self.sequencer.deck()
    }

    /// Consume the session, handing back the updated deck.
    pub fn into_deck(self) -> FlashcardDeck {
        self.sequencer.into_deck()
    }
}
