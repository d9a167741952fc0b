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

//! Batch selection and answer bookkeeping.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Serialize;

use crate::confidence::Confidence;
use crate::confidence::Verdict;
use crate::confidence::adjust_confidence;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::types::aliases::CardId;
use crate::types::card::Flashcard;
use crate::types::deck::FlashcardDeck;
use crate::types::settings::StudySettings;
use crate::validator::available_card_count;

/// Attempt counters for one card. Held in memory for the lifetime of the
/// sequencer and discarded with it; only confidence outlives the session.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct StudyHistory {
    pub card_id: CardId,
    pub correct_count: u32,
    pub total_attempts: u32,
}

/// Draws card batches for study sessions and applies answer outcomes.
///
/// The sequencer owns its deck. Callers hand the deck in at construction
/// and take the updated deck back with [`StudySequencer::into_deck`], so
/// confidence and progress changes never alias state held elsewhere.
pub struct StudySequencer {
    deck: FlashcardDeck,
    settings: StudySettings,
    history: BTreeMap<CardId, StudyHistory>,
    current_cards: Vec<CardId>,
}

impl StudySequencer {
    pub fn new(deck: FlashcardDeck, settings: StudySettings) -> Self {
        let history = deck
            .cards
            .iter()
            .map(|card| {
                (
                    card.id.clone(),
                    StudyHistory {
                        card_id: card.id.clone(),
                        correct_count: 0,
                        total_attempts: 0,
                    },
                )
            })
            .collect();
        StudySequencer {
            deck,
            settings,
            history,
            current_cards: Vec::new(),
        }
    }

    /// Draw the next batch of cards: up to `cards_per_session` of them,
    /// shuffled unless the settings say otherwise. Drawing a batch marks its
    /// cards as shown in the deck's current cycle; once every card in the
    /// deck has been shown, the cycle counter advances and the record of
    /// shown cards resets.
    pub fn next_cards(&mut self, rng: &mut TinyRng) -> Vec<Flashcard> {
        let limit = usize::min(
            self.settings.cards_per_session,
            available_card_count(&self.deck.cards, &self.settings),
        );
        let pool = self.deck.cards.clone();
        let pool = if self.settings.shuffle_cards {
            shuffle(pool, rng)
        } else {
            pool
        };
        let batch: Vec<Flashcard> = pool.into_iter().take(limit).collect();
        let ids: Vec<CardId> = batch.iter().map(|card| card.id.clone()).collect();
        for id in &ids {
            if !self.deck.shown_cards_in_cycle.contains(id) {
                self.deck.shown_cards_in_cycle.push(id.clone());
            }
        }
        if self.cycle_complete() {
            self.deck.current_cycle += 1;
            self.deck.shown_cards_in_cycle.clear();
        }
        self.current_cards = ids;
        batch
    }

    fn cycle_complete(&self) -> bool {
        if self.deck.cards.is_empty() {
            return false;
        }
        let shown: HashSet<&str> = self
            .deck
            .shown_cards_in_cycle
            .iter()
            .map(|id| id.as_str())
            .collect();
        self.deck
            .cards
            .iter()
            .all(|card| shown.contains(card.id.as_str()))
    }

    /// Apply an answer outcome to a card. Returns the card's new confidence,
    /// or `None` when the id does not belong to the deck, in which case
    /// nothing changes at all.
    pub fn record_result(&mut self, card_id: &str, verdict: Verdict) -> Option<Confidence> {
        let new_confidence = {
            let card = self.deck.card_mut(card_id)?;
            card.confidence = adjust_confidence(card.confidence, verdict);
            card.confidence
        };
        if let Some(entry) = self.history.get_mut(card_id) {
            entry.total_attempts += 1;
            if verdict.is_correct() {
                entry.correct_count += 1;
            }
        }
        if verdict.is_correct() {
            self.deck.completed_count += 1;
        }
        Some(new_confidence)
    }

    /// Per-card attempt counters, in card-id order.
    pub fn study_history(&self) -> Vec<StudyHistory> {
        self.history.values().cloned().collect()
    }

    /// The ids of the cards in the most recently drawn batch.
    pub fn current_cards(&self) -> &[CardId] {
        &self.current_cards
    }

    pub fn deck(&self) -> &FlashcardDeck {
        &self.deck
    }

    pub fn settings(&self) -> &StudySettings {
        &self.settings
    }

    /// Consume the sequencer, handing back the updated deck.
    pub fn into_deck(self) -> FlashcardDeck {
        self.deck
    }
}
