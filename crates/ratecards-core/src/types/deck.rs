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

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::types::aliases::CardId;
use crate::types::aliases::DeckId;
use crate::types::aliases::UserId;
use crate::types::card::Flashcard;

/// An error found while validating a deck read from disk.
#[derive(Debug, PartialEq)]
pub struct DeckError {
    pub message: String,
    /// The id of the offending deck.
    pub deck: String,
}

impl DeckError {
    pub fn new(message: impl Into<String>, deck: impl Into<String>) -> Self {
        DeckError {
            message: message.into(),
            deck: deck.into(),
        }
    }
}

impl Display for DeckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Deck: {}.", self.message, self.deck)
    }
}

impl Error for DeckError {}

/// A deck of flashcards owned by a single user.
///
/// The progress fields (`completed_count`, `current_cycle`,
/// `shown_cards_in_cycle`) default to zero when absent from the deck file,
/// and are brought up to date from the progress database before a session.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct FlashcardDeck {
    /// Identifier, unique within a collection.
    pub id: DeckId,
    /// The owning user.
    pub user_id: UserId,
    /// Display name. Defaults to the file stem when read from disk.
    #[serde(default)]
    pub name: String,
    /// The cards in this deck. May be empty.
    pub cards: Vec<Flashcard>,
    /// Cumulative count of correct answers across all sessions.
    #[serde(default)]
    pub completed_count: u64,
    /// Which show-every-card cycle the deck is on.
    #[serde(default)]
    pub current_cycle: u32,
    /// Ids of the cards already shown in the current cycle.
    #[serde(default)]
    pub shown_cards_in_cycle: Vec<CardId>,
}

impl FlashcardDeck {
    /// Check the structural invariants: non-blank identifiers, non-blank
    /// card faces, and unique card ids.
    pub fn validate(&self) -> Result<(), DeckError> {
        if self.id.trim().is_empty() {
            return Err(DeckError::new("Deck id is blank.", &self.name));
        }
        if self.user_id.trim().is_empty() {
            return Err(DeckError::new("Deck user id is blank.", &self.id));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, card) in self.cards.iter().enumerate() {
            if card.id.trim().is_empty() {
                return Err(DeckError::new(
                    format!("Card {} has a blank id.", index + 1),
                    &self.id,
                ));
            }
            if card.front.trim().is_empty() {
                return Err(DeckError::new(
                    format!("Card '{}' has a blank front side.", card.id),
                    &self.id,
                ));
            }
            if card.back.trim().is_empty() {
                return Err(DeckError::new(
                    format!("Card '{}' has a blank back side.", card.id),
                    &self.id,
                ));
            }
            if !seen.insert(card.id.as_str()) {
                return Err(DeckError::new(
                    format!("Duplicate card id '{}'.", card.id),
                    &self.id,
                ));
            }
        }
        Ok(())
    }

    /// Find a card by id.
    pub fn card(&self, id: &str) -> Option<&Flashcard> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub(crate) fn card_mut(&mut self, id: &str) -> Option<&mut Flashcard> {
        self.cards.iter_mut().find(|card| card.id == id)
    }
}
