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

//! Checks that decide whether a deck can run a session.

use crate::types::card::Flashcard;
use crate::types::settings::StudyMode;
use crate::types::settings::StudySettings;

/// The smallest deck a quick review can run against.
const QUICK_REVIEW_MIN_CARDS: usize = 5;

/// The smallest deck a standard session can run against.
const STANDARD_MIN_CARDS: usize = 1;

/// What a study mode requires of a deck.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModeRequirements {
    pub min_cards: usize,
    /// Human-readable form of the requirement, for error messages.
    pub description: &'static str,
}

/// How many cards a session plan may draw from. Never less than one, so
/// batch sizing arithmetic stays well-defined even for an empty deck.
pub fn available_card_count(cards: &[Flashcard], _settings: &StudySettings) -> usize {
    usize::max(1, cards.len())
}

/// The static requirements of a study mode.
pub fn mode_requirements(mode: StudyMode) -> ModeRequirements {
    match mode {
        StudyMode::Standard => ModeRequirements {
            min_cards: STANDARD_MIN_CARDS,
            description: "at least one card",
        },
        StudyMode::QuickReview => ModeRequirements {
            min_cards: QUICK_REVIEW_MIN_CARDS,
            description: "at least five cards",
        },
    }
}

/// Whether a deck has enough cards to run the given mode.
pub fn deck_supports_mode(cards: &[Flashcard], mode: StudyMode) -> bool {
    cards.len() >= mode_requirements(mode).min_cards
}
