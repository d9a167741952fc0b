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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// How a study session selects and paces cards.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudyMode {
    /// Work through the configured number of cards.
    Standard,
    /// A short pass over a handful of cards.
    QuickReview,
}

impl StudyMode {
    pub fn as_str(&self) -> &str {
        match self {
            StudyMode::Standard => "standard",
            StudyMode::QuickReview => "quick-review",
        }
    }
}

impl Display for StudyMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StudyMode {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(StudyMode::Standard),
            "quick-review" => Ok(StudyMode::QuickReview),
            _ => fail(format!("invalid study mode: {s}")),
        }
    }
}

/// User preferences for study sessions. The sequencer reads these but never
/// writes them.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StudySettings {
    /// How many cards to draw into one session.
    pub cards_per_session: usize,
    /// Whether to shuffle the deck before drawing.
    pub shuffle_cards: bool,
    /// Whether the answer face shows the card's explanation.
    pub show_explanations: bool,
    /// Whether the drill page plays feedback sounds.
    pub sound_effects: bool,
    /// Which study mode sessions run in.
    pub study_mode: StudyMode,
}

impl Default for StudySettings {
    fn default() -> Self {
        StudySettings {
            cards_per_session: 10,
            shuffle_cards: true,
            show_explanations: true,
            sound_effects: false,
            study_mode: StudyMode::Standard,
        }
    }
}

impl StudySettings {
    /// Parse settings from a TOML document. Missing keys take their default
    /// values.
    pub fn from_toml_str(text: &str) -> Fallible<Self> {
        let settings: StudySettings = toml::from_str(text)
            .map_err(|e| ErrorReport::new(format!("Failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Fallible<()> {
        if self.cards_per_session == 0 {
            return fail("cards_per_session must be at least 1.");
        }
        Ok(())
    }
}
