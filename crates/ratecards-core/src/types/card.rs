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

use serde::Deserialize;
use serde::Serialize;

use crate::confidence::Confidence;
use crate::types::aliases::CardId;
use crate::types::aliases::Topic;

/// What kind of prompt a card is.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// A question on the front, an answer on the back.
    #[default]
    Basic,
    /// A fill-in-the-blank prompt; the back carries the hidden text.
    Cloze,
}

/// Author-assigned difficulty of a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// A single flashcard.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Flashcard {
    /// Identifier, unique within the deck.
    pub id: CardId,
    /// The prompt side, in Markdown.
    pub front: String,
    /// The answer side, in Markdown.
    pub back: String,
    /// How well the user knows this card.
    #[serde(default)]
    pub confidence: Confidence,
    /// The kind of prompt.
    #[serde(rename = "type", default)]
    pub kind: CardKind,
    /// Author-assigned difficulty.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Topic tags, used for review and reporting.
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// Extra context shown alongside the answer.
    #[serde(default)]
    pub explanation: Option<String>,
}
