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

//! ratecards-core: Core library for the ratecards study system.
//!
//! This library provides the I/O-free pieces of the system:
//! - Deck, card, and settings types, validated at the I/O boundary
//! - Batch selection and confidence tracking (the sequencer)
//! - The study session state machine
//! - Statistics aggregation over persisted session rows
//! - Markdown to HTML rendering for card faces

pub mod confidence;
pub mod error;
pub mod markdown;
pub mod rng;
pub mod sequencer;
pub mod session;
pub mod stats;
pub mod types;
pub mod validator;

// Re-exports for convenience
pub use confidence::{Confidence, Verdict, adjust_confidence};
pub use error::{ErrorReport, Fallible, fail};
pub use sequencer::{StudyHistory, StudySequencer};
pub use session::{SessionPhase, SessionSummary, StudySession};
pub use stats::{SessionRecord, StatsRepository, StatsSummary, aggregate, per_deck};
pub use types::card::{CardKind, Difficulty, Flashcard};
pub use types::date::Date;
pub use types::deck::{DeckError, FlashcardDeck};
pub use types::settings::{StudyMode, StudySettings};
pub use types::timestamp::Timestamp;
