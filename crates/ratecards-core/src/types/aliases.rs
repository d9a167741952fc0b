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

/// The identifier of a flashcard, unique within its deck.
pub type CardId = String;

/// The identifier of a deck, unique within a collection.
pub type DeckId = String;

/// The identifier of the user who owns a deck.
pub type UserId = String;

/// A topic tag attached to a card.
pub type Topic = String;
