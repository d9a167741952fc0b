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

use std::fs::write;

use serde::Serialize;

use ratecards_core::error::Fallible;
use ratecards_core::types::deck::FlashcardDeck;
use ratecards_core::types::timestamp::Timestamp;

use crate::collection::Collection;

#[derive(Serialize)]
struct Export {
    exported_at: Timestamp,
    decks: Vec<FlashcardDeck>,
}

/// Write the collection's decks, with their persisted progress folded in, as
/// one JSON document.
pub fn export_collection(directory: Option<String>, output: Option<String>) -> Fallible<()> {
    let Collection {
        mut decks, db, ..
    } = Collection::new(directory)?;
    for deck in decks.iter_mut() {
        db.overlay_progress(deck)?;
    }
    let export = Export {
        exported_at: Timestamp::now(),
        decks,
    };
    let text = serde_json::to_string_pretty(&export)?;
    match output {
        Some(path) => write(path, text)?,
        None => println!("{text}"),
    }
    Ok(())
}
