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

//! Helpers shared by the binary's tests.

use std::fs::create_dir_all;
use std::fs::write;
use std::path::PathBuf;

use tempfile::tempdir;

use ratecards_core::error::Fallible;

/// An empty directory suitable as a collection root.
pub fn create_empty_collection_dir() -> Fallible<PathBuf> {
    let dir = tempdir()?.path().to_path_buf();
    create_dir_all(&dir)?;
    Ok(dir.canonicalize()?)
}

/// A collection with one two-card deck and no-shuffle settings, so tests see
/// the cards in file order. Returns the directory path as a string.
pub fn create_tmp_collection() -> Fallible<String> {
    let dir = create_empty_collection_dir()?;
    write(
        dir.join("navigation.json"),
        r#"{
    "id": "seamanship-basics",
    "user_id": "user-1",
    "name": "Seamanship",
    "cards": [
        {
            "id": "lines-1",
            "front": "What line secures the bow?",
            "back": "The bow line.",
            "type": "basic",
            "difficulty": "easy",
            "topics": ["seamanship"],
            "explanation": "Bow lines keep the bow snug against the pier."
        },
        {
            "id": "lines-2",
            "front": "Fill in: the ____ line runs aft.",
            "back": "stern",
            "type": "cloze",
            "difficulty": "medium"
        }
    ]
}"#,
    )?;
    write(
        dir.join("settings.toml"),
        "cards_per_session = 10\nshuffle_cards = false\n",
    )?;
    Ok(dir.display().to_string())
}
