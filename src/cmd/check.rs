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

use ratecards_core::error::Fallible;
use ratecards_core::error::fail;
use ratecards_core::types::settings::StudyMode;
use ratecards_core::validator::deck_supports_mode;
use ratecards_core::validator::mode_requirements;

use crate::collection::deck_files;
use crate::collection::load_deck;
use crate::collection::resolve_directory;

/// Validate every deck file in the collection and report what each deck
/// supports.
pub fn check_collection(directory: Option<String>) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    let paths = deck_files(&directory)?;
    if paths.is_empty() {
        println!("No deck files found.");
        return Ok(());
    }
    let mut errors = 0;
    for path in paths {
        match load_deck(&path) {
            Ok(deck) => {
                println!(
                    "{}: '{}' with {} card(s)",
                    path.display(),
                    deck.name,
                    deck.cards.len()
                );
                for mode in [StudyMode::Standard, StudyMode::QuickReview] {
                    if !deck_supports_mode(&deck.cards, mode) {
                        let requirements = mode_requirements(mode);
                        println!(
                            "  note: {mode} mode unavailable (needs {}).",
                            requirements.description
                        );
                    }
                }
            }
            Err(e) => {
                errors += 1;
                println!("{e}");
            }
        }
    }
    if errors > 0 {
        return fail(format!("{errors} invalid deck file(s)."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;
    use crate::helper::create_empty_collection_dir;

    #[test]
    fn test_empty_collection_is_ok() -> Fallible<()> {
        let dir = create_empty_collection_dir()?;
        check_collection(Some(dir.display().to_string()))
    }

    #[test]
    fn test_valid_deck_is_ok() -> Fallible<()> {
        let dir = create_empty_collection_dir()?;
        write(
            dir.join("deck.json"),
            r#"{"id": "d1", "user_id": "u1", "cards": [{"id": "c1", "front": "Q", "back": "A"}]}"#,
        )?;
        check_collection(Some(dir.display().to_string()))
    }

    #[test]
    fn test_invalid_deck_is_counted() -> Fallible<()> {
        let dir = create_empty_collection_dir()?;
        write(
            dir.join("deck.json"),
            r#"{"id": "d1", "user_id": "u1", "cards": [{"id": "", "front": "Q", "back": "A"}]}"#,
        )?;
        let result = check_collection(Some(dir.display().to_string()));
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: 1 invalid deck file(s)."
        );
        Ok(())
    }
}
