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
use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use ratecards_core::error::ErrorReport;
use ratecards_core::error::Fallible;
use ratecards_core::error::fail;
use ratecards_core::types::deck::FlashcardDeck;
use ratecards_core::types::settings::StudySettings;

use crate::db::Database;

/// The file name of the progress database inside a collection directory.
pub const DATABASE_FILE: &str = ".ratecards.db";

/// The file name of the optional settings file inside a collection directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// A collection directory: deck files, optional settings, and the progress
/// database.
pub struct Collection {
    /// Absolute path to the collection directory.
    pub directory: PathBuf,
    /// Every deck parsed from the directory, in path order.
    pub decks: Vec<FlashcardDeck>,
    /// Study settings from `settings.toml`, or defaults.
    pub settings: StudySettings,
    /// The progress database.
    pub db: Database,
}

impl Collection {
    /// Load the collection at `directory`, defaulting to the current working
    /// directory.
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory = resolve_directory(directory)?;
        let settings = load_settings(&directory)?;
        let paths = deck_files(&directory)?;
        let mut decks: Vec<FlashcardDeck> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        for path in paths {
            let deck = load_deck(&path)?;
            if !seen_ids.insert(deck.id.clone()) {
                return fail(format!(
                    "duplicate deck id '{}' in '{}'.",
                    deck.id,
                    path.display()
                ));
            }
            decks.push(deck);
        }
        let db = Database::open(&directory.join(DATABASE_FILE))?;
        Ok(Collection {
            directory,
            decks,
            settings,
            db,
        })
    }
}

/// Resolve and check the collection directory argument.
pub fn resolve_directory(directory: Option<String>) -> Fallible<PathBuf> {
    let directory = match directory {
        Some(directory) => PathBuf::from(directory),
        None => std::env::current_dir()?,
    };
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    if !directory.is_dir() {
        return fail("path is not a directory.");
    }
    Ok(directory.canonicalize()?)
}

/// Every deck file in the directory, sorted by path so load order is
/// deterministic.
pub fn deck_files(directory: &Path) -> Fallible<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(|e| ErrorReport::new(format!("Failed to walk directory: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if is_hidden(path) {
            continue;
        }
        paths.push(path.to_path_buf());
    }
    paths.sort();
    Ok(paths)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Parse and validate one deck file. The deck name defaults to the file stem
/// when the file does not set one.
pub fn load_deck(path: &Path) -> Fallible<FlashcardDeck> {
    let text = read_to_string(path)?;
    let mut deck: FlashcardDeck = serde_json::from_str(&text).map_err(|e| {
        ErrorReport::new(format!("Failed to parse deck file '{}': {e}", path.display()))
    })?;
    if deck.name.is_empty() {
        deck.name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("deck")
            .to_string();
    }
    deck.validate()
        .map_err(|e| ErrorReport::new(format!("{}: {e}", path.display())))?;
    Ok(deck)
}

fn load_settings(directory: &Path) -> Fallible<StudySettings> {
    let path = directory.join(SETTINGS_FILE);
    if !path.exists() {
        return Ok(StudySettings::default());
    }
    let text = read_to_string(&path)?;
    StudySettings::from_toml_str(&text)
}
