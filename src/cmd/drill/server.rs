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

use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use ratecards_core::error::ErrorReport;
use ratecards_core::error::Fallible;
use ratecards_core::error::fail;
use ratecards_core::rng::TinyRng;
use ratecards_core::sequencer::StudySequencer;
use ratecards_core::session::SessionPhase;
use ratecards_core::session::StudySession;
use ratecards_core::types::deck::FlashcardDeck;
use ratecards_core::types::settings::StudyMode;
use ratecards_core::types::settings::StudySettings;
use ratecards_core::types::timestamp::Timestamp;
use ratecards_core::validator::available_card_count;
use ratecards_core::validator::deck_supports_mode;
use ratecards_core::validator::mode_requirements;

use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::collection::Collection;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct ServerConfig {
    pub directory: Option<String>,
    pub host: String,
    pub port: u16,
    pub session_started_at: Timestamp,
    pub deck_filter: Option<String>,
    pub cards_per_session: Option<usize>,
    pub mode: Option<StudyMode>,
    pub no_shuffle: bool,
    pub seed: Option<u64>,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let Collection {
        decks,
        settings,
        db,
        ..
    } = Collection::new(config.directory)?;

    let settings = apply_overrides(
        settings,
        config.cards_per_session,
        config.mode,
        config.no_shuffle,
    )?;

    let mut deck = pick_deck(decks, config.deck_filter.as_deref())?;
    db.overlay_progress(&mut deck)?;

    if deck.cards.is_empty() {
        println!("No cards to study.");
        return Ok(());
    }

    if !deck_supports_mode(&deck.cards, settings.study_mode) {
        let requirements = mode_requirements(settings.study_mode);
        return fail(format!(
            "deck '{}' has {} card(s); {} mode needs {}.",
            deck.name,
            available_card_count(&deck.cards, &settings),
            settings.study_mode,
            requirements.description
        ));
    }

    let seed = config.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64
    });
    let mut rng = TinyRng::from_seed(seed);
    let sequencer = StudySequencer::new(deck, settings);
    let mut session = StudySession::new(sequencer);
    session.start(&mut rng, config.session_started_at);

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        settings,
        mutable: Arc::new(Mutex::new(MutableState {
            session,
            db,
            flushed: false,
        })),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C or shutdown button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    // Check if session was complete when server shut down
    let mutable = state.mutable.lock().unwrap();
    if mutable.session.phase() == SessionPhase::Complete {
        Ok(())
    } else {
        fail("Session interrupted before completion")
    }
}

/// Fold the command line overrides into the settings file's values.
fn apply_overrides(
    settings: StudySettings,
    cards_per_session: Option<usize>,
    mode: Option<StudyMode>,
    no_shuffle: bool,
) -> Fallible<StudySettings> {
    let mut settings = settings;
    if let Some(cards_per_session) = cards_per_session {
        settings.cards_per_session = cards_per_session;
    }
    if let Some(mode) = mode {
        settings.study_mode = mode;
    }
    if no_shuffle {
        settings.shuffle_cards = false;
    }
    settings.validate()?;
    Ok(settings)
}

/// Choose the deck to study. Without a filter the collection must hold
/// exactly one deck.
fn pick_deck(decks: Vec<FlashcardDeck>, filter: Option<&str>) -> Fallible<FlashcardDeck> {
    match filter {
        Some(name) => decks
            .into_iter()
            .find(|deck| deck.name == name || deck.id == name)
            .ok_or_else(|| ErrorReport::new(format!("no deck named '{name}' in the collection."))),
        None => {
            let mut decks = decks;
            match decks.len() {
                0 => fail("no deck files found in the collection."),
                1 => Ok(decks.remove(0)),
                _ => fail("multiple decks found; pass --deck to choose one."),
            }
        }
    }
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("script.js");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/javascript"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
