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

use std::time::Duration;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;

use ratecards_core::confidence::Verdict;
use ratecards_core::session::SessionPhase;
use ratecards_core::types::timestamp::Timestamp;

use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::render_page;
use crate::utils::retry_with_backoff;

const FLUSH_ATTEMPTS: u32 = 3;
const FLUSH_BASE_DELAY: Duration = Duration::from_millis(50);

#[derive(Deserialize)]
pub struct ActionForm {
    action: String,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<ActionForm>,
) -> (StatusCode, Html<String>) {
    let now = Timestamp::now();
    {
        let mut mutable = state.mutable.lock().unwrap();
        match form.action.as_str() {
            "Reveal" => mutable.session.flip(),
            "Correct" => mutable.session.answer(Verdict::Correct, now),
            "Incorrect" => mutable.session.answer(Verdict::Incorrect, now),
            "End" => mutable.session.end(now),
            "Shutdown" => {
                if let Some(tx) = state.shutdown_tx.lock().unwrap().take() {
                    let _ = tx.send(());
                }
            }
            // Unknown actions fall through to a re-render of the current page.
            _ => {}
        }
    }
    flush_if_complete(&state).await;
    let mutable = state.mutable.lock().unwrap();
    let markup = render_page(&state.settings, &mutable.session, mutable.flushed, now);
    (StatusCode::OK, Html(markup.into_string()))
}

/// Persist the session once it completes. The lock is never held across an
/// await, so the flush takes the summary and deck out first, then retries the
/// write with short lock windows.
async fn flush_if_complete(state: &ServerState) {
    let (summary, deck) = {
        let mut mutable = state.mutable.lock().unwrap();
        if mutable.session.phase() != SessionPhase::Complete || mutable.flushed {
            return;
        }
        let summary = match mutable.session.take_summary() {
            Some(summary) => summary,
            None => return,
        };
        (summary, mutable.session.deck().clone())
    };
    let mutable_arc = state.mutable.clone();
    let result = retry_with_backoff(FLUSH_ATTEMPTS, FLUSH_BASE_DELAY, || {
        let mut mutable = mutable_arc.lock().unwrap();
        mutable.db.flush_session(&summary, &deck)
    })
    .await;
    match result {
        Ok(_) => {
            state.mutable.lock().unwrap().flushed = true;
            log::info!("Session results saved for deck '{}'", deck.name);
        }
        Err(e) => {
            log::error!("Failed to save session results: {e}");
        }
    }
}
