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

use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use ratecards_core::markdown::markdown_to_html;
use ratecards_core::session::CardFace;
use ratecards_core::session::SessionPhase;
use ratecards_core::session::StudySession;
use ratecards_core::types::card::Flashcard;
use ratecards_core::types::settings::StudySettings;
use ratecards_core::types::timestamp::Timestamp;

pub fn page_template(settings: &StudySettings, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "ratecards" }
                link rel="stylesheet" href="/style.css";
            }
            body data-sound=(settings.sound_effects.to_string()) {
                (body)
                script src="/script.js" {};
            }
        }
    }
}

/// Render the page for wherever the session currently is.
pub fn render_page(
    settings: &StudySettings,
    session: &StudySession,
    saved: bool,
    now: Timestamp,
) -> Markup {
    let body = match session.phase() {
        SessionPhase::Loading => render_loading(),
        SessionPhase::InProgress => render_card(settings, session, now),
        SessionPhase::Complete => render_completion(session, saved),
    };
    page_template(settings, body)
}

fn render_loading() -> Markup {
    html! {
        main.session {
            p { "Loading session..." }
        }
    }
}

fn render_card(settings: &StudySettings, session: &StudySession, now: Timestamp) -> Markup {
    let (answered, total) = session.position();
    html! {
        main.session {
            header.progress {
                span { "Card " (answered + 1) " of " (total) }
                span.elapsed { (format_elapsed(session.elapsed_seconds(now))) }
            }
            @if let Some(card) = session.current_card() {
                (render_face(settings, card, session.face()))
            }
            (render_controls(session.face()))
        }
    }
}

fn render_face(settings: &StudySettings, card: &Flashcard, face: CardFace) -> Markup {
    html! {
        div.card {
            div.card-front {
                (PreEscaped(markdown_to_html(&card.front)))
            }
            @if face == CardFace::Answer {
                div.card-back {
                    (PreEscaped(markdown_to_html(&card.back)))
                }
                @if settings.show_explanations {
                    @if let Some(explanation) = &card.explanation {
                        div.card-explanation {
                            (PreEscaped(markdown_to_html(explanation)))
                        }
                    }
                }
            }
        }
    }
}

fn render_controls(face: CardFace) -> Markup {
    html! {
        form.controls method="post" action="/" {
            @match face {
                CardFace::Question => {
                    button type="submit" name="action" value="Reveal" { "Reveal" }
                }
                CardFace::Answer => {
                    button.incorrect type="submit" name="action" value="Incorrect" { "Missed it" }
                    button.correct type="submit" name="action" value="Correct" { "Got it" }
                }
            }
            button.end type="submit" name="action" value="End" { "End session" }
        }
    }
}

fn render_completion(session: &StudySession, saved: bool) -> Markup {
    let tallies = session.tallies();
    let answered = tallies.correct + tallies.incorrect;
    let accuracy = if answered > 0 {
        format!("{:.0}%", f64::from(tallies.correct) / f64::from(answered) * 100.0)
    } else {
        "n/a".to_string()
    };
    html! {
        main.completion {
            h1 { "Session Completed" }
            p { "Deck: " (session.deck().name) }
            ul.tally {
                li { "Correct: " (tallies.correct) }
                li { "Incorrect: " (tallies.incorrect) }
                li { "Accuracy: " (accuracy) }
                @if let Some(duration) = session.duration_seconds() {
                    li { "Time: " (format_elapsed(duration)) }
                }
            }
            @if !saved {
                p.warning { "Results could not be saved." }
            }
            form.controls method="post" action="/" {
                button type="submit" name="action" value="Shutdown" { "Close session" }
            }
        }
    }
}

fn format_elapsed(seconds: i64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use ratecards_core::confidence::Verdict;
    use ratecards_core::rng::TinyRng;
    use ratecards_core::sequencer::StudySequencer;
    use ratecards_core::types::deck::FlashcardDeck;

    use super::*;

    fn session() -> StudySession {
        let deck: FlashcardDeck = serde_json::from_str(
            r#"{
                "id": "d1",
                "user_id": "u1",
                "name": "Knots",
                "cards": [
                    {
                        "id": "c1",
                        "front": "What knot?",
                        "back": "A *bowline*.",
                        "explanation": "Forms a fixed loop."
                    }
                ]
            }"#,
        )
        .unwrap();
        let settings = StudySettings::default();
        StudySession::new(StudySequencer::new(deck, settings))
    }

    fn ts(text: &str) -> Timestamp {
        Timestamp::try_from(text.to_string()).unwrap()
    }

    #[test]
    fn test_question_face_hides_the_answer() {
        let mut session = session();
        let mut rng = TinyRng::from_seed(0);
        session.start(&mut rng, ts("2026-04-01T20:00:00.000"));
        let settings = StudySettings::default();
        let html = render_page(&settings, &session, false, ts("2026-04-01T20:00:05.000"))
            .into_string();
        assert!(html.contains("Card 1 of 1"));
        assert!(html.contains("What knot?"));
        assert!(html.contains("value=\"Reveal\""));
        assert!(!html.contains("bowline"));
    }

    #[test]
    fn test_answer_face_shows_markdown_and_explanation() {
        let mut session = session();
        let mut rng = TinyRng::from_seed(0);
        session.start(&mut rng, ts("2026-04-01T20:00:00.000"));
        session.flip();
        let settings = StudySettings::default();
        let html = render_page(&settings, &session, false, ts("2026-04-01T20:00:05.000"))
            .into_string();
        assert!(html.contains("<em>bowline</em>"));
        assert!(html.contains("Forms a fixed loop."));
        assert!(html.contains("value=\"Correct\""));
        assert!(html.contains("value=\"Incorrect\""));
    }

    #[test]
    fn test_explanations_can_be_disabled() {
        let mut session = session();
        let mut rng = TinyRng::from_seed(0);
        session.start(&mut rng, ts("2026-04-01T20:00:00.000"));
        session.flip();
        let settings = StudySettings {
            show_explanations: false,
            ..StudySettings::default()
        };
        let html = render_page(&settings, &session, false, ts("2026-04-01T20:00:05.000"))
            .into_string();
        assert!(html.contains("<em>bowline</em>"));
        assert!(!html.contains("Forms a fixed loop."));
    }

    #[test]
    fn test_completion_page() {
        let mut session = session();
        let mut rng = TinyRng::from_seed(0);
        session.start(&mut rng, ts("2026-04-01T20:00:00.000"));
        session.answer(Verdict::Correct, ts("2026-04-01T20:01:30.000"));
        let settings = StudySettings::default();
        let html = render_page(&settings, &session, true, ts("2026-04-01T20:01:30.000"))
            .into_string();
        assert!(html.contains("Session Completed"));
        assert!(html.contains("Deck: Knots"));
        assert!(html.contains("Correct: 1"));
        assert!(html.contains("Accuracy: 100%"));
        assert!(html.contains("Time: 1:30"));
        assert!(!html.contains("Results could not be saved."));
    }

    #[test]
    fn test_completion_page_warns_when_unsaved() {
        let mut session = session();
        let mut rng = TinyRng::from_seed(0);
        session.start(&mut rng, ts("2026-04-01T20:00:00.000"));
        session.end(ts("2026-04-01T20:00:10.000"));
        let settings = StudySettings::default();
        let html = render_page(&settings, &session, false, ts("2026-04-01T20:00:10.000"))
            .into_string();
        assert!(html.contains("Accuracy: n/a"));
        assert!(html.contains("Results could not be saved."));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(65), "1:05");
        assert_eq!(format_elapsed(600), "10:00");
    }
}
