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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use ratecards_core::error::Fallible;
use ratecards_core::stats::DeckStats;
use ratecards_core::stats::StatsRepository;
use ratecards_core::stats::StatsSummary;
use ratecards_core::stats::aggregate;
use ratecards_core::stats::per_deck;
use ratecards_core::types::date::Date;

use crate::collection::Collection;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    /// Human-readable text.
    Text,
    /// A JSON report.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

/// Print study statistics for the collection.
pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let records = collection.db.sessions()?;
    let summary = aggregate(&records, Date::today());
    let decks = per_deck(&records);
    match format {
        StatsFormat::Text => print_text(&summary, &decks),
        StatsFormat::Json => print_json(&summary, &decks)?,
    }
    Ok(())
}

fn print_text(summary: &StatsSummary, decks: &[DeckStats]) {
    println!("Sessions:       {}", summary.total_sessions);
    println!("Answers:        {}", summary.total_answers);
    println!("Correct:        {}", summary.total_correct);
    println!("Accuracy:       {}", fmt_accuracy(summary.accuracy));
    println!("Days studied:   {}", summary.days_studied);
    match summary.last_studied {
        Some(date) => println!("Last studied:   {date}"),
        None => println!("Last studied:   never"),
    }
    println!("Current streak: {} day(s)", summary.current_streak);
    println!("Longest streak: {} day(s)", summary.longest_streak);
    if !decks.is_empty() {
        println!();
        println!("Per deck:");
        for deck in decks {
            println!(
                "  {}: {} session(s), {} answer(s), {} accuracy",
                deck.deck_id,
                deck.sessions,
                deck.answers,
                fmt_accuracy(deck.accuracy)
            );
        }
    }
}

fn print_json(summary: &StatsSummary, decks: &[DeckStats]) -> Fallible<()> {
    #[derive(Serialize)]
    struct Report<'a> {
        summary: &'a StatsSummary,
        decks: &'a [DeckStats],
    }
    let report = Report { summary, decks };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn fmt_accuracy(accuracy: Option<f64>) -> String {
    match accuracy {
        Some(accuracy) => format!("{:.1}%", accuracy * 100.0),
        None => "n/a".to_string(),
    }
}
