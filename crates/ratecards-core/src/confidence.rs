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

//! Confidence scores and answer verdicts.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// The lowest confidence score a card can have.
pub const CONFIDENCE_MIN: u8 = 0;

/// The highest confidence score a card can have.
pub const CONFIDENCE_MAX: u8 = 5;

/// How well the user knows a card, on a scale from 0 to 5.
///
/// The scale saturates at both ends: raising a 5 keeps it at 5, and lowering
/// a 0 keeps it at 0. New cards start at 0.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub fn new(value: u8) -> Fallible<Self> {
        Self::try_from(value)
    }

    /// One step up the scale, saturating at the top.
    pub fn raise(self) -> Self {
        Confidence(u8::min(self.0 + 1, CONFIDENCE_MAX))
    }

    /// One step down the scale, saturating at the bottom.
    pub fn lower(self) -> Self {
        Confidence(self.0.saturating_sub(1))
    }

    pub fn is_mastered(self) -> bool {
        self.0 == CONFIDENCE_MAX
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Confidence {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > CONFIDENCE_MAX {
            fail(format!(
                "confidence {value} is out of range ({CONFIDENCE_MIN}-{CONFIDENCE_MAX})."
            ))
        } else {
            Ok(Confidence(value))
        }
    }
}

impl From<Confidence> for u8 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

/// The outcome of answering a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }

    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Correct => "correct",
            Verdict::Incorrect => "incorrect",
        }
    }
}

impl TryFrom<String> for Verdict {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "correct" => Ok(Verdict::Correct),
            "incorrect" => Ok(Verdict::Incorrect),
            _ => fail(format!("invalid verdict: {value}")),
        }
    }
}

/// Apply an answer outcome to a confidence score.
pub fn adjust_confidence(confidence: Confidence, verdict: Verdict) -> Confidence {
    match verdict {
        Verdict::Correct => confidence.raise(),
        Verdict::Incorrect => confidence.lower(),
    }
}
