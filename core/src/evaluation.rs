use alloc::format;
use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Runs longer than this are labelled out of range instead of timed.
pub const ELAPSED_LABEL_CEILING_MS: f64 = 600_000.0;

pub const OUT_OF_RANGE_LABEL: &str = "out of range";

/// Result of one completed run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: f64,
    pub previous_best: Option<f64>,
    pub elapsed_ms: f64,
    /// Taps per cell, `1.0` means no misses.
    pub hit_rate: f64,
}

impl Evaluation {
    /// `MM:SS.CC`, the last field only has tenth-of-a-second resolution.
    pub fn elapsed_label(&self) -> String {
        format_elapsed(self.elapsed_ms)
    }
}

pub fn format_elapsed(elapsed_ms: f64) -> String {
    if elapsed_ms > ELAPSED_LABEL_CEILING_MS {
        return String::from(OUT_OF_RANGE_LABEL);
    }

    let ms = elapsed_ms.max(0.0) as u64;
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let centis = (ms % 1000) / 100 * 10;
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

/// Rounds half-way cases up. Only meaningful for non-negative input.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5) as u64 as f64
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageCategory {
    FirstAttempt,
    NewRecord,
    NoImprovement,
}

impl MessageCategory {
    pub fn decide(previous_best: Option<f64>, score: f64) -> Self {
        match previous_best {
            None => Self::FirstAttempt,
            Some(best) if score > best => Self::NewRecord,
            Some(_) => Self::NoImprovement,
        }
    }

    pub const fn should_persist(self) -> bool {
        matches!(self, Self::FirstAttempt | Self::NewRecord)
    }
}

/// Payload of the run-complete notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub elapsed_label: String,
    pub message_category: MessageCategory,
}

impl RunSummary {
    pub fn new(evaluation: Evaluation) -> Self {
        let message_category = MessageCategory::decide(evaluation.previous_best, evaluation.score);
        Self {
            elapsed_label: evaluation.elapsed_label(),
            evaluation,
            message_category,
        }
    }
}
