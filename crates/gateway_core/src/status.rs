use std::time::Duration;

use crate::steps::{match_step, TOTAL_STEPS};

/// Pause between reaching the final step and showing the completion screen.
pub const FINALIZE_DELAY: Duration = Duration::from_millis(1500);

/// Outcome of feeding one push message to [`StatusProgress::apply_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// No step phrase in the message.
    Unmatched,
    /// The message names a step at or below the one already reached.
    Stale { step: u8, reached: u8 },
    Advanced { step: u8 },
    /// The final step was reached.
    Finished,
}

/// Progress for one mount of the status screen.
///
/// `reached` only ever grows; `current_step` is the step shown as in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusProgress {
    mount: u64,
    reached: u8,
    last_mark: Duration,
    durations: Vec<f64>,
    content_url: Option<String>,
}

impl StatusProgress {
    pub fn new(mount: u64) -> Self {
        Self {
            mount,
            ..Self::default()
        }
    }

    pub fn mount(&self) -> u64 {
        self.mount
    }

    pub fn reached(&self) -> u8 {
        self.reached
    }

    pub fn current_step(&self) -> u8 {
        (self.reached + 1).min(TOTAL_STEPS)
    }

    pub fn percent(&self) -> u8 {
        (u32::from(self.reached) * 100 / u32::from(TOTAL_STEPS)) as u8
    }

    pub fn is_finished(&self) -> bool {
        self.reached >= TOTAL_STEPS
    }

    /// Seconds spent per step, index 0 is step 1. Steps skipped over record 0.
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn content_url(&self) -> Option<&str> {
        self.content_url.as_deref()
    }

    /// A fresh connection restarts its clock at zero.
    pub fn connection_restarted(&mut self) {
        self.last_mark = Duration::ZERO;
    }

    pub fn apply_message(&mut self, text: &str, since_open: Duration) -> Advance {
        let Some(step) = match_step(text) else {
            return Advance::Unmatched;
        };
        if step.id <= self.reached {
            return Advance::Stale {
                step: step.id,
                reached: self.reached,
            };
        }

        let elapsed = since_open.saturating_sub(self.last_mark).as_secs_f64();
        for _ in (self.reached + 1)..step.id {
            self.durations.push(0.0);
        }
        self.durations.push((elapsed * 100.0).round() / 100.0);
        self.last_mark = since_open;
        self.reached = step.id;

        if self.is_finished() {
            self.content_url = extract_content_url(text);
            Advance::Finished
        } else {
            Advance::Advanced { step: step.id }
        }
    }
}

/// First absolute http(s) URL in a free-text message.
pub fn extract_content_url(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|token| {
            token.trim_matches(|c: char| {
                matches!(
                    c,
                    '"' | '\'' | '(' | ')' | '<' | '>' | '[' | ']' | '{' | '}' | ',' | ';' | '.'
                )
            })
        })
        .filter_map(|token| url::Url::parse(token).ok())
        .find(|url| matches!(url.scheme(), "http" | "https"))
        .map(String::from)
}
