use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// How long a freshly inserted row ramps from invisible to fully drawn.
pub const FADE_IN_DURATION: Duration = Duration::from_millis(500);

/// A single to-do item. Created on submit, never mutated, removed from the
/// list when the user marks it complete.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    inserted_at: Instant,
}

impl Task {
    /// `text` must already be trimmed and non-empty; the submit path owns
    /// that validation.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: Utc::now(),
            inserted_at: Instant::now(),
        }
    }

    /// Fade-in progress in `[0.0, 1.0]` at `now`.
    pub fn fade_alpha(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.inserted_at);
        if elapsed >= FADE_IN_DURATION {
            return 1.0;
        }
        elapsed.as_secs_f32() / FADE_IN_DURATION.as_secs_f32()
    }

    pub fn is_fading(&self, now: Instant) -> bool {
        self.fade_alpha(now) < 1.0
    }
}
