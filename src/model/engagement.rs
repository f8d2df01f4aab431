//! Engagement events reported to the backend for analytics and billing

use chrono::{DateTime, Utc};

use super::clip::ClipId;

/// Fraction of a clip that must have elapsed before leaving it counts as played
pub const PLAYED_THRESHOLD: f64 = 0.6;

/// A play/skip/tip record. Built synchronously at the moment of the
/// transition, so it carries the clip identity valid at that point.
#[derive(Clone, Debug, PartialEq)]
pub enum EngagementEvent {
    Played {
        clip_id: ClipId,
        occurred_at: DateTime<Utc>,
    },
    Skipped {
        clip_id: ClipId,
        at_seconds: f64,
        occurred_at: DateTime<Utc>,
    },
    Tipped {
        clip_id: ClipId,
        amount: f64,
        occurred_at: DateTime<Utc>,
    },
}

impl EngagementEvent {
    pub fn played(clip_id: ClipId) -> Self {
        Self::Played { clip_id, occurred_at: Utc::now() }
    }

    pub fn skipped(clip_id: ClipId, at_seconds: f64) -> Self {
        Self::Skipped { clip_id, at_seconds, occurred_at: Utc::now() }
    }

    pub fn tipped(clip_id: ClipId, amount: f64) -> Self {
        Self::Tipped { clip_id, amount, occurred_at: Utc::now() }
    }

    /// Classify a clip being left in the forward direction
    pub fn classify_departure(clip_id: ClipId, current_time: f64, duration: f64) -> Self {
        if duration > 0.0 && current_time / duration > PLAYED_THRESHOLD {
            Self::played(clip_id)
        } else {
            Self::skipped(clip_id, current_time)
        }
    }

    pub fn clip_id(&self) -> &ClipId {
        match self {
            Self::Played { clip_id, .. }
            | Self::Skipped { clip_id, .. }
            | Self::Tipped { clip_id, .. } => clip_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Played { .. } => "played",
            Self::Skipped { .. } => "skipped",
            Self::Tipped { .. } => "tipped",
        }
    }

    #[cfg(test)]
    pub fn is_played(&self) -> bool {
        matches!(self, Self::Played { .. })
    }

    pub fn skipped_at(&self) -> Option<f64> {
        match self {
            Self::Skipped { at_seconds, .. } => Some(*at_seconds),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn departure_past_sixty_percent_counts_as_played() {
        let event = EngagementEvent::classify_departure(ClipId::new("a"), 61.0, 100.0);
        assert!(event.is_played());
    }

    #[test]
    fn departure_at_exactly_sixty_percent_is_a_skip() {
        let event = EngagementEvent::classify_departure(ClipId::new("a"), 60.0, 100.0);
        assert_eq!(event.skipped_at(), Some(60.0));
    }

    #[test]
    fn unknown_duration_is_a_skip() {
        let event = EngagementEvent::classify_departure(ClipId::new("a"), 12.5, 0.0);
        assert_eq!(event.kind(), "skipped");
        assert_eq!(event.skipped_at(), Some(12.5));
    }
}
