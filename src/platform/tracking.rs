//! Camera tracking signal
//!
//! The AR host reports its tracking state every frame. The adapter turns
//! that stream into quality changes only.

use std::fmt;

/// Why tracking is degraded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitedReason {
    Initializing,
    ExcessiveMotion,
    InsufficientFeatures,
    Relocalizing,
}

impl fmt::Display for LimitedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LimitedReason::Initializing => "initializing",
            LimitedReason::ExcessiveMotion => "excessive motion",
            LimitedReason::InsufficientFeatures => "insufficient features",
            LimitedReason::Relocalizing => "relocalizing",
        })
    }
}

/// Tracking state as reported by the host, once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTrackingState {
    NotAvailable,
    Limited(LimitedReason),
    Normal,
}

/// Tracking quality consumed by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingQuality {
    Normal,
    Limited(LimitedReason),
    NotAvailable,
}

impl From<RawTrackingState> for TrackingQuality {
    fn from(raw: RawTrackingState) -> Self {
        match raw {
            RawTrackingState::NotAvailable => TrackingQuality::NotAvailable,
            RawTrackingState::Limited(reason) => TrackingQuality::Limited(reason),
            RawTrackingState::Normal => TrackingQuality::Normal,
        }
    }
}

/// Emits a quality only when it differs from the last one emitted
#[derive(Debug, Default)]
pub struct TrackingAdapter {
    last: Option<TrackingQuality>,
}

impl TrackingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, raw: RawTrackingState) -> Option<TrackingQuality> {
        let quality = TrackingQuality::from(raw);
        if self.last == Some(quality) {
            return None;
        }
        self.last = Some(quality);
        Some(quality)
    }

    /// Forget the last quality so the next report is emitted
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_are_suppressed() {
        let mut adapter = TrackingAdapter::new();
        assert_eq!(
            adapter.observe(RawTrackingState::Normal),
            Some(TrackingQuality::Normal)
        );
        assert_eq!(adapter.observe(RawTrackingState::Normal), None);
        assert_eq!(
            adapter.observe(RawTrackingState::Limited(LimitedReason::ExcessiveMotion)),
            Some(TrackingQuality::Limited(LimitedReason::ExcessiveMotion))
        );
    }

    #[test]
    fn test_reason_change_is_a_new_quality() {
        let mut adapter = TrackingAdapter::new();
        adapter.observe(RawTrackingState::Limited(LimitedReason::Initializing));
        assert_eq!(
            adapter.observe(RawTrackingState::Limited(
                LimitedReason::InsufficientFeatures
            )),
            Some(TrackingQuality::Limited(LimitedReason::InsufficientFeatures))
        );
    }

    #[test]
    fn test_reset_reemits() {
        let mut adapter = TrackingAdapter::new();
        adapter.observe(RawTrackingState::Normal);
        adapter.reset();
        assert_eq!(
            adapter.observe(RawTrackingState::Normal),
            Some(TrackingQuality::Normal)
        );
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(LimitedReason::ExcessiveMotion.to_string(), "excessive motion");
    }
}
