//! Platform abstraction layer
//!
//! Turns what the AR host reports into the typed events the game consumes:
//! - Camera tracking quality
//! - Plane anchors
//! - A single-consumer event queue shared by every collaborator

pub mod anchors;
pub mod events;
pub mod tracking;

pub use anchors::{AnchorFeed, AnchorId, PlaneAnchor, PlaneEvent};
pub use events::{Event, EventQueue, EventSender};
pub use tracking::{LimitedReason, RawTrackingState, TrackingAdapter, TrackingQuality};
