//! Typed events and the single-consumer queue that carries them
//!
//! AR callbacks, physics contacts and input can arrive on any thread. They
//! only ever push into the queue; the session drains it on its own thread,
//! one event at a time, in delivery order.

use std::sync::mpsc::{self, Receiver, Sender};

use super::anchors::PlaneEvent;
use super::tracking::RawTrackingState;

/// Everything a collaborator can report to the game
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Per-frame camera tracking state
    Tracking(RawTrackingState),
    /// The AR session failed; carries the host's error description
    SessionFailed(String),
    SessionInterrupted,
    SessionResumed,
    /// Camera yaw in radians, used to orient a new stage
    CameraHeading(f32),
    Plane(PlaneEvent),
    /// Two physics bodies touched (tags in either order)
    Contact { a: String, b: String },
    UserStart,
    ResetRequested,
}

/// Owning end of the event queue. Not `Sync`: exactly one consumer.
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// A producer handle that can be cloned and moved to other threads
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Next pending event, without blocking
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Producer handle for an [`EventQueue`]
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// Queue an event. Returns false if the queue is gone.
    pub fn send(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn contact(&self, a: &str, b: &str) -> bool {
        self.send(Event::Contact {
            a: a.to_string(),
            b: b.to_string(),
        })
    }
}
