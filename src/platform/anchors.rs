//! Plane anchor feed
//!
//! Tracks the planes the AR host has detected and yields stage placement
//! candidates. Whether a candidate is used is up to the state machine.

use std::collections::BTreeMap;

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u64);

/// A detected horizontal plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneAnchor {
    pub id: AnchorId,
    /// Plane center in world space
    pub center: Vec3,
}

impl PlaneAnchor {
    /// Plane at floor height (y = 0)
    pub fn new(id: u64, center_x: f32, center_z: f32) -> Self {
        Self {
            id: AnchorId(id),
            center: Vec3::new(center_x, 0.0, center_z),
        }
    }

    pub fn with_elevation(mut self, y: f32) -> Self {
        self.center.y = y;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneEvent {
    Added(PlaneAnchor),
    Updated(PlaneAnchor),
    Removed(AnchorId),
}

/// Known plane anchors since the last detection restart
#[derive(Debug, Default)]
pub struct AnchorFeed {
    known: BTreeMap<AnchorId, PlaneAnchor>,
}

impl AnchorFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a detection event, returning the placement candidate it produces
    pub fn observe(&mut self, event: PlaneEvent) -> Option<PlaneAnchor> {
        match event {
            PlaneEvent::Added(anchor) | PlaneEvent::Updated(anchor) => {
                self.known.insert(anchor.id, anchor);
                Some(anchor)
            }
            PlaneEvent::Removed(id) => {
                if self.known.remove(&id).is_none() {
                    log::debug!("removal of unknown plane anchor {}", id.0);
                }
                None
            }
        }
    }

    pub fn get(&self, id: AnchorId) -> Option<&PlaneAnchor> {
        self.known.get(&id)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Start over from an empty anchor set
    pub fn reset(&mut self) {
        self.known.clear();
    }
}
