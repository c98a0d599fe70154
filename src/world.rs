//! Scene mutator boundary
//!
//! The control core never touches geometry directly. It asks a [`World`] to
//! build and destroy nodes and gets opaque handles back. [`SceneGraph`] is an
//! in-memory entity table implementing it, used by the headless driver and
//! the tests.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};

use crate::consts::{GOAL_TAG, SPAWN_ANCHOR_NAME};
use crate::error::WorldError;
use crate::sim::{Hud, NodeHandle, ObstacleHandle, StageHandle};

/// Capabilities the game needs from the scene/physics host
pub trait World {
    /// Build a stage subtree at `position`, rotated `heading` radians about the vertical axis
    fn instantiate_stage_at(
        &mut self,
        position: Vec3,
        heading: f32,
    ) -> Result<StageHandle, WorldError>;

    /// Create an obstacle under the stage's spawn anchor, tagged for contact reports
    fn instantiate_obstacle_at(
        &mut self,
        stage: StageHandle,
        lateral_offset: f32,
        tag: &str,
    ) -> Result<ObstacleHandle, WorldError>;

    /// Remove a node and everything under it. Unknown handles are ignored.
    fn destroy(&mut self, node: NodeHandle);

    fn set_physics_simulation_running(&mut self, running: bool);

    /// Drop all detected planes and start detection again
    fn restart_plane_detection(&mut self);
}

/// Receives the HUD text whenever it is republished
pub trait HudSink {
    fn present(&mut self, hud: &Hud);
}

/// Records every published HUD
impl HudSink for Vec<Hud> {
    fn present(&mut self, hud: &Hud) {
        self.push(hud.clone());
    }
}

/// Discards HUD updates
impl HudSink for () {
    fn present(&mut self, _hud: &Hud) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Stage,
    Anchor,
    Obstacle,
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub parent: Option<NodeHandle>,
    /// Name, doubling as the physics tag
    pub tag: String,
    /// World-space position
    pub position: Vec3,
    pub heading: f32,
}

/// In-memory entity table
#[derive(Debug)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeHandle, SceneNode>,
    next_id: u32,
    with_spawn_anchor: bool,
    physics_running: bool,
    destroyed_obstacles: usize,
    detection_restarts: u32,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn anchor offset from the stage origin, in stage space
const SPAWN_ANCHOR_OFFSET: Vec3 = Vec3::new(0.0, 0.5, -4.0);
/// Goal offset from the stage origin, in stage space
const GOAL_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 1.0);

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            with_spawn_anchor: true,
            physics_running: false,
            destroyed_obstacles: 0,
            detection_restarts: 0,
        }
    }

    /// A scene whose stage asset lacks the spawn anchor
    pub fn without_spawn_anchor() -> Self {
        Self {
            with_spawn_anchor: false,
            ..Self::new()
        }
    }

    fn insert(&mut self, node: SceneNode) -> NodeHandle {
        let handle = NodeHandle::from_raw(self.next_id);
        self.next_id += 1;
        self.nodes.insert(handle, node);
        handle
    }

    fn children_of(&self, parent: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes
            .iter()
            .filter(move |(_, n)| n.parent == Some(parent))
            .map(|(h, _)| *h)
    }

    fn spawn_anchor_of(&self, stage: NodeHandle) -> Option<NodeHandle> {
        self.children_of(stage).find(|h| {
            self.nodes
                .get(h)
                .is_some_and(|n| n.kind == NodeKind::Anchor && n.tag == SPAWN_ANCHOR_NAME)
        })
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(&handle)
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    pub fn tag_of(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(&handle).map(|n| n.tag.as_str())
    }

    pub fn position_of(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes.get(&handle).map(|n| n.position)
    }

    fn count(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    pub fn stage_count(&self) -> usize {
        self.count(NodeKind::Stage)
    }

    pub fn obstacle_count(&self) -> usize {
        self.count(NodeKind::Obstacle)
    }

    /// Obstacles removed so far, individually or with their stage
    pub fn destroyed_obstacles(&self) -> usize {
        self.destroyed_obstacles
    }

    pub fn is_physics_running(&self) -> bool {
        self.physics_running
    }

    pub fn detection_restarts(&self) -> u32 {
        self.detection_restarts
    }
}

impl World for SceneGraph {
    fn instantiate_stage_at(
        &mut self,
        position: Vec3,
        heading: f32,
    ) -> Result<StageHandle, WorldError> {
        if !position.is_finite() || !heading.is_finite() {
            return Err(WorldError::StageAssetUnavailable);
        }
        let rotation = Quat::from_rotation_y(heading);
        let stage = self.insert(SceneNode {
            kind: NodeKind::Stage,
            parent: None,
            tag: "stage".to_string(),
            position,
            heading,
        });
        self.insert(SceneNode {
            kind: NodeKind::Anchor,
            parent: Some(stage),
            tag: GOAL_TAG.to_string(),
            position: position + rotation * GOAL_OFFSET,
            heading,
        });
        if self.with_spawn_anchor {
            self.insert(SceneNode {
                kind: NodeKind::Anchor,
                parent: Some(stage),
                tag: SPAWN_ANCHOR_NAME.to_string(),
                position: position + rotation * SPAWN_ANCHOR_OFFSET,
                heading,
            });
        }
        Ok(StageHandle::new(stage))
    }

    fn instantiate_obstacle_at(
        &mut self,
        stage: StageHandle,
        lateral_offset: f32,
        tag: &str,
    ) -> Result<ObstacleHandle, WorldError> {
        let stage_node = stage.node();
        if !self.contains(stage_node) {
            return Err(WorldError::UnknownNode { node: stage_node });
        }
        let anchor = self
            .spawn_anchor_of(stage_node)
            .ok_or(WorldError::MissingSpawnAnchor { stage: stage_node })?;
        let (origin, heading) = match self.nodes.get(&anchor) {
            Some(n) => (n.position, n.heading),
            None => return Err(WorldError::UnknownNode { node: anchor }),
        };
        let position = origin + Quat::from_rotation_y(heading) * Vec3::new(lateral_offset, 0.0, 0.0);
        let handle = self.insert(SceneNode {
            kind: NodeKind::Obstacle,
            parent: Some(anchor),
            tag: tag.to_string(),
            position,
            heading,
        });
        Ok(ObstacleHandle::new(handle))
    }

    fn destroy(&mut self, node: NodeHandle) {
        let mut pending = vec![node];
        while let Some(handle) = pending.pop() {
            pending.extend(self.children_of(handle));
            if let Some(removed) = self.nodes.remove(&handle) {
                if removed.kind == NodeKind::Obstacle {
                    self.destroyed_obstacles += 1;
                }
            }
        }
    }

    fn set_physics_simulation_running(&mut self, running: bool) {
        self.physics_running = running;
    }

    fn restart_plane_detection(&mut self) {
        self.detection_restarts += 1;
    }
}
