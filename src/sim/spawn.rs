//! Timed tasks and obstacle spawning
//!
//! Every task carries the run number it was scheduled under. The session
//! compares it with the current run when the task fires, so a task that
//! outlives its round does nothing instead of being cancelled up front.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::phase::{ObstacleHandle, StageHandle};
use crate::consts::OBSTACLE_TAG_PREFIX;
use crate::error::WorldError;
use crate::settings::Settings;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Clear the start banner, then schedule the first spawn
    ClearBanner,
    /// Spawn one obstacle and reschedule
    SpawnTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    /// Run the task was issued under
    pub run: u64,
}

#[derive(Debug)]
struct Entry {
    due: f64,
    seq: u64,
    task: ScheduledTask,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap, we want earliest due first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Session clock plus pending tasks, earliest first (ties in scheduling order)
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: f64,
    seq: u64,
    heap: BinaryHeap<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `task` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f64, task: ScheduledTask) {
        let due = self.now + delay.max(0.0);
        self.heap.push(Entry {
            due,
            seq: self.seq,
            task,
        });
        self.seq += 1;
    }

    /// Pop the next task due at or before `until`, moving the clock to its due time
    pub fn pop_due(&mut self, until: f64) -> Option<ScheduledTask> {
        if self.heap.peek()?.due > until {
            return None;
        }
        let entry = self.heap.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Move the clock forward (never backward)
    pub fn set_now(&mut self, time: f64) {
        self.now = self.now.max(time);
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// A live obstacle and the tag the physics engine reports for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obstacle {
    pub tag: String,
    pub handle: ObstacleHandle,
}

/// Creates obstacles at random lateral offsets and tracks the live ones
#[derive(Debug)]
pub struct SpawnScheduler {
    rng: Pcg32,
    lateral_range: f32,
    interval: f64,
    next_tag: u32,
    /// Live obstacles, in spawn order
    roster: Vec<Obstacle>,
}

impl SpawnScheduler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            lateral_range: settings.lateral_range,
            interval: settings.spawn_interval_secs,
            next_tag: 1,
            roster: Vec::new(),
        }
    }

    /// Seconds between spawn ticks
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Uniform lateral offset in [-range, range]
    pub fn sample_offset(&mut self) -> f32 {
        if self.lateral_range <= 0.0 {
            return 0.0;
        }
        self.rng
            .random_range(-self.lateral_range..=self.lateral_range)
    }

    fn allocate_tag(&mut self) -> String {
        let tag = format!("{OBSTACLE_TAG_PREFIX}{}", self.next_tag);
        self.next_tag += 1;
        tag
    }

    /// Create one obstacle under the stage's spawn anchor
    pub fn spawn_one<W: World>(
        &mut self,
        world: &mut W,
        stage: StageHandle,
    ) -> Result<ObstacleHandle, WorldError> {
        let offset = self.sample_offset();
        let tag = self.allocate_tag();
        let handle = world.instantiate_obstacle_at(stage, offset, &tag)?;
        log::debug!("spawned {} at lateral offset {:.2}", tag, offset);
        self.roster.push(Obstacle { tag, handle });
        Ok(handle)
    }

    /// Remove a live obstacle by tag
    pub fn take(&mut self, tag: &str) -> Option<ObstacleHandle> {
        let idx = self.roster.iter().position(|o| o.tag == tag)?;
        Some(self.roster.remove(idx).handle)
    }

    /// Forget every live obstacle, returning them for destruction
    pub fn drain(&mut self) -> Vec<ObstacleHandle> {
        self.roster.drain(..).map(|o| o.handle).collect()
    }

    pub fn live(&self) -> &[Obstacle] {
        &self.roster
    }

    pub fn live_count(&self) -> usize {
        self.roster.len()
    }
}
