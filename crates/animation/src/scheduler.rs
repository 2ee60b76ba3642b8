//! Frame driver
//!
//! The scheduler keeps one [`FrameAnimation`] per target and advances every
//! entry once per display frame. It requests a frame when work arrives while
//! idle and re-arms itself after a tick only while entries remain.
//!
//! Entries are snapshotted at the start of a tick. Registrations made by a
//! render callback are merged after the tick; cancellations take effect at
//! once. When a tick overruns its budget the overrun is accumulated as
//! fractional frames, and later ticks advance by the whole frames owed.

use crate::clock::{FrameClock, FrameRequester};
use crate::easing::Easing;
use crate::error::AnimationResult;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::mem;
use std::rc::Rc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Frame budget in milliseconds
pub const FRAME_DURATION_MS: f64 = 17.0;

/// Milliseconds per animation step
pub const STEP_DURATION_MS: f64 = 16.66;

/// Identifies the owner of a frame entry, usually a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(Uuid);

impl TargetId {
    /// Create a new random TargetId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TargetId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Progress handed to render and progress callbacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameProgress {
    pub target: TargetId,
    pub current_step: f64,
    pub total_steps: f64,
    /// Linear fraction in `[0, 1]`
    pub progress: f64,
    /// `progress` through the animation's easing
    pub eased: f64,
}

impl FrameProgress {
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.total_steps
    }
}

pub type RenderFn = Box<dyn FnMut(&FrameProgress) -> AnimationResult<()>>;
pub type ProgressFn = Box<dyn FnMut(&FrameProgress)>;

/// A stepped animation batch for one target
pub struct FrameAnimation {
    current_step: f64,
    total_steps: f64,
    easing: Easing,
    render: RenderFn,
    on_progress: Option<ProgressFn>,
    on_complete: Option<ProgressFn>,
}

impl std::fmt::Debug for FrameAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameAnimation")
            .field("current_step", &self.current_step)
            .field("total_steps", &self.total_steps)
            .field("easing", &self.easing)
            .finish_non_exhaustive()
    }
}

impl FrameAnimation {
    /// Animation lasting `duration_ms`; a non-positive duration is one step
    pub fn new<F>(duration_ms: f64, easing: Easing, render: F) -> Self
    where
        F: FnMut(&FrameProgress) -> AnimationResult<()> + 'static,
    {
        let total_steps = if duration_ms > 0.0 && duration_ms.is_finite() {
            duration_ms / STEP_DURATION_MS
        } else {
            1.0
        };
        Self::with_steps(total_steps, easing, render)
    }

    pub fn with_steps<F>(total_steps: f64, easing: Easing, render: F) -> Self
    where
        F: FnMut(&FrameProgress) -> AnimationResult<()> + 'static,
    {
        Self {
            current_step: 0.0,
            total_steps: if total_steps > 0.0 { total_steps } else { 1.0 },
            easing,
            render: Box::new(render),
            on_progress: None,
            on_complete: None,
        }
    }

    pub fn with_on_progress(mut self, callback: impl FnMut(&FrameProgress) + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    pub fn with_on_complete(mut self, callback: impl FnMut(&FrameProgress) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn current_step(&self) -> f64 {
        self.current_step
    }

    pub fn total_steps(&self) -> f64 {
        self.total_steps
    }

    /// Advance by `steps`, render, and report whether the batch is done
    fn step(&mut self, target: TargetId, steps: f64) -> AnimationResult<bool> {
        self.current_step = (self.current_step + steps).min(self.total_steps);
        let progress = self.current_step / self.total_steps;
        let frame = FrameProgress {
            target,
            current_step: self.current_step,
            total_steps: self.total_steps,
            progress,
            eased: self.easing.apply(progress),
        };

        (self.render)(&frame)?;
        if let Some(callback) = self.on_progress.as_mut() {
            callback(&frame);
        }
        if frame.is_complete() {
            if let Some(callback) = self.on_complete.as_mut() {
                callback(&frame);
            }
            return Ok(true);
        }
        Ok(false)
    }
}

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Entries rendered this tick
    pub rendered: usize,
    /// Extra steps every entry advanced by
    pub frames_dropped: u32,
    pub completed: Vec<TargetId>,
    pub failed: Vec<TargetId>,
    /// Entries skipped because they were cancelled earlier in the tick
    pub skipped: Vec<TargetId>,
    pub elapsed_ms: f64,
}

struct FrameEntry {
    target: TargetId,
    animation: FrameAnimation,
}

enum Deferred {
    Add(FrameEntry),
    Cancel(TargetId),
}

#[derive(Default)]
struct TickScratch {
    alive: BTreeSet<TargetId>,
    cancelled: BTreeSet<TargetId>,
    deferred: Vec<Deferred>,
}

#[derive(Default)]
struct SchedulerState {
    entries: Vec<FrameEntry>,
    drop_frames: f64,
    frame_pending: bool,
    tick: Option<TickScratch>,
}

impl SchedulerState {
    fn insert(&mut self, entry: FrameEntry) {
        match self.entries.iter_mut().find(|e| e.target == entry.target) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    fn remove(&mut self, target: TargetId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.target != target);
        self.entries.len() != before
    }
}

/// Handle to a frame scheduler. Clones drive the same entry list.
#[derive(Clone)]
pub struct AnimationScheduler {
    state: Rc<RefCell<SchedulerState>>,
    requester: Rc<dyn FrameRequester>,
    clock: Rc<dyn FrameClock>,
    frame_duration_ms: f64,
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("entries", &self.len())
            .field("drop_frames", &self.drop_frames())
            .field("frame_duration_ms", &self.frame_duration_ms)
            .finish()
    }
}

impl AnimationScheduler {
    pub fn new(requester: Rc<dyn FrameRequester>, clock: Rc<dyn FrameClock>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SchedulerState::default())),
            requester,
            clock,
            frame_duration_ms: FRAME_DURATION_MS,
        }
    }

    pub fn with_frame_duration(mut self, ms: f64) -> Self {
        self.frame_duration_ms = ms;
        self
    }

    pub fn frame_duration_ms(&self) -> f64 {
        self.frame_duration_ms
    }

    /// Register `animation` for `target`, replacing any existing entry
    pub fn add_animation(&self, target: TargetId, animation: FrameAnimation) {
        let entry = FrameEntry { target, animation };
        let request = {
            let mut state = self.state.borrow_mut();
            if let Some(scratch) = state.tick.as_mut() {
                scratch.alive.insert(target);
                scratch.deferred.push(Deferred::Add(entry));
                return;
            }
            let was_empty = state.entries.is_empty();
            state.insert(entry);
            let request = was_empty && !state.frame_pending;
            if request {
                state.frame_pending = true;
            }
            request
        };
        if request {
            trace!(%target, "requesting first frame");
            self.requester.request_frame();
        }
    }

    /// Remove the entry for `target`. Returns false if there was none.
    pub fn cancel_animation(&self, target: TargetId) -> bool {
        let mut state = self.state.borrow_mut();
        if let Some(scratch) = state.tick.as_mut() {
            scratch.cancelled.insert(target);
            scratch.deferred.push(Deferred::Cancel(target));
            return scratch.alive.remove(&target);
        }
        state.remove(target)
    }

    pub fn is_animating(&self, target: TargetId) -> bool {
        let state = self.state.borrow();
        match &state.tick {
            Some(scratch) => scratch.alive.contains(&target),
            None => state.entries.iter().any(|e| e.target == target),
        }
    }

    pub fn len(&self) -> usize {
        let state = self.state.borrow();
        match &state.tick {
            Some(scratch) => scratch.alive.len(),
            None => state.entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn drop_frames(&self) -> f64 {
        self.state.borrow().drop_frames
    }

    /// A frame has been requested and not yet ticked
    pub fn frame_pending(&self) -> bool {
        self.state.borrow().frame_pending
    }

    /// Cancel every entry and forget accumulated frame debt
    pub fn clear(&self) {
        let targets: Vec<TargetId> = {
            let state = self.state.borrow();
            match &state.tick {
                Some(scratch) => scratch.alive.iter().copied().collect(),
                None => state.entries.iter().map(|e| e.target).collect(),
            }
        };
        for target in targets {
            self.cancel_animation(target);
        }
        self.state.borrow_mut().drop_frames = 0.0;
    }

    /// Run one display frame
    pub fn tick(&self) -> TickReport {
        let started = self.clock.now_ms();
        let (entries, frames_to_drop) = {
            let mut state = self.state.borrow_mut();
            state.frame_pending = false;
            let frames_to_drop = if state.drop_frames > 1.0 {
                let whole = state.drop_frames.floor();
                state.drop_frames -= whole;
                whole
            } else {
                0.0
            };
            let entries = mem::take(&mut state.entries);
            state.tick = Some(TickScratch {
                alive: entries.iter().map(|e| e.target).collect(),
                ..TickScratch::default()
            });
            (entries, frames_to_drop)
        };

        let mut report = TickReport {
            frames_dropped: frames_to_drop as u32,
            ..TickReport::default()
        };
        let mut survivors = Vec::with_capacity(entries.len());
        for mut entry in entries {
            if self.cancelled_this_tick(entry.target) {
                report.skipped.push(entry.target);
                continue;
            }
            report.rendered += 1;
            match entry.animation.step(entry.target, 1.0 + frames_to_drop) {
                Ok(false) => survivors.push(entry),
                Ok(true) => {
                    self.retire(entry.target);
                    report.completed.push(entry.target);
                }
                Err(err) => {
                    warn!(target = %entry.target, %err, "dropping frame entry after failed render");
                    self.retire(entry.target);
                    report.failed.push(entry.target);
                }
            }
        }

        report.elapsed_ms = self.clock.now_ms() - started;
        let request = {
            let mut state = self.state.borrow_mut();
            let scratch = state.tick.take().unwrap_or_default();
            survivors.retain(|e| !scratch.cancelled.contains(&e.target));
            state.entries = survivors;
            for op in scratch.deferred {
                match op {
                    Deferred::Add(entry) => state.insert(entry),
                    Deferred::Cancel(target) => {
                        state.remove(target);
                    }
                }
            }

            if report.elapsed_ms > self.frame_duration_ms {
                let overrun = (report.elapsed_ms - self.frame_duration_ms) / self.frame_duration_ms;
                state.drop_frames += overrun;
                debug!(elapsed_ms = report.elapsed_ms, drop_frames = state.drop_frames, "frame overran its budget");
            }

            let request = !state.entries.is_empty() && !state.frame_pending;
            if request {
                state.frame_pending = true;
            }
            request
        };
        if request {
            self.requester.request_frame();
        }
        report
    }

    fn cancelled_this_tick(&self, target: TargetId) -> bool {
        self.state
            .borrow()
            .tick
            .as_ref()
            .is_some_and(|scratch| scratch.cancelled.contains(&target))
    }

    fn retire(&self, target: TargetId) {
        if let Some(scratch) = self.state.borrow_mut().tick.as_mut() {
            scratch.alive.remove(&target);
        }
    }
}
