//! Tween scheduler
//!
//! Owns every running tween and advances them together once per frame.
//! There is no process-wide scheduler: the application creates one
//! [`AnimationScheduler`] at startup and hands [`SchedulerHandle`]s to the
//! code that needs to start tweens. Handles are weak, so a view holding one
//! never keeps the scheduler alive past shutdown.
//!
//! Execution is single-threaded and frame-driven. Callbacks run after the
//! scheduler has finished advancing, outside of any internal borrow, so a
//! callback may freely start or cancel other tweens through a handle.
//!
//! ```
//! use std::time::Duration;
//! use tally_animation::{AnimationScheduler, Easing, Tween, TweenEvent};
//!
//! let scheduler = AnimationScheduler::new();
//! let id = scheduler.add(Tween::new(Duration::from_millis(20), Easing::Linear));
//!
//! scheduler.tick(Duration::from_millis(10));
//! let events = scheduler.tick(Duration::from_millis(10));
//! assert!(events
//!     .iter()
//!     .any(|e| matches!(e, TweenEvent::Completed { id: done, .. } if *done == id)));
//! assert_eq!(scheduler.tween_count(), 0);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::clock::FrameClock;
use crate::tween::{Tween, TweenFrame, TweenStep};

new_key_type! {
    /// Handle to a registered tween
    pub struct TweenId;
}

/// Called with every progress update, including the final one
pub type UpdateCallback = Box<dyn FnMut(TweenFrame)>;

/// Called once, after the final update
pub type CompleteCallback = Box<dyn FnOnce()>;

/// What happened to a tween during one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenEvent {
    /// The start delay ran out; `at` is the exact scheduled start time
    Started { id: TweenId, at: Duration },
    /// Progress advanced
    Updated { id: TweenId, frame: TweenFrame },
    /// Progress reached 1; `at` is the exact scheduled end time
    Completed { id: TweenId, at: Duration },
}

impl TweenEvent {
    pub fn id(&self) -> TweenId {
        match *self {
            TweenEvent::Started { id, .. }
            | TweenEvent::Updated { id, .. }
            | TweenEvent::Completed { id, .. } => id,
        }
    }
}

struct TweenEntry {
    tween: Tween,
    /// Scheduler time when the tween was registered
    created_at: Duration,
    on_update: Option<UpdateCallback>,
    on_complete: Option<CompleteCallback>,
}

impl TweenEntry {
    fn start_at(&self) -> Duration {
        self.created_at + self.tween.delay()
    }

    fn end_at(&self) -> Duration {
        self.start_at() + self.tween.duration()
    }
}

/// Internal state of the scheduler
struct SchedulerInner {
    tweens: SlotMap<TweenId, TweenEntry>,
    now: Duration,
    shut_down: bool,
}

impl SchedulerInner {
    fn insert(
        &mut self,
        tween: Tween,
        on_update: Option<UpdateCallback>,
        on_complete: Option<CompleteCallback>,
    ) -> Option<TweenId> {
        if self.shut_down {
            tracing::warn!("tween registered after scheduler shutdown, ignoring");
            return None;
        }
        let created_at = self.now;
        Some(self.tweens.insert(TweenEntry {
            tween,
            created_at,
            on_update,
            on_complete,
        }))
    }
}

/// The scheduler that ticks all running tweens
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                tweens: SlotMap::with_key(),
                now: Duration::ZERO,
                shut_down: false,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Scheduler time: the sum of every delta ticked so far
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Register a tween without callbacks
    ///
    /// After [`shutdown`](Self::shutdown) the tween is dropped and a null id
    /// is returned, which every query treats as finished.
    pub fn add(&self, tween: Tween) -> TweenId {
        self.inner
            .borrow_mut()
            .insert(tween, None, None)
            .unwrap_or_default()
    }

    /// Register a tween with update and completion callbacks
    pub fn add_with(
        &self,
        tween: Tween,
        on_update: impl FnMut(TweenFrame) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) -> TweenId {
        self.inner
            .borrow_mut()
            .insert(tween, Some(Box::new(on_update)), Some(Box::new(on_complete)))
            .unwrap_or_default()
    }

    /// Cancel a tween; returns false if it was unknown, finished, or already cancelled
    pub fn cancel(&self, id: TweenId) -> bool {
        self.inner.borrow_mut().tweens.remove(id).is_some()
    }

    /// Whether the tween is still registered (delayed or running)
    pub fn contains(&self, id: TweenId) -> bool {
        self.inner.borrow().tweens.contains_key(id)
    }

    /// Linear progress of a registered tween
    pub fn progress(&self, id: TweenId) -> Option<f32> {
        self.inner.borrow().tweens.get(id).map(|e| e.tween.progress())
    }

    /// Number of registered tweens
    pub fn tween_count(&self) -> usize {
        self.inner.borrow().tweens.len()
    }

    /// Check if any tweens are still registered
    pub fn has_active(&self) -> bool {
        self.tween_count() > 0
    }

    /// Advance every tween by the clock's delta
    pub fn tick_with(&self, clock: &mut impl FrameClock) -> Vec<TweenEvent> {
        self.tick(clock.delta())
    }

    /// Advance every tween by `dt`
    ///
    /// Completed tweens are removed. Returns the events of this tick in
    /// registration order per tween: `Started`, `Updated`, `Completed`.
    pub fn tick(&self, dt: Duration) -> Vec<TweenEvent> {
        let mut events = Vec::new();
        let mut updates: Vec<(TweenId, TweenFrame, UpdateCallback)> = Vec::new();
        let mut completed: Vec<TweenId> = Vec::new();

        {
            let mut inner = self.inner.borrow_mut();
            if inner.shut_down {
                return events;
            }
            inner.now += dt;

            for (id, entry) in inner.tweens.iter_mut() {
                let (frame, done) = match entry.tween.advance(dt) {
                    TweenStep::Waiting | TweenStep::Idle => continue,
                    TweenStep::Update(frame) => (frame, false),
                    TweenStep::Complete(frame) => (frame, true),
                };

                if frame.just_started {
                    events.push(TweenEvent::Started {
                        id,
                        at: entry.start_at(),
                    });
                }
                events.push(TweenEvent::Updated { id, frame });
                if done {
                    events.push(TweenEvent::Completed {
                        id,
                        at: entry.end_at(),
                    });
                    completed.push(id);
                }
                if let Some(callback) = entry.on_update.take() {
                    updates.push((id, frame, callback));
                }
            }
        }

        // Callbacks run unborrowed; skip any tween cancelled by an earlier callback
        for (id, frame, mut callback) in updates {
            if !self.contains(id) {
                continue;
            }
            callback(frame);
            if let Some(entry) = self.inner.borrow_mut().tweens.get_mut(id) {
                entry.on_update = Some(callback);
            }
        }

        for id in completed {
            let entry = self.inner.borrow_mut().tweens.remove(id);
            if let Some(on_complete) = entry.and_then(|e| e.on_complete) {
                on_complete();
            }
        }

        if !events.is_empty() {
            tracing::trace!(events = events.len(), "scheduler tick");
        }
        events
    }

    /// Cancel everything and refuse new tweens
    pub fn shutdown(&self) {
        let mut inner = self.inner.borrow_mut();
        let dropped = inner.tweens.len();
        inner.tweens.clear();
        inner.shut_down = true;
        tracing::debug!(dropped, "animation scheduler shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.borrow().shut_down
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// Every operation is a silent no-op once the scheduler is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a tween and return its ID
    pub fn register(&self, tween: Tween) -> Option<TweenId> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow_mut().insert(tween, None, None))
    }

    /// Register a tween with callbacks
    pub fn register_with(
        &self,
        tween: Tween,
        on_update: impl FnMut(TweenFrame) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) -> Option<TweenId> {
        self.inner.upgrade().and_then(|inner| {
            inner.borrow_mut().insert(
                tween,
                Some(Box::new(on_update)),
                Some(Box::new(on_complete)),
            )
        })
    }

    /// Cancel a tween, idempotent
    pub fn cancel(&self, id: TweenId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().tweens.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Check if a tween is still registered
    pub fn is_active(&self, id: TweenId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().tweens.contains_key(id))
            .unwrap_or(false)
    }

    /// Linear progress of a registered tween
    pub fn progress(&self, id: TweenId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow().tweens.get(id).map(|e| e.tween.progress()))
    }

    /// Check if the scheduler is still alive and accepting tweens
    pub fn is_alive(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| !inner.borrow().shut_down)
            .unwrap_or(false)
    }
}
