//! Reveal engine
//!
//! One engine instance drives every reveal and particle backdrop on the
//! page. It is created at startup, shared with views as weak
//! [`EngineHandle`]s, and torn down with [`RevealEngine::shutdown`].
//!
//! Each [`tick`](RevealEngine::tick) runs in a fixed order:
//!
//! 1. Particle nodes orphaned by unmounted views leave the render tree
//! 2. Running tweens advance; property values and counter text are written
//! 3. Armed observers are polled; entered targets get their start state and
//!    their tweens, which begin advancing on the next tick
//! 4. Live particles advance and expire, then spawners emit new ones
//!
//! Everything is single-threaded. Registrations, ticks and unmounts must
//! not overlap, which holds naturally in a frame loop.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tally_animation::{AnimationScheduler, CounterState, FrameClock, Tween, TweenEvent, TweenId};
use tracing::{debug, info, trace, warn};

use crate::error::{Result, RevealError};
use crate::events::RevealEvent;
use crate::layout::{ElementId, LayoutProvider};
use crate::particles::{ParticleConfig, ParticleId, ParticleInstance, ParticleSpawner};
use crate::presentation::Presentation;
use crate::scope::{RevealGroup, SpawnerHandle, ViewScope};
use crate::stagger::StaggerConfig;
use crate::target::{RevealPhase, RevealTarget};
use crate::viewport::{Observation, ObservationPoll, ViewportObserver};

new_key_type! {
    /// A mounted view
    pub struct ViewId;
    /// A registered reveal target
    pub struct TargetKey;
    /// A running particle spawner
    pub struct SpawnerId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TweenRole {
    Visual,
    Counter,
}

struct TargetState {
    target: RevealTarget,
    /// Delay from this target's position in its group
    stagger_delay: Duration,
    phase: RevealPhase,
    observation: Option<Observation>,
    visual: Option<TweenId>,
    counter_tween: Option<TweenId>,
    counter: Option<CounterState>,
}

impl TargetState {
    fn start_delay(&self) -> Duration {
        self.stagger_delay + self.target.animation.delay()
    }

    fn tweens(&self) -> impl Iterator<Item = TweenId> {
        self.visual.into_iter().chain(self.counter_tween)
    }
}

struct ViewState {
    name: String,
    targets: IndexMap<ElementId, TargetKey>,
    spawners: SmallVec<[SpawnerId; 2]>,
}

struct SpawnerState {
    view: ViewId,
    container: ElementId,
    spawner: ParticleSpawner,
}

struct LiveParticle {
    view: ViewId,
    instance: ParticleInstance,
}

pub(crate) struct EngineInner {
    scheduler: AnimationScheduler,
    views: SlotMap<ViewId, ViewState>,
    targets: SlotMap<TargetKey, TargetState>,
    tween_owners: FxHashMap<TweenId, (TargetKey, TweenRole)>,
    spawners: SlotMap<SpawnerId, SpawnerState>,
    particles: SlotMap<ParticleId, LiveParticle>,
    /// Particles of unmounted views, removed from the render tree next tick
    orphaned: Vec<ParticleId>,
    rng: StdRng,
    frames: u64,
    shut_down: bool,
}

impl EngineInner {
    fn new(rng: StdRng) -> Self {
        Self {
            scheduler: AnimationScheduler::new(),
            views: SlotMap::with_key(),
            targets: SlotMap::with_key(),
            tween_owners: FxHashMap::default(),
            spawners: SlotMap::with_key(),
            particles: SlotMap::with_key(),
            orphaned: Vec::new(),
            rng,
            frames: 0,
            shut_down: false,
        }
    }

    pub(crate) fn mount(&mut self, name: &str) -> Result<ViewId> {
        if self.shut_down {
            return Err(RevealError::EngineShutDown);
        }
        let view = self.views.insert(ViewState {
            name: name.to_string(),
            targets: IndexMap::new(),
            spawners: SmallVec::new(),
        });
        debug!(view = name, "view mounted");
        Ok(view)
    }

    pub(crate) fn register(
        &mut self,
        view: ViewId,
        layout: &dyn LayoutProvider,
        targets: Vec<RevealTarget>,
        stagger: StaggerConfig,
    ) -> Result<RevealGroup> {
        if self.shut_down {
            return Err(RevealError::EngineShutDown);
        }
        let view_state = self
            .views
            .get_mut(view)
            .ok_or(RevealError::EngineShutDown)?;

        let total = targets.len();
        let mut keys = SmallVec::with_capacity(total);
        for (index, target) in targets.into_iter().enumerate() {
            if let Some(&existing) = view_state.targets.get(&target.element) {
                trace!(element = %target.element, "already registered in this view");
                keys.push(Some(existing));
                continue;
            }

            let Some(observation) =
                ViewportObserver::observe(layout, &target.element, target.threshold)
            else {
                keys.push(None);
                continue;
            };

            let counter = target
                .counter
                .as_ref()
                .map(|spec| CounterState::new(spec.target).with_suffix(spec.suffix.clone()));
            let element = target.element.clone();
            let key = self.targets.insert(TargetState {
                target,
                stagger_delay: stagger.delay_for_index(index),
                phase: RevealPhase::Armed,
                observation: Some(observation),
                visual: None,
                counter_tween: None,
                counter,
            });
            view_state.targets.insert(element, key);
            keys.push(Some(key));
        }

        trace!(
            view = %view_state.name,
            requested = total,
            registered = keys.iter().flatten().count(),
            "registered reveal group"
        );
        Ok(RevealGroup::new(keys))
    }

    pub(crate) fn start_particles(
        &mut self,
        view: ViewId,
        container: ElementId,
        config: ParticleConfig,
    ) -> Result<SpawnerId> {
        if self.shut_down {
            return Err(RevealError::EngineShutDown);
        }
        let rng = StdRng::seed_from_u64(self.rng.gen());
        let spawner = ParticleSpawner::new(config, rng)?;
        let view_state = self
            .views
            .get_mut(view)
            .ok_or(RevealError::EngineShutDown)?;

        let id = self.spawners.insert(SpawnerState {
            view,
            container: container.clone(),
            spawner,
        });
        view_state.spawners.push(id);
        debug!(view = %view_state.name, container = %container, "particle spawner started");
        Ok(id)
    }

    /// Stop a spawner; its particles keep animating until they expire
    pub(crate) fn stop_particles(&mut self, id: SpawnerId) -> bool {
        match self.spawners.remove(id) {
            Some(mut state) => {
                state.spawner.stop();
                debug!(
                    container = %state.container,
                    emitted = state.spawner.total_emitted(),
                    "particle spawner stopped"
                );
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_spawner_running(&self, id: SpawnerId) -> bool {
        self.spawners.contains_key(id)
    }

    /// Cancel everything the view registered
    pub(crate) fn unmount(&mut self, view: ViewId) -> bool {
        let Some(view_state) = self.views.remove(view) else {
            return false;
        };

        let mut cancelled = 0usize;
        for key in view_state.targets.values() {
            if let Some(state) = self.targets.remove(*key) {
                for id in state.tweens() {
                    if self.scheduler.cancel(id) {
                        cancelled += 1;
                    }
                    self.tween_owners.remove(&id);
                }
            }
        }

        for id in &view_state.spawners {
            self.spawners.remove(*id);
        }

        let doomed: Vec<ParticleId> = self
            .particles
            .iter()
            .filter(|(_, live)| live.view == view)
            .map(|(id, _)| id)
            .collect();
        for id in &doomed {
            self.particles.remove(*id);
        }
        self.orphaned.extend_from_slice(&doomed);

        info!(
            view = %view_state.name,
            targets = view_state.targets.len(),
            tweens_cancelled = cancelled,
            particles = doomed.len(),
            "view unmounted"
        );
        true
    }

    fn tick(
        &mut self,
        dt: Duration,
        layout: &dyn LayoutProvider,
        sink: &mut dyn Presentation,
    ) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        for id in self.orphaned.drain(..) {
            sink.remove_particle(id);
        }
        if self.shut_down {
            return events;
        }
        self.frames += 1;

        self.advance_tweens(dt, sink, &mut events);
        self.poll_observers(layout, sink, &mut events);
        self.advance_particles(dt, sink, &mut events);

        if !events.is_empty() {
            trace!(frame = self.frames, events = events.len(), "engine tick");
        }
        events
    }

    fn advance_tweens(
        &mut self,
        dt: Duration,
        sink: &mut dyn Presentation,
        events: &mut Vec<RevealEvent>,
    ) {
        for event in self.scheduler.tick(dt) {
            let Some(&(key, role)) = self.tween_owners.get(&event.id()) else {
                continue;
            };
            let Some(state) = self.targets.get_mut(key) else {
                continue;
            };
            let element = &state.target.element;

            match event {
                TweenEvent::Started { at, .. } => {
                    if state.phase.advance_to(RevealPhase::Animating) {
                        debug!(element = %element, at = ?at, "reveal started");
                        events.push(RevealEvent::Started {
                            element: element.clone(),
                            at,
                        });
                    }
                }
                TweenEvent::Updated { frame, .. } => {
                    // The final frame is written exactly on completion
                    if frame.progress >= 1.0 {
                        continue;
                    }
                    match role {
                        TweenRole::Visual => {
                            for (property, value) in state.target.animation.sample(frame.eased) {
                                sink.set_property(element, property, value);
                            }
                        }
                        TweenRole::Counter => {
                            if let Some(counter) = state.counter.as_mut() {
                                counter.apply_frame(frame.progress, frame.eased);
                                sink.set_text(element, &counter.text());
                            }
                        }
                    }
                }
                TweenEvent::Completed { id, at } => {
                    self.tween_owners.remove(&id);
                    match role {
                        TweenRole::Visual => {
                            for (property, value) in state.target.animation.end_values() {
                                sink.set_property(element, property, value);
                            }
                            state.visual = None;
                        }
                        TweenRole::Counter => {
                            if let Some(counter) = state.counter.as_mut() {
                                counter.finish();
                                sink.set_text(element, &counter.text());
                            }
                            state.counter_tween = None;
                        }
                    }

                    if state.visual.is_none()
                        && state.counter_tween.is_none()
                        && state.phase.advance_to(RevealPhase::Settled)
                    {
                        debug!(element = %element, at = ?at, "reveal settled");
                        events.push(RevealEvent::Settled {
                            element: element.clone(),
                            at,
                        });
                    }
                }
            }
        }
    }

    fn poll_observers(
        &mut self,
        layout: &dyn LayoutProvider,
        sink: &mut dyn Presentation,
        events: &mut Vec<RevealEvent>,
    ) {
        let now = self.scheduler.now();
        for (key, state) in self.targets.iter_mut() {
            if state.phase != RevealPhase::Armed {
                continue;
            }
            let Some(observation) = state.observation.as_mut() else {
                continue;
            };
            if observation.poll(layout) != ObservationPoll::Entered {
                continue;
            }
            state.observation = None;
            state.phase.advance_to(RevealPhase::Triggered);

            let element = &state.target.element;
            for (property, value) in state.target.animation.start_values() {
                sink.set_property(element, property, value);
            }
            if let Some(counter) = &state.counter {
                sink.set_text(element, &counter.text());
            }

            let delay = state.start_delay();
            let animation = &state.target.animation;
            let visual = self
                .scheduler
                .add(Tween::new(animation.duration(), animation.easing()).with_delay(delay));
            self.tween_owners.insert(visual, (key, TweenRole::Visual));
            state.visual = Some(visual);

            if let Some(spec) = &state.target.counter {
                let id = self
                    .scheduler
                    .add(Tween::new(spec.duration, spec.easing).with_delay(delay));
                self.tween_owners.insert(id, (key, TweenRole::Counter));
                state.counter_tween = Some(id);
            }

            debug!(element = %element, delay = ?delay, "reveal triggered");
            events.push(RevealEvent::Triggered {
                element: element.clone(),
                at: now,
            });
        }
    }

    fn advance_particles(
        &mut self,
        dt: Duration,
        sink: &mut dyn Presentation,
        events: &mut Vec<RevealEvent>,
    ) {
        let mut expired: SmallVec<[ParticleId; 8]> = SmallVec::new();
        for (id, live) in self.particles.iter_mut() {
            live.instance.advance(dt);
            sink.update_particle(id, &live.instance.frame());
            if live.instance.is_dead() {
                expired.push(id);
            }
        }
        for id in expired {
            self.particles.remove(id);
            sink.remove_particle(id);
            events.push(RevealEvent::ParticleExpired { particle: id });
        }

        for state in self.spawners.values_mut() {
            for instance in state.spawner.advance(dt) {
                let id = self.particles.insert(LiveParticle {
                    view: state.view,
                    instance: instance.clone(),
                });
                sink.insert_particle(&state.container, id, &instance);
                events.push(RevealEvent::ParticleSpawned {
                    container: state.container.clone(),
                    particle: id,
                });
            }
        }
    }

    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        let views: Vec<ViewId> = self.views.keys().collect();
        for view in views {
            self.unmount(view);
        }
        self.scheduler.shutdown();
        self.shut_down = true;
        info!(frames = self.frames, "reveal engine shut down");
    }
}

/// The engine that drives every reveal on the page
pub struct RevealEngine {
    inner: Rc<RefCell<EngineInner>>,
}

impl RevealEngine {
    /// Engine with entropy-seeded particle randomness
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Engine whose particle randomness is fully determined by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EngineInner::new(rng))),
        }
    }

    /// Get a handle to this engine for passing to views
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Mount a view; everything it registers is released when the scope drops
    pub fn mount(&self, name: &str) -> Result<ViewScope> {
        self.handle().mount(name)
    }

    /// Advance the engine by `dt`, writing mutations to `sink`
    pub fn tick(
        &self,
        dt: Duration,
        layout: &impl LayoutProvider,
        sink: &mut impl Presentation,
    ) -> Vec<RevealEvent> {
        self.inner.borrow_mut().tick(dt, layout, sink)
    }

    /// Advance the engine by the clock's delta
    pub fn tick_with(
        &self,
        clock: &mut impl FrameClock,
        layout: &impl LayoutProvider,
        sink: &mut impl Presentation,
    ) -> Vec<RevealEvent> {
        self.tick(clock.delta(), layout, sink)
    }

    /// Engine time: the sum of every delta ticked so far
    pub fn now(&self) -> Duration {
        self.inner.borrow().scheduler.now()
    }

    pub fn frames(&self) -> u64 {
        self.inner.borrow().frames
    }

    pub fn phase(&self, key: TargetKey) -> Option<RevealPhase> {
        self.inner.borrow().targets.get(key).map(|state| state.phase)
    }

    /// Whether the target has played its reveal through to the end
    pub fn is_fired(&self, key: TargetKey) -> bool {
        self.phase(key).is_some_and(|phase| phase.is_settled())
    }

    pub fn counter(&self, key: TargetKey) -> Option<CounterState> {
        self.inner
            .borrow()
            .targets
            .get(key)
            .and_then(|state| state.counter.clone())
    }

    pub fn element(&self, key: TargetKey) -> Option<ElementId> {
        self.inner
            .borrow()
            .targets
            .get(key)
            .map(|state| state.target.element.clone())
    }

    pub fn target_count(&self) -> usize {
        self.inner.borrow().targets.len()
    }

    pub fn settled_count(&self) -> usize {
        self.inner
            .borrow()
            .targets
            .values()
            .filter(|state| state.phase.is_settled())
            .count()
    }

    /// Tweens in flight across all views
    pub fn active_tweens(&self) -> usize {
        self.inner.borrow().scheduler.tween_count()
    }

    pub fn view_count(&self) -> usize {
        self.inner.borrow().views.len()
    }

    pub fn live_particles(&self) -> usize {
        self.inner.borrow().particles.len()
    }

    pub fn running_spawners(&self) -> usize {
        self.inner.borrow().spawners.len()
    }

    /// Unmount every view and refuse new work
    pub fn shutdown(&self) {
        self.inner.borrow_mut().shutdown();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.borrow().shut_down
    }
}

impl Default for RevealEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the reveal engine
///
/// Views hold these instead of the engine. Once the engine is dropped or shut
/// down, mounting fails with [`RevealError::EngineShutDown`] and teardown is a
/// no-op.
#[derive(Clone)]
pub struct EngineHandle {
    inner: Weak<RefCell<EngineInner>>,
}

impl EngineHandle {
    pub fn mount(&self, name: &str) -> Result<ViewScope> {
        let view = self.with_inner(|inner| inner.mount(name))??;
        Ok(ViewScope::new(self.clone(), view, name))
    }

    /// Check if the engine is still alive and accepting work
    pub fn is_alive(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| !inner.borrow().shut_down)
            .unwrap_or(false)
    }

    pub(crate) fn with_inner<R>(&self, f: impl FnOnce(&mut EngineInner) -> R) -> Result<R> {
        let inner = self.inner.upgrade().ok_or(RevealError::EngineShutDown)?;
        let mut inner = inner.borrow_mut();
        Ok(f(&mut inner))
    }

    /// Unmount without panicking if the engine is busy or gone
    pub(crate) fn release(&self, view: ViewId) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        match inner.try_borrow_mut() {
            Ok(mut inner) => {
                inner.unmount(view);
            }
            Err(_) => warn!("view dropped while the engine was ticking, teardown skipped"),
        };
    }

    pub(crate) fn spawner(&self, id: SpawnerId) -> SpawnerHandle {
        SpawnerHandle::new(self.clone(), id)
    }
}
