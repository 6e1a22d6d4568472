//! View scopes
//!
//! A [`ViewScope`] is the owner of everything one mounted view registers:
//! reveal targets, their observers and tweens, particle spawners and the
//! particles they emitted. Dropping the scope releases all of it.

use smallvec::SmallVec;

use crate::engine::{EngineHandle, SpawnerId, TargetKey, ViewId};
use crate::error::Result;
use crate::layout::{ElementId, LayoutProvider};
use crate::particles::ParticleConfig;
use crate::stagger::StaggerConfig;
use crate::target::RevealTarget;

/// Ordered sibling targets registered together
///
/// Indexed by sibling position. A slot is empty when its element wasn't in
/// the layout at registration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealGroup {
    keys: SmallVec<[Option<TargetKey>; 8]>,
}

impl RevealGroup {
    pub(crate) fn new(keys: SmallVec<[Option<TargetKey>; 8]>) -> Self {
        Self { keys }
    }

    pub fn get(&self, index: usize) -> Option<TargetKey> {
        self.keys.get(index).copied().flatten()
    }

    /// Number of sibling slots, empty ones included
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of targets actually registered
    pub fn registered(&self) -> usize {
        self.keys.iter().flatten().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = TargetKey> + '_ {
        self.keys.iter().flatten().copied()
    }
}

/// Registrations owned by one mounted view
pub struct ViewScope {
    engine: EngineHandle,
    view: ViewId,
    name: String,
}

impl ViewScope {
    pub(crate) fn new(engine: EngineHandle, view: ViewId, name: &str) -> Self {
        Self {
            engine,
            view,
            name: name.to_string(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.view
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register staggered siblings
    ///
    /// Sibling `i` starts `stagger.delay_for_index(i)` after its element
    /// enters. Elements missing from `layout` are skipped with a warning.
    /// An element already registered in this view keeps its existing target
    /// and is never restarted.
    pub fn register(
        &self,
        layout: &impl LayoutProvider,
        targets: impl IntoIterator<Item = RevealTarget>,
        stagger: StaggerConfig,
    ) -> Result<RevealGroup> {
        let targets: Vec<RevealTarget> = targets.into_iter().collect();
        self.engine
            .with_inner(|inner| inner.register(self.view, layout, targets, stagger))?
    }

    /// Register a single target
    pub fn register_one(
        &self,
        layout: &impl LayoutProvider,
        target: RevealTarget,
    ) -> Result<Option<TargetKey>> {
        let group = self.register(layout, [target], StaggerConfig::none())?;
        Ok(group.get(0))
    }

    /// Start a particle backdrop inside `container`
    pub fn start_particles(
        &self,
        container: impl Into<ElementId>,
        config: ParticleConfig,
    ) -> Result<SpawnerHandle> {
        let container = container.into();
        let id = self
            .engine
            .with_inner(|inner| inner.start_particles(self.view, container, config))??;
        Ok(self.engine.spawner(id))
    }

    /// Tear the view down now instead of at drop
    pub fn unmount(self) {}
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.engine.release(self.view);
    }
}

/// Controls one running particle spawner
#[derive(Clone)]
pub struct SpawnerHandle {
    engine: EngineHandle,
    id: SpawnerId,
}

impl SpawnerHandle {
    pub(crate) fn new(engine: EngineHandle, id: SpawnerId) -> Self {
        Self { engine, id }
    }

    pub fn id(&self) -> SpawnerId {
        self.id
    }

    /// Stop spawning; returns false if already stopped
    ///
    /// Particles already on screen finish their fade and remove themselves.
    pub fn stop(&self) -> bool {
        self.engine
            .with_inner(|inner| inner.stop_particles(self.id))
            .unwrap_or(false)
    }

    pub fn is_running(&self) -> bool {
        self.engine
            .with_inner(|inner| inner.is_spawner_running(self.id))
            .unwrap_or(false)
    }
}
