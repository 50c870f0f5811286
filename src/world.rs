//! Pose World
//!
//! Owns every playing scene instance together with its mixer and evaluates
//! them once per frame.
//!
//! Instances share their assets read-only and own all of their mutable state,
//! so they are independent of each other. With the `parallel` feature they are
//! evaluated on the rayon thread pool; each instance's own pass stays
//! sequential because children depend on their parents.

use std::sync::Arc;

use log::trace;
use slotmap::{SlotMap, new_key_type};

use crate::animation::mixer::AnimationMixer;
use crate::assets::SceneAsset;
use crate::errors::Result;
use crate::scene::instance::SceneInstance;
use crate::settings::WorldSettings;

new_key_type! {
    pub struct InstanceKey;
}

/// A scene instance and the mixer driving it.
#[derive(Debug)]
pub struct AnimatedInstance {
    pub instance: SceneInstance,
    pub mixer: AnimationMixer,
}

impl AnimatedInstance {
    pub fn new(asset: Arc<SceneAsset>) -> Result<Self> {
        Ok(Self {
            instance: SceneInstance::new(asset)?,
            mixer: AnimationMixer::new(),
        })
    }

    /// Advances animations by `dt`, then recomputes world and joint matrices.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        self.mixer.update(dt, &mut self.instance)?;
        self.instance.evaluate()
    }
}

#[derive(Debug, Default)]
pub struct PoseWorld {
    instances: SlotMap<InstanceKey, AnimatedInstance>,
    settings: WorldSettings,
}

impl PoseWorld {
    #[must_use]
    pub fn new(settings: WorldSettings) -> Self {
        Self {
            instances: SlotMap::with_key(),
            settings,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Spawns a rest-pose instance of `asset`.
    pub fn spawn(&mut self, asset: Arc<SceneAsset>) -> Result<InstanceKey> {
        let instance = AnimatedInstance::new(asset)?;
        Ok(self.instances.insert(instance))
    }

    pub fn despawn(&mut self, key: InstanceKey) -> Option<AnimatedInstance> {
        self.instances.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: InstanceKey) -> Option<&AnimatedInstance> {
        self.instances.get(key)
    }

    pub fn get_mut(&mut self, key: InstanceKey) -> Option<&mut AnimatedInstance> {
        self.instances.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstanceKey, &AnimatedInstance)> {
        self.instances.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Updates every instance by `dt` seconds.
    ///
    /// Every instance is updated even if one fails; the first error is
    /// returned.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        trace!("Updating {} instances (dt {dt:.4}s)", self.instances.len());

        #[cfg(feature = "parallel")]
        if self.instances.len() >= self.settings.parallel_threshold {
            use rayon::prelude::*;

            let mut instances: Vec<&mut AnimatedInstance> = self.instances.values_mut().collect();
            let results: Vec<Result<()>> = instances.par_iter_mut().map(|i| i.update(dt)).collect();
            return results.into_iter().collect();
        }

        let mut first_error = None;
        for instance in self.instances.values_mut() {
            if let Err(err) = instance.update(dt) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
