//! Footstep sounds keyed by surface material.

use std::collections::HashMap;

use shooter_physics::MaterialId;

use crate::config::FootstepEntry;
use crate::services::{ResourceManager, SoundBuffer};

#[derive(Debug, Default)]
struct FootstepGroup {
    sounds: Vec<SoundBuffer>,
    next: usize,
}

/// Material to footstep sound lookup.
///
/// Each material cycles through its sounds so consecutive steps on the same
/// surface don't repeat.
#[derive(Debug, Default)]
pub struct FootstepSoundMap {
    groups: HashMap<MaterialId, FootstepGroup>,
}

impl FootstepSoundMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request every configured sound. Missing sounds are skipped, and a
    /// material with none left gets no entry.
    pub fn load(entries: &[FootstepEntry], resources: &mut dyn ResourceManager) -> Self {
        let mut map = Self::new();
        for entry in entries {
            let sounds: Vec<SoundBuffer> = entry
                .sounds
                .iter()
                .filter_map(|path| {
                    let buffer = resources.request_sound_buffer(path);
                    if buffer.is_none() {
                        log::warn!("footstep sound {} unavailable", path);
                    }
                    buffer
                })
                .collect();
            map.insert(MaterialId::from_name(&entry.material), sounds);
        }
        log::debug!("footstep map has {} materials", map.groups.len());
        map
    }

    pub fn insert(&mut self, material: MaterialId, sounds: Vec<SoundBuffer>) {
        if sounds.is_empty() {
            return;
        }
        self.groups.insert(material, FootstepGroup { sounds, next: 0 });
    }

    /// Next sound for `material`, if it has any.
    pub fn next_sound(&mut self, material: MaterialId) -> Option<&SoundBuffer> {
        let group = self.groups.get_mut(&material)?;
        let index = group.next % group.sounds.len();
        group.next = index + 1;
        group.sounds.get(index)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
