use ahash::AHashMap;
use glam::Vec3A;
use log::debug;

use crate::{
    Pose, consts,
    error::{ConfigError, check_non_negative, check_positive},
};

/// Stable handle the renderer uses to pair spawn and expiry notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileId(pub u64);

/// A missile in flight. Its heading never changes after launch.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub pose: Pose,
    pub spawn_ms: f64,
}

impl Projectile {
    #[must_use]
    pub const fn new(pose: Pose, spawn_ms: f64) -> Self {
        Self { pose, spawn_ms }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileConfig {
    /// Distance travelled per tick
    pub speed: f32,
    /// Projectiles farther than this from the car are removed
    pub despawn_radius: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ProjectileConfig {
    pub const DEFAULT: Self = Self {
        speed: consts::missile::SPEED,
        despawn_radius: consts::missile::DESPAWN_RADIUS,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("projectile.speed", self.speed.into())?;
        check_positive("projectile.despawn_radius", self.despawn_radius.into())
    }
}

/// Owns every projectile in flight
#[derive(Clone, Debug, Default)]
pub struct ProjectileManager {
    config: ProjectileConfig,
    live: AHashMap<ProjectileId, Projectile>,
    next_id: u64,
}

impl ProjectileManager {
    #[must_use]
    pub fn new(config: ProjectileConfig) -> Self {
        Self {
            config,
            live: AHashMap::new(),
            next_id: 1,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    pub fn spawn(&mut self, projectile: Projectile) -> ProjectileId {
        let id = ProjectileId(self.next_id);
        self.next_id += 1;

        debug!("Spawned projectile {} at {}", id.0, projectile.pose.pos);
        self.live.insert(id, projectile);
        id
    }

    /// Moves every projectile one tick along its heading and removes those that
    /// drifted out of range of the car. Returns the removed handles in ascending order.
    pub fn update(&mut self, car_pos: Vec3A) -> Vec<ProjectileId> {
        let step = self.config.speed;
        let radius_sq = self.config.despawn_radius * self.config.despawn_radius;

        let mut expired = Vec::new();
        for (id, projectile) in &mut self.live {
            projectile.pose.pos += projectile.pose.get_forward_dir() * step;

            if projectile.pose.pos.distance_squared(car_pos) > radius_sq {
                expired.push(*id);
            }
        }

        expired.sort_unstable();
        for id in &expired {
            self.live.remove(id);
            debug!("Projectile {} expired", id.0);
        }

        expired
    }

    pub(crate) fn rebase(&mut self, delta_z: f32) {
        for projectile in self.live.values_mut() {
            projectile.pose.rebase(delta_z);
        }
    }

    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.live.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> {
        self.live.iter().map(|(id, projectile)| (*id, projectile))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops every projectile, returning their handles so the renderer can release them
    pub fn clear(&mut self) -> Vec<ProjectileId> {
        let mut ids: Vec<_> = self.live.drain().map(|(id, _)| id).collect();
        ids.sort_unstable();
        ids
    }
}
