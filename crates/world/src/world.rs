use std::collections::BTreeMap;

use cadence_common::{EntityId, FrameError, GameTime, WorldLayer};
use cadence_core::{GraphicsDevice, RenderInstance};
use glam::Vec3;

/// A simulated world: owns its state, knows how to draw itself.
///
/// Drawing is split into geometry layers (below and above the entity plane)
/// and the entities themselves, so render passes can exclude categories
/// independently.
pub trait World: Send {
    fn name(&self) -> &str;

    fn update(&mut self, time: GameTime) -> Result<(), FrameError>;

    fn draw_layer(
        &mut self,
        layer: WorldLayer,
        device: &mut dyn GraphicsDevice,
    ) -> Result<(), FrameError>;

    fn draw_entities(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), FrameError>;
}

/// One drifting entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftEntity {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: [f32; 4],
}

/// Sample world: entities drift inside a bounded box and wrap at the edges.
///
/// Uses BTreeMap for deterministic iteration order; entity layout derives
/// from the seed alone, so two worlds built with the same seed evolve
/// identically.
pub struct DriftWorld {
    name: String,
    entities: BTreeMap<EntityId, DriftEntity>,
    bounds: f32,
}

impl DriftWorld {
    /// Builds `count` entities deterministically from `seed`.
    pub fn with_seed(name: impl Into<String>, seed: u64, count: usize) -> Self {
        let mut state = seed;
        let mut next = || {
            state = splitmix64(state);
            state
        };
        // Map the high 23 bits to [-1, 1).
        let unit = |state: u64| (state >> 41) as f32 / (1u64 << 23) as f32 * 2.0 - 1.0;

        let bounds = 12.0;
        let mut entities = BTreeMap::new();
        for index in 0..count {
            let position = Vec3::new(
                unit(next()) * bounds,
                unit(next()).abs() * 3.0 + 0.5,
                unit(next()) * bounds,
            );
            let velocity = Vec3::new(unit(next()), 0.0, unit(next())) * 2.0;
            let tint = unit(next()) * 0.5 + 0.5;
            let color = [0.3 + tint * 0.6, 0.5, 0.9 - tint * 0.5, 1.0];
            // Seed-derived ids keep BTreeMap iteration order reproducible.
            let id = EntityId::from_bits(index as u64, next());
            entities.insert(id, DriftEntity { position, velocity, color });
        }

        Self {
            name: name.into(),
            entities,
            bounds,
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &BTreeMap<EntityId, DriftEntity> {
        &self.entities
    }
}

impl World for DriftWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, time: GameTime) -> Result<(), FrameError> {
        let dt = time.delta_secs();
        for entity in self.entities.values_mut() {
            entity.position += entity.velocity * dt;
            // Wrap at the box edges so entities never escape.
            for axis in [0, 2] {
                if entity.position[axis] > self.bounds {
                    entity.position[axis] = -self.bounds;
                } else if entity.position[axis] < -self.bounds {
                    entity.position[axis] = self.bounds;
                }
            }
        }
        Ok(())
    }

    fn draw_layer(
        &mut self,
        layer: WorldLayer,
        device: &mut dyn GraphicsDevice,
    ) -> Result<(), FrameError> {
        match layer {
            WorldLayer::Below => {
                // Floor: one row of flat slabs spanning the bounds.
                let slabs: Vec<RenderInstance> = (-3..=3)
                    .map(|i| RenderInstance {
                        position: Vec3::new(i as f32 * self.bounds / 3.0, -0.5, 0.0),
                        scale: self.bounds / 3.0,
                        color: [0.15, 0.17, 0.2, 1.0],
                    })
                    .collect();
                device.draw_instances(&slabs);
            }
            WorldLayer::Above => {}
        }
        Ok(())
    }

    fn draw_entities(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), FrameError> {
        let instances: Vec<RenderInstance> = self
            .entities
            .values()
            .map(|e| RenderInstance {
                position: e.position,
                scale: 0.5,
                color: e.color,
            })
            .collect();
        device.draw_instances(&instances);
        Ok(())
    }
}

/// Splitmix64 step function; deterministic across platforms.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_common::FrameTime;
    use cadence_core::{DeviceOp, RecordingDevice};
    use std::time::Duration;

    fn time(delta_ms: u64, total_ms: u64) -> GameTime {
        let mut t = GameTime::default();
        t.stamp(FrameTime::from_millis(delta_ms, total_ms));
        t
    }

    #[test]
    fn same_seed_same_layout() {
        let a = DriftWorld::with_seed("a", 7, 8);
        let b = DriftWorld::with_seed("b", 7, 8);
        let pos_a: Vec<Vec3> = a.entities().values().map(|e| e.position).collect();
        let pos_b: Vec<Vec3> = b.entities().values().map(|e| e.position).collect();
        assert_eq!(pos_a, pos_b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = DriftWorld::with_seed("a", 1, 4);
        let b = DriftWorld::with_seed("b", 2, 4);
        let pos_a: Vec<Vec3> = a.entities().values().map(|e| e.position).collect();
        let pos_b: Vec<Vec3> = b.entities().values().map(|e| e.position).collect();
        assert_ne!(pos_a, pos_b);
    }

    #[test]
    fn update_moves_entities() {
        let mut world = DriftWorld::with_seed("drift", 3, 5);
        let before: Vec<Vec3> = world.entities().values().map(|e| e.position).collect();
        world.update(time(100, 100)).unwrap();
        let after: Vec<Vec3> = world.entities().values().map(|e| e.position).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn entities_stay_inside_bounds() {
        let mut world = DriftWorld::with_seed("drift", 11, 16);
        let mut t = GameTime::default();
        for i in 1..=600 {
            t.stamp(FrameTime {
                delta: Duration::from_millis(50),
                total: Duration::from_millis(50 * i),
            });
            world.update(t).unwrap();
        }
        for entity in world.entities().values() {
            assert!(entity.position.x.abs() <= 12.0 + f32::EPSILON);
            assert!(entity.position.z.abs() <= 12.0 + f32::EPSILON);
        }
    }

    #[test]
    fn draws_one_instance_per_entity() {
        let mut world = DriftWorld::with_seed("drift", 5, 9);
        let mut device = RecordingDevice::new();
        world.draw_entities(&mut device).unwrap();
        assert_eq!(device.ops(), &[DeviceOp::Instances(9)]);
    }

    #[test]
    fn above_layer_is_empty() {
        let mut world = DriftWorld::with_seed("drift", 5, 9);
        let mut device = RecordingDevice::new();
        world.draw_layer(WorldLayer::Above, &mut device).unwrap();
        assert!(device.ops().is_empty());
        world.draw_layer(WorldLayer::Below, &mut device).unwrap();
        assert!(!device.ops().is_empty());
    }
}
