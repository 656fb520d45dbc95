use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PickupConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub position: Vec3,
    pub radius: f32,
    pub tint: Vec3,
    active: bool,
}

impl Pickup {
    pub fn new(position: Vec3, radius: f32, tint: Vec3) -> Self {
        Self { position, radius, tint, active: true }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Inclusive sphere-sphere overlap test.
    pub fn touches(&self, player_position: Vec3, player_radius: f32) -> bool {
        player_position.distance(self.position) <= player_radius + self.radius
    }
}

/// Fixed collection of pickups. Entries are never added or removed after
/// generation; collecting one only clears its `active` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct PickupSet {
    pickups: Vec<Pickup>,
}

impl PickupSet {
    pub fn new(pickups: Vec<Pickup>) -> Self {
        Self { pickups }
    }

    /// Deterministic layout: the same seed and config always yield the same
    /// positions, radii and tints.
    pub fn generate(seed: u64, count: usize, config: &PickupConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let range = -config.range..config.range;
        let tint = config.tint_min..config.tint_max;

        let pickups = (0..count)
            .map(|i| {
                let x = rng.gen_range(range.clone());
                let z = rng.gen_range(range.clone());
                let y = config.base_height + i as f32 * config.height_step;
                let color = Vec3::new(
                    rng.gen_range(tint.clone()),
                    rng.gen_range(tint.clone()),
                    rng.gen_range(tint.clone()),
                );
                Pickup::new(Vec3::new(x, y, z), config.radius, color)
            })
            .collect();

        Self { pickups }
    }

    /// Deactivate every active pickup the player overlaps. Returns how many
    /// were collected by this call.
    pub fn evaluate(&mut self, player_position: Vec3, player_radius: f32) -> usize {
        let mut collected = 0;
        for (i, pickup) in self.pickups.iter_mut().enumerate() {
            if pickup.active && pickup.touches(player_position, player_radius) {
                pickup.active = false;
                collected += 1;
                tracing::debug!(index = i, position = ?pickup.position, "pickup collected");
            }
        }
        collected
    }

    pub fn active(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter().filter(|p| p.active)
    }

    pub fn all(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn collected_count(&self) -> usize {
        self.pickups.iter().filter(|p| !p.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(position: Vec3, radius: f32) -> PickupSet {
        PickupSet::new(vec![Pickup::new(position, radius, Vec3::ONE)])
    }

    #[test]
    fn same_seed_same_layout() {
        let cfg = PickupConfig::default();
        let a = PickupSet::generate(1337, 5, &cfg);
        let b = PickupSet::generate(1337, 5, &cfg);
        assert_eq!(a, b);

        let c = PickupSet::generate(7, 5, &cfg);
        assert_ne!(a.all()[0].position, c.all()[0].position);
    }

    #[test]
    fn seed_1337_stays_in_bounds() {
        let cfg = PickupConfig::default();
        let set = PickupSet::generate(1337, 5, &cfg);
        assert_eq!(set.len(), 5);
        for (i, p) in set.all().iter().enumerate() {
            assert!(p.position.x >= -40.0 && p.position.x <= 40.0);
            assert!(p.position.z >= -40.0 && p.position.z <= 40.0);
            assert!((p.position.y - (2.0 + i as f32 * 0.2)).abs() < 1e-6);
            assert_eq!(p.radius, 2.0);
            for c in p.tint.to_array() {
                assert!((0.3..1.0).contains(&c));
            }
            assert!(p.is_active());
        }
    }

    #[test]
    fn collision_boundary_is_inclusive() {
        let mut set = single(Vec3::new(2.5, 0.0, 0.0), 2.0);
        assert_eq!(set.evaluate(Vec3::ZERO, 0.5), 1);
        assert!(!set.all()[0].is_active());

        let mut set = single(Vec3::new(2.5 + 1e-3, 0.0, 0.0), 2.0);
        assert_eq!(set.evaluate(Vec3::ZERO, 0.5), 0);
        assert!(set.all()[0].is_active());
    }

    #[test]
    fn collected_pickups_never_come_back() {
        let mut set = single(Vec3::ZERO, 1.0);
        assert_eq!(set.evaluate(Vec3::ZERO, 0.5), 1);
        // moving away and back again changes nothing
        assert_eq!(set.evaluate(Vec3::new(100.0, 0.0, 0.0), 0.5), 0);
        assert_eq!(set.evaluate(Vec3::ZERO, 0.5), 0);
        assert_eq!(set.active().count(), 0);
        assert_eq!(set.collected_count(), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn several_pickups_can_go_in_one_frame() {
        let mut set = PickupSet::new(vec![
            Pickup::new(Vec3::new(1.0, 0.0, 0.0), 1.0, Vec3::ONE),
            Pickup::new(Vec3::new(-1.0, 0.0, 0.0), 1.0, Vec3::ONE),
            Pickup::new(Vec3::new(50.0, 0.0, 0.0), 1.0, Vec3::ONE),
        ]);
        assert_eq!(set.evaluate(Vec3::ZERO, 0.5), 2);
        let left: Vec<_> = set.active().map(|p| p.position.x).collect();
        assert_eq!(left, vec![50.0]);
    }
}
