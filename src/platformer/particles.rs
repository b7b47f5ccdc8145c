//! Pickup sparkles. Purely cosmetic; positions are in level pixels.

use rand::Rng;

pub const BURST_SIZE: usize = 12;
const PARTICLE_GRAVITY: f32 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining lifetime in frames.
    pub life: f32,
    pub size: f32,
    /// Picks one of the two carrot-orange tints.
    pub warm: bool,
}

impl Particle {
    /// Opacity falls off over the last 60 frames of life.
    pub fn alpha(&self) -> f32 {
        (self.life / 60.0).clamp(0.0, 1.0)
    }
}

/// Spray `count` particles around `(x, y)`, biased upwards.
pub fn spawn_burst(particles: &mut Vec<Particle>, x: f32, y: f32, count: usize, rng: &mut impl Rng) {
    for _ in 0..count {
        particles.push(Particle {
            x: x + (rng.gen::<f32>() - 0.5) * 10.0,
            y: y + (rng.gen::<f32>() - 0.5) * 10.0,
            vx: (rng.gen::<f32>() - 0.5) * 3.0,
            vy: (rng.gen::<f32>() - 0.9) * -3.0,
            life: 40.0 + rng.gen::<f32>() * 20.0,
            size: 2.0 + rng.gen::<f32>() * 3.0,
            warm: rng.gen_bool(0.5),
        });
    }
}

/// One frame of ballistic motion with light damping; expired particles are dropped.
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.vy += PARTICLE_GRAVITY;
        p.x += p.vx;
        p.y += p.vy;
        p.life -= 1.0;
        p.vx *= 0.99;
        p.vy *= 0.995;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_burst_spawns_requested_count_near_origin() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut particles = Vec::new();
        spawn_burst(&mut particles, 100.0, 200.0, BURST_SIZE, &mut rng);
        assert_eq!(particles.len(), BURST_SIZE);
        for p in &particles {
            assert!((p.x - 100.0).abs() <= 5.0);
            assert!((p.y - 200.0).abs() <= 5.0);
            assert!(p.life >= 40.0 && p.life <= 60.0);
        }
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut particles = Vec::new();
        spawn_burst(&mut particles, 0.0, 0.0, 4, &mut rng);
        for _ in 0..61 {
            update_particles(&mut particles);
        }
        assert!(particles.is_empty());
    }
}
