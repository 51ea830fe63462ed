/// Static point cloud scattered around the scene
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::material::Rgb;

#[derive(Debug, Clone)]
pub struct ParticleField {
    pub points: Vec<Point3<f32>>,
    pub color: Rgb,
}

impl ParticleField {
    /// Scatter `count` points uniformly inside an axis-aligned cube of side
    /// `spread` centred on the origin. The same `seed` gives the same field.
    pub fn scatter(count: usize, spread: f32, seed: u64, color: Rgb) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut coordinate = || (rng.random::<f32>() - 0.5) * spread;

        let points = (0..count)
            .map(|_| {
                let x = coordinate();
                let y = coordinate();
                let z = coordinate();
                Point3::new(x, y, z)
            })
            .collect();

        tracing::debug!(count, spread, seed, "scattered particle field");
        Self { points, color }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
