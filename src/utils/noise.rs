// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Seeded 1-D gradient noise used by the Noise modifier.
//!
//! Smooth, deterministic pseudo-random displacement: a permutation table is
//! filled from a seeded RNG, values between lattice points are blended with
//! a smoothstep curve. Same seed, same curve.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TABLE_SIZE: usize = 256;

/// Deterministic gradient noise over one dimension
pub struct NoiseGen {
    table: [f32; TABLE_SIZE],
}

impl NoiseGen {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut table = [0.0f32; TABLE_SIZE];
        for v in table.iter_mut() {
            *v = rng.gen_range(-1.0..1.0);
        }
        Self { table }
    }

    fn lattice(&self, i: i64) -> f32 {
        self.table[(i.rem_euclid(TABLE_SIZE as i64)) as usize]
    }

    /// Noise value in [-1,1] at position `x`
    pub fn noise(&self, x: f32) -> f32 {
        let i = x.floor() as i64;
        let f = x - x.floor();
        // smoothstep blend between neighbouring lattice values
        let t = f * f * (3.0 - 2.0 * f);
        let a = self.lattice(i);
        let b = self.lattice(i + 1);
        a + t * (b - a)
    }
}
